use crate::app::{App, StartupError};
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::{list_tools, tool_by_name, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::services::logger::Logger;
use crate::utils::output::{render_tool_error, render_tool_text};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "fakturoid-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const OUTBOX_CAPACITY: usize = 64;

fn tool_result(text: String, is_error: bool) -> Value {
    serde_json::json!({
        "content": [ { "type": "text", "text": text } ],
        "isError": is_error,
    })
}

pub struct McpServer {
    app: Arc<App>,
    logger: Logger,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        let logger = app.logger.child("server");
        Self { app, logger }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": list_tools() })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim();
        if name.is_empty() {
            return Err(McpError::invalid_params("Missing tool name"));
        }
        if tool_by_name(name).is_none() || !self.app.tool_executor.has_tool(name) {
            return Err(McpError::invalid_params(format!("Unknown tool: {}", name)));
        }

        let args = match params.get("arguments") {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(args) => args.clone(),
        };
        let outcome: Result<Value, ToolError> = match validate_tool_args(name, &args) {
            Ok(()) => self.app.tool_executor.execute(name, args).await,
            Err(err) => Err(err),
        };
        Ok(match outcome {
            Ok(value) => tool_result(render_tool_text(&value), false),
            Err(err) => tool_result(render_tool_error(name, &err), true),
        })
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.logger.debug(
                "notification",
                Some(&serde_json::json!({ "method": request.method })),
            );
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                McpError::new(ErrorCode::InvalidRequest, "Invalid request: jsonrpc must be \"2.0\""),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            other => Err(McpError::new(
                ErrorCode::MethodNotFound,
                format!("Method not found: {}", other),
            )),
        };
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::failure(id, err),
        })
    }

    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(trimmed) {
            Err(err) => Some(JsonRpcResponse::failure(
                Value::Null,
                McpError::new(ErrorCode::ParseError, format!("Parse error: {}", err)),
            )),
            Ok(parsed) => {
                let id = parsed.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(parsed) {
                    Ok(request) => self.dispatch(request).await,
                    Err(err) => Some(JsonRpcResponse::failure(
                        id,
                        McpError::new(
                            ErrorCode::InvalidRequest,
                            format!("Invalid request: {}", err),
                        ),
                    )),
                }
            }
        };

        response.map(|response| match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(err) => {
                self.logger.error(
                    "failed to encode response",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
                serde_json::json!({
                    "jsonrpc": JSONRPC_VERSION,
                    "id": response.id,
                    "error": {
                        "code": ErrorCode::InternalError.as_i32(),
                        "message": "Internal error",
                    },
                })
                .to_string()
            }
        })
    }

    /// Reads newline-delimited JSON-RPC from `reader` until EOF. Each message
    /// runs on its own task; a single writer task serializes the replies.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbox, mut inbox) = mpsc::channel::<String>(OUTBOX_CAPACITY);
        let writer_logger = self.logger.clone();
        let writer_task = tokio::spawn(async move {
            let mut writer = BufWriter::new(writer);
            while let Some(payload) = inbox.recv().await {
                let written = async {
                    writer.write_all(payload.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await
                }
                .await;
                if let Err(err) = written {
                    writer_logger.error(
                        "stdout write failed",
                        Some(&serde_json::json!({ "error": err.to_string() })),
                    );
                    return Err(ToolError::from(err));
                }
            }
            Ok(())
        });

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let server = self.clone();
            let outbox = outbox.clone();
            tokio::spawn(async move {
                if let Some(payload) = server.handle_line(&line).await {
                    let _ = outbox.send(payload).await;
                }
            });
        }
        drop(outbox);

        match writer_task.await {
            Ok(result) => result,
            Err(err) => Err(ToolError::internal(format!("writer task failed: {}", err))),
        }
    }
}

pub async fn run_stdio() -> Result<(), StartupError> {
    let app = Arc::new(App::initialize()?);
    app.logger.info(
        "fakturoid-mcp ready",
        Some(&serde_json::json!({ "version": SERVER_VERSION })),
    );
    let server = Arc::new(McpServer::new(app));
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}
