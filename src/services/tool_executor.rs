use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::services::logger::Logger;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolRoute {
    pub handler: Arc<dyn ToolHandler>,
    pub action: &'static str,
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    routes: Arc<HashMap<String, ToolRoute>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, routes: HashMap<String, ToolRoute>) -> Self {
        Self {
            logger: logger.child("executor"),
            routes: Arc::new(routes),
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.routes.contains_key(tool)
    }

    fn merge_action(args: Value, action: &str) -> Value {
        let mut map = match args {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        map.insert("action".to_string(), Value::String(action.to_string()));
        Value::Object(map)
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let route = self.routes.get(tool).ok_or_else(|| {
            ToolError::not_found(format!("Unknown tool: {}", tool))
                .with_hint("Call tools/list to see the available tools")
        })?;

        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({ "tool": tool, "action": route.action, "call_id": call_id })),
        );

        let result = route
            .handler
            .handle(Self::merge_action(args, route.action))
            .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.logger.info(
                "tool completed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "call_id": call_id,
                    "duration_ms": duration_ms,
                })),
            ),
            Err(err) => self.logger.warn(
                "tool failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "call_id": call_id,
                    "duration_ms": duration_ms,
                    "code": err.code,
                    "kind": err.kind,
                })),
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;
    use crate::services::logger::LogLevel;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, args: Value) -> Result<Value, ToolError> {
            Ok(args)
        }
    }

    fn executor() -> ToolExecutor {
        let mut routes = HashMap::new();
        routes.insert(
            "fakturoid_invoice_detail".to_string(),
            ToolRoute {
                handler: Arc::new(Echo),
                action: "invoice_detail",
            },
        );
        ToolExecutor::new(Logger::with_level("test", LogLevel::Error), routes)
    }

    #[tokio::test]
    async fn injects_routed_action() {
        let result = executor()
            .execute(
                "fakturoid_invoice_detail",
                serde_json::json!({"id": 5, "action": "invoice_delete"}),
            )
            .await
            .unwrap();
        assert_eq!(result["action"], "invoice_detail");
        assert_eq!(result["id"], 5);
    }

    #[tokio::test]
    async fn non_object_arguments_become_empty_map() {
        let result = executor()
            .execute("fakturoid_invoice_detail", Value::Null)
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!({"action": "invoice_detail"}));
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let err = executor()
            .execute("fakturoid_nope", serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::NotFound);
    }
}
