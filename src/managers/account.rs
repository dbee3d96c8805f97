use crate::errors::ToolError;
use crate::fakturoid::{EventQuery, FakturoidClient};
use crate::managers::ToolTable;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::tool_errors::{failed, to_tool_value, unknown_action_error};
use serde_json::Value;
use std::sync::Arc;

pub const ACCOUNT_TOOLS: ToolTable = &[
    ("fakturoid_account_info", "account_info"),
    ("fakturoid_events", "events"),
];
const ACCOUNT_ACTIONS: &[&str] = &["account_info", "events"];

#[derive(Clone)]
pub struct AccountManager {
    logger: Logger,
    validation: Validation,
    client: Arc<FakturoidClient>,
}

impl AccountManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<FakturoidClient>) -> Self {
        Self {
            logger: logger.child("account"),
            validation,
            client,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "account_info" => {
                let account = self
                    .client
                    .get_account()
                    .await
                    .map_err(failed("get account info"))?;
                to_tool_value(&account)
            }
            "events" => {
                let query = EventQuery {
                    page: self.validation.ensure_page(&args)?,
                    since: self.validation.ensure_optional_string(&args, "since")?,
                };
                let events = self
                    .client
                    .list_events(&query)
                    .await
                    .map_err(failed("list events"))?;
                to_tool_value(&events)
            }
            _ => Err(unknown_action_error("account", action, ACCOUNT_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for AccountManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", args.get("action"));
        self.handle_action(args).await
    }
}
