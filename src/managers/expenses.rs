use crate::errors::ToolError;
use crate::fakturoid::{
    CreateExpenseRequest, FakturoidClient, ListQuery, SearchQuery, UpdateExpenseRequest,
};
use crate::managers::ToolTable;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::tool_errors::{failed, to_tool_value, unknown_action_error};
use serde_json::Value;
use std::sync::Arc;

pub const EXPENSE_TOOLS: ToolTable = &[
    ("fakturoid_expense_list", "expense_list"),
    ("fakturoid_expense_detail", "expense_detail"),
    ("fakturoid_expense_search", "expense_search"),
    ("fakturoid_expense_create", "expense_create"),
    ("fakturoid_expense_update", "expense_update"),
    ("fakturoid_expense_delete", "expense_delete"),
];
const EXPENSE_ACTIONS: &[&str] = &[
    "expense_list",
    "expense_detail",
    "expense_search",
    "expense_create",
    "expense_update",
    "expense_delete",
];

#[derive(Clone)]
pub struct ExpenseManager {
    logger: Logger,
    validation: Validation,
    client: Arc<FakturoidClient>,
}

impl ExpenseManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<FakturoidClient>) -> Self {
        Self {
            logger: logger.child("expense"),
            validation,
            client,
        }
    }

    fn list_query(&self, args: &Value) -> Result<ListQuery, ToolError> {
        Ok(ListQuery {
            page: self.validation.ensure_page(args)?,
            status: self.validation.ensure_optional_string(args, "status")?,
            subject_id: self.validation.ensure_optional_id(args, "subject_id")?,
            since: self.validation.ensure_optional_string(args, "since")?,
            updated_since: self
                .validation
                .ensure_optional_string(args, "updated_since")?,
        })
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "expense_list" => {
                let query = self.list_query(&args)?;
                let expenses = self
                    .client
                    .list_expenses(&query)
                    .await
                    .map_err(failed("list expenses"))?;
                to_tool_value(&expenses)
            }
            "expense_detail" => {
                let id = self.validation.ensure_id(&args, "id")?;
                let expense = self
                    .client
                    .get_expense(id)
                    .await
                    .map_err(failed("get expense"))?;
                to_tool_value(&expense)
            }
            "expense_search" => {
                let query = SearchQuery::new(
                    self.validation.ensure_string(&args, "query")?,
                    self.validation.ensure_page(&args)?,
                );
                let expenses = self
                    .client
                    .search_expenses(&query)
                    .await
                    .map_err(failed("search expenses"))?;
                to_tool_value(&expenses)
            }
            "expense_create" => {
                let request = CreateExpenseRequest {
                    subject_id: self.validation.ensure_id(&args, "subject_id")?,
                    lines: self.validation.ensure_lines(&args)?,
                    original_number: self
                        .validation
                        .ensure_optional_string(&args, "original_number")?,
                    currency: self.validation.ensure_optional_string(&args, "currency")?,
                    issued_on: self.validation.ensure_optional_string(&args, "issued_on")?,
                    due_on: self.validation.ensure_optional_string(&args, "due_on")?,
                    private_note: self.validation.ensure_optional_string(&args, "note")?,
                };
                let expense = self
                    .client
                    .create_expense(&request)
                    .await
                    .map_err(failed("create expense"))?;
                to_tool_value(&expense)
            }
            "expense_update" => {
                let id = self.validation.ensure_id(&args, "id")?;
                let request = UpdateExpenseRequest {
                    subject_id: self.validation.ensure_optional_id(&args, "subject_id")?,
                    lines: self.validation.ensure_optional_lines(&args)?,
                    original_number: self
                        .validation
                        .ensure_optional_string(&args, "original_number")?,
                    currency: self.validation.ensure_optional_string(&args, "currency")?,
                    issued_on: self.validation.ensure_optional_string(&args, "issued_on")?,
                    due_on: self.validation.ensure_optional_string(&args, "due_on")?,
                    private_note: self.validation.ensure_optional_string(&args, "note")?,
                };
                let expense = self
                    .client
                    .update_expense(id, &request)
                    .await
                    .map_err(failed("update expense"))?;
                to_tool_value(&expense)
            }
            "expense_delete" => {
                let id = self.validation.ensure_id(&args, "id")?;
                self.client
                    .delete_expense(id)
                    .await
                    .map_err(failed("delete expense"))?;
                Ok(Value::String(format!("Expense {} deleted", id)))
            }
            _ => Err(unknown_action_error("expense", action, EXPENSE_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for ExpenseManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", args.get("action"));
        self.handle_action(args).await
    }
}
