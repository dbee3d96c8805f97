use crate::errors::ToolError;
use crate::fakturoid::{
    CreateInvoiceRequest, FakturoidClient, ListQuery, SearchQuery, SendInvoiceRequest,
    UpdateInvoiceRequest,
};
use crate::managers::ToolTable;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::tool_errors::{failed, to_tool_value, unknown_action_error};
use serde_json::Value;
use std::sync::Arc;

pub const INVOICE_TOOLS: ToolTable = &[
    ("fakturoid_invoice_list", "invoice_list"),
    ("fakturoid_invoice_detail", "invoice_detail"),
    ("fakturoid_invoice_search", "invoice_search"),
    ("fakturoid_invoice_create", "invoice_create"),
    ("fakturoid_invoice_update", "invoice_update"),
    ("fakturoid_invoice_delete", "invoice_delete"),
    ("fakturoid_invoice_send", "invoice_send"),
    ("fakturoid_invoice_payments", "invoice_payments"),
];
const INVOICE_ACTIONS: &[&str] = &[
    "invoice_list",
    "invoice_detail",
    "invoice_search",
    "invoice_create",
    "invoice_update",
    "invoice_delete",
    "invoice_send",
    "invoice_payments",
];

#[derive(Clone)]
pub struct InvoiceManager {
    logger: Logger,
    validation: Validation,
    client: Arc<FakturoidClient>,
}

impl InvoiceManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<FakturoidClient>) -> Self {
        Self {
            logger: logger.child("invoice"),
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

    fn create_request(&self, args: &Value) -> Result<CreateInvoiceRequest, ToolError> {
        Ok(CreateInvoiceRequest {
            subject_id: self.validation.ensure_id(args, "subject_id")?,
            lines: self.validation.ensure_lines(args)?,
            currency: self.validation.ensure_optional_string(args, "currency")?,
            note: self.validation.ensure_optional_string(args, "note")?,
            due_on: self.validation.ensure_optional_string(args, "due_on")?,
            issued_on: self.validation.ensure_optional_string(args, "issued_on")?,
            taxable_fulfillment_due: self
                .validation
                .ensure_optional_string(args, "taxable_fulfillment_due")?,
        })
    }

    fn update_request(&self, args: &Value) -> Result<UpdateInvoiceRequest, ToolError> {
        Ok(UpdateInvoiceRequest {
            subject_id: self.validation.ensure_optional_id(args, "subject_id")?,
            lines: self.validation.ensure_optional_lines(args)?,
            currency: self.validation.ensure_optional_string(args, "currency")?,
            note: self.validation.ensure_optional_string(args, "note")?,
            due_on: self.validation.ensure_optional_string(args, "due_on")?,
        })
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "invoice_list" => {
                let query = self.list_query(&args)?;
                let invoices = self
                    .client
                    .list_invoices(&query)
                    .await
                    .map_err(failed("list invoices"))?;
                to_tool_value(&invoices)
            }
            "invoice_detail" => {
                let id = self.validation.ensure_id(&args, "id")?;
                let invoice = self
                    .client
                    .get_invoice(id)
                    .await
                    .map_err(failed("get invoice"))?;
                to_tool_value(&invoice)
            }
            "invoice_search" => {
                let query = SearchQuery::new(
                    self.validation.ensure_string(&args, "query")?,
                    self.validation.ensure_page(&args)?,
                );
                let invoices = self
                    .client
                    .search_invoices(&query)
                    .await
                    .map_err(failed("search invoices"))?;
                to_tool_value(&invoices)
            }
            "invoice_create" => {
                let request = self.create_request(&args)?;
                let invoice = self
                    .client
                    .create_invoice(&request)
                    .await
                    .map_err(failed("create invoice"))?;
                to_tool_value(&invoice)
            }
            "invoice_update" => {
                let id = self.validation.ensure_id(&args, "id")?;
                let request = self.update_request(&args)?;
                let invoice = self
                    .client
                    .update_invoice(id, &request)
                    .await
                    .map_err(failed("update invoice"))?;
                to_tool_value(&invoice)
            }
            "invoice_delete" => {
                let id = self.validation.ensure_id(&args, "id")?;
                self.client
                    .delete_invoice(id)
                    .await
                    .map_err(failed("delete invoice"))?;
                Ok(Value::String(format!("Invoice {} deleted", id)))
            }
            "invoice_send" => {
                let invoice_id = self.validation.ensure_id(&args, "invoice_id")?;
                let request = SendInvoiceRequest {
                    email: self.validation.ensure_string(&args, "email")?,
                    email_copy: self.validation.ensure_optional_string(&args, "email_copy")?,
                    subject: self.validation.ensure_optional_string(&args, "subject")?,
                    message: self.validation.ensure_optional_string(&args, "message")?,
                };
                self.client
                    .send_invoice(invoice_id, &request)
                    .await
                    .map_err(failed("send invoice"))?;
                Ok(Value::String(format!(
                    "Invoice {} sent to {}",
                    invoice_id, request.email
                )))
            }
            "invoice_payments" => {
                let invoice_id = self.validation.ensure_id(&args, "invoice_id")?;
                let payments = self
                    .client
                    .list_invoice_payments(invoice_id)
                    .await
                    .map_err(failed("list invoice payments"))?;
                to_tool_value(&payments)
            }
            _ => Err(unknown_action_error("invoice", action, INVOICE_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for InvoiceManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", args.get("action"));
        self.handle_action(args).await
    }
}
