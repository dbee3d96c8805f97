use crate::errors::ToolError;
use crate::fakturoid::{
    CreateSubjectRequest, FakturoidClient, ListQuery, SearchQuery, SubjectFields,
    UpdateSubjectRequest,
};
use crate::managers::ToolTable;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::tool_errors::{failed, to_tool_value, unknown_action_error};
use serde_json::Value;
use std::sync::Arc;

pub const SUBJECT_TOOLS: ToolTable = &[
    ("fakturoid_subject_list", "subject_list"),
    ("fakturoid_subject_detail", "subject_detail"),
    ("fakturoid_subject_search", "subject_search"),
    ("fakturoid_subject_create", "subject_create"),
    ("fakturoid_subject_update", "subject_update"),
    ("fakturoid_subject_delete", "subject_delete"),
];
const SUBJECT_ACTIONS: &[&str] = &[
    "subject_list",
    "subject_detail",
    "subject_search",
    "subject_create",
    "subject_update",
    "subject_delete",
];

#[derive(Clone)]
pub struct SubjectManager {
    logger: Logger,
    validation: Validation,
    client: Arc<FakturoidClient>,
}

impl SubjectManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<FakturoidClient>) -> Self {
        Self {
            logger: logger.child("subject"),
            validation,
            client,
        }
    }

    fn contact_fields(&self, args: &Value) -> Result<SubjectFields, ToolError> {
        let field = |key: &str| self.validation.ensure_optional_string(args, key);
        Ok(SubjectFields {
            street: field("street")?,
            city: field("city")?,
            zip: field("zip")?,
            country: field("country")?,
            registration_no: field("registration_no")?,
            vat_no: field("vat_no")?,
            email: field("email")?,
            phone: field("phone")?,
        })
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "subject_list" => {
                // Subjects have no status or subject filter upstream.
                let query = ListQuery {
                    since: self.validation.ensure_optional_string(&args, "since")?,
                    updated_since: self
                        .validation
                        .ensure_optional_string(&args, "updated_since")?,
                    ..ListQuery::page(self.validation.ensure_page(&args)?)
                };
                let subjects = self
                    .client
                    .list_subjects(&query)
                    .await
                    .map_err(failed("list subjects"))?;
                to_tool_value(&subjects)
            }
            "subject_detail" => {
                let id = self.validation.ensure_id(&args, "id")?;
                let subject = self
                    .client
                    .get_subject(id)
                    .await
                    .map_err(failed("get subject"))?;
                to_tool_value(&subject)
            }
            "subject_search" => {
                let query = SearchQuery::new(
                    self.validation.ensure_string(&args, "query")?,
                    self.validation.ensure_page(&args)?,
                );
                let subjects = self
                    .client
                    .search_subjects(&query)
                    .await
                    .map_err(failed("search subjects"))?;
                to_tool_value(&subjects)
            }
            "subject_create" => {
                let request = CreateSubjectRequest {
                    name: self.validation.ensure_string(&args, "name")?,
                    fields: self.contact_fields(&args)?,
                };
                let subject = self
                    .client
                    .create_subject(&request)
                    .await
                    .map_err(failed("create subject"))?;
                to_tool_value(&subject)
            }
            "subject_update" => {
                let id = self.validation.ensure_id(&args, "id")?;
                let request = UpdateSubjectRequest {
                    name: self.validation.ensure_optional_string(&args, "name")?,
                    fields: self.contact_fields(&args)?,
                };
                let subject = self
                    .client
                    .update_subject(id, &request)
                    .await
                    .map_err(failed("update subject"))?;
                to_tool_value(&subject)
            }
            "subject_delete" => {
                let id = self.validation.ensure_id(&args, "id")?;
                self.client
                    .delete_subject(id)
                    .await
                    .map_err(failed("delete subject"))?;
                Ok(Value::String(format!("Subject {} deleted", id)))
            }
            _ => Err(unknown_action_error("subject", action, SUBJECT_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for SubjectManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", args.get("action"));
        self.handle_action(args).await
    }
}
