use crate::config::{Config, ConfigError};
use crate::errors::ToolError;
use crate::fakturoid::{FakturoidClient, FakturoidError};
use crate::managers::account::ACCOUNT_TOOLS;
use crate::managers::expenses::EXPENSE_TOOLS;
use crate::managers::invoices::INVOICE_TOOLS;
use crate::managers::subjects::SUBJECT_TOOLS;
use crate::managers::{AccountManager, ExpenseManager, InvoiceManager, SubjectManager, ToolTable};
use crate::mcp::catalog::tool_catalog;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler, ToolRoute};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot build HTTP client: {0}")]
    Client(#[from] FakturoidError),

    #[error("{0}")]
    Server(#[from] ToolError),
}

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(routes: &HashMap<String, ToolRoute>) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !routes.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        let mut undeclared: Vec<String> = routes
            .keys()
            .filter(|name| !tool_catalog().iter().any(|tool| &tool.name == *name))
            .cloned()
            .collect();
        if missing.is_empty() && undeclared.is_empty() {
            return Ok(());
        }
        missing.sort();
        undeclared.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint(
                "Every tool in tool_catalog.json needs a manager route, and every route a catalog entry.",
            )
            .with_details(serde_json::json!({
                "missing_tools": missing,
                "undeclared_tools": undeclared,
            })))
    }

    fn route_all(
        routes: &mut HashMap<String, ToolRoute>,
        handler: Arc<dyn ToolHandler>,
        table: ToolTable,
    ) {
        for &(tool, action) in table.iter() {
            routes.insert(
                tool.to_string(),
                ToolRoute {
                    handler: handler.clone(),
                    action,
                },
            );
        }
    }

    pub fn new(client: Arc<FakturoidClient>, logger: Logger) -> Result<Self, ToolError> {
        let validation = Validation::new();

        let account = Arc::new(AccountManager::new(
            logger.clone(),
            validation.clone(),
            client.clone(),
        ));
        let invoices = Arc::new(InvoiceManager::new(
            logger.clone(),
            validation.clone(),
            client.clone(),
        ));
        let subjects = Arc::new(SubjectManager::new(
            logger.clone(),
            validation.clone(),
            client.clone(),
        ));
        let expenses = Arc::new(ExpenseManager::new(logger.clone(), validation, client));

        let mut routes = HashMap::new();
        Self::route_all(&mut routes, account, ACCOUNT_TOOLS);
        Self::route_all(&mut routes, invoices, INVOICE_TOOLS);
        Self::route_all(&mut routes, subjects, SUBJECT_TOOLS);
        Self::route_all(&mut routes, expenses, EXPENSE_TOOLS);
        Self::validate_tool_wiring(&routes)?;

        Ok(Self {
            tool_executor: Arc::new(ToolExecutor::new(logger.clone(), routes)),
            logger,
        })
    }

    pub fn initialize() -> Result<Self, StartupError> {
        let logger = Logger::new("fakturoid-mcp");
        let config = Config::load()?;
        logger.info(
            "configuration loaded",
            Some(&serde_json::json!({
                "slug": config.credentials.slug,
                "base_url": config.endpoints.base_url,
                "config_path": config.source_path.display().to_string(),
            })),
        );
        let client = FakturoidClient::new(config.credentials, logger.clone())?
            .with_endpoints(config.endpoints);
        Ok(Self::new(Arc::new(client), logger)?)
    }
}
