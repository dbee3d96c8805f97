use super::query::with_query;
use super::{
    CreateExpenseRequest, Expense, FakturoidClient, FakturoidError, ListQuery, SearchQuery,
    UpdateExpenseRequest,
};
use reqwest::Method;
use serde_json::Value;

impl FakturoidClient {
    pub async fn list_expenses(&self, query: &ListQuery) -> Result<Vec<Expense>, FakturoidError> {
        self.get_json(&with_query("/expenses.json", query)?).await
    }

    pub async fn get_expense(&self, id: u64) -> Result<Expense, FakturoidError> {
        self.get_json(&format!("/expenses/{}.json", id)).await
    }

    pub async fn search_expenses(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Expense>, FakturoidError> {
        self.get_json(&with_query("/expenses/search.json", query)?)
            .await
    }

    pub async fn create_expense(
        &self,
        request: &CreateExpenseRequest,
    ) -> Result<Expense, FakturoidError> {
        self.send_json(Method::POST, "/expenses.json", request).await
    }

    pub async fn update_expense(
        &self,
        id: u64,
        request: &UpdateExpenseRequest,
    ) -> Result<Expense, FakturoidError> {
        self.send_json(Method::PATCH, &format!("/expenses/{}.json", id), request)
            .await
    }

    pub async fn delete_expense(&self, id: u64) -> Result<(), FakturoidError> {
        self.send_discarding::<Value>(Method::DELETE, &format!("/expenses/{}.json", id), None)
            .await
    }
}
