use super::query::with_query;
use super::{Account, Event, EventQuery, FakturoidClient, FakturoidError};

impl FakturoidClient {
    pub async fn get_account(&self) -> Result<Account, FakturoidError> {
        self.get_json("/account.json").await
    }

    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, FakturoidError> {
        self.get_json(&with_query("/events.json", query)?).await
    }
}
