use super::query::with_query;
use super::{
    CreateSubjectRequest, FakturoidClient, FakturoidError, ListQuery, SearchQuery, Subject,
    UpdateSubjectRequest,
};
use reqwest::Method;
use serde_json::Value;

impl FakturoidClient {
    pub async fn list_subjects(&self, query: &ListQuery) -> Result<Vec<Subject>, FakturoidError> {
        self.get_json(&with_query("/subjects.json", query)?).await
    }

    pub async fn get_subject(&self, id: u64) -> Result<Subject, FakturoidError> {
        self.get_json(&format!("/subjects/{}.json", id)).await
    }

    pub async fn search_subjects(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Subject>, FakturoidError> {
        self.get_json(&with_query("/subjects/search.json", query)?)
            .await
    }

    pub async fn create_subject(
        &self,
        request: &CreateSubjectRequest,
    ) -> Result<Subject, FakturoidError> {
        self.send_json(Method::POST, "/subjects.json", request).await
    }

    pub async fn update_subject(
        &self,
        id: u64,
        request: &UpdateSubjectRequest,
    ) -> Result<Subject, FakturoidError> {
        self.send_json(Method::PATCH, &format!("/subjects/{}.json", id), request)
            .await
    }

    pub async fn delete_subject(&self, id: u64) -> Result<(), FakturoidError> {
        self.send_discarding::<Value>(Method::DELETE, &format!("/subjects/{}.json", id), None)
            .await
    }
}
