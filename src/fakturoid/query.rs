use super::FakturoidError;
use crate::constants::pagination::DEFAULT_PAGE;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_since: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            status: None,
            subject_id: None,
            since: None,
            updated_since: None,
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::page(DEFAULT_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventQuery {
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            since: None,
        }
    }
}

pub(crate) fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, FakturoidError> {
    let encoded =
        serde_urlencoded::to_string(query).map_err(|err| FakturoidError::Encode(err.to_string()))?;
    if encoded.is_empty() {
        return Ok(path.to_string());
    }
    Ok(format!("{}?{}", path, encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_encodes_only_set_filters() {
        let query = ListQuery {
            status: Some("paid".to_string()),
            ..ListQuery::page(2)
        };
        assert_eq!(
            with_query("/invoices.json", &query).unwrap(),
            "/invoices.json?page=2&status=paid"
        );
    }

    #[test]
    fn search_query_escapes_text() {
        let query = SearchQuery::new("ACME s.r.o. & co", 1);
        assert_eq!(
            with_query("/subjects/search.json", &query).unwrap(),
            "/subjects/search.json?query=ACME+s.r.o.+%26+co&page=1"
        );
    }

    #[test]
    fn default_list_query_is_first_page() {
        assert_eq!(
            with_query("/expenses.json", &ListQuery::default()).unwrap(),
            "/expenses.json?page=1"
        );
    }
}
