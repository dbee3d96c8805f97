mod account;
mod auth;
mod client;
mod error;
mod expenses;
mod invoices;
mod query;
mod subjects;
mod transport;
mod types;

pub use auth::Credentials;
pub use client::{Endpoints, FakturoidClient};
pub use error::FakturoidError;
pub use query::{EventQuery, ListQuery, SearchQuery};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::*;
