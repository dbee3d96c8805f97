use super::query::with_query;
use super::{
    CreateInvoiceRequest, FakturoidClient, FakturoidError, Invoice, InvoicePayment, ListQuery,
    SearchQuery, SendInvoiceRequest, UpdateInvoiceRequest,
};
use reqwest::Method;
use serde_json::Value;

impl FakturoidClient {
    pub async fn list_invoices(&self, query: &ListQuery) -> Result<Vec<Invoice>, FakturoidError> {
        self.get_json(&with_query("/invoices.json", query)?).await
    }

    pub async fn get_invoice(&self, id: u64) -> Result<Invoice, FakturoidError> {
        self.get_json(&format!("/invoices/{}.json", id)).await
    }

    pub async fn search_invoices(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Invoice>, FakturoidError> {
        self.get_json(&with_query("/invoices/search.json", query)?)
            .await
    }

    pub async fn create_invoice(
        &self,
        request: &CreateInvoiceRequest,
    ) -> Result<Invoice, FakturoidError> {
        self.send_json(Method::POST, "/invoices.json", request).await
    }

    pub async fn update_invoice(
        &self,
        id: u64,
        request: &UpdateInvoiceRequest,
    ) -> Result<Invoice, FakturoidError> {
        self.send_json(Method::PATCH, &format!("/invoices/{}.json", id), request)
            .await
    }

    pub async fn delete_invoice(&self, id: u64) -> Result<(), FakturoidError> {
        self.send_discarding::<Value>(Method::DELETE, &format!("/invoices/{}.json", id), None)
            .await
    }

    pub async fn list_invoice_payments(
        &self,
        invoice_id: u64,
    ) -> Result<Vec<InvoicePayment>, FakturoidError> {
        self.get_json(&format!("/invoices/{}/payments.json", invoice_id))
            .await
    }

    /// Emails the invoice; `#link#` in the message expands to the invoice link.
    pub async fn send_invoice(
        &self,
        invoice_id: u64,
        request: &SendInvoiceRequest,
    ) -> Result<(), FakturoidError> {
        self.send_discarding(
            Method::POST,
            &format!("/invoices/{}/message.json", invoice_id),
            Some(request),
        )
        .await
    }
}
