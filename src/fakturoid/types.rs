use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Decimal carried verbatim as text. Accepts JSON strings or numbers and
/// always serializes as a string, so `"100.00"` stays `"100.00"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decimal(pub String);

impl Decimal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Decimal {
    fn from(value: &str) -> Self {
        Decimal(value.to_string())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl<'de> Visitor<'de> for DecimalVisitor {
            type Value = Decimal;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number or a numeric string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
                let trimmed = value.trim();
                if trimmed.is_empty() || trimmed.parse::<f64>().is_err() {
                    return Err(E::custom(format!("invalid decimal: {:?}", value)));
                }
                Ok(Decimal(trimmed.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
                Ok(Decimal(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
                Ok(Decimal(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
                Ok(Decimal(value.to_string()))
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}

// `#[serde(default)]` only covers absent keys; the API also sends explicit nulls.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Lines ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub name: String,
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    pub unit_price: Decimal,
    pub vat_rate: Decimal,
}

pub type InvoiceLine = DocumentLine;
pub type ExpenseLine = DocumentLine;

// --- Invoice ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subject_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_fulfillment_due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_note: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_amount: Option<Decimal>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<InvoiceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateInvoiceRequest {
    pub subject_id: u64,
    pub lines: Vec<InvoiceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_fulfillment_due: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateInvoiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<InvoiceLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendInvoiceRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicePayment {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub paid_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
}

// --- Subject (contact) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubjectFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    #[serde(flatten)]
    pub fields: SubjectFields,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSubjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: SubjectFields,
}

// --- Expense ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_number: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub subject_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<ExpenseLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateExpenseRequest {
    pub subject_id: u64,
    pub lines: Vec<ExpenseLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateExpenseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<ExpenseLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,
}

// --- Account ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "null_as_default")]
    pub subdomain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_price: Option<Decimal>,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
}

// --- Event ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_accepts_strings_and_numbers() {
        let line: DocumentLine = serde_json::from_value(serde_json::json!({
            "name": "Service",
            "quantity": "1",
            "unit_price": 100.5,
            "vat_rate": 21
        }))
        .unwrap();
        assert_eq!(line.quantity.as_str(), "1");
        assert_eq!(line.unit_price.as_str(), "100.5");
        assert_eq!(line.vat_rate.as_str(), "21");
    }

    #[test]
    fn decimal_rejects_non_numeric_text() {
        let parsed = serde_json::from_value::<Decimal>(serde_json::json!("ten"));
        assert!(parsed.is_err());
    }

    #[test]
    fn decimal_serializes_as_string() {
        let encoded = serde_json::to_value(Decimal::from("100.00")).unwrap();
        assert_eq!(encoded, serde_json::json!("100.00"));
    }

    #[test]
    fn invoice_tolerates_missing_fields() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "id": 7,
            "number": "2024-0007",
            "total": "1210.0"
        }))
        .unwrap();
        assert_eq!(invoice.id, 7);
        assert_eq!(invoice.total.unwrap().as_str(), "1210.0");
        assert!(invoice.lines.is_empty());
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "id": 9,
            "number": "2024-0009",
            "document_type": null,
            "subject_id": null,
            "lines": null
        }))
        .unwrap();
        assert_eq!(invoice.id, 9);
        assert_eq!(invoice.document_type, "");
        assert_eq!(invoice.subject_id, 0);
        assert!(invoice.lines.is_empty());

        let account: Account = serde_json::from_value(serde_json::json!({
            "subdomain": "acme",
            "email": null,
            "currency": "CZK"
        }))
        .unwrap();
        assert_eq!(account.subdomain, "acme");
        assert_eq!(account.email, "");

        let payment: InvoicePayment =
            serde_json::from_value(serde_json::json!({ "id": 1, "amount": null })).unwrap();
        assert_eq!(payment.amount, Decimal::default());
    }

    #[test]
    fn update_subject_skips_unset_fields() {
        let request = UpdateSubjectRequest {
            name: None,
            fields: SubjectFields {
                city: Some("Brno".to_string()),
                ..Default::default()
            },
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, serde_json::json!({ "city": "Brno" }));
    }

    #[test]
    fn subject_type_field_is_renamed() {
        let subject: Subject =
            serde_json::from_value(serde_json::json!({ "id": 3, "name": "ACME", "type": "customer" }))
                .unwrap();
        assert_eq!(subject.kind.as_deref(), Some("customer"));
    }
}
