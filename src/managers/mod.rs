pub mod account;
pub mod expenses;
pub mod invoices;
pub mod subjects;

pub use account::AccountManager;
pub use expenses::ExpenseManager;
pub use invoices::InvoiceManager;
pub use subjects::SubjectManager;

pub type ToolTable = &'static [(&'static str, &'static str)];
