//! Billing (Invoice) Model

use super::order::{PaymentMethod, PaymentStatus};
use serde::{Deserialize, Serialize};

/// What an invoice bills for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    Membership,
    Product,
    Service,
    Other,
}

/// Invoice entity, joined with customer, creator and membership plan names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub invoice_id: i64,
    pub invoice_number: String,
    /// `None` for walk-in invoices
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub membership_id: Option<i64>,
    pub plan_name: Option<String>,
    pub order_id: Option<i64>,
    pub invoice_type: InvoiceType,
    /// Subtotal before discount and tax
    pub amount: f64,
    pub discount: f64,
    pub tax: f64,
    /// `amount - discount + tax`
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub invoice_date: i64,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub created_by_user: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create invoice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub customer_id: Option<i64>,
    pub membership_id: Option<i64>,
    pub order_id: Option<i64>,
    pub invoice_type: InvoiceType,
    /// Omitted: taken from the linked order's grand total
    pub amount: Option<f64>,
    pub discount: Option<f64>,
    pub tax: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

/// Update invoice payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    pub payment_method: Option<PaymentMethod>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

/// Result of creating an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceCreated {
    pub id: i64,
    pub invoice_number: String,
    pub total_amount: f64,
}
