//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (joined with its category name)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: f64,
    pub stock_qty: i64,
    /// Reorder threshold; the product is low on stock at or below it
    pub low_stock_alert: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub product_name: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub stock_qty: Option<i64>,
    pub low_stock_alert: Option<i64>,
    pub image_url: Option<String>,
}

/// Update product payload
///
/// Stock is not editable here; use the stock adjustment endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub low_stock_alert: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Signed stock delta (positive restocks, negative removes)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockAdjust {
    pub qty: i64,
}

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductCategory {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCategoryCreate {
    pub category_name: String,
    pub description: Option<String>,
}
