//! Report Handlers
//!
//! Read-only aggregations, no side effects.

use axum::extract::State;
use shared::models::{MonthlyRevenue, Product, RevenueByType};

use crate::core::ServerState;
use crate::db::repository::report;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/reports/revenue
pub async fn revenue_by_type(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<RevenueByType>>> {
    let rows = report::revenue_by_type(state.pool()).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/reports/monthly
pub async fn monthly_revenue(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<MonthlyRevenue>>> {
    let rows = report::monthly_revenue(state.pool()).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/reports/low-stock
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Product>>> {
    let rows = report::low_stock(state.pool()).await?;
    Ok(ApiResponse::success(rows))
}
