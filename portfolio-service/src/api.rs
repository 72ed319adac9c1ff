use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::ApiResult,
    types::{HistoryResponse, PositionView, SubmitTransactionsRequest, SubmitTransactionsResponse},
    AppState,
};

pub fn app_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/transactions",
            get(list_transactions).post(submit_transactions),
        )
        .route("/balance", get(get_balance))
        .route("/lots", get(get_lots))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "msg": "Server is running!" }))
}

async fn health_check() -> impl IntoResponse {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    Json(serde_json::json!({
        "status": "healthy",
        "service": "portfolio-service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp
    }))
}

async fn submit_transactions(
    State(state): State<AppState>,
    payload: Result<Json<SubmitTransactionsRequest>, JsonRejection>,
) -> ApiResult<Json<SubmitTransactionsResponse>> {
    let Json(request) = payload?;
    let applied = request.transactions.len();

    let profit = state
        .portfolio
        .execute_transactions(request.transactions)
        .await?;

    Ok(Json(SubmitTransactionsResponse { profit, applied }))
}

async fn list_transactions(State(state): State<AppState>) -> ApiResult<Json<HistoryResponse>> {
    let transactions = state.portfolio.history().await?;
    Ok(Json(HistoryResponse { transactions }))
}

async fn get_balance(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let balances = state.portfolio.current_balances().await?;
    Ok(Json(balances))
}

async fn get_lots(State(state): State<AppState>) -> ApiResult<Json<Vec<PositionView>>> {
    let positions = state.portfolio.open_positions().await?;
    Ok(Json(positions))
}
