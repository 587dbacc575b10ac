use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::ApiState;
use crate::search::SearchOptions;

/// Default page size of `/api/emails`.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// `GET /api/search?q=&from=&size=&sort=&order=&fields=`
pub async fn search(
    State(state): State<ApiState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let options = search_options(&params)?;
    let results = state.backend.search(&state.index, &options).await?;
    Ok(Json(results))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
}

/// `GET /api/emails?page=&size=`, newest first.
pub async fn list_emails(
    State(state): State<ApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let page = parse_or(params.page.as_deref(), 0);
    let size = parse_or(params.size.as_deref(), DEFAULT_PAGE_SIZE);
    let results = state
        .backend
        .list_all(&state.index, page.saturating_mul(size), size)
        .await?;
    Ok(Json(results))
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build search options from raw query pairs.
///
/// `fields` may be repeated and each value may hold a comma-separated list.
/// Unparseable numbers fall back to their defaults.
pub fn search_options(params: &[(String, String)]) -> Result<SearchOptions, ApiError> {
    let query = param(params, "q")
        .ok_or_else(|| ApiError::BadRequest("query parameter 'q' is required".to_string()))?;
    let mut options = SearchOptions::new(query);

    let fields: Vec<String> = params
        .iter()
        .filter(|(k, _)| k == "fields")
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if !fields.is_empty() {
        options.fields = fields;
    }

    options.from = parse_or(param(params, "from"), 0);
    let size = parse_or(param(params, "size"), options.size);
    if size > 0 {
        options.size = size;
    }
    options.sort_field = param(params, "sort").map(str::to_string);
    if let Some(order) = param(params, "order").and_then(|o| o.parse().ok()) {
        options.sort_order = order;
    }
    Ok(options)
}

/// First non-blank value of `key`.
fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_or(value: Option<&str>, default: usize) -> usize {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
