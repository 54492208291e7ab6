//! Document listing endpoint
//!
//! GET /documents/?limit=1..100&prefix=<id prefix>

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::documents::{Document, ListQuery, PageLimit};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Raw query string parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub prefix: Option<String>,
}

impl TryFrom<ListParams> for ListQuery {
    type Error = AppError;

    fn try_from(params: ListParams) -> Result<Self> {
        let limit = match params.limit {
            Some(limit) => PageLimit::new(limit)?,
            None => PageLimit::default(),
        };

        Ok(ListQuery {
            prefix: params.prefix.unwrap_or_default(),
            limit,
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/documents/", get(list_documents))
}

/// List complete documents, newest first
async fn list_documents(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Document>>> {
    let Query(params) = params.map_err(|e| AppError::InvalidParameter(e.body_text()))?;
    let query = ListQuery::try_from(params)?;

    let documents = state.documents().list(&query).await?;
    Ok(Json(documents))
}
