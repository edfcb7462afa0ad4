use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_service::{
	Error as ServiceError, FeedRequest, FeedResponse, SearchHistoryRequest, SearchHistoryResponse,
	SearchRequest, SearchResponse, SearchType,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/feed", get(feed))
		.route("/v1/search", get(search))
		.route("/v1/search/history", get(search_history))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct FeedParams {
	pub viewer_id: Option<Uuid>,
	pub category: Option<String>,
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

async fn feed(
	State(state): State<AppState>,
	Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, ApiError> {
	let request = FeedRequest {
		viewer_id: params.viewer_id,
		category: params.category,
		limit: params.limit,
		offset: params.offset,
	};
	let response = state.service.feed(request).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
	pub q: String,
	pub viewer_id: Option<Uuid>,
	#[serde(rename = "type")]
	pub search_type: Option<String>,
	pub category: Option<String>,
	pub shop_name: Option<String>,
}

async fn search(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
	let search_type =
		params.search_type.as_deref().map(SearchType::from_filter).unwrap_or_default();
	let request = SearchRequest {
		query: params.q,
		viewer_id: params.viewer_id,
		search_type,
		category: params.category,
		shop_name: params.shop_name,
	};
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SearchHistoryParams {
	pub viewer_id: Uuid,
}

async fn search_history(
	State(state): State<AppState>,
	Query(params): Query<SearchHistoryParams>,
) -> Result<Json<SearchHistoryResponse>, ApiError> {
	let request = SearchHistoryRequest { viewer_id: params.viewer_id };
	let response = state.service.search_history(request).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::Catalog { .. } =>
				(StatusCode::INTERNAL_SERVER_ERROR, "catalog_unavailable"),
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
		};

		Self { status, error_code, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.status.is_server_error() {
			tracing::error!(error_code = self.error_code, message = %self.message, "Request failed.");
		}

		let body =
			ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
