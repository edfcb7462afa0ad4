use uuid::Uuid;

use bazaar_storage::models::{FeedProductRow, SellerSummaryRow};

use crate::{Error, FeedService, Result, signals::ViewerSignals};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
	Products,
	Sellers,
	#[default]
	All,
}
impl SearchType {
	/// Lenient wire parsing; unknown values fall back to searching both.
	pub fn from_filter(value: &str) -> Self {
		match value.trim() {
			"products" => Self::Products,
			"sellers" => Self::Sellers,
			_ => Self::All,
		}
	}

	fn includes_products(self) -> bool {
		matches!(self, Self::Products | Self::All)
	}

	fn includes_sellers(self) -> bool {
		matches!(self, Self::Sellers | Self::All)
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub viewer_id: Option<Uuid>,
	#[serde(default, rename = "type")]
	pub search_type: SearchType,
	pub category: Option<String>,
	pub shop_name: Option<String>,
}

/// A product hit on the search path. Same join as a feed entry, without
/// bucket or score: search results are ordered by recency only.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedCandidate {
	pub product_id: Uuid,
	pub seller_id: Uuid,
	pub name: String,
	pub description: String,
	pub price_minor: i64,
	pub discount_percent: i32,
	pub currency: String,
	pub images: Vec<String>,
	pub tags: Vec<String>,
	pub is_promoted: bool,
	#[serde(with = "crate::time_serde::option")]
	pub promotion_until: Option<time::OffsetDateTime>,
	pub views_count: i64,
	pub likes_count: i64,
	pub shares_count: i64,
	pub purchases_count: i64,
	pub rating: f32,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	pub shop_name: String,
	pub seller_logo: Option<String>,
	pub seller_username: String,
	pub is_liked: bool,
	pub is_subscribed: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SellerSummary {
	pub seller_id: Uuid,
	pub username: String,
	pub shop_name: String,
	pub description: String,
	pub logo_url: Option<String>,
	pub rating: f32,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	pub products_count: i64,
	pub subscribers_count: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub products: Vec<FeedCandidate>,
	pub sellers: Vec<SellerSummary>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHistoryRequest {
	pub viewer_id: Uuid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHistoryItem {
	pub query: String,
	pub category: Option<String>,
	pub shop_name: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHistoryResponse {
	pub queries: Vec<SearchHistoryItem>,
}

impl FeedService {
	/// Plain substring search over products and sellers, newest first. No
	/// relevance scoring on this path: the query itself already narrows
	/// the candidate set.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query is required.".to_string() });
		}

		let category = req.category.as_deref().map(str::trim).filter(|value| !value.is_empty());
		let shop_name = req.shop_name.as_deref().map(str::trim).filter(|value| !value.is_empty());

		let products = if req.search_type.includes_products() {
			self.providers
				.catalog
				.search_products(query, category, shop_name)
				.await
				.map_err(|err| Error::Catalog { message: err.to_string() })?
		} else {
			Vec::new()
		};
		let sellers = if req.search_type.includes_sellers() {
			self.providers
				.catalog
				.search_sellers(query, shop_name)
				.await
				.map_err(|err| Error::Catalog { message: err.to_string() })?
		} else {
			Vec::new()
		};

		let signals = self.load_viewer_signals(req.viewer_id).await;
		let products =
			products.into_iter().map(|row| feed_candidate(row, &signals)).collect();
		let sellers = sellers.into_iter().map(seller_summary).collect();

		// Fire and forget: a failed history append never fails the search.
		if let Some(viewer_id) = req.viewer_id
			&& let Err(err) = self
				.providers
				.signals
				.append_query(viewer_id, query, category, shop_name, time::OffsetDateTime::now_utc())
				.await
		{
			tracing::warn!(
				error = %err,
				%viewer_id,
				"Search history append failed; returning results anyway."
			);
		}

		Ok(SearchResponse { products, sellers })
	}

	/// The viewer's most recent queries, newest first, capped at the
	/// configured history limit. Lookup failures degrade to an empty list.
	pub async fn search_history(
		&self,
		req: SearchHistoryRequest,
	) -> Result<SearchHistoryResponse> {
		let limit = self.cfg.search.history_limit;
		let queries = match self.providers.signals.recent_queries(req.viewer_id, limit).await {
			Ok(rows) => rows
				.into_iter()
				.map(|row| SearchHistoryItem {
					query: row.query,
					category: row.category,
					shop_name: row.shop_name,
					created_at: row.created_at,
				})
				.collect(),
			Err(err) => {
				tracing::warn!(
					error = %err,
					viewer_id = %req.viewer_id,
					"Search history lookup failed; returning an empty history."
				);

				Vec::new()
			},
		};

		Ok(SearchHistoryResponse { queries })
	}
}

fn feed_candidate(row: FeedProductRow, signals: &ViewerSignals) -> FeedCandidate {
	FeedCandidate {
		product_id: row.product_id,
		seller_id: row.seller_id,
		name: row.name,
		description: row.description,
		price_minor: row.price_minor,
		discount_percent: row.discount_percent,
		currency: row.currency,
		images: row.images.0,
		tags: row.tags.0,
		is_promoted: row.is_promoted,
		promotion_until: row.promotion_until,
		views_count: row.views_count,
		likes_count: row.likes_count,
		shares_count: row.shares_count,
		purchases_count: row.purchases_count,
		rating: row.rating,
		created_at: row.created_at,
		shop_name: row.shop_name,
		seller_logo: row.seller_logo,
		seller_username: row.seller_username,
		is_liked: signals.is_liked(row.product_id),
		is_subscribed: signals.is_subscribed(row.seller_id),
	}
}

fn seller_summary(row: SellerSummaryRow) -> SellerSummary {
	SellerSummary {
		seller_id: row.seller_id,
		username: row.username,
		shop_name: row.shop_name,
		description: row.description,
		logo_url: row.logo_url,
		rating: row.rating,
		created_at: row.created_at,
		products_count: row.products_count,
		subscribers_count: row.subscribers_count,
	}
}
