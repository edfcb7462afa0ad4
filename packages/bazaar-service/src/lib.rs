pub mod feed;
pub mod search;
pub mod time_serde;

mod error;
mod signals;

use std::{future::Future, pin::Pin, sync::Arc};

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub use error::{Error, Result};
pub use feed::{FeedRequest, FeedResponse, RankedEntry};
pub use search::{
	FeedCandidate, SearchHistoryItem, SearchHistoryRequest, SearchHistoryResponse, SearchRequest,
	SearchResponse, SearchType, SellerSummary,
};

use bazaar_config::Config;
use bazaar_storage::{
	db::Db,
	models::{FeedProductRow, SearchHistoryRow, SellerSummaryRow},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Catalog reads. The catalog is the one hard dependency of the feed: a
/// failure here fails the request.
pub trait CatalogProvider
where
	Self: Send + Sync,
{
	fn approved_products(&self) -> BoxFuture<'_, color_eyre::Result<Vec<FeedProductRow>>>;

	fn search_products<'a>(
		&'a self,
		query: &'a str,
		category: Option<&'a str>,
		shop_name: Option<&'a str>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<FeedProductRow>>>;

	fn search_sellers<'a>(
		&'a self,
		query: &'a str,
		shop_name: Option<&'a str>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SellerSummaryRow>>>;
}

/// Per-viewer personalization signals. Failures on this path degrade to
/// "viewer has none" instead of failing the request.
pub trait SignalProvider
where
	Self: Send + Sync,
{
	fn subscribed_seller_ids(
		&self,
		viewer_id: Uuid,
	) -> BoxFuture<'_, color_eyre::Result<Vec<Uuid>>>;

	fn liked_product_ids(&self, viewer_id: Uuid) -> BoxFuture<'_, color_eyre::Result<Vec<Uuid>>>;

	fn recent_queries(
		&self,
		viewer_id: Uuid,
		limit: i64,
	) -> BoxFuture<'_, color_eyre::Result<Vec<SearchHistoryRow>>>;

	fn append_query<'a>(
		&'a self,
		viewer_id: Uuid,
		query: &'a str,
		category: Option<&'a str>,
		shop_name: Option<&'a str>,
		now: OffsetDateTime,
	) -> BoxFuture<'a, color_eyre::Result<()>>;
}

/// Review aggregates. Review data lives in the catalog schema, so lookup
/// failures are fatal like any other catalog read.
pub trait ReviewProvider
where
	Self: Send + Sync,
{
	fn high_rating_review_counts<'a>(
		&'a self,
		product_ids: &'a [Uuid],
		min_rating: i32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<(Uuid, i64)>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub catalog: Arc<dyn CatalogProvider>,
	pub signals: Arc<dyn SignalProvider>,
	pub reviews: Arc<dyn ReviewProvider>,
}
impl Providers {
	pub fn new(
		catalog: Arc<dyn CatalogProvider>,
		signals: Arc<dyn SignalProvider>,
		reviews: Arc<dyn ReviewProvider>,
	) -> Self {
		Self { catalog, signals, reviews }
	}

	pub fn postgres(pool: PgPool) -> Self {
		let provider = Arc::new(PgProviders { pool });

		Self { catalog: provider.clone(), signals: provider.clone(), reviews: provider }
	}
}

pub struct FeedService {
	pub cfg: Config,
	pub providers: Providers,
}
impl FeedService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let providers = Providers::postgres(db.pool);

		Self { cfg, providers }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}
}

struct PgProviders {
	pool: PgPool,
}

impl CatalogProvider for PgProviders {
	fn approved_products(&self) -> BoxFuture<'_, color_eyre::Result<Vec<FeedProductRow>>> {
		Box::pin(async move { Ok(queries::approved_products(&self.pool).await?) })
	}

	fn search_products<'a>(
		&'a self,
		query: &'a str,
		category: Option<&'a str>,
		shop_name: Option<&'a str>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<FeedProductRow>>> {
		Box::pin(async move {
			Ok(queries::search_products(&self.pool, query, category, shop_name).await?)
		})
	}

	fn search_sellers<'a>(
		&'a self,
		query: &'a str,
		shop_name: Option<&'a str>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SellerSummaryRow>>> {
		Box::pin(async move { Ok(queries::search_sellers(&self.pool, query, shop_name).await?) })
	}
}

impl SignalProvider for PgProviders {
	fn subscribed_seller_ids(
		&self,
		viewer_id: Uuid,
	) -> BoxFuture<'_, color_eyre::Result<Vec<Uuid>>> {
		Box::pin(async move { Ok(queries::subscribed_seller_ids(&self.pool, viewer_id).await?) })
	}

	fn liked_product_ids(&self, viewer_id: Uuid) -> BoxFuture<'_, color_eyre::Result<Vec<Uuid>>> {
		Box::pin(async move { Ok(queries::liked_product_ids(&self.pool, viewer_id).await?) })
	}

	fn recent_queries(
		&self,
		viewer_id: Uuid,
		limit: i64,
	) -> BoxFuture<'_, color_eyre::Result<Vec<SearchHistoryRow>>> {
		Box::pin(async move { Ok(queries::recent_queries(&self.pool, viewer_id, limit).await?) })
	}

	fn append_query<'a>(
		&'a self,
		viewer_id: Uuid,
		query: &'a str,
		category: Option<&'a str>,
		shop_name: Option<&'a str>,
		now: OffsetDateTime,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			Ok(queries::append_search_query(&self.pool, viewer_id, query, category, shop_name, now)
				.await?)
		})
	}
}

impl ReviewProvider for PgProviders {
	fn high_rating_review_counts<'a>(
		&'a self,
		product_ids: &'a [Uuid],
		min_rating: i32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<(Uuid, i64)>>> {
		Box::pin(async move {
			Ok(queries::high_rating_review_counts(&self.pool, product_ids, min_rating).await?)
		})
	}
}
