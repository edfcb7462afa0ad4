use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

/// An approved product joined with its approved seller's summary. One row
/// per feed candidate; the counters are snapshot reads, not transactional.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct FeedProductRow {
	pub product_id: Uuid,
	pub seller_id: Uuid,
	pub name: String,
	pub description: String,
	pub price_minor: i64,
	pub discount_percent: i32,
	pub currency: String,
	pub images: Json<Vec<String>>,
	pub tags: Json<Vec<String>>,
	pub status: String,
	pub is_promoted: bool,
	pub promotion_until: Option<OffsetDateTime>,
	pub views_count: i64,
	pub likes_count: i64,
	pub shares_count: i64,
	pub purchases_count: i64,
	pub rating: f32,
	pub created_at: OffsetDateTime,
	pub shop_name: String,
	pub seller_logo: Option<String>,
	pub seller_username: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SellerSummaryRow {
	pub seller_id: Uuid,
	pub username: String,
	pub shop_name: String,
	pub description: String,
	pub logo_url: Option<String>,
	pub rating: f32,
	pub created_at: OffsetDateTime,
	pub products_count: i64,
	pub subscribers_count: i64,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SearchHistoryRow {
	pub entry_id: Uuid,
	pub viewer_id: Uuid,
	pub query: String,
	pub category: Option<String>,
	pub shop_name: Option<String>,
	pub created_at: OffsetDateTime,
}
