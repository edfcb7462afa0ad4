use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	models::{FeedProductRow, SearchHistoryRow, SellerSummaryRow},
};

const FEED_PRODUCT_COLUMNS: &str = "\
p.product_id, p.seller_id, p.name, p.description, p.price_minor, p.discount_percent, \
p.currency, p.images, p.tags, p.status, p.is_promoted, p.promotion_until, \
p.views_count, p.likes_count, p.shares_count, p.purchases_count, p.rating, p.created_at, \
s.shop_name, s.logo_url AS seller_logo, s.username AS seller_username";

/// All feed candidates: approved products of approved sellers.
pub async fn approved_products(pool: &PgPool) -> Result<Vec<FeedProductRow>> {
	let rows = sqlx::query_as(&format!(
		"SELECT {FEED_PRODUCT_COLUMNS} \
         FROM products p \
         INNER JOIN sellers s ON s.seller_id = p.seller_id \
         WHERE p.status = 'approved' AND s.status = 'approved'",
	))
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

/// Case-insensitive substring match over product name and description,
/// optionally narrowed by an exact tag and a shop-name substring. Newest
/// first; no relevance scoring on the search path.
pub async fn search_products(
	pool: &PgPool,
	query: &str,
	category: Option<&str>,
	shop_name: Option<&str>,
) -> Result<Vec<FeedProductRow>> {
	let mut builder = sqlx::QueryBuilder::new(format!(
		"SELECT {FEED_PRODUCT_COLUMNS} \
         FROM products p \
         INNER JOIN sellers s ON s.seller_id = p.seller_id \
         WHERE p.status = 'approved' AND s.status = 'approved' AND (p.name ILIKE ",
	));

	builder.push_bind(like_pattern(query));
	builder.push(" OR p.description ILIKE ");
	builder.push_bind(like_pattern(query));
	builder.push(")");

	if let Some(category) = category {
		builder.push(
			" AND EXISTS (SELECT 1 FROM jsonb_array_elements_text(p.tags) AS tag WHERE tag = ",
		);
		builder.push_bind(category);
		builder.push(")");
	}
	if let Some(shop_name) = shop_name {
		builder.push(" AND s.shop_name ILIKE ");
		builder.push_bind(like_pattern(shop_name));
	}

	builder.push(" ORDER BY p.created_at DESC, p.product_id");

	let rows = builder.build_query_as().fetch_all(pool).await?;

	Ok(rows)
}

/// Case-insensitive substring match over seller shop name and description.
pub async fn search_sellers(
	pool: &PgPool,
	query: &str,
	shop_name: Option<&str>,
) -> Result<Vec<SellerSummaryRow>> {
	let mut builder = sqlx::QueryBuilder::new(
		"SELECT s.seller_id, s.username, s.shop_name, s.description, s.logo_url, s.rating, \
                s.created_at, \
                COUNT(DISTINCT p.product_id) AS products_count, \
                COUNT(DISTINCT sub.viewer_id) AS subscribers_count \
         FROM sellers s \
         LEFT JOIN products p ON p.seller_id = s.seller_id AND p.status = 'approved' \
         LEFT JOIN subscriptions sub ON sub.seller_id = s.seller_id \
         WHERE s.status = 'approved' AND (s.shop_name ILIKE ",
	);

	builder.push_bind(like_pattern(query));
	builder.push(" OR s.description ILIKE ");
	builder.push_bind(like_pattern(query));
	builder.push(")");

	if let Some(shop_name) = shop_name {
		builder.push(" AND s.shop_name ILIKE ");
		builder.push_bind(like_pattern(shop_name));
	}

	builder.push(" GROUP BY s.seller_id ORDER BY s.created_at DESC, s.seller_id");

	let rows = builder.build_query_as().fetch_all(pool).await?;

	Ok(rows)
}

pub async fn subscribed_seller_ids(pool: &PgPool, viewer_id: Uuid) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar("SELECT seller_id FROM subscriptions WHERE viewer_id = $1")
		.bind(viewer_id)
		.fetch_all(pool)
		.await?;

	Ok(ids)
}

pub async fn liked_product_ids(pool: &PgPool, viewer_id: Uuid) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar("SELECT product_id FROM product_likes WHERE viewer_id = $1")
		.bind(viewer_id)
		.fetch_all(pool)
		.await?;

	Ok(ids)
}

/// Per-product count of reviews at or above the given rating, batched over
/// the candidate set. Products without such reviews are absent from the
/// result.
pub async fn high_rating_review_counts(
	pool: &PgPool,
	product_ids: &[Uuid],
	min_rating: i32,
) -> Result<Vec<(Uuid, i64)>> {
	if product_ids.is_empty() {
		return Ok(Vec::new());
	}

	let counts = sqlx::query_as(
		"SELECT product_id, COUNT(*) AS review_count \
         FROM reviews \
         WHERE product_id = ANY($1) AND rating >= $2 \
         GROUP BY product_id",
	)
	.bind(product_ids)
	.bind(min_rating)
	.fetch_all(pool)
	.await?;

	Ok(counts)
}

/// Append-only search history write. Duplicate entries on retry are
/// acceptable; the log is never mutated or pruned here.
pub async fn append_search_query(
	pool: &PgPool,
	viewer_id: Uuid,
	query: &str,
	category: Option<&str>,
	shop_name: Option<&str>,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"INSERT INTO search_history (entry_id, viewer_id, query, category, shop_name, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(Uuid::new_v4())
	.bind(viewer_id)
	.bind(query)
	.bind(category)
	.bind(shop_name)
	.bind(now)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn recent_queries(
	pool: &PgPool,
	viewer_id: Uuid,
	limit: i64,
) -> Result<Vec<SearchHistoryRow>> {
	let rows = sqlx::query_as(
		"SELECT entry_id, viewer_id, query, category, shop_name, created_at \
         FROM search_history \
         WHERE viewer_id = $1 \
         ORDER BY created_at DESC, entry_id \
         LIMIT $2",
	)
	.bind(viewer_id)
	.bind(limit.max(0))
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

fn like_pattern(value: &str) -> String {
	let escaped = value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");

	format!("%{escaped}%")
}
