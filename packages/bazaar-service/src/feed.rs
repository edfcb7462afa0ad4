use std::collections::HashMap;

use uuid::Uuid;

use bazaar_domain::{
	order::SortKey,
	ranking::{self, Bucket},
};
use bazaar_storage::models::FeedProductRow;

use crate::{Error, FeedService, Result, signals::ViewerSignals};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedRequest {
	pub viewer_id: Option<Uuid>,
	pub category: Option<String>,
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

/// One assembled feed entry: the product joined with its seller summary
/// and the viewer-specific booleans, plus the bucket it landed in.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RankedEntry {
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
	pub feed_category: Bucket,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub relevance_score: Option<i64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedResponse {
	pub products: Vec<RankedEntry>,
	pub total: i64,
	pub limit: i64,
	pub offset: i64,
}

impl FeedService {
	/// Assembles the ranked feed for one viewer: fetch approved candidates,
	/// join viewer signals, score and bucket each candidate, filter, sort,
	/// paginate. Read-only against the catalog; two calls over the same
	/// snapshot produce identical ordering.
	pub async fn feed(&self, req: FeedRequest) -> Result<FeedResponse> {
		let limit = req.limit.unwrap_or(self.cfg.feed.default_limit).max(0);
		let offset = req.offset.unwrap_or(0).max(0);
		// Unknown category values mean "no filter", never an error.
		let category = req.category.as_deref().and_then(Bucket::from_filter);

		// Subscription-based filtering is undefined without a viewer.
		if category == Some(Bucket::Subscription) && req.viewer_id.is_none() {
			return Ok(FeedResponse { products: Vec::new(), total: 0, limit, offset });
		}

		let now = time::OffsetDateTime::now_utc();
		let candidates = self
			.providers
			.catalog
			.approved_products()
			.await
			.map_err(|err| Error::Catalog { message: err.to_string() })?;
		let signals = self.load_viewer_signals(req.viewer_id).await;

		let candidate_ids: Vec<Uuid> = candidates.iter().map(|row| row.product_id).collect();
		let review_counts: HashMap<Uuid, i64> = self
			.providers
			.reviews
			.high_rating_review_counts(&candidate_ids, self.cfg.ranking.min_review_rating)
			.await
			.map_err(|err| Error::Catalog { message: err.to_string() })?
			.into_iter()
			.collect();

		let mut ranked: Vec<(SortKey, RankedEntry)> = Vec::with_capacity(candidates.len());

		for row in candidates {
			let facts = product_facts(&row);
			let is_subscribed = signals.is_subscribed(row.seller_id);
			let tier = ranking::tier(&facts, is_subscribed, now, &self.cfg.ranking);
			let bucket = tier.bucket();

			if let Some(filter) = category
				&& bucket != filter
			{
				continue;
			}

			let high_rating_reviews = review_counts.get(&row.product_id).copied().unwrap_or(0);
			let score = tier.floor(&self.cfg.ranking)
				+ self.cfg.ranking.review_bonus * high_rating_reviews;
			let key = SortKey {
				bucket,
				score,
				created_at: row.created_at,
				product_id: row.product_id,
			};
			let exposed_score = self.cfg.ranking.expose_scores.then_some(score);

			ranked.push((key, ranked_entry(row, &signals, bucket, exposed_score)));
		}

		let total = ranked.len() as i64;

		ranked.sort_by(|a, b| a.0.cmp(&b.0));

		let products = ranked
			.into_iter()
			.skip(offset as usize)
			.take(limit as usize)
			.map(|(_, entry)| entry)
			.collect();

		Ok(FeedResponse { products, total, limit, offset })
	}
}

pub(crate) fn product_facts(row: &FeedProductRow) -> ranking::ProductFacts {
	ranking::ProductFacts {
		is_promoted: row.is_promoted,
		promotion_until: row.promotion_until,
		purchases_count: row.purchases_count,
		rating: row.rating,
		likes_count: row.likes_count,
	}
}

fn ranked_entry(
	row: FeedProductRow,
	signals: &ViewerSignals,
	bucket: Bucket,
	relevance_score: Option<i64>,
) -> RankedEntry {
	RankedEntry {
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
		feed_category: bucket,
		relevance_score,
	}
}
