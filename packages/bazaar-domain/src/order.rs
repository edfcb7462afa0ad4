use std::cmp::Ordering;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::ranking::Bucket;

/// Total order over ranked feed entries: bucket precedence ascending,
/// relevance score descending, recency descending, then product id as a
/// stable final tie breaker so reruns over the same snapshot produce
/// byte-identical ordering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortKey {
	pub bucket: Bucket,
	pub score: i64,
	pub created_at: OffsetDateTime,
	pub product_id: Uuid,
}
impl Ord for SortKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.bucket
			.precedence()
			.cmp(&other.bucket.precedence())
			.then_with(|| other.score.cmp(&self.score))
			.then_with(|| other.created_at.cmp(&self.created_at))
			.then_with(|| self.product_id.cmp(&other.product_id))
	}
}
impl PartialOrd for SortKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
