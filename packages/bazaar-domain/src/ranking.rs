use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use bazaar_config::Ranking;

/// Feed bucket a candidate is assigned to. Exactly one bucket applies per
/// candidate; the order of the variants is the feed precedence order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
	Promoted,
	Subscription,
	Popular,
	Recommended,
}
impl Bucket {
	/// Precedence within the assembled feed. Lower sorts first.
	pub fn precedence(self) -> u8 {
		match self {
			Self::Promoted => 1,
			Self::Subscription => 2,
			Self::Popular => 3,
			Self::Recommended => 4,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Promoted => "promoted",
			Self::Subscription => "subscription",
			Self::Popular => "popular",
			Self::Recommended => "recommended",
		}
	}

	/// Lenient wire parsing for the category filter. Unknown values mean
	/// "no filter", never an error.
	pub fn from_filter(value: &str) -> Option<Self> {
		match value.trim() {
			"promoted" => Some(Self::Promoted),
			"subscription" => Some(Self::Subscription),
			"popular" => Some(Self::Popular),
			"recommended" => Some(Self::Recommended),
			_ => None,
		}
	}
}

/// Base tier of a candidate. First matching tier wins; tiers are mutually
/// exclusive by construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
	Promoted,
	Subscribed,
	HighPurchases,
	HighRating,
	HighLikes,
	Baseline,
}
impl Tier {
	pub fn bucket(self) -> Bucket {
		match self {
			Self::Promoted => Bucket::Promoted,
			Self::Subscribed => Bucket::Subscription,
			Self::HighPurchases | Self::HighRating | Self::HighLikes => Bucket::Popular,
			Self::Baseline => Bucket::Recommended,
		}
	}

	pub fn floor(self, weights: &Ranking) -> i64 {
		match self {
			Self::Promoted => weights.promoted_points,
			Self::Subscribed => weights.subscription_points,
			Self::HighPurchases => weights.purchases_points,
			Self::HighRating => weights.rating_points,
			Self::HighLikes => weights.likes_points,
			Self::Baseline => weights.base_points,
		}
	}
}

/// The catalog facts the ranking reads for one candidate. Counters are
/// eventually-consistent snapshot values; two candidates in the same batch
/// may reflect slightly different points in time.
#[derive(Clone, Copy, Debug)]
pub struct ProductFacts {
	pub is_promoted: bool,
	pub promotion_until: Option<OffsetDateTime>,
	pub purchases_count: i64,
	pub rating: f32,
	pub likes_count: i64,
}
impl ProductFacts {
	/// A promotion counts only while `promotion_until` is in the future.
	pub fn promotion_active(&self, now: OffsetDateTime) -> bool {
		self.is_promoted && self.promotion_until.map(|until| until > now).unwrap_or(false)
	}
}

pub fn tier(
	facts: &ProductFacts,
	is_subscribed: bool,
	now: OffsetDateTime,
	weights: &Ranking,
) -> Tier {
	if facts.promotion_active(now) {
		Tier::Promoted
	} else if is_subscribed {
		Tier::Subscribed
	} else if facts.purchases_count > weights.purchases_threshold {
		Tier::HighPurchases
	} else if facts.rating > weights.rating_threshold {
		Tier::HighRating
	} else if facts.likes_count > weights.likes_threshold {
		Tier::HighLikes
	} else {
		Tier::Baseline
	}
}

/// Bucket assignment shares the tier evaluation with the scorer, so the
/// two can never disagree.
pub fn bucket(
	facts: &ProductFacts,
	is_subscribed: bool,
	now: OffsetDateTime,
	weights: &Ranking,
) -> Bucket {
	tier(facts, is_subscribed, now, weights).bucket()
}

/// Relevance score: the floor of the first matching tier plus a cumulative
/// bonus per high-rating review. Ties are broken at assembly time, never
/// here.
pub fn relevance_score(
	facts: &ProductFacts,
	is_subscribed: bool,
	high_rating_reviews: i64,
	now: OffsetDateTime,
	weights: &Ranking,
) -> i64 {
	let floor = tier(facts, is_subscribed, now, weights).floor(weights);

	floor + weights.review_bonus * high_rating_reviews.max(0)
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

	fn weights() -> Ranking {
		Ranking::default()
	}

	fn baseline_facts() -> ProductFacts {
		ProductFacts {
			is_promoted: false,
			promotion_until: None,
			purchases_count: 0,
			rating: 0.0,
			likes_count: 0,
		}
	}

	#[test]
	fn promoted_tier_requires_active_promotion() {
		let mut facts = baseline_facts();

		facts.is_promoted = true;
		facts.promotion_until = Some(NOW + time::Duration::days(1));
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::Promoted);

		facts.promotion_until = Some(NOW - time::Duration::days(1));
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::Baseline);

		facts.promotion_until = None;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::Baseline);
	}

	#[test]
	fn promoted_outranks_subscription() {
		let mut facts = baseline_facts();

		facts.is_promoted = true;
		facts.promotion_until = Some(NOW + time::Duration::days(1));

		let selected = tier(&facts, true, NOW, &weights());

		assert_eq!(selected, Tier::Promoted);
		assert_eq!(selected.floor(&weights()), 1_000);
	}

	#[test]
	fn tier_thresholds_are_strict() {
		let mut facts = baseline_facts();

		facts.purchases_count = 20;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::Baseline);
		facts.purchases_count = 21;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::HighPurchases);

		let mut facts = baseline_facts();

		facts.rating = 4.5;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::Baseline);
		facts.rating = 4.6;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::HighRating);

		let mut facts = baseline_facts();

		facts.likes_count = 100;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::Baseline);
		facts.likes_count = 101;
		assert_eq!(tier(&facts, false, NOW, &weights()), Tier::HighLikes);
	}

	#[test]
	fn score_is_floor_plus_review_bonus() {
		let mut facts = baseline_facts();

		facts.purchases_count = 25;

		assert_eq!(relevance_score(&facts, false, 0, NOW, &weights()), 600);
		assert_eq!(relevance_score(&facts, false, 3, NOW, &weights()), 750);
	}

	#[test]
	fn subscription_floor_beats_popularity_signals() {
		let mut facts = baseline_facts();

		facts.purchases_count = 1_000;
		facts.rating = 5.0;
		facts.likes_count = 1_000;

		assert_eq!(relevance_score(&facts, true, 0, NOW, &weights()), 800);
		assert_eq!(bucket(&facts, true, NOW, &weights()), Bucket::Subscription);
	}

	#[test]
	fn bucket_collapses_popularity_tiers() {
		assert_eq!(Tier::HighPurchases.bucket(), Bucket::Popular);
		assert_eq!(Tier::HighRating.bucket(), Bucket::Popular);
		assert_eq!(Tier::HighLikes.bucket(), Bucket::Popular);
		assert_eq!(Tier::Baseline.bucket(), Bucket::Recommended);
	}

	#[test]
	fn filter_parsing_is_lenient() {
		assert_eq!(Bucket::from_filter("promoted"), Some(Bucket::Promoted));
		assert_eq!(Bucket::from_filter(" popular "), Some(Bucket::Popular));
		assert_eq!(Bucket::from_filter("trending"), None);
		assert_eq!(Bucket::from_filter(""), None);
	}
}
