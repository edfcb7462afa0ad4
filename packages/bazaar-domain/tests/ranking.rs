use time::macros::datetime;

use bazaar_config::Ranking;
use bazaar_domain::ranking::{self, Bucket, ProductFacts, Tier};

const NOW: time::OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

fn facts_grid() -> Vec<ProductFacts> {
	let mut grid = Vec::new();

	for promoted in [false, true] {
		for until_offset_days in [-2_i64, 2] {
			for purchases in [0_i64, 19, 21, 200] {
				for rating in [0.0_f32, 4.4, 4.9] {
					for likes in [0_i64, 99, 150] {
						grid.push(ProductFacts {
							is_promoted: promoted,
							promotion_until: Some(NOW + time::Duration::days(until_offset_days)),
							purchases_count: purchases,
							rating,
							likes_count: likes,
						});
					}
				}
			}
		}
	}
	grid.push(ProductFacts {
		is_promoted: true,
		promotion_until: None,
		purchases_count: 50,
		rating: 5.0,
		likes_count: 500,
	});

	grid
}

#[test]
fn exactly_one_tier_applies_to_every_candidate() {
	let weights = Ranking::default();

	for facts in facts_grid() {
		for is_subscribed in [false, true] {
			let selected = ranking::tier(&facts, is_subscribed, NOW, &weights);
			let expected = if facts.promotion_active(NOW) {
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
			};

			assert_eq!(selected, expected, "facts: {facts:?}, subscribed: {is_subscribed}");
		}
	}
}

#[test]
fn score_never_drops_below_the_tier_floor() {
	let weights = Ranking::default();

	for facts in facts_grid() {
		for is_subscribed in [false, true] {
			for reviews in [0_i64, 1, 3, 40] {
				let floor = ranking::tier(&facts, is_subscribed, NOW, &weights).floor(&weights);
				let score =
					ranking::relevance_score(&facts, is_subscribed, reviews, NOW, &weights);

				assert!(score >= floor);
				assert_eq!(score - floor, weights.review_bonus * reviews);
			}
		}
	}
}

#[test]
fn bucket_and_tier_never_disagree() {
	let weights = Ranking::default();

	for facts in facts_grid() {
		for is_subscribed in [false, true] {
			let tier = ranking::tier(&facts, is_subscribed, NOW, &weights);
			let bucket = ranking::bucket(&facts, is_subscribed, NOW, &weights);

			match bucket {
				Bucket::Promoted => assert_eq!(tier, Tier::Promoted),
				Bucket::Subscription => assert_eq!(tier, Tier::Subscribed),
				Bucket::Popular => assert!(matches!(
					tier,
					Tier::HighPurchases | Tier::HighRating | Tier::HighLikes
				)),
				Bucket::Recommended => assert_eq!(tier, Tier::Baseline),
			}
		}
	}
}

#[test]
fn wire_labels_round_trip() {
	for bucket in
		[Bucket::Promoted, Bucket::Subscription, Bucket::Popular, Bucket::Recommended]
	{
		assert_eq!(Bucket::from_filter(bucket.as_str()), Some(bucket));

		let encoded = serde_json::to_string(&bucket).expect("Bucket must serialize.");

		assert_eq!(encoded, format!("\"{}\"", bucket.as_str()));
	}
}
