use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub feed: Feed,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Tier points and thresholds for the additive relevance model. The floors
/// are strictly descending so a promoted candidate always outranks a
/// subscribed one within the same review-bonus band.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub promoted_points: i64,
	pub subscription_points: i64,
	pub purchases_points: i64,
	pub rating_points: i64,
	pub likes_points: i64,
	pub base_points: i64,
	pub review_bonus: i64,
	pub min_review_rating: i32,
	pub purchases_threshold: i64,
	pub rating_threshold: f32,
	pub likes_threshold: i64,
	pub expose_scores: bool,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			promoted_points: 1_000,
			subscription_points: 800,
			purchases_points: 600,
			rating_points: 500,
			likes_points: 400,
			base_points: 100,
			review_bonus: 50,
			min_review_rating: 4,
			purchases_threshold: 20,
			rating_threshold: 4.5,
			likes_threshold: 100,
			expose_scores: false,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Feed {
	pub default_limit: i64,
}
impl Default for Feed {
	fn default() -> Self {
		Self { default_limit: 50 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub history_limit: i64,
}
impl Default for Search {
	fn default() -> Self {
		Self { history_limit: 10 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
