mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Feed, Postgres, Ranking, Search, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let tiers = [
		("ranking.promoted_points", cfg.ranking.promoted_points),
		("ranking.subscription_points", cfg.ranking.subscription_points),
		("ranking.purchases_points", cfg.ranking.purchases_points),
		("ranking.rating_points", cfg.ranking.rating_points),
		("ranking.likes_points", cfg.ranking.likes_points),
		("ranking.base_points", cfg.ranking.base_points),
	];

	for (label, points) in tiers {
		if points <= 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}
	for window in tiers.windows(2) {
		let (upper_label, upper) = window[0];
		let (lower_label, lower) = window[1];

		if upper <= lower {
			return Err(Error::Validation {
				message: format!("{upper_label} must be greater than {lower_label}."),
			});
		}
	}

	if cfg.ranking.review_bonus < 0 {
		return Err(Error::Validation {
			message: "ranking.review_bonus must be zero or greater.".to_string(),
		});
	}
	if !(1..=5).contains(&cfg.ranking.min_review_rating) {
		return Err(Error::Validation {
			message: "ranking.min_review_rating must be in the range 1-5.".to_string(),
		});
	}
	if cfg.ranking.purchases_threshold < 0 {
		return Err(Error::Validation {
			message: "ranking.purchases_threshold must be zero or greater.".to_string(),
		});
	}
	if !cfg.ranking.rating_threshold.is_finite() {
		return Err(Error::Validation {
			message: "ranking.rating_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=5.0).contains(&cfg.ranking.rating_threshold) {
		return Err(Error::Validation {
			message: "ranking.rating_threshold must be in the range 0.0-5.0.".to_string(),
		});
	}
	if cfg.ranking.likes_threshold < 0 {
		return Err(Error::Validation {
			message: "ranking.likes_threshold must be zero or greater.".to_string(),
		});
	}
	if cfg.feed.default_limit <= 0 {
		return Err(Error::Validation {
			message: "feed.default_limit must be greater than zero.".to_string(),
		});
	}
	if !(1..=10).contains(&cfg.search.history_limit) {
		return Err(Error::Validation {
			message: "search.history_limit must be in the range 1-10.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	if level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
