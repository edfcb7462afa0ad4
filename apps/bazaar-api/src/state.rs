use std::sync::Arc;

use bazaar_service::FeedService;
use bazaar_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FeedService>,
}
impl AppState {
	pub async fn new(config: bazaar_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = FeedService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
