use std::collections::HashSet;

use uuid::Uuid;

use crate::FeedService;

/// Personalization signals resolved for one request. An anonymous viewer,
/// or a viewer whose signal store is unreachable, carries empty sets.
#[derive(Debug, Default)]
pub(crate) struct ViewerSignals {
	pub subscribed_sellers: HashSet<Uuid>,
	pub liked_products: HashSet<Uuid>,
}
impl ViewerSignals {
	pub fn is_subscribed(&self, seller_id: Uuid) -> bool {
		self.subscribed_sellers.contains(&seller_id)
	}

	pub fn is_liked(&self, product_id: Uuid) -> bool {
		self.liked_products.contains(&product_id)
	}
}

impl FeedService {
	/// Signal lookups never fail the request: a broken personalization
	/// store degrades the feed to an unpersonalized ranking.
	pub(crate) async fn load_viewer_signals(&self, viewer_id: Option<Uuid>) -> ViewerSignals {
		let Some(viewer_id) = viewer_id else {
			return ViewerSignals::default();
		};
		let subscribed_sellers = match self.providers.signals.subscribed_seller_ids(viewer_id).await
		{
			Ok(ids) => ids.into_iter().collect(),
			Err(err) => {
				tracing::warn!(
					error = %err,
					%viewer_id,
					"Subscription lookup failed; treating the viewer as unsubscribed."
				);

				HashSet::new()
			},
		};
		let liked_products = match self.providers.signals.liked_product_ids(viewer_id).await {
			Ok(ids) => ids.into_iter().collect(),
			Err(err) => {
				tracing::warn!(
					error = %err,
					%viewer_id,
					"Like lookup failed; treating the viewer as having no likes."
				);

				HashSet::new()
			},
		};

		ViewerSignals { subscribed_sellers, liked_products }
	}
}
