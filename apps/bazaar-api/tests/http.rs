use axum::{
	body::Body,
	http::{Request, StatusCode},
};
use sqlx::{PgPool, types::Json};
use time::macros::datetime;
use tower::util::ServiceExt;
use uuid::Uuid;

use bazaar_api::{routes, state::AppState};
use bazaar_config::{Config, Feed, Postgres, Ranking, Search, Service, Storage};
use bazaar_testkit::TestDatabase;

fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 2 } },
		ranking: Ranking::default(),
		feed: Feed::default(),
		search: Search::default(),
	}
}

async fn seed_catalog(pool: &PgPool) -> (Uuid, Uuid, Uuid) {
	let seller_id = Uuid::new_v4();

	sqlx::query(
		"INSERT INTO sellers (seller_id, username, shop_name, description, status) \
         VALUES ($1, 'shopkeeper', 'Gadget Garden', 'Gadgets of all kinds.', 'approved')",
	)
	.bind(seller_id)
	.execute(pool)
	.await
	.expect("Failed to insert seller.");

	let promoted = Uuid::new_v4();
	let popular = Uuid::new_v4();

	sqlx::query(
		"INSERT INTO products \
         (product_id, seller_id, name, description, price_minor, currency, tags, status, \
          is_promoted, promotion_until, purchases_count, created_at) \
         VALUES ($1, $2, 'Promoted Widget', 'A sponsored widget.', 2990, 'USD', $3, 'approved', \
                 TRUE, $4, 0, $5)",
	)
	.bind(promoted)
	.bind(seller_id)
	.bind(Json(vec!["widgets".to_string()]))
	.bind(datetime!(2030-01-01 00:00 UTC))
	.bind(datetime!(2026-01-01 00:00 UTC))
	.execute(pool)
	.await
	.expect("Failed to insert promoted product.");

	sqlx::query(
		"INSERT INTO products \
         (product_id, seller_id, name, description, price_minor, currency, tags, status, \
          purchases_count, created_at) \
         VALUES ($1, $2, 'Popular Widget', 'A well-bought widget.', 1990, 'USD', $3, 'approved', \
                 25, $4)",
	)
	.bind(popular)
	.bind(seller_id)
	.bind(Json(vec!["widgets".to_string()]))
	.bind(datetime!(2026-01-02 00:00 UTC))
	.execute(pool)
	.await
	.expect("Failed to insert popular product.");

	(seller_id, promoted, popular)
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Response body must be JSON.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BAZAAR_PG_DSN to run."]
async fn feed_endpoint_returns_ranked_products() {
	let Some(base_dsn) = bazaar_testkit::env_dsn() else {
		eprintln!("Skipping; set BAZAAR_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let state =
		AppState::new(test_config(test_db.dsn().to_string())).await.expect("Failed to boot.");
	let pool = PgPool::connect(test_db.dsn()).await.expect("Failed to connect fixtures pool.");
	let (_, promoted, popular) = seed_catalog(&pool).await;

	let app = routes::router(state);
	let response = app
		.clone()
		.oneshot(Request::builder().uri("/v1/feed").body(Body::empty()).expect("request"))
		.await
		.expect("Request must succeed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = read_json(response).await;

	assert_eq!(body["total"], 2);
	assert_eq!(body["limit"], 50);
	assert_eq!(body["products"][0]["product_id"], promoted.to_string());
	assert_eq!(body["products"][0]["feed_category"], "promoted");
	assert_eq!(body["products"][1]["product_id"], popular.to_string());
	assert_eq!(body["products"][1]["feed_category"], "popular");
	assert_eq!(body["products"][0]["shop_name"], "Gadget Garden");
	assert!(body["products"][0].get("relevance_score").is_none());

	let filtered = app
		.oneshot(
			Request::builder()
				.uri("/v1/feed?category=subscription")
				.body(Body::empty())
				.expect("request"),
		)
		.await
		.expect("Request must succeed.");

	assert_eq!(filtered.status(), StatusCode::OK);

	let body = read_json(filtered).await;

	assert_eq!(body["total"], 0);
	assert_eq!(body["products"].as_array().map(Vec::len), Some(0));

	drop(pool);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BAZAAR_PG_DSN to run."]
async fn search_endpoint_matches_and_logs_history() {
	let Some(base_dsn) = bazaar_testkit::env_dsn() else {
		eprintln!("Skipping; set BAZAAR_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let state =
		AppState::new(test_config(test_db.dsn().to_string())).await.expect("Failed to boot.");
	let pool = PgPool::connect(test_db.dsn()).await.expect("Failed to connect fixtures pool.");

	seed_catalog(&pool).await;

	let viewer = Uuid::new_v4();
	let app = routes::router(state);
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri(format!("/v1/search?q=widget&viewer_id={viewer}&type=products"))
				.body(Body::empty())
				.expect("request"),
		)
		.await
		.expect("Request must succeed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = read_json(response).await;

	assert_eq!(body["products"].as_array().map(Vec::len), Some(2));
	assert_eq!(body["sellers"].as_array().map(Vec::len), Some(0));
	// Search results are recency-ordered, not ranked.
	assert_eq!(body["products"][0]["name"], "Popular Widget");

	let logged: i64 =
		sqlx::query_scalar("SELECT COUNT(*) FROM search_history WHERE viewer_id = $1")
			.bind(viewer)
			.fetch_one(&pool)
			.await
			.expect("Failed to count history rows.");

	assert_eq!(logged, 1);

	let history = app
		.clone()
		.oneshot(
			Request::builder()
				.uri(format!("/v1/search/history?viewer_id={viewer}"))
				.body(Body::empty())
				.expect("request"),
		)
		.await
		.expect("Request must succeed.");

	assert_eq!(history.status(), StatusCode::OK);

	let body = read_json(history).await;

	assert_eq!(body["queries"][0]["query"], "widget");

	let missing_query = app
		.oneshot(Request::builder().uri("/v1/search").body(Body::empty()).expect("request"))
		.await
		.expect("Request must succeed.");

	assert_eq!(missing_query.status(), StatusCode::BAD_REQUEST);

	drop(pool);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BAZAAR_PG_DSN to run."]
async fn health_endpoint_is_available() {
	let Some(base_dsn) = bazaar_testkit::env_dsn() else {
		eprintln!("Skipping; set BAZAAR_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let state =
		AppState::new(test_config(test_db.dsn().to_string())).await.expect("Failed to boot.");
	let app = routes::router(state);
	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
		.await
		.expect("Request must succeed.");

	assert_eq!(response.status(), StatusCode::OK);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
