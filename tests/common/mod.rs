use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use storefront_api::{
    config::AppConfig,
    db,
    entities::{CategoryModel, ProductModel},
    events::{self, EventSender},
    handlers::AppServices,
    services::catalog::{CreateCategoryInput, CreateProductInput},
    AppState,
};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a SQLite
/// database in a fresh temporary directory, so tests never share state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("storefront_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/health", get(storefront_api::health_check))
            .nest("/api", storefront_api::api_routes())
            .nest("/store", storefront_api::store_routes())
            .merge(storefront_api::openapi::swagger_ui())
            .layer(axum::middleware::from_fn(
                storefront_api::request_id::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    /// Send a request with extra headers (the storefront tests pass cookies).
    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Seed a category through the service layer.
    #[allow(dead_code)]
    pub async fn seed_category(&self, name: &str) -> CategoryModel {
        self.state
            .services
            .catalog
            .create_category(CreateCategoryInput {
                name: name.to_string(),
                description: Some(format!("{} category seeded for tests", name)),
            })
            .await
            .expect("seed category for tests")
    }

    /// Seed a product with its own category through the service layer.
    #[allow(dead_code)]
    pub async fn seed_product(&self, name: &str, price: Decimal, stock: i32) -> ProductModel {
        let category = self.seed_category(&format!("{} Shelf", name)).await;
        self.seed_product_in(category.id, name, price, stock).await
    }

    /// Seed a product in an existing category through the service layer.
    #[allow(dead_code)]
    pub async fn seed_product_in(
        &self,
        category_id: Uuid,
        name: &str,
        price: Decimal,
        stock: i32,
    ) -> ProductModel {
        self.state
            .services
            .catalog
            .create_product(CreateProductInput {
                name: name.to_string(),
                description: format!("{} seeded for integration tests", name),
                price,
                category_id,
                stock_quantity: stock,
                image_url: None,
            })
            .await
            .expect("seed product for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
