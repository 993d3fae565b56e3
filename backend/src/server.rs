use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::ConnectionStore;
use crate::handlers;
use crate::services::{ConnectionView, FeedGenerator, RequestLedger, UserDirectory};
use crate::utils::Config;

/// Shared by every handler. Services are cheap views over the store and are
/// built per request; nothing here caches ledger state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConnectionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn ConnectionStore>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn directory(&self) -> UserDirectory {
        UserDirectory::new(self.store.clone())
    }

    pub fn ledger(&self) -> RequestLedger {
        RequestLedger::new(self.store.clone())
    }

    pub fn feed(&self) -> FeedGenerator {
        FeedGenerator::new(self.store.clone(), self.config.feed)
    }

    pub fn connections(&self) -> ConnectionView {
        ConnectionView::new(self.store.clone())
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors_layer = create_cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        // User directory
        .route("/users", post(handlers::register_user))
        .route("/users/{user_id}", get(handlers::get_user))
        // Request ledger
        .route("/reqs/send/{status}/{receiver_id}", post(handlers::send_request))
        .route("/reqs/review/{status}/{req_id}", patch(handlers::review_request))
        // Connection view
        .route("/user/reqs/received", get(handlers::received_requests))
        .route("/user/reqs/sent", get(handlers::sent_requests))
        .route("/user/connections", get(handlers::list_connections))
        .route("/user/connections/{user_id}", get(handlers::connection_status))
        // Feed
        .route("/feed", get(handlers::get_feed))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

async fn health_check() -> &'static str {
    "OK"
}
