pub mod config;
pub mod endpoints;
pub mod provisioning;

use kafka_client::Publisher;
use ntex::web;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct AppState {
    pub publisher: Arc<dyn Publisher>,
    pub topic: String,
}

impl AppState {
    pub fn new(publisher: Arc<dyn Publisher>, topic: impl Into<String>) -> Self {
        AppState {
            publisher,
            topic: topic.into(),
        }
    }
}

/// Customer record, forwarded to the topic as JSON without transformation.
/// Absent fields are published as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<i64>,
    pub name: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(async || "OK"))
        .route(
            "/producer/publish/customer",
            web::post().to(endpoints::publish_customer),
        )
        .route(
            "/producer/publish/{message}",
            web::get().to(endpoints::publish_message),
        );
}
