use crate::{AppState, Customer};
use kafka_client::Delivery;
use log::{error, info};
use ntex::http::StatusCode;
use ntex::web;
use std::sync::Arc;

pub const MESSAGE_PUBLISHED: &str = "Message published.";
pub const CUSTOMER_PUBLISHED: &str = "Customer published.";

pub async fn publish_message(
    data: web::types::State<Arc<AppState>>,
    message: web::types::Path<String>,
) -> Result<web::HttpResponse, web::Error> {
    let message = message.into_inner();

    info!("Publishing message to topic={:?}: {message}", data.topic);
    match data.publisher.publish(&data.topic, &message) {
        Ok(delivery) => {
            detach(delivery);
            Ok(web::HttpResponse::Ok().body(MESSAGE_PUBLISHED))
        }
        Err(e) => {
            error!("Exception when publishing message: {e}");
            Ok(internal_error())
        }
    }
}

pub async fn publish_customer(
    data: web::types::State<Arc<AppState>>,
    body: web::types::Json<Customer>,
) -> Result<web::HttpResponse, web::Error> {
    let customer = body.into_inner();

    let payload = match serde_json::to_string(&customer) {
        Ok(s) => s,
        Err(e) => {
            error!("Exception when publishing customer: {e}");
            return Ok(internal_error());
        }
    };

    info!("Publishing customer to topic={:?}: {payload}", data.topic);
    match data.publisher.publish(&data.topic, &payload) {
        Ok(delivery) => {
            detach(delivery);
            Ok(web::HttpResponse::Ok().body(CUSTOMER_PUBLISHED))
        }
        Err(e) => {
            error!("Exception when publishing customer: {e}");
            Ok(internal_error())
        }
    }
}

// The response goes out before the broker answers; the delivery logs itself.
fn detach(delivery: Delivery) {
    let _ = ntex::rt::spawn(async move {
        let _ = delivery.await;
    });
}

fn internal_error() -> web::HttpResponse {
    web::HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).finish()
}
