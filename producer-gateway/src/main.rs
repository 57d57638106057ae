use dotenvy::dotenv;
use kafka_client::{KafkaPublisher, utils};
use log::{error, info};
use ntex::web;
use producer_gateway::config::GatewayConfig;
use producer_gateway::{AppState, configure, provisioning};
use std::io;
use std::sync::Arc;

#[ntex::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = GatewayConfig::from_env();

    info!(
        "Starting producer gateway on {}, broker={}, topic={}",
        config.bind_addr, config.brokers, config.topic
    );

    if let Some(spec) = provisioning::declared_topic(&config) {
        let admin = utils::create_admin(&config.brokers).map_err(io::Error::other)?;
        provisioning::provision(&admin, &spec).await;
    }

    let producer = utils::create_producer(&config.brokers, config.message_timeout_ms)
        .map_err(io::Error::other)?;
    let publisher = KafkaPublisher::new(producer);

    let state = Arc::new(AppState::new(Arc::new(publisher.clone()), &config.topic));

    web::server(move || {
        let s = state.clone();
        web::App::new().state(s).configure(configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    if let Err(e) = publisher.close(config.shutdown_flush) {
        error!("Producer flush failed: {e}");
    }
    info!("Producer gateway stopped");
    Ok(())
}
