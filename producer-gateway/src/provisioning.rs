use crate::config::GatewayConfig;
use kafka_client::utils::{self, TopicSpec};
use log::{error, info};
use rdkafka::admin::AdminClient;
use rdkafka::client::DefaultClientContext;

pub const ALTERNATE_TOPIC: &str = "kafka-alternate-topic";
pub const ALTERNATE_PARTITIONS: i32 = 2;
pub const ALTERNATE_REPLICATION: i32 = 1;

/// The topic to declare at startup, if declaration is switched on.
pub fn declared_topic(config: &GatewayConfig) -> Option<TopicSpec> {
    config.create_topic.then(|| TopicSpec {
        name: ALTERNATE_TOPIC.to_string(),
        partitions: ALTERNATE_PARTITIONS,
        replication: ALTERNATE_REPLICATION,
    })
}

/// Declares `spec` on the cluster. Failures are logged, never fatal.
pub async fn provision(admin: &AdminClient<DefaultClientContext>, spec: &TopicSpec) {
    info!(
        "Declaring topic {} (partitions={}, replication={})",
        spec.name, spec.partitions, spec.replication
    );
    if let Err(e) = utils::ensure_topic(admin, spec).await {
        error!("Topic ensure failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_when_disabled() {
        let config = GatewayConfig::default();
        assert_eq!(declared_topic(&config), None);
    }

    #[test]
    fn alternate_topic_when_enabled() {
        let config = GatewayConfig {
            create_topic: true,
            ..GatewayConfig::default()
        };
        let spec = declared_topic(&config).expect("topic should be declared");
        assert_eq!(spec.name, "kafka-alternate-topic");
        assert_eq!(spec.partitions, 2);
        assert_eq!(spec.replication, 1);
    }

    #[test]
    fn independent_of_publish_topic() {
        let config = GatewayConfig {
            create_topic: true,
            topic: "something-else".into(),
            ..GatewayConfig::default()
        };
        assert_eq!(declared_topic(&config).unwrap().name, ALTERNATE_TOPIC);
    }
}
