//! Gateway settings read from the environment (and `.env`, when present).

use std::time::Duration;

pub const DEFAULT_TOPIC: &str = "kafka-passthrough";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub brokers: String,
    pub topic: String,
    pub message_timeout_ms: u64,
    /// Declare the alternate topic at startup.
    pub create_topic: bool,
    pub bind_addr: String,
    pub shutdown_flush: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        GatewayConfig {
            brokers: load("KAFKA_BROKERS", "localhost:9092"),
            topic: load("KAFKA_TOPIC", DEFAULT_TOPIC),
            message_timeout_ms: load("KAFKA_MESSAGE_TIMEOUT_MS", "5000")
                .parse()
                .unwrap_or(5000),
            create_topic: parse_flag(&load("KAFKA_TOPIC_CREATE_ENABLED", "false")),
            bind_addr: load("BIND_ADDRESS", "0.0.0.0:8080"),
            shutdown_flush: Duration::from_secs(
                load("SHUTDOWN_FLUSH_SECS", "5").parse().unwrap_or(5),
            ),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> GatewayConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.brokers, "localhost:9092");
        assert_eq!(config.topic, "kafka-passthrough");
        assert_eq!(config.message_timeout_ms, 5000);
        assert!(!config.create_topic);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.shutdown_flush, Duration::from_secs(5));
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("KAFKA_BROKERS", "kafka-1:9092,kafka-2:9092"),
            ("KAFKA_TOPIC", "other"),
            ("KAFKA_MESSAGE_TIMEOUT_MS", "250"),
            ("BIND_ADDRESS", "127.0.0.1:9000"),
        ]);
        assert_eq!(config.brokers, "kafka-1:9092,kafka-2:9092");
        assert_eq!(config.topic, "other");
        assert_eq!(config.message_timeout_ms, 250);
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = config_from(&[
            ("KAFKA_MESSAGE_TIMEOUT_MS", "soon"),
            ("SHUTDOWN_FLUSH_SECS", "-1"),
        ]);
        assert_eq!(config.message_timeout_ms, 5000);
        assert_eq!(config.shutdown_flush, Duration::from_secs(5));
    }

    #[test]
    fn create_flag() {
        assert!(config_from(&[("KAFKA_TOPIC_CREATE_ENABLED", "true")]).create_topic);
        assert!(config_from(&[("KAFKA_TOPIC_CREATE_ENABLED", "TRUE")]).create_topic);
        assert!(!config_from(&[("KAFKA_TOPIC_CREATE_ENABLED", "false")]).create_topic);
        assert!(!config_from(&[("KAFKA_TOPIC_CREATE_ENABLED", "yes")]).create_topic);
        assert!(!config_from(&[("KAFKA_TOPIC_CREATE_ENABLED", "")]).create_topic);
    }
}
