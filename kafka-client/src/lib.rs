pub mod utils;

use anyhow::Result;
use log::{info, warn};
use rdkafka::producer::{FutureProducer, Producer};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Pending delivery of an enqueued record. Resolves once the broker
/// acknowledges or rejects it, after the outcome has been logged.
pub type Delivery = Pin<Box<dyn Future<Output = DeliveryOutcome> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { partition: i32, offset: i64 },
    Failed(String),
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered { partition, offset } => {
                write!(f, "delivered to partition {partition} at offset {offset}")
            }
            DeliveryOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Send side of the gateway.
///
/// `publish` only initiates the send: an `Err` means the record never made it
/// onto the producer queue. Whatever happens afterwards is reported through
/// the returned [`Delivery`].
pub trait Publisher: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> Result<Delivery>;
}

#[derive(Clone)]
pub struct KafkaPublisher {
    pub producer: FutureProducer,
}

impl KafkaPublisher {
    pub fn new(producer: FutureProducer) -> Self {
        KafkaPublisher { producer }
    }

    /// Records queued or awaiting acknowledgement.
    pub fn in_flight(&self) -> i32 {
        self.producer.in_flight_count()
    }

    /// Waits up to `timeout` for in-flight records before the handle is dropped.
    ///
    /// Delivery futures spawned on the server's runtimes are gone by the time
    /// this runs, so records acknowledged during the flush are not logged.
    pub fn close(&self, timeout: Duration) -> Result<()> {
        let pending = self.in_flight();
        if pending > 0 {
            warn!("{pending} deliveries still pending at shutdown, their outcomes will not be logged");
        }
        info!("Flushing producer (timeout={timeout:?})");
        self.producer.flush(timeout)?;
        Ok(())
    }
}

impl Publisher for KafkaPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<Delivery> {
        let pending = utils::enqueue_message(&self.producer, topic, payload)?;
        let payload = payload.to_string();
        Ok(Box::pin(async move {
            let outcome = utils::delivery_outcome(pending.await);
            utils::log_delivery(&payload, &outcome);
            outcome
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_publisher(max_bytes: &str) -> KafkaPublisher {
        // Nothing listens on port 1, so every delivery times out.
        let producer = utils::producer_config("127.0.0.1:1", 200)
            .set("message.max.bytes", max_bytes)
            .set("batch.size", max_bytes)
            .create()
            .expect("producer");
        KafkaPublisher::new(producer)
    }

    #[test]
    fn outcome_display() {
        let ok = DeliveryOutcome::Delivered {
            partition: 1,
            offset: 42,
        };
        assert_eq!(ok.to_string(), "delivered to partition 1 at offset 42");
        let failed = DeliveryOutcome::Failed("boom".into());
        assert_eq!(failed.to_string(), "failed: boom");
    }

    #[tokio::test]
    async fn oversized_payload_fails_before_enqueue() {
        let publisher = offline_publisher("1000");
        let payload = "x".repeat(4096);
        let res = publisher.publish("kafka-passthrough", &payload);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn close_reports_unflushed_records() {
        let publisher = offline_publisher("1000000");
        let _delivery = publisher
            .publish("kafka-passthrough", "hello")
            .expect("enqueue should succeed without a broker");

        assert_eq!(publisher.in_flight(), 1);
        assert!(publisher.close(Duration::from_millis(10)).is_err());
    }

    #[tokio::test]
    async fn unreachable_broker_fails_asynchronously() {
        let publisher = offline_publisher("1000000");
        let delivery = publisher
            .publish("kafka-passthrough", "hello")
            .expect("enqueue should succeed without a broker");

        let outcome = tokio::time::timeout(Duration::from_secs(30), delivery)
            .await
            .expect("delivery should resolve after message.timeout.ms");
        assert!(matches!(outcome, DeliveryOutcome::Failed(_)));
    }
}
