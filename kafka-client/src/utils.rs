use crate::DeliveryOutcome;
use log::{debug, error, info};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaError, KafkaResult, RDKafkaErrorCode};
use rdkafka::message::OwnedMessage;
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord};

/// Topic declaration applied by [`ensure_topic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication: i32,
}

pub fn producer_config(brokers: &str, message_timeout_ms: u64) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", brokers)
        .set("message.timeout.ms", message_timeout_ms.to_string());
    config
}

pub fn create_producer(brokers: &str, message_timeout_ms: u64) -> KafkaResult<FutureProducer> {
    producer_config(brokers, message_timeout_ms).create()
}

pub fn create_admin(brokers: &str) -> KafkaResult<AdminClient<DefaultClientContext>> {
    ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .create()
}

/// Puts the record on the producer queue without waiting for the broker.
pub fn enqueue_message(
    producer: &FutureProducer,
    topic: &str,
    payload: &str,
) -> Result<DeliveryFuture, KafkaError> {
    let record = FutureRecord::<(), str>::to(topic).payload(payload);

    match producer.send_result(record) {
        Ok(pending) => {
            debug!("Enqueued message for topic={topic}");
            Ok(pending)
        }
        Err((e, _)) => {
            error!("Failed to enqueue message: {e:?}");
            Err(e)
        }
    }
}

pub fn delivery_outcome<C>(
    result: Result<Result<(i32, i64), (KafkaError, OwnedMessage)>, C>,
) -> DeliveryOutcome {
    match result {
        Ok(Ok((partition, offset))) => DeliveryOutcome::Delivered { partition, offset },
        Ok(Err((e, _))) => DeliveryOutcome::Failed(e.to_string()),
        // producer dropped before the report arrived
        Err(_) => DeliveryOutcome::Failed("delivery canceled".to_string()),
    }
}

pub fn delivery_report(payload: &str, outcome: &DeliveryOutcome) -> String {
    match outcome {
        DeliveryOutcome::Delivered { offset, .. } => {
            format!("Sent message = [{payload}] with offset=[{offset}]")
        }
        DeliveryOutcome::Failed(reason) => {
            format!("Unable to send message = [{payload}] due to : {reason}")
        }
    }
}

pub fn log_delivery(payload: &str, outcome: &DeliveryOutcome) {
    let report = delivery_report(payload, outcome);
    match outcome {
        DeliveryOutcome::Delivered { .. } => info!("{report}"),
        DeliveryOutcome::Failed(_) => error!("{report}"),
    }
}

pub async fn ensure_topic(
    admin: &AdminClient<DefaultClientContext>,
    spec: &TopicSpec,
) -> Result<(), KafkaError> {
    let new_topic = NewTopic::new(
        &spec.name,
        spec.partitions,
        TopicReplication::Fixed(spec.replication),
    );
    let res = admin
        .create_topics([&new_topic], &AdminOptions::new())
        .await?;

    for r in res {
        match r {
            Ok(t) => info!("Created topic: {t}"),
            Err((t, e)) => {
                if e == RDKafkaErrorCode::TopicAlreadyExists {
                    info!("Topic already exists: {t}");
                } else {
                    return Err(KafkaError::AdminOp(e));
                }
            }
        }
    }

    Ok(())
}
