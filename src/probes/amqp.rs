use super::{up_or_down, within, Probe, ProbeError, ProbeOutcome, TargetKind};
use async_trait::async_trait;
use lapin::options::QueueDeclareOptions;
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use std::time::Duration;

/// Queue declared on every check. Non-durable, so a broker restart drops it.
pub const HEALTH_CHECK_QUEUE: &str = "health_check_queue";

const REPLY_SUCCESS: u16 = 200;

/// Healthy when the broker accepts a connection, a channel and a queue
/// declaration.
pub struct AmqpProbe;

#[async_trait]
impl Probe for AmqpProbe {
    #[tracing::instrument(name = "Check RabbitMQ health", skip_all)]
    async fn check(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        up_or_down(TargetKind::Amqp, declare_queue(url, timeout).await)
    }
}

async fn declare_queue(url: &str, timeout: Duration) -> Result<(), ProbeError> {
    let connection = within(
        timeout,
        Connection::connect(url, ConnectionProperties::default()),
    )
    .await?;

    let declared = within(timeout, async {
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                HEALTH_CHECK_QUEUE,
                QueueDeclareOptions {
                    passive: false,
                    durable: false,
                    exclusive: false,
                    auto_delete: false,
                    nowait: false,
                },
                FieldTable::default(),
            )
            .await?;
        Ok::<_, lapin::Error>(())
    })
    .await;

    if let Err(err) = within(timeout, connection.close(REPLY_SUCCESS, "OK")).await {
        tracing::debug!("Closing RabbitMQ connection: {}", err);
    }

    declared
}
