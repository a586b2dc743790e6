use super::{up_or_down, within, Probe, ProbeError, ProbeOutcome, TargetKind};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::time::Duration;

pub struct MongoProbe;

#[async_trait]
impl Probe for MongoProbe {
    #[tracing::instrument(name = "Check MongoDB health", skip_all)]
    async fn check(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        up_or_down(TargetKind::Mongo, ping(url, timeout).await)
    }
}

async fn ping(url: &str, timeout: Duration) -> Result<(), ProbeError> {
    // SRV URIs resolve DNS while parsing
    let mut options = within(timeout, ClientOptions::parse(url)).await?;
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);

    let client = Client::with_options(options)?;
    let pinged = within(
        timeout,
        client.database("admin").run_command(doc! { "ping": 1 }, None),
    )
    .await
    .map(|_| ());

    client.shutdown().await;

    pinged
}
