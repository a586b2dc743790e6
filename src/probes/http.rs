use super::{Probe, ProbeError, ProbeOutcome};
use async_trait::async_trait;
use std::time::Duration;

/// Reports the status code of a `GET` against the target, or `0` when no
/// response came back at all.
pub struct HttpProbe;

#[async_trait]
impl Probe for HttpProbe {
    #[tracing::instrument(name = "Check HTTP target", skip(self))]
    async fn check(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        match fetch_status(url, timeout).await {
            Ok(code) => ProbeOutcome::Status(code),
            Err(err) => {
                tracing::warn!("HTTP health check failed: {}", err);
                ProbeOutcome::Down
            }
        }
    }
}

async fn fetch_status(url: &str, timeout: Duration) -> Result<u16, ProbeError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;

    Ok(response.status().as_u16())
}
