//! Liveness probes, one per kind of downstream dependency.
//!
//! Every probe opens its own short-lived connection, performs one cheap
//! operation and releases the connection before returning. Failures never
//! escape a probe: they are logged and reported as [`ProbeOutcome::Down`].

mod amqp;
mod errors;
mod http;
mod models;
mod mongo;
mod redis;
mod taos;

pub use amqp::{AmqpProbe, HEALTH_CHECK_QUEUE};
pub use errors::ProbeError;
pub use http::HttpProbe;
pub use models::{ProbeOutcome, TargetKind};
pub use mongo::MongoProbe;
pub use self::redis::RedisProbe;
pub use taos::{TaosEndpoint, TaosProbe};

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

/// Lookup table from target kind to the probe handling it.
#[derive(Clone)]
pub struct ProbeRegistry {
    probes: HashMap<TargetKind, Arc<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn empty() -> Self {
        Self {
            probes: HashMap::new(),
        }
    }

    pub fn register(mut self, kind: TargetKind, probe: impl Probe + 'static) -> Self {
        self.probes.insert(kind, Arc::new(probe));
        self
    }

    pub fn get(&self, kind: TargetKind) -> Option<Arc<dyn Probe>> {
        self.probes.get(&kind).cloned()
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::empty()
            .register(TargetKind::Http, HttpProbe)
            .register(TargetKind::Amqp, AmqpProbe)
            .register(TargetKind::Mongo, MongoProbe)
            .register(TargetKind::Redis, RedisProbe)
            .register(TargetKind::Taos, TaosProbe)
    }
}

/// Bounds one step of a probe by `timeout`.
pub(crate) async fn within<F, T, E>(timeout: Duration, step: F) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, E>>,
    ProbeError: From<E>,
{
    tokio::time::timeout(timeout, step)
        .await
        .map_err(|_| ProbeError::Timeout(timeout))?
        .map_err(ProbeError::from)
}

/// Maps a pass/fail liveness check onto 1/0.
pub(crate) fn up_or_down(kind: TargetKind, result: Result<(), ProbeError>) -> ProbeOutcome {
    match result {
        Ok(()) => ProbeOutcome::Up,
        Err(err) => {
            tracing::warn!(target_kind = %kind, "Probe failed: {}", err);
            ProbeOutcome::Down
        }
    }
}
