//! Turns configured metric definitions into samples, one probe at a time.

mod declaration;
mod sample;

pub use declaration::{fq_name, Declaration, DeclarationError, MetricKind};
pub use sample::Sample;

use crate::configuration::{MetricDefinition, Settings};
use crate::probes::{ProbeOutcome, ProbeRegistry};
use std::collections::{BTreeMap, HashSet};

/// Samples gathered by one pass over the configuration.
#[derive(Debug, Default)]
pub struct Collection {
    pub samples: Vec<Sample>,
    pub skipped: usize,
}

pub struct Collector {
    namespace: String,
    node_name: String,
    metrics: BTreeMap<String, MetricDefinition>,
    probes: ProbeRegistry,
    reserved: HashSet<String>,
}

impl Collector {
    pub fn new(settings: &Settings, probes: ProbeRegistry) -> Self {
        Self {
            namespace: settings.namespace.clone(),
            node_name: settings.node_name.clone(),
            metrics: settings.metrics.clone(),
            probes,
            reserved: HashSet::new(),
        }
    }

    /// Full names already exposed by someone else; declarations that
    /// would collide with them are skipped.
    pub fn with_reserved_names(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.reserved.extend(names);
        self
    }

    /// Validates every definition once at startup so misconfiguration is
    /// visible before the first scrape.
    pub fn describe(&self) {
        for (name, metric) in &self.metrics {
            match self.declare(name, metric) {
                Ok(declaration) => tracing::info!(
                    metric = %declaration.name,
                    kind = %declaration.kind,
                    target_kind = %declaration.target,
                    "metric description for \"{}\" registered",
                    name
                ),
                Err(err) => report(name, &err),
            }
        }
    }

    /// Probes every declared metric in name order. Bad declarations and
    /// kinds without a registered probe are skipped, never fatal.
    pub async fn collect(&self) -> Collection {
        let mut collection = Collection::default();

        for (name, metric) in &self.metrics {
            let declaration = match self.declare(name, metric) {
                Ok(declaration) => declaration,
                Err(err) => {
                    report(name, &err);
                    collection.skipped += 1;
                    continue;
                }
            };

            let Some(probe) = self.probes.get(declaration.target) else {
                tracing::warn!("There is no probe registered for {}", declaration.target);
                collection.skipped += 1;
                continue;
            };

            let outcome = match tokio::time::timeout(
                declaration.timeout,
                probe.check(&declaration.url, declaration.timeout),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        metric = %declaration.name,
                        "Probe did not finish within {:?}",
                        declaration.timeout
                    );
                    ProbeOutcome::Down
                }
            };

            collection
                .samples
                .push(Sample::new(&declaration, &self.node_name, outcome.value()));
        }

        collection
    }

    fn declare(
        &self,
        name: &str,
        metric: &MetricDefinition,
    ) -> Result<Declaration, DeclarationError> {
        Declaration::parse(&self.namespace, name, metric, &self.reserved)
    }
}

fn report(name: &str, err: &DeclarationError) {
    if err.is_warning() {
        tracing::warn!("Skipping metric {}: {}", name, err);
    } else {
        tracing::error!("Fail to add metric for {}: {}", name, err);
    }
}
