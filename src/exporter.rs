//! Prometheus exposition of collected samples.
//!
//! Probe samples go into a registry built for a single scrape, so nothing
//! about one scrape's label values survives into the next. The exporter's
//! own metrics live in a long-lived registry next to it.

use crate::collector::{Collector, MetricKind, Sample};
use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Encoder, Gauge, GaugeVec, IntGauge, Opts, Registry, TextEncoder};
use std::time::Instant;

pub struct Exporter {
    collector: Collector,
    registry: Registry,
    scrape_duration: Gauge,
    skipped_metrics: IntGauge,
}

impl Exporter {
    pub fn new(collector: Collector, namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let build_info = GaugeVec::new(
            Opts::new(
                "build_info",
                "A metric with a constant '1' value labeled by the exporter version",
            )
            .namespace(namespace),
            &["version"],
        )?;
        build_info
            .with_label_values(&[env!("CARGO_PKG_VERSION")])
            .set(1.0);
        registry.register(Box::new(build_info))?;

        let scrape_duration = Gauge::with_opts(
            Opts::new(
                "scrape_duration_seconds",
                "Time spent probing all configured targets during the last scrape",
            )
            .namespace(namespace),
        )?;
        registry.register(Box::new(scrape_duration.clone()))?;

        let skipped_metrics = IntGauge::with_opts(
            Opts::new(
                "scrape_skipped_metrics",
                "Configured metrics skipped during the last scrape",
            )
            .namespace(namespace),
        )?;
        registry.register(Box::new(skipped_metrics.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        // configured metrics may not shadow anything registered above
        let taken = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect::<Vec<_>>();
        let collector = collector.with_reserved_names(taken);

        Ok(Self {
            collector,
            registry,
            scrape_duration,
            skipped_metrics,
        })
    }

    /// Logs how every configured metric will be exposed, or why it won't.
    pub fn describe(&self) {
        self.collector.describe();
    }

    /// Runs one collection cycle and encodes the result.
    #[tracing::instrument(name = "Scrape", skip(self))]
    pub async fn scrape(&self) -> Result<Vec<u8>, prometheus::Error> {
        let started = Instant::now();
        let collection = self.collector.collect().await;
        self.scrape_duration.set(started.elapsed().as_secs_f64());
        self.skipped_metrics.set(collection.skipped as i64);

        let mut families = self.registry.gather();
        families.extend(render(&collection.samples));
        families.sort_by(|a, b| a.get_name().cmp(b.get_name()));

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(buffer)
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

/// Builds metric families for one scrape's samples. A sample the
/// prometheus client refuses is logged and left out.
pub fn render(samples: &[Sample]) -> Vec<MetricFamily> {
    let registry = Registry::new();

    for sample in samples {
        if let Err(err) = register_sample(&registry, sample) {
            tracing::error!("Fail to add metric for {}: {}", sample.name, err);
        }
    }

    registry.gather()
}

fn register_sample(registry: &Registry, sample: &Sample) -> Result<(), prometheus::Error> {
    let opts = Opts::new(sample.name.as_str(), sample.help.as_str());
    let label_names: Vec<&str> = sample.label_names.iter().map(String::as_str).collect();
    let label_values: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();

    match sample.kind {
        MetricKind::Gauge => {
            let gauge = GaugeVec::new(opts, &label_names)?;
            gauge
                .get_metric_with_label_values(&label_values)?
                .set(sample.value);
            registry.register(Box::new(gauge))
        }
        MetricKind::Counter => {
            let counter = CounterVec::new(opts, &label_names)?;
            counter
                .get_metric_with_label_values(&label_values)?
                .inc_by(sample.value);
            registry.register(Box::new(counter))
        }
    }
}
