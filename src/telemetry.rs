use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::log::SetLoggerError;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Client libraries that log every connection attempt at `info`. A scrape
/// opens a fresh connection per target, so they are held at `warn` unless
/// `RUST_LOG` says otherwise.
const CHATTY_CLIENTS: &[&str] = &["lapin", "mongodb", "redis", "hyper", "reqwest"];

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to bridge log records: {0}")]
    Logger(#[from] SetLoggerError),
    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Bunyan JSON subscriber writing to `sink`. `RUST_LOG` wins over
/// `default_level`.
pub fn get_subscriber<Sink>(
    name: &str,
    default_level: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level)));
    let formatting_layer = BunyanFormattingLayer::new(name.to_string(), sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    // lapin and reqwest still emit `log` records
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

fn default_directives(level: &str) -> String {
    let mut directives = vec![level.to_string()];
    directives.extend(CHATTY_CLIENTS.iter().map(|target| format!("{}=warn", target)));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn client_libraries_are_held_at_warn() {
        let directives = default_directives("info");

        assert!(directives.starts_with("info,"));
        assert!(directives.contains("lapin=warn"));
        assert!(directives.contains("mongodb=warn"));
        assert!(directives.contains("redis=warn"));
    }

    #[test]
    fn events_are_written_as_bunyan_json() {
        let buffer = Buffer::default();
        let subscriber = get_subscriber("sidewatch", "info", buffer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(metric = "sidewatch_db_up", "Fail to add metric");
        });

        let line = buffer.contents();
        let record: serde_json::Value =
            serde_json::from_str(line.lines().last().expect("one record")).unwrap();
        assert_eq!(record["name"], "sidewatch");
        assert_eq!(record["msg"], "Fail to add metric");
        assert_eq!(record["metric"], "sidewatch_db_up");
        assert_eq!(record["level"], 50);
    }
}
