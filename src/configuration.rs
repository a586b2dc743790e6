use serde;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const NODE_NAME_VAR: &str = "NODE_NAME";
pub const DEFAULT_NAMESPACE: &str = "sidewatch";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricDefinition>,
    /// First label value of every sample, taken from `NODE_NAME`.
    #[serde(skip)]
    pub node_name: String,
}

/// One entry under `metrics:` in the configuration file.
///
/// Every field is read leniently so that a bad declaration only costs
/// that metric at scrape time instead of the whole process.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct MetricDefinition {
    #[serde(default)]
    pub description: String,
    /// Ordered label names: index 0 names the node label, index 1 is the
    /// target kind (`http`, `amqp`, `mongo`, `redis`, `taos`).
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
    /// Seconds; `0` falls back to [`DEFAULT_PROBE_TIMEOUT`].
    #[serde(default)]
    pub timeout: u64,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl MetricDefinition {
    pub fn timeout(&self) -> Duration {
        match self.timeout {
            0 => DEFAULT_PROBE_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    pub fn target_label(&self) -> Option<&str> {
        self.labels.get(1).map(String::as_str)
    }
}

impl Settings {
    pub fn from_yaml(contents: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}

pub fn node_name_from_env() -> Result<String, config::ConfigError> {
    match std::env::var(NODE_NAME_VAR) {
        Ok(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(config::ConfigError::NotFound(NODE_NAME_VAR.to_string())),
    }
}

pub fn get_configuration(path: &Path) -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // The format is picked from the extension: .yml, .yaml, .toml, .json
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    config.node_name = node_name_from_env()?;

    Ok(config)
}
