use crate::configuration::MetricDefinition;
use crate::probes::TargetKind;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

lazy_static! {
    static ref METRIC_NAME: Regex = Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("valid regex");
    static ref LABEL_NAME: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "counter" => Ok(MetricKind::Counter),
            "gauge" => Ok(MetricKind::Gauge),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Counter => f.write_str("counter"),
            MetricKind::Gauge => f.write_str("gauge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("expected 2 labels (node, target kind), found {0}")]
    LabelCount(usize),
    #[error("there is no valid label {0:?}")]
    UnknownTarget(String),
    #[error("{0:?} is not valid type")]
    UnknownType(String),
    #[error("{0:?} is not a valid metric name")]
    InvalidName(String),
    #[error("{0:?} is reserved for the exporter's own metrics")]
    ReservedName(String),
    #[error("{0:?} is not a valid label name")]
    InvalidLabel(String),
}

impl DeclarationError {
    /// Unknown target kinds are tolerated; everything else is a config bug.
    pub fn is_warning(&self) -> bool {
        matches!(self, DeclarationError::UnknownTarget(_))
    }
}

/// A metric definition that passed validation and is ready to probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub target: TargetKind,
    pub label_names: Vec<String>,
    pub url: String,
    pub timeout: Duration,
}

impl Declaration {
    /// `reserved` holds the full names of metrics the exporter already
    /// exposes; a declaration may not shadow any of them.
    pub fn parse(
        namespace: &str,
        name: &str,
        definition: &MetricDefinition,
        reserved: &HashSet<String>,
    ) -> Result<Self, DeclarationError> {
        if definition.labels.len() != 2 {
            return Err(DeclarationError::LabelCount(definition.labels.len()));
        }
        let target = definition.labels[1]
            .parse::<TargetKind>()
            .map_err(DeclarationError::UnknownTarget)?;
        let kind = definition
            .kind
            .parse::<MetricKind>()
            .map_err(DeclarationError::UnknownType)?;

        let full_name = fq_name(namespace, name);
        if !METRIC_NAME.is_match(&full_name) {
            return Err(DeclarationError::InvalidName(full_name));
        }
        if reserved.contains(&full_name) {
            return Err(DeclarationError::ReservedName(full_name));
        }
        for (i, label) in definition.labels.iter().enumerate() {
            let duplicate = definition.labels[..i].contains(label);
            if duplicate || label.starts_with("__") || !LABEL_NAME.is_match(label) {
                return Err(DeclarationError::InvalidLabel(label.clone()));
            }
        }

        // the exposition format refuses empty help strings
        let help = match definition.description.trim() {
            "" => name.to_string(),
            description => description.to_string(),
        };

        Ok(Self {
            name: full_name,
            help,
            kind,
            target,
            label_names: definition.labels.clone(),
            url: definition.url.clone(),
            timeout: definition.timeout(),
        })
    }
}

pub fn fq_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", namespace, name)
    }
}
