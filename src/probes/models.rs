use std::fmt;
use std::str::FromStr;

/// Kind of dependency a metric points at, read from label index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Http,
    Amqp,
    Mongo,
    Redis,
    Taos,
}

impl TargetKind {
    pub const ALL: [TargetKind; 5] = [
        TargetKind::Http,
        TargetKind::Amqp,
        TargetKind::Mongo,
        TargetKind::Redis,
        TargetKind::Taos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Http => "http",
            TargetKind::Amqp => "amqp",
            TargetKind::Mongo => "mongo",
            TargetKind::Redis => "redis",
            TargetKind::Taos => "taos",
        }
    }

    /// Value reported under the target-kind label. HTTP targets are
    /// identified by their URL, everything else by the product name.
    pub fn label_value(&self, url: &str) -> String {
        match self {
            TargetKind::Http => url.to_string(),
            TargetKind::Amqp => "rabbitmq".to_string(),
            TargetKind::Mongo => "mongodb".to_string(),
            TargetKind::Redis => "redis".to_string(),
            TargetKind::Taos => "tdengine".to_string(),
        }
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Up,
    Down,
    /// A completed HTTP exchange, whatever the status.
    Status(u16),
}

impl ProbeOutcome {
    pub fn value(&self) -> f64 {
        match self {
            ProbeOutcome::Up => 1.0,
            ProbeOutcome::Down => 0.0,
            ProbeOutcome::Status(code) => f64::from(*code),
        }
    }
}
