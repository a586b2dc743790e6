use super::declaration::{Declaration, MetricKind};

/// One value produced during a scrape, with its label values fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub label_names: Vec<String>,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl Sample {
    pub fn new(declaration: &Declaration, node_name: &str, value: f64) -> Self {
        let label_values = vec![
            node_name.to_string(),
            declaration.target.label_value(&declaration.url),
        ];

        Self {
            name: declaration.name.clone(),
            help: declaration.help.clone(),
            kind: declaration.kind,
            label_names: declaration.label_names.clone(),
            label_values,
            value,
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.label_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.label_values[i].as_str())
    }
}
