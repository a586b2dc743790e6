pub mod health_checks;
pub mod metrics;

pub use health_checks::*;
pub use metrics::*;
