pub mod collector;
pub mod configuration;
pub mod exporter;
pub mod probes;
pub mod routes;
pub mod startup;
pub mod telemetry;
