use clap::Parser;
use sidewatch::collector::Collector;
use sidewatch::configuration::get_configuration;
use sidewatch::exporter::Exporter;
use sidewatch::probes::ProbeRegistry;
use sidewatch::startup::run;
use sidewatch::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;
use std::path::PathBuf;

/// Probes downstream dependencies and exposes their health as Prometheus metrics
#[derive(Parser, Debug)]
#[command(name = "sidewatch", version)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "SIDEWATCH_CONFIG", default_value = "config.yml")]
    config: PathBuf,
    /// Address to serve /metrics on
    #[arg(long, env = "SIDEWATCH_BIND", default_value = "0.0.0.0:9100")]
    bind: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let subscriber = get_subscriber("sidewatch", "info", std::io::stdout);
    if let Err(err) = init_subscriber(subscriber) {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    let settings = match get_configuration(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(config = %cli.config.display(), "Failed to load config: {}", err);
            std::process::exit(1);
        }
    };

    let collector = Collector::new(&settings, ProbeRegistry::default());
    let exporter = match Exporter::new(collector, &settings.namespace) {
        Ok(exporter) => exporter,
        Err(err) => {
            tracing::error!(namespace = %settings.namespace, "Failed to build exporter: {}", err);
            std::process::exit(1);
        }
    };
    exporter.describe();

    tracing::info!("Starting http server - {}", &cli.bind);
    let listener = match TcpListener::bind(&cli.bind) {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to start http server: {}", err);
            std::process::exit(1);
        }
    };

    run(listener, exporter)?.await
}
