use sidewatch::collector::Collector;
use sidewatch::configuration::Settings;
use sidewatch::exporter::Exporter;
use sidewatch::probes::ProbeRegistry;

pub const NODE_NAME: &str = "node-1";

pub struct TestApp {
    pub address: String,
}

pub fn settings(yaml: &str) -> Settings {
    let mut settings = Settings::from_yaml(yaml).expect("Failed to parse configuration");
    settings.node_name = NODE_NAME.to_string();
    settings
}

// the server has to run in the background while the test talks to it
pub async fn spawn_app(settings: Settings) -> TestApp {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let collector = Collector::new(&settings, ProbeRegistry::default());
    let exporter =
        Exporter::new(collector, &settings.namespace).expect("Failed to build exporter");

    let server = sidewatch::startup::run(listener, exporter).expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp { address }
}
