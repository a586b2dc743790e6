use crate::exporter::Exporter;
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub const METRICS_PATH: &str = "/metrics";

pub fn run(listener: TcpListener, exporter: Exporter) -> Result<Server, std::io::Error> {
    let exporter = web::Data::new(exporter);

    tracing::info!("HTTP handler path - {}", METRICS_PATH);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(exporter.clone())
            .service(web::resource(METRICS_PATH).route(web::get().to(routes::metrics)))
            .service(web::resource("/health_check").route(web::get().to(routes::health_check)))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
