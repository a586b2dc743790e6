use actix_web::HttpResponse;

/// Liveness of the exporter itself. Never touches a probe.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
