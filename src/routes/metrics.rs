use crate::exporter::Exporter;
use actix_web::{web, HttpResponse};

pub async fn metrics(exporter: web::Data<Exporter>) -> HttpResponse {
    match exporter.scrape().await {
        Ok(body) => HttpResponse::Ok()
            .content_type(exporter.content_type())
            .body(body),
        Err(err) => {
            tracing::error!("Failed to encode metrics: {:?}", err);
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}
