use actix_web::HttpResponse;

/// GET /
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().finish()
}
