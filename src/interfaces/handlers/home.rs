use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Portfolio content API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/skills",
            "/api/projects",
            "/api/posts",
            "/api/timeline",
            "/api/contact",
            "/api/comments"
        ],
        "health": "/health"
    }))
}
