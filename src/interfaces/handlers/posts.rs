use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::post::PostFilter, errors::AppError, use_cases::extractors::RequestLanguage, AppState,
};

#[instrument(skip(state))]
pub async fn list_posts(
    state: web::Data<AppState>,
    filter: web::Query<PostFilter>,
    language: RequestLanguage,
) -> Result<impl Responder, AppError> {
    let posts = state.post_handler.list_posts(&filter).await?;

    let body: Vec<_> = posts
        .iter()
        .map(|p| state.serializer.post(p, &language.0))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

#[instrument(skip(state))]
pub async fn get_post_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
    language: RequestLanguage,
) -> Result<impl Responder, AppError> {
    let post = state.post_handler.get_post_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(state.serializer.post(&post, &language.0)))
}
