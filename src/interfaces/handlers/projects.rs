use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::project::ProjectFilter, errors::AppError, use_cases::extractors::RequestLanguage,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects(
    state: web::Data<AppState>,
    filter: web::Query<ProjectFilter>,
    language: RequestLanguage,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects(&filter).await?;

    let body: Vec<_> = projects
        .iter()
        .map(|p| state.serializer.project(p, &language.0))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

#[instrument(skip(state))]
pub async fn get_project_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
    language: RequestLanguage,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(state.serializer.project(&project, &language.0)))
}
