use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::skill::SkillFilter, errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn list_skills(
    state: web::Data<AppState>,
    filter: web::Query<SkillFilter>,
) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.list_skills(&filter).await?;

    let body: Vec<_> = skills.iter().map(|s| state.serializer.skill(s)).collect();
    Ok(HttpResponse::Ok().json(body))
}
