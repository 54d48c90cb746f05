use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, use_cases::extractors::RequestLanguage, AppState};

#[instrument(skip(state))]
pub async fn list_timeline(
    state: web::Data<AppState>,
    language: RequestLanguage,
) -> Result<impl Responder, AppError> {
    let events = state.timeline_handler.list_events().await?;

    let body: Vec<_> = events
        .iter()
        .map(|e| state.serializer.timeline_event(e, &language.0))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}
