use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::comment::NewCommentRequest, errors::AppError, AppState};

#[instrument(skip(state, data))]
pub async fn create_comment(
    state: web::Data<AppState>,
    data: web::Json<NewCommentRequest>,
) -> Result<impl Responder, AppError> {
    let comment = state.comment_handler.create_comment(data.into_inner()).await?;

    Ok(HttpResponse::Created().json(state.serializer.comment(&comment)))
}
