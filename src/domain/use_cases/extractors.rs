use actix_web::{http::header::ACCEPT_LANGUAGE, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Deserialize;

use crate::{errors::AppError, i18n::Language, AppState};

#[derive(Debug, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// Response language of the current request.
///
/// Resolved from `?lang=`, then `Accept-Language`, then the configured default.
/// Usage: add `language: RequestLanguage` as a parameter to a handler.
#[derive(Debug, Clone)]
pub struct RequestLanguage(pub Language);

impl FromRequest for RequestLanguage {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState missing while resolving request language");
            return ready(Err(AppError::InternalError("application state missing".into()).into()));
        };

        let query = web::Query::<LangQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().lang);
        let header = req
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        ready(Ok(RequestLanguage(state.languages.negotiate(query.as_deref(), header))))
    }
}
