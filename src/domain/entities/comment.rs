use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::validation::{take_trimmed, trim_input, validate_not_blank},
    errors::AppError,
};

const MAX_AUTHOR_LENGTH: u64 = 100;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

#[derive(Debug, Clone)]
pub struct CommentInsert {
    pub post_id: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Public comment submission. Approval is never accepted from the submitter.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewCommentRequest {
    #[validate(required(message = "This field is required."))]
    pub post: Option<i64>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = MAX_AUTHOR_LENGTH)
    )]
    pub author_name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub body: Option<String>,
}

impl TryFrom<NewCommentRequest> for CommentInsert {
    type Error = AppError;

    fn try_from(mut value: NewCommentRequest) -> Result<Self, Self::Error> {
        trim_input(&mut value.author_name);
        trim_input(&mut value.body);
        value.validate()?;
        Ok(CommentInsert {
            post_id: value.post.unwrap_or_default(),
            author_name: take_trimmed(value.author_name),
            body: take_trimmed(value.body),
            created_at: Utc::now(),
        })
    }
}
