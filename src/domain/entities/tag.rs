use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    domain::slug::assign_slug,
    entities::validation::{take_trimmed, trim_input, validate_not_blank, REQUIRED_MESSAGE},
    errors::AppError,
};

const MAX_NAME_LENGTH: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct TagInsert {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewTagRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = MAX_NAME_LENGTH)
    )]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,
}

impl NewTagRequest {
    pub fn named(name: &str) -> Self {
        NewTagRequest { name: Some(name.to_string()), slug: None }
    }
}

impl TryFrom<NewTagRequest> for TagInsert {
    type Error = AppError;

    fn try_from(mut value: NewTagRequest) -> Result<Self, Self::Error> {
        trim_input(&mut value.name);
        value.validate()?;
        let name = take_trimmed(value.name);
        let slug = assign_slug(value.slug.as_deref(), &name)?;
        Ok(TagInsert { name, slug })
    }
}
