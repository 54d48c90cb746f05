use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::validation::{take_trimmed, trim_input, validate_not_blank},
    errors::AppError,
};

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewContactMeForm {
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = 200)
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address."),
        length(max = 254)
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContactMeFormInsert {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ContactMeMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<NewContactMeForm> for ContactMeFormInsert {
    type Error = AppError;

    fn try_from(mut value: NewContactMeForm) -> Result<Self, Self::Error> {
        trim_input(&mut value.name);
        trim_input(&mut value.email);
        trim_input(&mut value.message);
        value.validate()?;
        Ok(ContactMeFormInsert {
            name: take_trimmed(value.name),
            email: take_trimmed(value.email),
            message: take_trimmed(value.message),
            timestamp: Utc::now(),
        })
    }
}
