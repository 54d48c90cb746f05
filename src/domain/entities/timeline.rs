use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::{
    entities::{
        option_fields::{OptionField, PatchString},
        translations::Translations,
        validation::{take_trimmed, trim_input, validate_not_blank, validate_not_blank_patch},
    },
    errors::AppError,
};

const MAX_YEAR_LENGTH: u64 = 30;
const MAX_TITLE_LENGTH: u64 = 100;

pub const TRANSLATABLE_FIELDS: [&str; 2] = ["title", "description"];

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TimelineEvent {
    pub id: i64,
    /// Free text such as "2018" or "2018-2021".
    pub year: String,
    pub title: String,
    pub description: String,
    pub sort_order: i32,
    pub translations: Json<Translations>,
}

#[derive(Debug, Clone)]
pub struct TimelineEventInsert {
    pub year: String,
    pub title: String,
    pub description: String,
    pub sort_order: i32,
    pub translations: Translations,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewTimelineEventRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = MAX_YEAR_LENGTH)
    )]
    pub year: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = MAX_TITLE_LENGTH)
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub description: Option<String>,

    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub translations: Translations,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTimelineEventRequest {
    #[validate(custom(function = "validate_not_blank_patch"), length(max = MAX_YEAR_LENGTH))]
    pub year: PatchString,

    #[validate(custom(function = "validate_not_blank_patch"), length(max = MAX_TITLE_LENGTH))]
    pub title: PatchString,

    #[validate(custom(function = "validate_not_blank_patch"))]
    pub description: PatchString,

    pub order: OptionField<i32>,

    pub translations: OptionField<Translations>,
}

impl TryFrom<NewTimelineEventRequest> for TimelineEventInsert {
    type Error = AppError;

    fn try_from(mut value: NewTimelineEventRequest) -> Result<Self, Self::Error> {
        trim_input(&mut value.year);
        trim_input(&mut value.title);
        trim_input(&mut value.description);
        value.validate()?;
        value.translations.ensure_fields(&TRANSLATABLE_FIELDS)?;
        Ok(TimelineEventInsert {
            year: take_trimmed(value.year),
            title: take_trimmed(value.title),
            description: take_trimmed(value.description),
            sort_order: value.order,
            translations: value.translations,
        })
    }
}

impl UpdateTimelineEventRequest {
    pub fn apply_to(mut self, current: &TimelineEvent) -> Result<TimelineEventInsert, AppError> {
        self.year.trim_in_place();
        self.title.trim_in_place();
        self.description.trim_in_place();
        self.validate()?;
        if let OptionField::SetToValue(overlay) = &self.translations {
            overlay.ensure_fields(&TRANSLATABLE_FIELDS)?;
        }
        Ok(TimelineEventInsert {
            year: self.year.apply_required(current.year.clone()),
            title: self.title.apply_required(current.title.clone()),
            description: self.description.apply_required(current.description.clone()),
            sort_order: self.order.apply_required(current.sort_order),
            translations: self.translations.apply_required(current.translations.0.clone()),
        })
    }
}
