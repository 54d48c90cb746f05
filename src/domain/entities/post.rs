use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use crate::{
    domain::slug::assign_slug,
    entities::{
        option_fields::{OptionField, PatchString},
        project::dedup_ids,
        tag::Tag,
        translations::Translations,
        validation::{take_trimmed, trim_input, validate_not_blank, validate_not_blank_patch},
    },
    errors::AppError,
};

const MAX_TITLE_LENGTH: u64 = 200;

pub const TRANSLATABLE_FIELDS: [&str; 2] = ["title", "content"];

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_active: bool,
    pub translations: Json<Translations>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PostInsert {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_active: bool,
    pub translations: Translations,
    pub tag_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_active: bool,
    pub translations: Translations,
    pub tag_ids: Option<Vec<i64>>,
}

/// A post with its tags and the number of approved comments at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub comment_count: i64,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostFilter {
    /// Tag slug.
    pub tag: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewPostRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = MAX_TITLE_LENGTH)
    )]
    pub title: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub content: Option<String>,

    #[serde(default)]
    pub tags: Vec<i64>,

    /// New posts stay hidden until explicitly activated.
    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub translations: Translations,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdatePostRequest {
    #[validate(custom(function = "validate_not_blank_patch"), length(max = MAX_TITLE_LENGTH))]
    pub title: PatchString,

    pub slug: PatchString,

    #[validate(custom(function = "validate_not_blank_patch"))]
    pub content: PatchString,

    pub tags: OptionField<Vec<i64>>,

    pub is_active: OptionField<bool>,

    pub translations: OptionField<Translations>,
}

impl TryFrom<NewPostRequest> for PostInsert {
    type Error = AppError;

    fn try_from(mut value: NewPostRequest) -> Result<Self, Self::Error> {
        trim_input(&mut value.title);
        trim_input(&mut value.content);
        value.validate()?;
        value.translations.ensure_fields(&TRANSLATABLE_FIELDS)?;

        let title = take_trimmed(value.title);
        let slug = assign_slug(value.slug.as_deref(), &title)?;

        Ok(PostInsert {
            title,
            slug,
            content: take_trimmed(value.content),
            is_active: value.is_active,
            translations: value.translations,
            tag_ids: dedup_ids(value.tags),
            created_at: Utc::now(),
        })
    }
}

impl UpdatePostRequest {
    pub fn apply_to(mut self, current: &Post) -> Result<PostChanges, AppError> {
        self.title.trim_in_place();
        self.content.trim_in_place();
        self.validate()?;
        if let OptionField::SetToValue(overlay) = &self.translations {
            overlay.ensure_fields(&TRANSLATABLE_FIELDS)?;
        }

        let title = self.title.apply_required(current.title.clone());

        let slug = match self.slug {
            OptionField::Unchanged => current.slug.clone(),
            OptionField::SetToNull => assign_slug(None, &title)?,
            OptionField::SetToValue(explicit) => assign_slug(Some(&explicit), &title)?,
        };

        Ok(PostChanges {
            title,
            slug,
            content: self.content.apply_required(current.content.clone()),
            is_active: self.is_active.apply_required(current.is_active),
            translations: self.translations.apply_required(current.translations.0.clone()),
            tag_ids: match self.tags {
                OptionField::Unchanged => None,
                OptionField::SetToNull => Some(Vec::new()),
                OptionField::SetToValue(ids) => Some(dedup_ids(ids)),
            },
        })
    }
}
