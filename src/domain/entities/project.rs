use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::{Validate, ValidationError};

use crate::{
    domain::slug::assign_slug,
    entities::{
        option_fields::{OptionField, PatchString},
        tag::Tag,
        translations::Translations,
        validation::{
            blank_to_none, take_trimmed, trim_input, validate_not_blank, validate_not_blank_patch,
            validate_url,
        },
    },
    errors::AppError,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_LINK_LENGTH: u64 = 200;

pub const TRANSLATABLE_FIELDS: [&str; 3] = ["title", "short_description", "full_description"];

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectCategory {
    #[default]
    #[display("Full Stack")]
    FullStack,
    #[display("Data Science")]
    DataScience,
    #[display("Scripts")]
    Scripts,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub full_description: String,
    pub thumbnail: String,
    pub repo_link: Option<String>,
    pub demo_link: Option<String>,
    pub is_featured: bool,
    pub category: ProjectCategory,
    pub translations: Json<Translations>,
    pub created_at: DateTime<Utc>,
}

/// Every mutable column of a project plus its tag links.
#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub full_description: String,
    pub thumbnail: String,
    pub repo_link: Option<String>,
    pub demo_link: Option<String>,
    pub is_featured: bool,
    pub category: ProjectCategory,
    pub translations: Translations,
    pub tag_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// Full replacement state for an update; `created_at` is not part of it.
#[derive(Debug, Clone)]
pub struct ProjectChanges {
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub full_description: String,
    pub thumbnail: String,
    pub repo_link: Option<String>,
    pub demo_link: Option<String>,
    pub is_featured: bool,
    pub category: ProjectCategory,
    pub translations: Translations,
    /// `None` keeps the current tag links.
    pub tag_ids: Option<Vec<i64>>,
}

/// A project together with its tags, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectView {
    pub project: Project,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProjectFilter {
    pub featured: Option<bool>,
    pub category: Option<ProjectCategory>,
    /// Tag slug.
    pub tag: Option<String>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
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
    pub short_description: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub full_description: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub thumbnail: Option<String>,

    #[validate(length(max = MAX_LINK_LENGTH), custom(function = "validate_optional_link"))]
    pub repo_link: Option<String>,

    #[validate(length(max = MAX_LINK_LENGTH), custom(function = "validate_optional_link"))]
    pub demo_link: Option<String>,

    #[serde(default)]
    pub tags: Vec<i64>,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub category: ProjectCategory,

    #[serde(default)]
    pub translations: Translations,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(custom(function = "validate_not_blank_patch"), length(max = MAX_TITLE_LENGTH))]
    pub title: PatchString,

    pub slug: PatchString,

    #[validate(custom(function = "validate_not_blank_patch"))]
    pub short_description: PatchString,

    #[validate(custom(function = "validate_not_blank_patch"))]
    pub full_description: PatchString,

    #[validate(custom(function = "validate_not_blank_patch"))]
    pub thumbnail: PatchString,

    #[validate(length(max = MAX_LINK_LENGTH), custom(function = "validate_link_patch"))]
    pub repo_link: PatchString,

    #[validate(length(max = MAX_LINK_LENGTH), custom(function = "validate_link_patch"))]
    pub demo_link: PatchString,

    pub tags: OptionField<Vec<i64>>,

    pub is_featured: OptionField<bool>,

    pub category: OptionField<ProjectCategory>,

    pub translations: OptionField<Translations>,
}

// ───── Validation Helpers ───────────────────────────────────────────

/// Blank links are allowed and stored as absent.
fn validate_optional_link(link: &str) -> Result<(), ValidationError> {
    if link.trim().is_empty() {
        return Ok(());
    }
    validate_url(link.trim())
}

fn validate_link_patch(link: &PatchString) -> Result<(), ValidationError> {
    match link {
        OptionField::SetToValue(value) => validate_optional_link(value),
        _ => Ok(()),
    }
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = AppError;

    fn try_from(mut value: NewProjectRequest) -> Result<Self, Self::Error> {
        for field in [
            &mut value.title,
            &mut value.short_description,
            &mut value.full_description,
            &mut value.thumbnail,
            &mut value.repo_link,
            &mut value.demo_link,
        ] {
            trim_input(field);
        }
        value.validate()?;
        value.translations.ensure_fields(&TRANSLATABLE_FIELDS)?;

        let title = take_trimmed(value.title);
        let slug = assign_slug(value.slug.as_deref(), &title)?;

        Ok(ProjectInsert {
            title,
            slug,
            short_description: take_trimmed(value.short_description),
            full_description: take_trimmed(value.full_description),
            thumbnail: take_trimmed(value.thumbnail),
            repo_link: blank_to_none(value.repo_link),
            demo_link: blank_to_none(value.demo_link),
            is_featured: value.is_featured,
            category: value.category,
            translations: value.translations,
            tag_ids: dedup_ids(value.tags),
            created_at: Utc::now(),
        })
    }
}

impl UpdateProjectRequest {
    /// Merges the patch over `current`. The slug is only recomputed when the
    /// patch sets it: a blank or null slug is derived again from the resulting title.
    pub fn apply_to(mut self, current: &Project) -> Result<ProjectChanges, AppError> {
        for field in [
            &mut self.title,
            &mut self.short_description,
            &mut self.full_description,
            &mut self.thumbnail,
            &mut self.repo_link,
            &mut self.demo_link,
        ] {
            field.trim_in_place();
        }
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

        Ok(ProjectChanges {
            title,
            slug,
            short_description: self.short_description.apply_required(current.short_description.clone()),
            full_description: self.full_description.apply_required(current.full_description.clone()),
            thumbnail: self.thumbnail.apply_required(current.thumbnail.clone()),
            repo_link: blank_to_none(self.repo_link.apply_nullable(current.repo_link.clone())),
            demo_link: blank_to_none(self.demo_link.apply_nullable(current.demo_link.clone())),
            is_featured: self.is_featured.apply_required(current.is_featured),
            category: self.category.apply_required(current.category),
            translations: self.translations.apply_required(current.translations.0.clone()),
            tag_ids: match self.tags {
                OptionField::Unchanged => None,
                OptionField::SetToNull => Some(Vec::new()),
                OptionField::SetToValue(ids) => Some(dedup_ids(ids)),
            },
        })
    }
}

pub(crate) fn dedup_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
