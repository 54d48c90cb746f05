use derive_more::Display;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::validation::{take_trimmed, trim_input, validate_not_blank},
    errors::AppError,
};

const MAX_NAME_LENGTH: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillCategory {
    #[default]
    #[display("Web Development")]
    Web,
    #[display("Data Science & AI")]
    Data,
    #[display("Tools & DevOps")]
    Tools,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub logo: String,
    pub is_key_skill: bool,
    pub category: SkillCategory,
}

#[derive(Debug, Clone)]
pub struct SkillInsert {
    pub name: String,
    pub logo: String,
    pub is_key_skill: bool,
    pub category: SkillCategory,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct SkillFilter {
    pub category: Option<SkillCategory>,
    #[serde(rename = "key_skill")]
    pub is_key_skill: Option<bool>,
}

impl SkillFilter {
    pub fn matches(&self, skill: &Skill) -> bool {
        self.category.is_none_or(|c| c == skill.category)
            && self.is_key_skill.is_none_or(|k| k == skill.is_key_skill)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct NewSkillRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank"),
        length(max = MAX_NAME_LENGTH)
    )]
    pub name: Option<String>,

    /// Storage reference of the uploaded logo, e.g. `skills/rust.svg`.
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_not_blank")
    )]
    pub logo: Option<String>,

    #[serde(default)]
    pub is_key_skill: bool,

    #[serde(default)]
    pub category: SkillCategory,
}

impl TryFrom<NewSkillRequest> for SkillInsert {
    type Error = AppError;

    fn try_from(mut value: NewSkillRequest) -> Result<Self, Self::Error> {
        trim_input(&mut value.name);
        trim_input(&mut value.logo);
        value.validate()?;
        Ok(SkillInsert {
            name: take_trimmed(value.name),
            logo: take_trimmed(value.logo),
            is_key_skill: value.is_key_skill,
            category: value.category,
        })
    }
}
