use std::sync::Arc;

use crate::{
    entities::skill::{NewSkillRequest, Skill, SkillFilter, SkillInsert},
    errors::AppError,
    repositories::skill::SkillRepository,
};

pub struct SkillHandler {
    pub skill_repo: Arc<dyn SkillRepository>,
}

impl SkillHandler {
    pub fn new(skill_repo: Arc<dyn SkillRepository>) -> Self {
        SkillHandler { skill_repo }
    }

    pub async fn create_skill(&self, request: NewSkillRequest) -> Result<Skill, AppError> {
        let insert = SkillInsert::try_from(request)?;
        self.skill_repo.create_skill(&insert).await
    }

    /// Skills in insertion order, optionally narrowed by category and key-skill flag
    pub async fn list_skills(&self, filter: &SkillFilter) -> Result<Vec<Skill>, AppError> {
        self.skill_repo.list_skills(filter).await
    }

    pub async fn delete_skill(&self, id: i64) -> Result<(), AppError> {
        self.skill_repo.delete_skill(id).await
    }
}
