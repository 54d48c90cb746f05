use std::sync::Arc;

use crate::repositories::{
    comment::CommentRepository,
    contact_me::ContactRepository,
    memory::MemoryStore,
    post::PostRepository,
    project::ProjectRepository,
    skill::SkillRepository,
    sqlx_repo::{
        SqlxCommentRepo, SqlxContactMeRepo, SqlxPostRepo, SqlxProjectRepo, SqlxRepo,
        SqlxSkillRepo, SqlxTagRepo, SqlxTimelineRepo,
    },
    tag::TagRepository,
    timeline::TimelineRepository,
    HealthCheck,
};

/// One handle per repository trait, shared by every use case.
#[derive(Clone)]
pub struct SharedRepositories {
    pub health: Arc<dyn HealthCheck>,
    pub tag_repo: Arc<dyn TagRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub post_repo: Arc<dyn PostRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub timeline_repo: Arc<dyn TimelineRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            health: Arc::new(SqlxRepo::new(pool.clone())),
            tag_repo: Arc::new(SqlxTagRepo::new(pool.clone())),
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            post_repo: Arc::new(SqlxPostRepo::new(pool.clone())),
            comment_repo: Arc::new(SqlxCommentRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactMeRepo::new(pool.clone())),
            timeline_repo: Arc::new(SqlxTimelineRepo::new(pool)),
        }
    }

    /// Every repository backed by the same in-process store.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        SharedRepositories {
            health: store.clone(),
            tag_repo: store.clone(),
            skill_repo: store.clone(),
            project_repo: store.clone(),
            post_repo: store.clone(),
            comment_repo: store.clone(),
            contact_repo: store.clone(),
            timeline_repo: store,
        }
    }
}
