mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, slug, use_cases};
pub use interfaces::{handlers, repositories, routes, serializers};
pub use infrastructure::{db, i18n, media, telemetry};

use anyhow::Context;

use i18n::LanguageSettings;
use media::MediaResolver;
use serializers::ContentSerializer;
use shared_repos::SharedRepositories;
use use_cases::{
    comment::CommentHandler, contact::ContactHandler, post::PostHandler, project::ProjectHandler,
    skill::SkillHandler, tag::TagHandler, timeline::TimelineHandler,
};

pub struct AppState {
    pub tag_handler: TagHandler,
    pub skill_handler: SkillHandler,
    pub project_handler: ProjectHandler,
    pub post_handler: PostHandler,
    pub comment_handler: CommentHandler,
    pub contact_handler: ContactHandler,
    pub timeline_handler: TimelineHandler,
    pub serializer: ContentSerializer,
    pub languages: LanguageSettings,
    pub health: std::sync::Arc<dyn repositories::HealthCheck>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, repos: SharedRepositories) -> anyhow::Result<Self> {
        let media = MediaResolver::new(&config.media_base_url)
            .with_context(|| format!("invalid media base URL '{}'", config.media_base_url))?;
        let languages = LanguageSettings::from_config(config);
        let serializer = ContentSerializer::new(media, languages.localizer());

        Ok(AppState {
            tag_handler: TagHandler::new(repos.tag_repo.clone()),
            skill_handler: SkillHandler::new(repos.skill_repo.clone()),
            project_handler: ProjectHandler::new(repos.project_repo.clone(), repos.tag_repo.clone()),
            post_handler: PostHandler::new(
                repos.post_repo.clone(),
                repos.tag_repo.clone(),
                repos.comment_repo.clone(),
            ),
            comment_handler: CommentHandler::new(repos.comment_repo.clone(), repos.post_repo.clone()),
            contact_handler: ContactHandler::new(repos.contact_repo.clone()),
            timeline_handler: TimelineHandler::new(repos.timeline_repo.clone()),
            serializer,
            languages,
            health: repos.health,
        })
    }
}
