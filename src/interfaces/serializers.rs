//! Public JSON shapes of the content entities.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    entities::{
        comment::Comment,
        contact_me::ContactMeMessage,
        post::PostView,
        project::{ProjectCategory, ProjectView},
        skill::{Skill, SkillCategory},
        tag::Tag,
        timeline::TimelineEvent,
    },
    i18n::{Language, Localizer},
    media::MediaResolver,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillResponse {
    pub id: i64,
    pub name: String,
    pub logo: String,
    pub is_key_skill: bool,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub full_description: String,
    pub thumbnail: String,
    pub repo_link: Option<String>,
    pub demo_link: Option<String>,
    pub tags: Vec<TagResponse>,
    pub is_featured: bool,
    pub category: ProjectCategory,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: Vec<TagResponse>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Approved comments only, counted at read time.
    pub comment_count: i64,
}

/// What a commenter gets back. Moderation state stays private.
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessageResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEventResponse {
    pub id: i64,
    pub year: String,
    pub title: String,
    pub description: String,
    pub order: i32,
}

#[derive(Clone)]
pub struct ContentSerializer {
    media: MediaResolver,
    localizer: Arc<dyn Localizer>,
}

impl ContentSerializer {
    pub fn new(media: MediaResolver, localizer: Arc<dyn Localizer>) -> Self {
        ContentSerializer { media, localizer }
    }

    pub fn tag(&self, tag: &Tag) -> TagResponse {
        TagResponse {
            id: tag.id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }
    }

    fn tags(&self, tags: &[Tag]) -> Vec<TagResponse> {
        tags.iter().map(|t| self.tag(t)).collect()
    }

    pub fn skill(&self, skill: &Skill) -> SkillResponse {
        SkillResponse {
            id: skill.id,
            name: skill.name.clone(),
            logo: self.media.resolve(&skill.logo),
            is_key_skill: skill.is_key_skill,
            category: skill.category,
        }
    }

    pub fn project(&self, view: &ProjectView, language: &Language) -> ProjectResponse {
        let project = &view.project;
        let overlay = &project.translations.0;
        let localize = |base: &str, field: &str| self.localizer.localize(base, overlay, field, language);

        ProjectResponse {
            id: project.id,
            title: localize(&project.title, "title"),
            slug: project.slug.clone(),
            short_description: localize(&project.short_description, "short_description"),
            full_description: localize(&project.full_description, "full_description"),
            thumbnail: self.media.resolve(&project.thumbnail),
            repo_link: project.repo_link.clone(),
            demo_link: project.demo_link.clone(),
            tags: self.tags(&view.tags),
            is_featured: project.is_featured,
            category: project.category,
            created_at: project.created_at,
        }
    }

    pub fn post(&self, view: &PostView, language: &Language) -> PostResponse {
        let post = &view.post;
        let overlay = &post.translations.0;

        PostResponse {
            id: post.id,
            title: self.localizer.localize(&post.title, overlay, "title", language),
            slug: post.slug.clone(),
            content: self.localizer.localize(&post.content, overlay, "content", language),
            tags: self.tags(&view.tags),
            is_active: post.is_active,
            created_at: post.created_at,
            comment_count: view.comment_count,
        }
    }

    pub fn comment(&self, comment: &Comment) -> CommentResponse {
        CommentResponse {
            id: comment.id,
            post: comment.post_id,
            author_name: comment.author_name.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at,
        }
    }

    pub fn contact_message(&self, message: &ContactMeMessage) -> ContactMessageResponse {
        ContactMessageResponse {
            id: message.id,
            name: message.name.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
            timestamp: message.timestamp,
        }
    }

    pub fn timeline_event(&self, event: &TimelineEvent, language: &Language) -> TimelineEventResponse {
        let overlay = &event.translations.0;

        TimelineEventResponse {
            id: event.id,
            year: event.year.clone(),
            title: self.localizer.localize(&event.title, overlay, "title", language),
            description: self.localizer.localize(&event.description, overlay, "description", language),
            order: event.sort_order,
        }
    }
}
