//! In-process store implementing every repository trait.
//!
//! Backs the integration tests and `APP_STORE=memory` runs. All tables live
//! behind one `RwLock`, so each write (slug check, row insert and tag links)
//! is applied atomically, mirroring the unique and foreign key constraints of
//! the Postgres schema.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::types::Json;

use crate::{
    entities::{
        comment::{Comment, CommentInsert},
        contact_me::{ContactMeFormInsert, ContactMeMessage},
        post::{Post, PostChanges, PostFilter, PostInsert},
        project::{Project, ProjectChanges, ProjectFilter, ProjectInsert},
        skill::{Skill, SkillFilter, SkillInsert},
        tag::{Tag, TagInsert},
        timeline::{TimelineEvent, TimelineEventInsert},
    },
    errors::AppError,
    repositories::{
        comment::CommentRepository, contact_me::ContactRepository, post::PostRepository,
        project::ProjectRepository, skill::SkillRepository, tag::TagRepository,
        timeline::TimelineRepository, HealthCheck,
    },
};

const SLUG_CONFLICT: &str = "Slug already exists";

#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

/// `(owner_id, tag_id)` rows of a join table.
type Links = Vec<(i64, i64)>;

#[derive(Debug, Default)]
struct Tables {
    tags: Vec<Tag>,
    tag_ids: Sequence,
    skills: Vec<Skill>,
    skill_ids: Sequence,
    projects: Vec<Project>,
    project_ids: Sequence,
    project_tags: Links,
    posts: Vec<Post>,
    post_ids: Sequence,
    post_tags: Links,
    comments: Vec<Comment>,
    comment_ids: Sequence,
    contact_messages: Vec<ContactMeMessage>,
    contact_ids: Sequence,
    timeline: Vec<TimelineEvent>,
    timeline_ids: Sequence,
}

fn missing_reference(field: &str) -> AppError {
    AppError::invalid_field(field, "Referenced object does not exist.")
}

impl Tables {
    fn ensure_tags_exist(&self, ids: &[i64]) -> Result<(), AppError> {
        if ids.iter().all(|id| self.tags.iter().any(|t| t.id == *id)) {
            Ok(())
        } else {
            Err(missing_reference("tags"))
        }
    }

    fn has_tag(&self, links: &Links, owner_id: i64, tag_slug: &str) -> bool {
        links.iter().any(|(owner, tag_id)| {
            *owner == owner_id && self.tags.iter().any(|t| t.id == *tag_id && t.slug == tag_slug)
        })
    }

    fn tags_for(&self, links: &Links, owners: &[i64]) -> HashMap<i64, Vec<Tag>> {
        let mut grouped: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (owner, tag_id) in links.iter().filter(|(owner, _)| owners.contains(owner)) {
            if let Some(tag) = self.tags.iter().find(|t| t.id == *tag_id) {
                grouped.entry(*owner).or_default().push(tag.clone());
            }
        }
        for tags in grouped.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }
        grouped
    }
}

fn replace_links(links: &mut Links, owner_id: i64, tag_ids: &[i64]) {
    links.retain(|(owner, _)| *owner != owner_id);
    links.extend(tag_ids.iter().map(|tag_id| (owner_id, *tag_id)));
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn create_tag(&self, tag: &TagInsert) -> Result<Tag, AppError> {
        let mut tables = self.tables.write();
        if tables.tags.iter().any(|t| t.slug == tag.slug) {
            return Err(AppError::Conflict(SLUG_CONFLICT.into()));
        }
        let created = Tag {
            id: tables.tag_ids.next(),
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        };
        tables.tags.push(created.clone());
        Ok(created)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let mut tags = self.tables.read().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(tags)
    }

    async fn get_tag_by_slug(&self, slug: &str) -> Result<Tag, AppError> {
        self.tables
            .read()
            .tags
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Tag not found".into()))
    }

    async fn tag_exists_with_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().tags.iter().any(|t| t.slug == slug))
    }

    async fn missing_tag_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        let tables = self.tables.read();
        let mut missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !tables.tags.iter().any(|t| t.id == *id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }

    async fn delete_tag(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.tags.len();
        tables.tags.retain(|t| t.id != id);
        if tables.tags.len() == before {
            return Err(AppError::NotFound("Tag not found".into()));
        }
        tables.project_tags.retain(|(_, tag_id)| *tag_id != id);
        tables.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let mut tables = self.tables.write();
        let created = Skill {
            id: tables.skill_ids.next(),
            name: skill.name.clone(),
            logo: skill.logo.clone(),
            is_key_skill: skill.is_key_skill,
            category: skill.category,
        };
        tables.skills.push(created.clone());
        Ok(created)
    }

    async fn list_skills(&self, filter: &SkillFilter) -> Result<Vec<Skill>, AppError> {
        Ok(self
            .tables
            .read()
            .skills
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn delete_skill(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.skills.len();
        tables.skills.retain(|s| s.id != id);
        if tables.skills.len() == before {
            return Err(AppError::NotFound("Skill not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let mut tables = self.tables.write();
        if tables.projects.iter().any(|p| p.slug == project.slug) {
            return Err(AppError::Conflict(SLUG_CONFLICT.into()));
        }
        tables.ensure_tags_exist(&project.tag_ids)?;

        let created = Project {
            id: tables.project_ids.next(),
            title: project.title.clone(),
            slug: project.slug.clone(),
            short_description: project.short_description.clone(),
            full_description: project.full_description.clone(),
            thumbnail: project.thumbnail.clone(),
            repo_link: project.repo_link.clone(),
            demo_link: project.demo_link.clone(),
            is_featured: project.is_featured,
            category: project.category,
            translations: Json(project.translations.clone()),
            created_at: project.created_at,
        };
        replace_links(&mut tables.project_tags, created.id, &project.tag_ids);
        tables.projects.push(created.clone());
        Ok(created)
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Project, AppError> {
        self.tables
            .read()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Project, AppError> {
        self.tables
            .read()
            .projects
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        let tables = self.tables.read();
        let mut projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| filter.featured.is_none_or(|f| f == p.is_featured))
            .filter(|p| filter.category.is_none_or(|c| c == p.category))
            .filter(|p| {
                filter
                    .tag
                    .as_deref()
                    .is_none_or(|tag| tables.has_tag(&tables.project_tags, p.id, tag))
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn update_project(&self, id: i64, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut tables = self.tables.write();
        if !tables.projects.iter().any(|p| p.id == id) {
            return Err(AppError::NotFound("Project not found".into()));
        }
        if tables.projects.iter().any(|p| p.id != id && p.slug == changes.slug) {
            return Err(AppError::Conflict(SLUG_CONFLICT.into()));
        }
        if let Some(tag_ids) = &changes.tag_ids {
            tables.ensure_tags_exist(tag_ids)?;
            replace_links(&mut tables.project_tags, id, tag_ids);
        }

        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        project.title = changes.title.clone();
        project.slug = changes.slug.clone();
        project.short_description = changes.short_description.clone();
        project.full_description = changes.full_description.clone();
        project.thumbnail = changes.thumbnail.clone();
        project.repo_link = changes.repo_link.clone();
        project.demo_link = changes.demo_link.clone();
        project.is_featured = changes.is_featured;
        project.category = changes.category;
        project.translations = Json(changes.translations.clone());
        Ok(project.clone())
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Err(AppError::NotFound("Project not found".into()));
        }
        tables.project_tags.retain(|(owner, _)| *owner != id);
        Ok(())
    }

    async fn project_exists_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        Ok(self
            .tables
            .read()
            .projects
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id))
    }

    async fn tags_for_projects(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, AppError> {
        let tables = self.tables.read();
        Ok(tables.tags_for(&tables.project_tags, ids))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(AppError::Conflict(SLUG_CONFLICT.into()));
        }
        tables.ensure_tags_exist(&post.tag_ids)?;

        let created = Post {
            id: tables.post_ids.next(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            is_active: post.is_active,
            translations: Json(post.translations.clone()),
            created_at: post.created_at,
        };
        replace_links(&mut tables.post_tags, created.id, &post.tag_ids);
        tables.posts.push(created.clone());
        Ok(created)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Post, AppError> {
        self.tables
            .read()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    async fn get_active_post_by_slug(&self, slug: &str) -> Result<Post, AppError> {
        self.tables
            .read()
            .posts
            .iter()
            .find(|p| p.slug == slug && p.is_active)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    async fn list_posts(&self, active_only: bool, filter: &PostFilter) -> Result<Vec<Post>, AppError> {
        let tables = self.tables.read();
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| !active_only || p.is_active)
            .filter(|p| {
                filter
                    .tag
                    .as_deref()
                    .is_none_or(|tag| tables.has_tag(&tables.post_tags, p.id, tag))
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn update_post(&self, id: i64, changes: &PostChanges) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        if !tables.posts.iter().any(|p| p.id == id) {
            return Err(AppError::NotFound("Post not found".into()));
        }
        if tables.posts.iter().any(|p| p.id != id && p.slug == changes.slug) {
            return Err(AppError::Conflict(SLUG_CONFLICT.into()));
        }
        if let Some(tag_ids) = &changes.tag_ids {
            tables.ensure_tags_exist(tag_ids)?;
            replace_links(&mut tables.post_tags, id, tag_ids);
        }

        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
        post.title = changes.title.clone();
        post.slug = changes.slug.clone();
        post.content = changes.content.clone();
        post.is_active = changes.is_active;
        post.translations = Json(changes.translations.clone());
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(AppError::NotFound("Post not found".into()));
        }
        tables.comments.retain(|c| c.post_id != id);
        tables.post_tags.retain(|(owner, _)| *owner != id);
        Ok(())
    }

    async fn post_exists(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.read().posts.iter().any(|p| p.id == id))
    }

    async fn post_exists_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        Ok(self
            .tables
            .read()
            .posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id))
    }

    async fn tags_for_posts(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, AppError> {
        let tables = self.tables.read();
        Ok(tables.tags_for(&tables.post_tags, ids))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Comment, AppError> {
        let mut tables = self.tables.write();
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(missing_reference("post"));
        }
        let created = Comment {
            id: tables.comment_ids.next(),
            post_id: comment.post_id,
            author_name: comment.author_name.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at,
            is_approved: false,
        };
        tables.comments.push(created.clone());
        Ok(created)
    }

    async fn list_comments_for_post(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = self
            .tables
            .read()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && (c.is_approved || !approved_only))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn set_comment_approval(&self, id: i64, approved: bool) -> Result<Comment, AppError> {
        let mut tables = self.tables.write();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
        comment.is_approved = approved;
        Ok(comment.clone())
    }

    async fn approved_comment_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, AppError> {
        let mut counts = HashMap::new();
        for comment in self.tables.read().comments.iter() {
            if comment.is_approved && post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn delete_comment(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(AppError::NotFound("Comment not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<ContactMeMessage, AppError> {
        let mut tables = self.tables.write();
        let created = ContactMeMessage {
            id: tables.contact_ids.next(),
            name: msg.name.clone(),
            email: msg.email.clone(),
            message: msg.message.clone(),
            timestamp: msg.timestamp,
        };
        tables.contact_messages.push(created.clone());
        Ok(created)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMeMessage>, AppError> {
        let mut messages = self.tables.read().contact_messages.clone();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(messages)
    }

    async fn delete_contact_message(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.contact_messages.len();
        tables.contact_messages.retain(|m| m.id != id);
        if tables.contact_messages.len() == before {
            return Err(AppError::NotFound("Contact message not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TimelineRepository for MemoryStore {
    async fn create_event(&self, event: &TimelineEventInsert) -> Result<TimelineEvent, AppError> {
        let mut tables = self.tables.write();
        let created = TimelineEvent {
            id: tables.timeline_ids.next(),
            year: event.year.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            sort_order: event.sort_order,
            translations: Json(event.translations.clone()),
        };
        tables.timeline.push(created.clone());
        Ok(created)
    }

    async fn get_event_by_id(&self, id: i64) -> Result<TimelineEvent, AppError> {
        self.tables
            .read()
            .timeline
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Timeline event not found".into()))
    }

    async fn list_events(&self) -> Result<Vec<TimelineEvent>, AppError> {
        let mut events = self.tables.read().timeline.clone();
        events.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn update_event(&self, id: i64, event: &TimelineEventInsert) -> Result<TimelineEvent, AppError> {
        let mut tables = self.tables.write();
        let stored = tables
            .timeline
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound("Timeline event not found".into()))?;
        stored.year = event.year.clone();
        stored.title = event.title.clone();
        stored.description = event.description.clone();
        stored.sort_order = event.sort_order;
        stored.translations = Json(event.translations.clone());
        Ok(stored.clone())
    }

    async fn delete_event(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let before = tables.timeline.len();
        tables.timeline.retain(|e| e.id != id);
        if tables.timeline.len() == before {
            return Err(AppError::NotFound("Timeline event not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::entities::translations::Translations;

    fn post(title: &str, slug: &str, active: bool) -> PostInsert {
        PostInsert {
            title: title.into(),
            slug: slug.into(),
            content: "body".into(),
            is_active: active,
            translations: Translations::new(),
            tag_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn comment(post_id: i64) -> CommentInsert {
        CommentInsert {
            post_id,
            author_name: "Ana".into(),
            body: "Nice".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_post_slug_conflicts() {
        let store = MemoryStore::new();
        store.create_post(&post("A", "same", true)).await.unwrap();
        let err = store.create_post(&post("B", "same", true)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_post_cascades_to_comments() {
        let store = MemoryStore::new();
        let created = store.create_post(&post("A", "a", true)).await.unwrap();
        store.create_comment(&comment(created.id)).await.unwrap();
        store.create_comment(&comment(created.id)).await.unwrap();

        store.delete_post(created.id).await.unwrap();

        assert!(store.list_comments_for_post(created.id, false).await.unwrap().is_empty());
        assert!(store.tables.read().comments.is_empty());
    }

    #[tokio::test]
    async fn comment_on_unknown_post_flags_post_field() {
        let store = MemoryStore::new();
        let err = store.create_comment(&comment(99)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref f) if f[0].field == "post"));
    }

    #[tokio::test]
    async fn unknown_tag_ids_are_rejected_without_writing() {
        let store = MemoryStore::new();
        let mut insert = post("Tagged", "tagged", true);
        insert.tag_ids = vec![42];
        let err = store.create_post(&insert).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref f) if f[0].field == "tags"));
        assert!(store.list_posts(false, &PostFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn posts_list_newest_first_and_hide_inactive() {
        let store = MemoryStore::new();
        let mut older = post("Old", "old", true);
        older.created_at = Utc::now() - Duration::days(1);
        store.create_post(&older).await.unwrap();
        store.create_post(&post("New", "new", true)).await.unwrap();
        store.create_post(&post("Draft", "draft", false)).await.unwrap();

        let slugs: Vec<_> = store
            .list_posts(true, &PostFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old"]);
        assert!(store.get_active_post_by_slug("draft").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn approved_counts_only_include_approved_comments() {
        let store = MemoryStore::new();
        let created = store.create_post(&post("A", "a", true)).await.unwrap();
        let first = store.create_comment(&comment(created.id)).await.unwrap();
        store.create_comment(&comment(created.id)).await.unwrap();

        assert!(store.approved_comment_counts(&[created.id]).await.unwrap().is_empty());

        store.set_comment_approval(first.id, true).await.unwrap();
        let counts = store.approved_comment_counts(&[created.id]).await.unwrap();
        assert_eq!(counts.get(&created.id), Some(&1));
    }

    #[tokio::test]
    async fn timeline_is_ordered_by_sort_order() {
        let store = MemoryStore::new();
        for (title, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
            store
                .create_event(&TimelineEventInsert {
                    year: "2020".into(),
                    title: title.into(),
                    description: "d".into(),
                    sort_order: order,
                    translations: Translations::new(),
                })
                .await
                .unwrap();
        }
        let titles: Vec<_> = store.list_events().await.unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
