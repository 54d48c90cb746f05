use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::project::{
        NewProjectRequest, Project, ProjectFilter, ProjectInsert, ProjectView, UpdateProjectRequest,
    },
    errors::AppError,
    repositories::{project::ProjectRepository, tag::TagRepository},
    use_cases::tag::ensure_tags_exist,
};

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub tag_repo: Arc<dyn TagRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>, tag_repo: Arc<dyn TagRepository>) -> Self {
        ProjectHandler { project_repo, tag_repo }
    }

    /// Creates a project and links its tags
    #[instrument(skip(self, request))]
    pub async fn create_project(&self, request: NewProjectRequest) -> Result<ProjectView, AppError> {
        let insert = ProjectInsert::try_from(request)?;

        if self.project_repo.project_exists_with_slug(&insert.slug, None).await? {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        ensure_tags_exist(self.tag_repo.as_ref(), &insert.tag_ids).await?;

        let project = self.project_repo.create_project(&insert).await?;
        tracing::info!(project_id = project.id, slug = %project.slug, "Project created");

        self.with_tags(project).await
    }

    /// Newest first
    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ProjectView>, AppError> {
        let projects = self.project_repo.list_projects(filter).await?;

        let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
        let mut tags = self.project_repo.tags_for_projects(&ids).await?;

        Ok(projects
            .into_iter()
            .map(|project| ProjectView {
                tags: tags.remove(&project.id).unwrap_or_default(),
                project,
            })
            .collect())
    }

    pub async fn get_project_by_slug(&self, slug: &str) -> Result<ProjectView, AppError> {
        let project = self.project_repo.get_project_by_slug(slug).await?;
        self.with_tags(project).await
    }

    /// Applies a partial update; tags are replaced only when the patch names them
    #[instrument(skip(self, request))]
    pub async fn update_project(&self, id: i64, request: UpdateProjectRequest) -> Result<ProjectView, AppError> {
        let current = self.project_repo.get_project_by_id(id).await?;
        let changes = request.apply_to(&current)?;

        if changes.slug != current.slug
            && self.project_repo.project_exists_with_slug(&changes.slug, Some(id)).await?
        {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        if let Some(tag_ids) = &changes.tag_ids {
            ensure_tags_exist(self.tag_repo.as_ref(), tag_ids).await?;
        }

        let project = self.project_repo.update_project(id, &changes).await?;
        self.with_tags(project).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        self.project_repo.delete_project(id).await
    }

    async fn with_tags(&self, project: Project) -> Result<ProjectView, AppError> {
        let tags = self
            .project_repo
            .tags_for_projects(&[project.id])
            .await?
            .remove(&project.id)
            .unwrap_or_default();

        Ok(ProjectView { project, tags })
    }
}
