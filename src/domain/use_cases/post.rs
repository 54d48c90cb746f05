use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::post::{NewPostRequest, Post, PostFilter, PostInsert, PostView, UpdatePostRequest},
    errors::AppError,
    repositories::{comment::CommentRepository, post::PostRepository, tag::TagRepository},
    use_cases::tag::ensure_tags_exist,
};

pub struct PostHandler {
    pub post_repo: Arc<dyn PostRepository>,
    pub tag_repo: Arc<dyn TagRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
}

impl PostHandler {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        tag_repo: Arc<dyn TagRepository>,
        comment_repo: Arc<dyn CommentRepository>,
    ) -> Self {
        PostHandler { post_repo, tag_repo, comment_repo }
    }

    /// Creates a post (inactive unless the request says otherwise)
    #[instrument(skip(self, request))]
    pub async fn create_post(&self, request: NewPostRequest) -> Result<PostView, AppError> {
        let insert = PostInsert::try_from(request)?;

        if self.post_repo.post_exists_with_slug(&insert.slug, None).await? {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        ensure_tags_exist(self.tag_repo.as_ref(), &insert.tag_ids).await?;

        let post = self.post_repo.create_post(&insert).await?;
        tracing::info!(post_id = post.id, slug = %post.slug, active = post.is_active, "Post created");

        self.with_details(post).await
    }

    /// Active posts, newest first
    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<PostView>, AppError> {
        let posts = self.post_repo.list_posts(true, filter).await?;
        self.assemble(posts).await
    }

    /// Every post including drafts, newest first
    pub async fn list_all_posts(&self, filter: &PostFilter) -> Result<Vec<PostView>, AppError> {
        let posts = self.post_repo.list_posts(false, filter).await?;
        self.assemble(posts).await
    }

    /// Inactive posts are indistinguishable from missing ones
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<PostView, AppError> {
        let post = self.post_repo.get_active_post_by_slug(slug).await?;
        self.with_details(post).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_post(&self, id: i64, request: UpdatePostRequest) -> Result<PostView, AppError> {
        let current = self.post_repo.get_post_by_id(id).await?;
        let changes = request.apply_to(&current)?;

        if changes.slug != current.slug
            && self.post_repo.post_exists_with_slug(&changes.slug, Some(id)).await?
        {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        if let Some(tag_ids) = &changes.tag_ids {
            ensure_tags_exist(self.tag_repo.as_ref(), tag_ids).await?;
        }

        let post = self.post_repo.update_post(id, &changes).await?;
        self.with_details(post).await
    }

    /// Deletes the post along with all of its comments
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        self.post_repo.delete_post(id).await?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn with_details(&self, post: Post) -> Result<PostView, AppError> {
        let mut views = self.assemble(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::InternalError("post view assembly returned nothing".into()))
    }

    async fn assemble(&self, posts: Vec<Post>) -> Result<Vec<PostView>, AppError> {
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let mut tags = self.post_repo.tags_for_posts(&ids).await?;
        let counts = self.comment_repo.approved_comment_counts(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                tags: tags.remove(&post.id).unwrap_or_default(),
                comment_count: counts.get(&post.id).copied().unwrap_or(0),
                post,
            })
            .collect())
    }
}
