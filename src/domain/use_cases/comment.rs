use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::comment::{Comment, CommentInsert, NewCommentRequest},
    errors::AppError,
    repositories::{comment::CommentRepository, post::PostRepository},
};

pub struct CommentHandler {
    pub comment_repo: Arc<dyn CommentRepository>,
    pub post_repo: Arc<dyn PostRepository>,
}

impl CommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepository>, post_repo: Arc<dyn PostRepository>) -> Self {
        CommentHandler { comment_repo, post_repo }
    }

    /// Stores a visitor comment awaiting moderation
    #[instrument(skip(self, request))]
    pub async fn create_comment(&self, request: NewCommentRequest) -> Result<Comment, AppError> {
        let insert = CommentInsert::try_from(request)?;

        if !self.post_repo.post_exists(insert.post_id).await? {
            return Err(AppError::invalid_field(
                "post",
                format!("Invalid pk \"{}\" - object does not exist.", insert.post_id),
            ));
        }

        let comment = self.comment_repo.create_comment(&insert).await?;
        tracing::info!(comment_id = comment.id, post_id = comment.post_id, "Comment submitted");
        Ok(comment)
    }

    /// Comments of one post, oldest first, including unapproved ones unless `approved_only`
    pub async fn list_comments(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError> {
        if !self.post_repo.post_exists(post_id).await? {
            return Err(AppError::NotFound("Post not found".into()));
        }
        self.comment_repo.list_comments_for_post(post_id, approved_only).await
    }

    pub async fn approve_comment(&self, id: i64) -> Result<Comment, AppError> {
        self.comment_repo.set_comment_approval(id, true).await
    }

    pub async fn unapprove_comment(&self, id: i64) -> Result<Comment, AppError> {
        self.comment_repo.set_comment_approval(id, false).await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), AppError> {
        self.comment_repo.delete_comment(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::repositories::{comment::MockCommentRepository, post::MockPostRepository};

    fn request(post: i64) -> NewCommentRequest {
        NewCommentRequest {
            post: Some(post),
            author_name: Some("Ana".into()),
            body: Some("Great read".into()),
        }
    }

    #[tokio::test]
    async fn comment_on_missing_post_flags_post_field() {
        let mut posts = MockPostRepository::new();
        posts.expect_post_exists().returning(|_| Ok(false));
        let mut comments = MockCommentRepository::new();
        comments.expect_create_comment().never();

        let handler = CommentHandler::new(Arc::new(comments), Arc::new(posts));
        let err = handler.create_comment(request(42)).await.unwrap_err();

        match err {
            AppError::ValidationError(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "post");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_comments_start_unapproved() {
        let mut posts = MockPostRepository::new();
        posts.expect_post_exists().returning(|_| Ok(true));
        let mut comments = MockCommentRepository::new();
        comments.expect_create_comment().returning(|insert| {
            Ok(Comment {
                id: 1,
                post_id: insert.post_id,
                author_name: insert.author_name.clone(),
                body: insert.body.clone(),
                created_at: insert.created_at,
                is_approved: false,
            })
        });

        let handler = CommentHandler::new(Arc::new(comments), Arc::new(posts));
        let comment = handler.create_comment(request(3)).await.unwrap();

        assert!(!comment.is_approved);
        assert_eq!(comment.post_id, 3);
        assert!(comment.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn approval_flips_the_flag() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_set_comment_approval()
            .withf(|id, approved| *id == 8 && *approved)
            .returning(|id, approved| {
                Ok(Comment {
                    id,
                    post_id: 1,
                    author_name: "Ana".into(),
                    body: "Hi".into(),
                    created_at: Utc::now(),
                    is_approved: approved,
                })
            });

        let handler = CommentHandler::new(Arc::new(comments), Arc::new(MockPostRepository::new()));

        assert!(handler.approve_comment(8).await.unwrap().is_approved);
    }
}
