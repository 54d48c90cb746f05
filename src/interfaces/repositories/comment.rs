use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;

use crate::{
    entities::comment::{Comment, CommentInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxCommentRepo,
};

const COMMENT_COLUMNS: &str = "id, post_id, author_name, body, created_at, is_approved";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores an unapproved comment. A dangling `post_id` fails on the `post` field.
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Comment, AppError>;
    /// Oldest first.
    async fn list_comments_for_post(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError>;
    async fn set_comment_approval(&self, id: i64, approved: bool) -> Result<Comment, AppError>;
    /// Approved comment counts keyed by post id. Posts without approved comments are absent.
    async fn approved_comment_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, AppError>;
    async fn delete_comment(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCommentRepo { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepo {
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Comment, AppError> {
        let created = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (post_id, author_name, body, created_at, is_approved)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(comment.post_id)
        .bind(&comment.author_name)
        .bind(&comment.body)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_comments_for_post(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE post_id = $1 AND (is_approved OR NOT $2)
            ORDER BY created_at, id
            "#
        ))
        .bind(post_id)
        .bind(approved_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn set_comment_approval(&self, id: i64, approved: bool) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET is_approved = $1 WHERE id = $2 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(approved)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))
    }

    async fn approved_comment_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, AppError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT post_id, COUNT(*)
            FROM comments
            WHERE is_approved AND post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn delete_comment(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".into()));
        }

        Ok(())
    }
}
