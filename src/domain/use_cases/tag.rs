use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::tag::{NewTagRequest, Tag, TagInsert},
    errors::AppError,
    repositories::tag::TagRepository,
};

pub struct TagHandler {
    pub tag_repo: Arc<dyn TagRepository>,
}

impl TagHandler {
    pub fn new(tag_repo: Arc<dyn TagRepository>) -> Self {
        TagHandler { tag_repo }
    }

    /// Creates a tag, deriving its slug from the name when none is given
    #[instrument(skip(self, request))]
    pub async fn create_tag(&self, request: NewTagRequest) -> Result<Tag, AppError> {
        let insert = TagInsert::try_from(request)?;

        if self.tag_repo.tag_exists_with_slug(&insert.slug).await? {
            return Err(AppError::Conflict("Slug already exists".into()));
        }

        let tag = self.tag_repo.create_tag(&insert).await?;
        tracing::info!(tag_id = tag.id, slug = %tag.slug, "Tag created");
        Ok(tag)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.tag_repo.list_tags().await
    }

    /// Deletes a tag and unlinks it from every project and post
    pub async fn delete_tag(&self, id: i64) -> Result<(), AppError> {
        self.tag_repo.delete_tag(id).await
    }
}

/// Fails on the `tags` field when any id has no tag row.
pub(crate) async fn ensure_tags_exist(repo: &dyn TagRepository, ids: &[i64]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }

    match repo.missing_tag_ids(ids).await?.first() {
        Some(missing) => Err(AppError::invalid_field(
            "tags",
            format!("Invalid pk \"{missing}\" - object does not exist."),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::tag::MockTagRepository;

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let mut repo = MockTagRepository::new();
        repo.expect_tag_exists_with_slug()
            .withf(|slug| slug == "rust")
            .returning(|_| Ok(true));
        repo.expect_create_tag().never();

        let handler = TagHandler::new(Arc::new(repo));
        let err = handler.create_tag(NewTagRequest::named("Rust")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn creates_tag_with_derived_slug() {
        let mut repo = MockTagRepository::new();
        repo.expect_tag_exists_with_slug().returning(|_| Ok(false));
        repo.expect_create_tag()
            .withf(|insert| insert.slug == "web-development")
            .returning(|insert| Ok(Tag { id: 1, name: insert.name.clone(), slug: insert.slug.clone() }));

        let handler = TagHandler::new(Arc::new(repo));
        let tag = handler.create_tag(NewTagRequest::named("Web Development")).await.unwrap();

        assert_eq!(tag.slug, "web-development");
    }

    #[tokio::test]
    async fn unknown_tag_ids_flag_tags_field() {
        let mut repo = MockTagRepository::new();
        repo.expect_missing_tag_ids().returning(|_| Ok(vec![7]));

        let err = ensure_tags_exist(&repo, &[1, 7]).await.unwrap_err();

        match err {
            AppError::ValidationError(fields) => {
                assert_eq!(fields[0].field, "tags");
                assert!(fields[0].message.contains('7'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
