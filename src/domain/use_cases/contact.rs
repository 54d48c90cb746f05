use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::contact_me::{ContactMeFormInsert, ContactMeMessage, NewContactMeForm},
    errors::AppError,
    repositories::contact_me::ContactRepository,
};

pub struct ContactHandler {
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl ContactHandler {
    pub fn new(contact_repo: Arc<dyn ContactRepository>) -> Self {
        ContactHandler { contact_repo }
    }

    /// Handles the creation of a new contact message
    #[instrument(skip(self, request))]
    pub async fn create_contact_message(&self, request: NewContactMeForm) -> Result<ContactMeMessage, AppError> {
        let new_msg = ContactMeFormInsert::try_from(request)?;

        let created = self.contact_repo.create_contact_message(&new_msg).await?;
        tracing::info!(message_id = created.id, "Contact message received");

        Ok(created)
    }

    /// Lists all contact messages, newest first
    pub async fn list_contact_messages(&self) -> Result<Vec<ContactMeMessage>, AppError> {
        self.contact_repo.list_contact_messages().await
    }

    /// Deletes a contact message by its ID
    pub async fn delete_contact_message(&self, id: i64) -> Result<(), AppError> {
        self.contact_repo.delete_contact_message(id).await
    }
}
