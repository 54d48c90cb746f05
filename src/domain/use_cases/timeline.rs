use std::sync::Arc;

use crate::{
    entities::timeline::{
        NewTimelineEventRequest, TimelineEvent, TimelineEventInsert, UpdateTimelineEventRequest,
    },
    errors::AppError,
    repositories::timeline::TimelineRepository,
};

pub struct TimelineHandler {
    pub timeline_repo: Arc<dyn TimelineRepository>,
}

impl TimelineHandler {
    pub fn new(timeline_repo: Arc<dyn TimelineRepository>) -> Self {
        TimelineHandler { timeline_repo }
    }

    pub async fn create_event(&self, request: NewTimelineEventRequest) -> Result<TimelineEvent, AppError> {
        let insert = TimelineEventInsert::try_from(request)?;
        self.timeline_repo.create_event(&insert).await
    }

    /// Ascending by `order`
    pub async fn list_events(&self) -> Result<Vec<TimelineEvent>, AppError> {
        self.timeline_repo.list_events().await
    }

    pub async fn update_event(
        &self,
        id: i64,
        request: UpdateTimelineEventRequest,
    ) -> Result<TimelineEvent, AppError> {
        let current = self.timeline_repo.get_event_by_id(id).await?;
        let merged = request.apply_to(&current)?;
        self.timeline_repo.update_event(id, &merged).await
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), AppError> {
        self.timeline_repo.delete_event(id).await
    }
}
