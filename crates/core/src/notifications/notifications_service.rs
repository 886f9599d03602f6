use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::notifications_model::{NewNotification, Notification};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::errors::{Error, Result};

pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn enqueue(&self, notification: NewNotification) -> Result<Notification> {
        if notification.text.trim().is_empty() {
            return Err(Error::invalid_input("Notification text cannot be empty"));
        }
        let saved = self.repository.insert(notification).await?;
        debug!(
            "notification enqueued user_id={} campaign_id={:?}",
            saved.user_id, saved.campaign_id
        );
        Ok(saved)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.repository.list_for_user(user_id)
    }
}
