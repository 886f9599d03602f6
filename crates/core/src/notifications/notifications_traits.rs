use async_trait::async_trait;

use super::notifications_model::{NewNotification, Notification};
use crate::errors::Result;

#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    async fn insert(&self, notification: NewNotification) -> Result<Notification>;
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>>;
}

#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    async fn enqueue(&self, notification: NewNotification) -> Result<Notification>;
    /// Newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>>;
}
