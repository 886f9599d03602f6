use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub campaign_id: Option<String>,
    pub text: String,
    pub link: Option<String>,
    pub from_admin: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: String,
    pub campaign_id: Option<String>,
    pub text: String,
    pub link: Option<String>,
    pub from_admin: bool,
}

impl NewNotification {
    /// System notice announcing that a campaign finished delivering.
    pub fn campaign_completed(
        user_id: &str,
        campaign_id: &str,
        title: &str,
        recipients: i64,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            campaign_id: Some(campaign_id.to_string()),
            text: format!(
                "Campaign '{}' has been sent to {} recipients.",
                title, recipients
            ),
            link: None,
            from_admin: true,
        }
    }
}
