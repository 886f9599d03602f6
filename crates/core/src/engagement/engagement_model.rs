use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::customers::{Customer, Gender};

/// 1x1 transparent GIF served by the read-tracking pixel.
pub const TRACKING_PIXEL_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF, 0xFF,
    0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x04, 0x01, 0x00, 0x3B,
];

/// Whether a mark call performed the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOutcome {
    pub updated: bool,
}

/// Engagement timestamps of one target. Input of the statistics aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEngagement {
    pub campaign_id: String,
    pub sent_at: Option<NaiveDateTime>,
    pub read_at: Option<NaiveDateTime>,
    pub click_at: Option<NaiveDateTime>,
}

/// Demographics of one targeted customer, one row per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudienceDemographic {
    pub gender: Gender,
    pub birth_year: i32,
}

/// A delivered message as the recipient sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    pub target_id: String,
    pub campaign_id: String,
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    pub company_name: String,
    pub sent_at: Option<NaiveDateTime>,
    pub read_at: Option<NaiveDateTime>,
    pub click_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedCustomer {
    pub id: String,
    pub name: String,
    pub address: String,
}

impl From<&Customer> for MaskedCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.masked_name(),
            address: customer.masked_address(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInbox {
    pub customer: MaskedCustomer,
    pub messages: Vec<InboxMessage>,
}
