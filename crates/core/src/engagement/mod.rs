//! Engagement tracker - read and click events on delivered messages.

mod engagement_model;
mod engagement_service;
mod engagement_traits;


pub use engagement_model::{
    AudienceDemographic, CustomerInbox, InboxMessage, MarkOutcome, MaskedCustomer,
    TargetEngagement, TRACKING_PIXEL_GIF,
};
pub use engagement_service::EngagementService;
pub use engagement_traits::{EngagementRepositoryTrait, EngagementServiceTrait};
