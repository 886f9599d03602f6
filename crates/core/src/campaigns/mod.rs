//! Campaigns module - campaign lifecycle from draft through delivery.

mod campaigns_model;
mod campaigns_service;
mod campaigns_traits;

#[cfg(test)]
mod campaigns_service_tests;

pub use campaigns_model::{
    Campaign, CampaignDraft, CampaignStatus, CampaignTarget, DeliveryReport, DeliveryStatus,
    NewCampaign, SendOutcome, SendReceipt, SendRequest,
};
pub use campaigns_service::CampaignService;
pub use campaigns_traits::{CampaignRepositoryTrait, CampaignServiceTrait};
