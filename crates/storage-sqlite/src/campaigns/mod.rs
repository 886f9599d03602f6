//! SQLite storage implementation for campaigns and their targets.

mod model;
mod repository;

pub use model::{CampaignDB, CampaignTargetDB};
pub use repository::CampaignRepository;
