//! Background recovery of campaign deliveries.
//!
//! A send commits before delivery runs. Campaigns left in SENDING (crash,
//! delivery error) are finished here.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Starts the delivery recovery loop. The first pass runs immediately.
pub fn start_delivery_recovery_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Delivery recovery scheduler started ({}s interval)", every.as_secs());
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_recovery_pass(&state).await;
        }
    });
}

/// Runs a single recovery pass.
pub async fn run_recovery_pass(state: &Arc<AppState>) {
    match state.campaign_service.resume_pending_deliveries().await {
        Ok(0) => debug!("Delivery recovery: nothing pending"),
        Ok(finished) => info!("Delivery recovery finished {} campaign(s)", finished),
        Err(e) => warn!("Delivery recovery failed: {}", e),
    }
}
