use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::engagement_model::{CustomerInbox, MarkOutcome, MaskedCustomer};
use super::engagement_traits::{EngagementRepositoryTrait, EngagementServiceTrait};
use crate::customers::CustomerRepositoryTrait;
use crate::errors::Result;
use crate::utils::Clock;

pub struct EngagementService {
    repository: Arc<dyn EngagementRepositoryTrait>,
    customer_repository: Arc<dyn CustomerRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl EngagementService {
    pub fn new(
        repository: Arc<dyn EngagementRepositoryTrait>,
        customer_repository: Arc<dyn CustomerRepositoryTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            customer_repository,
            clock,
        }
    }
}

#[async_trait]
impl EngagementServiceTrait for EngagementService {
    async fn mark_read(&self, target_id: &str) -> Result<MarkOutcome> {
        let updated = self.repository.mark_read(target_id, self.clock.now()).await?;
        if updated {
            info!("engagement read target_id={}", target_id);
        } else {
            debug!("engagement read repeat target_id={}", target_id);
        }
        Ok(MarkOutcome { updated })
    }

    async fn mark_clicked(&self, target_id: &str) -> Result<MarkOutcome> {
        let updated = self
            .repository
            .mark_clicked(target_id, self.clock.now())
            .await?;
        if updated {
            info!("engagement click target_id={}", target_id);
        } else {
            debug!("engagement click repeat target_id={}", target_id);
        }
        Ok(MarkOutcome { updated })
    }

    fn click_destination(&self, target_id: &str, fallback: &str) -> Result<String> {
        let link = self
            .repository
            .get_target_link(target_id)?
            .filter(|l| !l.trim().is_empty());
        Ok(link.unwrap_or_else(|| fallback.to_string()))
    }

    fn customer_inbox(&self, customer_id: &str) -> Result<CustomerInbox> {
        let customer = self.customer_repository.get_by_id(customer_id)?;
        let messages = self.repository.list_inbox_messages(customer_id)?;
        Ok(CustomerInbox {
            customer: MaskedCustomer::from(&customer),
            messages,
        })
    }
}
