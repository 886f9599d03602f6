use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::customers_model::{AudienceMember, Customer, CustomerUpdate, NewCustomer};
use super::customers_traits::{CustomerRepositoryTrait, CustomerServiceTrait};
use crate::errors::{Error, Result};
use crate::filters::{AudienceQuery, FilterSpec};
use crate::users::UserIdentity;
use crate::utils::{Page, PageRequest, ReportingCalendar};

/// Service for querying and administering the customer directory
pub struct CustomerService {
    repository: Arc<dyn CustomerRepositoryTrait>,
    calendar: ReportingCalendar,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepositoryTrait>, calendar: ReportingCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    fn resolve(&self, filters: &FilterSpec) -> AudienceQuery {
        filters.resolve(self.calendar.reference_year()).query
    }
}

#[async_trait]
impl CustomerServiceTrait for CustomerService {
    fn count_matching(&self, query: &AudienceQuery) -> Result<i64> {
        self.repository.count_matching(query)
    }

    fn list_matching(&self, query: &AudienceQuery) -> Result<Vec<Customer>> {
        self.repository.list_matching(query)
    }

    fn list_page(&self, query: &AudienceQuery, page: PageRequest) -> Result<Page<Customer>> {
        self.repository.list_page(query, page)
    }

    fn browse_audience(
        &self,
        filters: &FilterSpec,
        page: PageRequest,
    ) -> Result<Page<AudienceMember>> {
        let query = self.resolve(filters);
        Ok(self.repository.list_page(&query, page)?.map(AudienceMember::from))
    }

    fn get_customer(&self, actor: &UserIdentity, customer_id: &str) -> Result<Customer> {
        actor.ensure_admin()?;
        self.repository.get_by_id(customer_id)
    }

    fn list_customers(
        &self,
        actor: &UserIdentity,
        filters: &FilterSpec,
        page: PageRequest,
    ) -> Result<Page<Customer>> {
        actor.ensure_admin()?;
        let query = self.resolve(filters);
        self.repository.list_page(&query, page)
    }

    async fn create_customer(
        &self,
        actor: &UserIdentity,
        new_customer: NewCustomer,
    ) -> Result<Customer> {
        actor.ensure_admin()?;
        let new_customer = new_customer.normalized();
        new_customer.validate()?;
        let customer = self.repository.create(new_customer).await?;
        info!("Customer {} created by {}", customer.id, actor.user_id);
        Ok(customer)
    }

    async fn update_customer(
        &self,
        actor: &UserIdentity,
        mut customer_update: CustomerUpdate,
    ) -> Result<Customer> {
        actor.ensure_admin()?;
        customer_update.fields = customer_update.fields.normalized();
        customer_update.validate()?;
        let customer = self.repository.update(customer_update).await?;
        debug!("Customer {} updated by {}", customer.id, actor.user_id);
        Ok(customer)
    }

    async fn delete_customer(&self, actor: &UserIdentity, customer_id: &str) -> Result<()> {
        actor.ensure_admin()?;
        let deleted = self.repository.delete(customer_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Customer {} not found", customer_id)));
        }
        info!("Customer {} deleted by {}", customer_id, actor.user_id);
        Ok(())
    }
}
