use async_trait::async_trait;

use super::customers_model::{AudienceMember, Customer, CustomerUpdate, NewCustomer};
use crate::errors::Result;
use crate::filters::{AudienceQuery, FilterSpec};
use crate::users::UserIdentity;
use crate::utils::{Page, PageRequest};

/// Trait for customer repository operations
///
/// Every query method applies all predicates of the `AudienceQuery`,
/// including exact great-circle radius containment.
#[async_trait]
pub trait CustomerRepositoryTrait: Send + Sync {
    fn count_matching(&self, query: &AudienceQuery) -> Result<i64>;
    fn list_matching(&self, query: &AudienceQuery) -> Result<Vec<Customer>>;
    fn list_page(&self, query: &AudienceQuery, page: PageRequest) -> Result<Page<Customer>>;
    fn get_by_id(&self, customer_id: &str) -> Result<Customer>;
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer>;
    async fn update(&self, customer_update: CustomerUpdate) -> Result<Customer>;
    async fn delete(&self, customer_id: &str) -> Result<usize>;
}

/// Trait for customer service operations
#[async_trait]
pub trait CustomerServiceTrait: Send + Sync {
    fn count_matching(&self, query: &AudienceQuery) -> Result<i64>;
    fn list_matching(&self, query: &AudienceQuery) -> Result<Vec<Customer>>;
    fn list_page(&self, query: &AudienceQuery, page: PageRequest) -> Result<Page<Customer>>;

    /// Paged audience matching `filters`, without contact data.
    fn browse_audience(&self, filters: &FilterSpec, page: PageRequest)
        -> Result<Page<AudienceMember>>;

    fn get_customer(&self, actor: &UserIdentity, customer_id: &str) -> Result<Customer>;
    fn list_customers(
        &self,
        actor: &UserIdentity,
        filters: &FilterSpec,
        page: PageRequest,
    ) -> Result<Page<Customer>>;
    async fn create_customer(
        &self,
        actor: &UserIdentity,
        new_customer: NewCustomer,
    ) -> Result<Customer>;
    async fn update_customer(
        &self,
        actor: &UserIdentity,
        customer_update: CustomerUpdate,
    ) -> Result<Customer>;
    async fn delete_customer(&self, actor: &UserIdentity, customer_id: &str) -> Result<()>;
}
