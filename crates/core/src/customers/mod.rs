//! Customer directory - demographic and geographic records of message recipients.

mod customers_model;
mod customers_service;
mod customers_traits;


pub use customers_model::{AudienceMember, Customer, CustomerUpdate, Gender, NewCustomer};
pub use customers_service::CustomerService;
pub use customers_traits::{CustomerRepositoryTrait, CustomerServiceTrait};
