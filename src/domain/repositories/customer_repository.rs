//! Repository trait for customer data access.

use crate::domain::entities::{Customer, CustomerStatus, NewCustomer};
use crate::domain::paging::{Page, PageRequest, Sort};
use crate::error::AppError;
use async_trait::async_trait;

/// Conjunctive filter for advanced search.
///
/// `None` fields impose no constraint. `name` and `email` match as
/// case-insensitive substrings, `status` matches exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<CustomerStatus>,
}

impl CustomerFilter {
    /// Returns true if the customer satisfies every provided predicate.
    pub fn matches(&self, customer: &Customer) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|name| contains_ignore_case(&customer.name, name));
        let email_ok = self
            .email
            .as_deref()
            .is_none_or(|email| contains_ignore_case(&customer.email, email));
        let status_ok = self.status.is_none_or(|status| customer.status == status);

        name_ok && email_ok && status_ok
    }
}

/// Returns true if the customer's name, email or phone contains `keyword`, ignoring case.
pub fn matches_keyword(customer: &Customer, keyword: &str) -> bool {
    contains_ignore_case(&customer.name, keyword)
        || contains_ignore_case(&customer.email, keyword)
        || customer
            .phone
            .as_deref()
            .is_some_and(|phone| contains_ignore_case(phone, keyword))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Repository interface for customer records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCustomerRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryCustomerRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Lists every customer, ordered by `sort` or by ascending id when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<Customer>, AppError>;

    /// Returns one page of customers together with the total count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_page(&self, request: PageRequest) -> Result<Page<Customer>, AppError>;

    /// Finds a customer by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError>;

    /// Finds a customer by normalized email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError>;

    /// Lists customers in the given status, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_status(&self, status: CustomerStatus) -> Result<Vec<Customer>, AppError>;

    /// Free-text search over name, email and phone. See [`matches_keyword`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn search(&self, keyword: &str) -> Result<Vec<Customer>, AppError>;

    /// Lists customers matching every predicate of `filter`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn filter(&self, filter: CustomerFilter) -> Result<Vec<Customer>, AppError>;

    /// Inserts a new customer and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already stored.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError>;

    /// Overwrites every mutable field of a customer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Customer))` with the stored result
    /// - `Ok(None)` if no customer has this id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email belongs to another customer.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn replace(
        &self,
        id: i64,
        values: NewCustomer,
    ) -> Result<Option<Customer>, AppError>;

    /// Removes a customer. Returns `false` if nothing was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
