//! Customer management service.

use crate::domain::entities::{Customer, CustomerPatch, CustomerStatus, NewCustomer};
use crate::domain::paging::{Page, PageRequest, Sort};
use crate::domain::repositories::{CustomerFilter, CustomerRepository};
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service owning the business rules around customer records.
///
/// Enforces:
/// - existence checks before update and delete
/// - email uniqueness across customers
/// - partial updates touching only the provided fields
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    /// Creates a new customer service.
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// Lists every customer, unpaged and unsorted (id order).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_all_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.repository.find_all(None).await
    }

    /// Returns one page of customers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_customers_page(
        &self,
        request: PageRequest,
    ) -> Result<Page<Customer>, AppError> {
        self.repository.find_page(request).await
    }

    /// Lists every customer in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_customers_sorted(&self, sort: Sort) -> Result<Vec<Customer>, AppError> {
        self.repository.find_all(Some(sort)).await
    }

    /// Free-text search over name, email and phone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn search_customers(&self, keyword: &str) -> Result<Vec<Customer>, AppError> {
        self.repository.search(keyword.trim()).await
    }

    /// Lists customers whose status equals `status`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `status` is not a known status.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_customers_by_status(&self, status: &str) -> Result<Vec<Customer>, AppError> {
        let status: CustomerStatus = status.parse()?;
        self.repository.find_by_status(status).await
    }

    /// Retrieves a single customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_customer_by_id(&self, id: i64) -> Result<Customer, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| customer_not_found(id))
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already in use.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create_customer(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        let new_customer = new_customer.normalized();

        self.ensure_email_available(&new_customer.email, None).await?;

        let created = self.repository.create(new_customer).await?;
        tracing::info!(customer_id = created.id, "Customer created");

        Ok(created)
    }

    /// Replaces every field of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    /// Returns [`AppError::Conflict`] if the email belongs to another customer.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update_customer(
        &self,
        id: i64,
        values: NewCustomer,
    ) -> Result<Customer, AppError> {
        self.get_customer_by_id(id).await?;

        let values = values.normalized();
        self.ensure_email_available(&values.email, Some(id)).await?;

        let updated = self
            .repository
            .replace(id, values)
            .await?
            .ok_or_else(|| customer_not_found(id))?;
        tracing::info!(customer_id = id, "Customer updated");

        Ok(updated)
    }

    /// Applies only the provided fields to an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    /// Returns [`AppError::Conflict`] if a new email belongs to another customer.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn partial_update_customer(
        &self,
        id: i64,
        patch: CustomerPatch,
    ) -> Result<Customer, AppError> {
        let existing = self.get_customer_by_id(id).await?;

        let email_changed = patch.email.is_some();
        let values = existing.merged_with(patch).normalized();

        if email_changed && values.email != existing.email {
            self.ensure_email_available(&values.email, Some(id)).await?;
        }

        let updated = self
            .repository
            .replace(id, values)
            .await?
            .ok_or_else(|| customer_not_found(id))?;
        tracing::info!(customer_id = id, "Customer partially updated");

        Ok(updated)
    }

    /// Deletes a customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete_customer(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(customer_not_found(id));
        }

        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    /// Filters customers by any combination of name, email and status.
    ///
    /// Blank values are ignored. With no filters, every customer is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `status` is not a known status.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn advanced_search(
        &self,
        name: Option<String>,
        email: Option<String>,
        status: Option<String>,
    ) -> Result<Vec<Customer>, AppError> {
        let status = match non_blank(status) {
            Some(status) => Some(status.parse::<CustomerStatus>()?),
            None => None,
        };

        let filter = CustomerFilter {
            name: non_blank(name),
            email: non_blank(email),
            status,
        };

        self.repository.filter(filter).await
    }

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn ensure_email_available(
        &self,
        email: &str,
        owner_id: Option<i64>,
    ) -> Result<(), AppError> {
        match self.repository.find_by_email(email).await? {
            Some(other) if Some(other.id) != owner_id => Err(AppError::conflict(
                "Email already in use",
                json!({ "email": email }),
            )),
            _ => Ok(()),
        }
    }
}

fn customer_not_found(id: i64) -> AppError {
    AppError::not_found("Customer not found", json!({ "id": id }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCustomerRepository;
    use chrono::Utc;

    fn create_test_customer(id: i64, name: &str, email: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("+1 555 0100".to_string()),
            address: Some("1 Main St".to_string()),
            status: CustomerStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_customer(name: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            address: None,
            status: CustomerStatus::Active,
        }
    }

    fn stored(id: i64, values: NewCustomer) -> Customer {
        let now = Utc::now();
        Customer {
            id,
            name: values.name,
            email: values.email,
            phone: values.phone,
            address: values.address,
            status: values.status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_customer_success() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "jane@example.com")
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .withf(|c| c.name == "Jane" && c.email == "jane@example.com")
            .times(1)
            .returning(|c| Ok(stored(1, c)));

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service
            .create_customer(new_customer(" Jane ", "Jane@Example.com"))
            .await;

        let customer = result.unwrap();
        assert_eq!(customer.id, 1);
        assert_eq!(customer.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_create_customer_duplicate_email() {
        let mut mock_repo = MockCustomerRepository::new();

        let existing = create_test_customer(5, "Other", "jane@example.com");
        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_create().never();

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service
            .create_customer(new_customer("Jane", "jane@example.com"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_id()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|_| Ok(None));

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service.get_customer_by_id(42).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_customer_not_found_skips_write() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        mock_repo.expect_replace().never();

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service
            .update_customer(9, new_customer("Jane", "jane@example.com"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_customer_keeps_own_email() {
        let mut mock_repo = MockCustomerRepository::new();

        let existing = create_test_customer(3, "Jane", "jane@example.com");
        let same = existing.clone();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(same.clone())));
        mock_repo
            .expect_replace()
            .withf(|id, values| *id == 3 && values.name == "Jane Doe" && values.phone.is_none())
            .times(1)
            .returning(|id, values| Ok(Some(stored(id, values))));

        let service = CustomerService::new(Arc::new(mock_repo));

        let updated = service
            .update_customer(3, new_customer("Jane Doe", "jane@example.com"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Jane Doe");
        assert!(updated.phone.is_none());
    }

    #[tokio::test]
    async fn test_update_customer_email_taken_by_other() {
        let mut mock_repo = MockCustomerRepository::new();

        let existing = create_test_customer(3, "Jane", "jane@example.com");
        let other = create_test_customer(4, "John", "john@example.com");
        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(other.clone())));
        mock_repo.expect_replace().never();

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service
            .update_customer(3, new_customer("Jane", "john@example.com"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_partial_update_only_changes_email() {
        let mut mock_repo = MockCustomerRepository::new();

        let existing = create_test_customer(7, "John Doe", "john@example.com");
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "new@x.com")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_replace()
            .times(1)
            .returning(|id, values| Ok(Some(stored(id, values))));

        let service = CustomerService::new(Arc::new(mock_repo));

        let patch = CustomerPatch {
            email: Some("New@X.com".to_string()),
            ..Default::default()
        };
        let updated = service.partial_update_customer(7, patch).await.unwrap();

        assert_eq!(updated.email, "new@x.com");
        assert_eq!(updated.name, "John Doe");
        assert_eq!(updated.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(updated.address.as_deref(), Some("1 Main St"));
        assert_eq!(updated.status, CustomerStatus::Active);
    }

    #[tokio::test]
    async fn test_partial_update_without_email_skips_uniqueness_check() {
        let mut mock_repo = MockCustomerRepository::new();

        let existing = create_test_customer(7, "John Doe", "john@example.com");
        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_find_by_email().never();
        mock_repo
            .expect_replace()
            .returning(|id, values| Ok(Some(stored(id, values))));

        let service = CustomerService::new(Arc::new(mock_repo));

        let patch = CustomerPatch {
            status: Some(CustomerStatus::Suspended),
            ..Default::default()
        };
        let updated = service.partial_update_customer(7, patch).await.unwrap();

        assert_eq!(updated.status, CustomerStatus::Suspended);
    }

    #[tokio::test]
    async fn test_delete_customer_not_found() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo.expect_delete().times(1).returning(|_| Ok(false));

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service.delete_customer(1).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_customers_by_status_rejects_unknown_status() {
        let mut mock_repo = MockCustomerRepository::new();
        mock_repo.expect_find_by_status().never();

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service.get_customers_by_status("archived").await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_advanced_search_ignores_blank_filters() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_filter()
            .withf(|f| {
                f.name.as_deref() == Some("Jo")
                    && f.email.is_none()
                    && f.status == Some(CustomerStatus::Active)
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = CustomerService::new(Arc::new(mock_repo));

        let result = service
            .advanced_search(
                Some("Jo".to_string()),
                Some("   ".to_string()),
                Some("ACTIVE".to_string()),
            )
            .await;

        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_customers_sorted_passes_sort() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_all()
            .withf(|sort| sort.is_some_and(|s| s == Sort::parse("name", "desc").unwrap()))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = CustomerService::new(Arc::new(mock_repo));

        let sort = Sort::parse("name", "desc").unwrap();
        assert!(service.get_customers_sorted(sort).await.unwrap().is_empty());
    }
}
