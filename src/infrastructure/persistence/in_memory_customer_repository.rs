//! Process-local customer repository.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Mirrors the PostgreSQL repository's observable behavior: ids are assigned
//! in increasing order and never reused, emails are unique.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Customer, CustomerStatus, NewCustomer};
use crate::domain::paging::{Page, PageRequest, Sort};
use crate::domain::repositories::{CustomerFilter, CustomerRepository, matches_keyword};
use crate::error::AppError;

#[derive(Default)]
struct Store {
    customers: BTreeMap<i64, Customer>,
    last_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.customers
            .values()
            .any(|c| c.email == email && Some(c.id) != except_id)
    }

    /// Customers in id order, then re-sorted if requested.
    fn ordered(&self, sort: Option<&Sort>) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self.customers.values().cloned().collect();
        if let Some(sort) = sort {
            customers.sort_by(|a, b| sort.compare(a, b));
        }
        customers
    }
}

/// In-memory implementation of [`CustomerRepository`].
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    store: RwLock<Store>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email(email: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": "customers_email_key", "email": email }),
    )
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<Customer>, AppError> {
        Ok(self.store.read().await.ordered(sort.as_ref()))
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Customer>, AppError> {
        let store = self.store.read().await;
        let all = store.ordered(request.sort.as_ref());
        let total = all.len() as i64;

        let content = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();

        Ok(Page::new(content, &request, total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        Ok(self.store.read().await.customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let store = self.store.read().await;
        Ok(store.customers.values().find(|c| c.email == email).cloned())
    }

    async fn find_by_status(&self, status: CustomerStatus) -> Result<Vec<Customer>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .customers
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Customer>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .customers
            .values()
            .filter(|c| matches_keyword(c, keyword))
            .cloned()
            .collect())
    }

    async fn filter(&self, filter: CustomerFilter) -> Result<Vec<Customer>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .customers
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        let mut store = self.store.write().await;

        if store.email_taken(&new_customer.email, None) {
            return Err(duplicate_email(&new_customer.email));
        }

        store.last_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: store.last_id,
            name: new_customer.name,
            email: new_customer.email,
            phone: new_customer.phone,
            address: new_customer.address,
            status: new_customer.status,
            created_at: now,
            updated_at: now,
        };

        store.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn replace(
        &self,
        id: i64,
        values: NewCustomer,
    ) -> Result<Option<Customer>, AppError> {
        let mut store = self.store.write().await;

        if !store.customers.contains_key(&id) {
            return Ok(None);
        }
        if store.email_taken(&values.email, Some(id)) {
            return Err(duplicate_email(&values.email));
        }

        let Some(customer) = store.customers.get_mut(&id) else {
            return Ok(None);
        };
        customer.name = values.name;
        customer.email = values.email;
        customer.phone = values.phone;
        customer.address = values.address;
        customer.status = values.status;
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.store.write().await.customers.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer(name: &str, email: &str, status: CustomerStatus) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            address: None,
            status,
        }
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let repo = InMemoryCustomerRepository::new();

        let first = repo
            .create(new_customer("A", "a@example.com", CustomerStatus::Active))
            .await
            .unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo
            .create(new_customer("B", "b@example.com", CustomerStatus::Active))
            .await
            .unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = InMemoryCustomerRepository::new();

        repo.create(new_customer("A", "a@example.com", CustomerStatus::Active))
            .await
            .unwrap();
        let result = repo
            .create(new_customer("B", "a@example.com", CustomerStatus::Active))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_replace_missing_returns_none() {
        let repo = InMemoryCustomerRepository::new();

        let result = repo
            .replace(99, new_customer("A", "a@example.com", CustomerStatus::Active))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_page_slices_and_counts() {
        let repo = InMemoryCustomerRepository::new();
        for i in 0..5 {
            repo.create(new_customer(
                &format!("C{i}"),
                &format!("c{i}@example.com"),
                CustomerStatus::Active,
            ))
            .await
            .unwrap();
        }

        let request = PageRequest::new(2, 2, None).unwrap();
        let page = repo.find_page(request).await.unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.content[0].name, "C4");
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_name_desc() {
        let repo = InMemoryCustomerRepository::new();
        for name in ["Bob", "Alice", "Carol"] {
            repo.create(new_customer(
                name,
                &format!("{}@example.com", name.to_lowercase()),
                CustomerStatus::Active,
            ))
            .await
            .unwrap();
        }

        let sort = Sort::parse("name", "desc").unwrap();
        let names: Vec<String> = repo
            .find_all(Some(sort))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
    }
}
