//! PostgreSQL implementation of customer repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Customer, CustomerStatus, NewCustomer};
use crate::domain::paging::{Page, PageRequest, Sort};
use crate::domain::repositories::{CustomerFilter, CustomerRepository};
use crate::error::AppError;

const SELECT_COLUMNS: &str =
    "SELECT id, name, email, phone, address, status, created_at, updated_at FROM customers";

/// Raw `customers` row before the status column is parsed.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = AppError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<CustomerStatus>().map_err(|_| {
            AppError::internal(
                "Stored customer has an unknown status",
                json!({ "id": row.id, "status": row.status }),
            )
        })?;

        Ok(Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_customers(rows: Vec<CustomerRow>) -> Result<Vec<Customer>, AppError> {
    rows.into_iter().map(Customer::try_from).collect()
}

/// Wraps `value` in `%...%` for `ILIKE`, escaping the pattern metacharacters.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn order_by(sort: Option<&Sort>) -> String {
    match sort {
        Some(sort) => format!(" ORDER BY {}", sort.order_by_clause()),
        None => " ORDER BY id ASC".to_string(),
    }
}

/// PostgreSQL repository for customer records.
///
/// Queries are built at runtime because ordering is chosen per request; all
/// user-supplied values are bound, never interpolated.
pub struct PgCustomerRepository {
    pool: Arc<PgPool>,
}

impl PgCustomerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn find_all(&self, sort: Option<Sort>) -> Result<Vec<Customer>, AppError> {
        let sql = format!("{SELECT_COLUMNS}{}", order_by(sort.as_ref()));

        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_customers(rows)
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Customer>, AppError> {
        let sql = format!(
            "{SELECT_COLUMNS}{} LIMIT $1 OFFSET $2",
            order_by(request.sort.as_ref())
        );

        let rows_query = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool.as_ref());
        let count_query =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers").fetch_one(self.pool.as_ref());

        let (rows, total) = tokio::try_join!(rows_query, count_query)?;

        Ok(Page::new(into_customers(rows)?, &request, total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1");

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let sql = format!("{SELECT_COLUMNS} WHERE email = $1");

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn find_by_status(&self, status: CustomerStatus) -> Result<Vec<Customer>, AppError> {
        let sql = format!("{SELECT_COLUMNS} WHERE status = $1 ORDER BY id ASC");

        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(status.as_str())
            .fetch_all(self.pool.as_ref())
            .await?;

        into_customers(rows)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1 ORDER BY id ASC"
        );

        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(like_pattern(keyword))
            .fetch_all(self.pool.as_ref())
            .await?;

        into_customers(rows)
    }

    async fn filter(&self, filter: CustomerFilter) -> Result<Vec<Customer>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE TRUE");

        if let Some(name) = &filter.name {
            builder.push(" AND name ILIKE ");
            builder.push_bind(like_pattern(name));
        }
        if let Some(email) = &filter.email {
            builder.push(" AND email ILIKE ");
            builder.push_bind(like_pattern(email));
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }

        builder.push(" ORDER BY id ASC");

        let rows = builder
            .build_query_as::<CustomerRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        into_customers(rows)
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (name, email, phone, address, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, address, status, created_at, updated_at
            "#,
        )
        .bind(new_customer.name)
        .bind(new_customer.email)
        .bind(new_customer.phone)
        .bind(new_customer.address)
        .bind(new_customer.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Customer::try_from(row)
    }

    async fn replace(
        &self,
        id: i64,
        values: NewCustomer,
    ) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers SET
                name       = $2,
                email      = $3,
                phone      = $4,
                address    = $5,
                status     = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, phone, address, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(values.name)
        .bind(values.email)
        .bind(values.phone)
        .bind(values.address)
        .bind(values.status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("jo"), "%jo%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_order_by_defaults_to_id() {
        assert_eq!(order_by(None), " ORDER BY id ASC");

        let sort = Sort::parse("email", "DESC").unwrap();
        assert_eq!(order_by(Some(&sort)), " ORDER BY LOWER(email) COLLATE \"C\" DESC, id ASC");
    }

    #[test]
    fn test_row_with_unknown_status_is_internal_error() {
        let now = Utc::now();
        let row = CustomerRow {
            id: 1,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            address: None,
            status: "archived".to_string(),
            created_at: now,
            updated_at: now,
        };

        let err = Customer::try_from(row).unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
