//! Sorting and pagination primitives shared by the service and repositories.
//!
//! A [`PageRequest`] describes one zero-based slice of an ordered collection,
//! optionally carrying a [`Sort`]. Repositories answer it with a [`Page`].

use serde_json::json;
use std::cmp::Ordering;

use crate::domain::entities::Customer;
use crate::error::AppError;

/// Largest page size accepted from callers.
pub const MAX_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Interprets a `sortDir` query value.
    ///
    /// Only `desc` (any case) selects descending order; every other value is ascending.
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Customer attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Email,
    Phone,
    Address,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Resolves a `sortBy` property name. Accepts camelCase and snake_case spellings.
    pub fn from_property(property: &str) -> Result<Self, AppError> {
        let field = match property.trim() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "email" => SortField::Email,
            "phone" => SortField::Phone,
            "address" => SortField::Address,
            "status" => SortField::Status,
            "createdAt" | "created_at" => SortField::CreatedAt,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            _ => {
                return Err(AppError::bad_request(
                    "Unknown sort property",
                    json!({
                        "sortBy": property,
                        "allowed": [
                            "id", "name", "email", "phone", "address",
                            "status", "createdAt", "updatedAt"
                        ],
                    }),
                ));
            }
        };

        Ok(field)
    }

    /// Column name in the `customers` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::Address => "address",
            SortField::Status => "status",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// SQL expression the column is ordered by.
    ///
    /// Text columns compare lowercased in code point order, matching [`Sort::compare`].
    pub fn sort_expression(&self) -> String {
        match self {
            SortField::Name | SortField::Email | SortField::Phone | SortField::Address => {
                format!("LOWER({}) COLLATE \"C\"", self.column())
            }
            _ => self.column().to_string(),
        }
    }

    fn compare(&self, a: &Customer, b: &Customer) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => cmp_folded(&a.name, &b.name),
            SortField::Email => cmp_folded(&a.email, &b.email),
            SortField::Phone => cmp_nullable(a.phone.as_deref(), b.phone.as_deref()),
            SortField::Address => cmp_nullable(a.address.as_deref(), b.address.as_deref()),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Missing values sort after present ones, like PostgreSQL's ascending `NULLS LAST`.
fn cmp_nullable(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_folded(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ordering applied to a customer listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Builds a sort from raw `sortBy` / `sortDir` query values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `sort_by` is not a known property.
    pub fn parse(sort_by: &str, sort_dir: &str) -> Result<Self, AppError> {
        Ok(Self::new(
            SortField::from_property(sort_by)?,
            SortDirection::from_param(sort_dir),
        ))
    }

    /// Compares two customers under this ordering. Ties fall back to ascending id.
    pub fn compare(&self, a: &Customer, b: &Customer) -> Ordering {
        let ordering = self.field.compare(a, b);
        let ordering = match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }

    /// SQL `ORDER BY` body, e.g. `LOWER(name) COLLATE "C" DESC, id ASC`.
    ///
    /// Built only from the fixed column names of [`SortField`].
    pub fn order_by_clause(&self) -> String {
        if self.field == SortField::Id {
            return format!("id {}", self.direction.as_sql());
        }
        format!(
            "{} {}, id ASC",
            self.field.sort_expression(),
            self.direction.as_sql()
        )
    }
}

/// A request for one zero-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is negative, `size` is outside
    /// `1..=MAX_PAGE_SIZE`, or the resulting offset does not fit in an `i64`.
    pub fn new(page: i64, size: i64, sort: Option<Sort>) -> Result<Self, AppError> {
        if page < 0 {
            return Err(AppError::bad_request(
                "Page index must not be less than zero",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "size": size }),
            ));
        }

        if page.checked_mul(size).is_none() {
            return Err(AppError::bad_request(
                "Page index is too large",
                json!({ "page": page, "size": size }),
            ));
        }

        Ok(Self { page, size, sort })
    }

    pub fn offset(&self) -> i64 {
        self.page * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// One slice of a larger collection plus the totals needed to navigate it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: i64,
    pub size: i64,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// `ceil(total_elements / size)`.
    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        (self.total_elements + self.size - 1) / self.size
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}
