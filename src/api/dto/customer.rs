//! DTOs for the customer endpoints.
//!
//! JSON field names are camelCase:
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "Jane Doe",
//!   "email": "jane@example.com",
//!   "phone": "+1 555 0100",
//!   "address": "1 Main St",
//!   "status": "active",
//!   "createdAt": "2026-01-01T00:00:00Z",
//!   "updatedAt": "2026-01-01T00:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::domain::entities::{Customer, CustomerPatch, CustomerStatus, NewCustomer};
use crate::domain::paging::Page;

/// Digits with an optional leading `+`, spaces, dashes and parentheses. Empty clears the field.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^$|^\+?[0-9 ()\-]{7,20}$").unwrap());

/// Checks the name as it will be stored: trimmed, 2 to 100 characters.
fn valid_name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::new("blank").with_message("Must not be blank".into()));
    }
    if !(2..=100).contains(&len) {
        return Err(ValidationError::new("length")
            .with_message("Name must be between 2 and 100 characters".into()));
    }
    Ok(())
}

/// Treats an empty or whitespace-only optional string as absent.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body for `POST /api/customers` and `PUT /api/customers/{id}`.
///
/// `name` and `email` are required. On `PUT`, omitted optional fields are cleared
/// and an omitted `status` resets to `active`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[validate(custom(function = "valid_name"))]
    pub name: String,

    #[validate(
        email(message = "Email must be a valid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 7-20 digits, spaces, dashes or parentheses"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    pub status: Option<CustomerStatus>,
}

impl From<CustomerRequest> for NewCustomer {
    fn from(req: CustomerRequest) -> Self {
        NewCustomer {
            name: req.name,
            email: req.email,
            phone: blank_to_none(req.phone),
            address: blank_to_none(req.address),
            status: req.status.unwrap_or_default(),
        }
    }
}

/// Request body for `PATCH /api/customers/{id}`.
///
/// All fields are optional; only provided fields are validated and changed.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[validate(custom(function = "valid_name"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Email must be a valid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 7-20 digits, spaces, dashes or parentheses"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    pub status: Option<CustomerStatus>,
}

impl From<CustomerUpdate> for CustomerPatch {
    fn from(req: CustomerUpdate) -> Self {
        CustomerPatch {
            name: req.name,
            email: req.email,
            phone: blank_to_none(req.phone),
            address: blank_to_none(req.address),
            status: req.status,
        }
    }
}

/// Read-only projection of a customer returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Paged listing envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPageResponse {
    pub customers: Vec<CustomerResponse>,
    pub current_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl From<Page<Customer>> for CustomerPageResponse {
    fn from(page: Page<Customer>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(CustomerResponse::from);

        CustomerPageResponse {
            customers: page.content,
            current_page: page.number,
            total_items: page.total_elements,
            total_pages,
        }
    }
}

/// Body of `GET /api/customers`: a page envelope when paging was requested,
/// otherwise a plain list.
///
/// Untagged, so the JSON is either the envelope object or a bare array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CustomerListResponse {
    Page(CustomerPageResponse),
    List(Vec<CustomerResponse>),
}

/// Confirmation body, e.g. after a delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Converts a list of customers into response DTOs.
pub fn to_responses(customers: Vec<Customer>) -> Vec<CustomerResponse> {
    customers.into_iter().map(CustomerResponse::from).collect()
}
