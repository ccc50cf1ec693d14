//! Handlers for the customer endpoints.
//!
//! Each handler validates its input, delegates to
//! [`crate::application::services::CustomerService`] and maps the result to a
//! response. Errors propagate as [`AppError`] and are translated to HTTP status
//! codes by its `IntoResponse` implementation.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::customer::{
    CustomerListResponse, CustomerRequest, CustomerResponse, CustomerUpdate, MessageResponse,
    to_responses,
};
use crate::api::dto::pagination::{AdvancedSearchParams, ListParams, SearchParams};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every customer without paging or sorting.
///
/// # Endpoint
///
/// `GET /api/customers/all`
pub async fn list_all_customers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.customer_service.get_all_customers().await?;
    Ok(Json(to_responses(customers)))
}

/// Lists customers, optionally paged and/or sorted.
///
/// # Endpoint
///
/// `GET /api/customers?page=&size=&sortBy=&sortDir=`
///
/// # Behavior
///
/// - `page` and `size` both present: returns the page envelope
///   `{customers, currentPage, totalItems, totalPages}`, sorted if `sortBy` is set
/// - otherwise `sortBy` present: returns the full list in that order
/// - otherwise: returns the full list unsorted
///
/// `sortDir` is descending only for `desc` (any case).
///
/// # Errors
///
/// Returns 400 Bad Request for a negative page, a size outside `1..=1000`,
/// or an unknown sort property.
pub async fn list_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<CustomerListResponse>, AppError> {
    if let Some(request) = params.page_request()? {
        let page = state.customer_service.get_customers_page(request).await?;
        return Ok(Json(CustomerListResponse::Page(page.into())));
    }

    if let Some(sort) = params.sort()? {
        let customers = state.customer_service.get_customers_sorted(sort).await?;
        return Ok(Json(CustomerListResponse::List(to_responses(customers))));
    }

    let customers = state.customer_service.get_all_customers().await?;
    Ok(Json(CustomerListResponse::List(to_responses(customers))))
}

/// Free-text search over name, email and phone.
///
/// # Endpoint
///
/// `GET /api/customers/search?keyword=`
///
/// # Errors
///
/// Returns 400 Bad Request if `keyword` is missing.
pub async fn search_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state
        .customer_service
        .search_customers(&params.keyword)
        .await?;
    Ok(Json(to_responses(customers)))
}

/// Lists customers in the given status.
///
/// # Endpoint
///
/// `GET /api/customers/status/{status}`
///
/// # Errors
///
/// Returns 400 Bad Request if `status` is not `active`, `inactive` or `suspended`.
pub async fn customers_by_status_handler(
    Path(status): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state
        .customer_service
        .get_customers_by_status(&status)
        .await?;
    Ok(Json(to_responses(customers)))
}

/// Filters customers by any combination of name, email and status.
///
/// # Endpoint
///
/// `GET /api/customers/advanced-search?name=&email=&status=`
///
/// All parameters are optional and combined with AND.
///
/// # Errors
///
/// Returns 400 Bad Request if `status` is not a known status.
pub async fn advanced_search_handler(
    State(state): State<AppState>,
    Query(params): Query<AdvancedSearchParams>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state
        .customer_service
        .advanced_search(params.name, params.email, params.status)
        .await?;
    Ok(Json(to_responses(customers)))
}

/// Retrieves a single customer.
///
/// # Endpoint
///
/// `GET /api/customers/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the customer doesn't exist.
pub async fn get_customer_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state.customer_service.get_customer_by_id(id).await?;
    Ok(Json(customer.into()))
}

/// Creates a customer.
///
/// # Endpoint
///
/// `POST /api/customers`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "phone": "+1 555 0100",     // optional
///   "address": "1 Main St",     // optional
///   "status": "active"          // optional, default "active"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the email is already in use.
pub async fn create_customer_handler(
    State(state): State<AppState>,
    Json(payload): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    payload.validate()?;

    let customer = state.customer_service.create_customer(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Replaces every field of a customer.
///
/// # Endpoint
///
/// `PUT /api/customers/{id}`
///
/// Takes the same body as create. Omitted optional fields are cleared.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the customer doesn't exist.
/// Returns 409 Conflict if the email belongs to another customer.
pub async fn update_customer_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    payload.validate()?;

    let customer = state
        .customer_service
        .update_customer(id, payload.into())
        .await?;

    Ok(Json(customer.into()))
}

/// Partially updates a customer.
///
/// # Endpoint
///
/// `PATCH /api/customers/{id}`
///
/// All fields are optional. Only provided fields are changed.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the customer doesn't exist.
/// Returns 409 Conflict if the new email belongs to another customer.
pub async fn patch_customer_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CustomerUpdate>,
) -> Result<Json<CustomerResponse>, AppError> {
    payload.validate()?;

    let customer = state
        .customer_service
        .partial_update_customer(id, payload.into())
        .await?;

    Ok(Json(customer.into()))
}

/// Deletes a customer.
///
/// # Endpoint
///
/// `DELETE /api/customers/{id}`
///
/// # Response
///
/// ```json
/// { "message": "Customer deleted successfully" }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the customer doesn't exist or was already deleted.
pub async fn delete_customer_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.customer_service.delete_customer(id).await?;
    Ok(Json(MessageResponse::new("Customer deleted successfully")))
}
