//! Customer entity and the value types used to create and modify it.

use chrono::{DateTime, Utc};
use serde_json::json;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Lifecycle state of a customer account.
///
/// Parsed case-insensitively (also when deserialized), serialized lowercase.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Active,
        CustomerStatus::Inactive,
        CustomerStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        CustomerStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                AppError::bad_request(
                    "Invalid customer status",
                    json!({
                        "status": s,
                        "allowed": CustomerStatus::ALL.map(|st| st.as_str()),
                    }),
                )
            })
    }
}

/// A persisted customer record.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Full replacement values for this record, ready to be stored again.
    pub fn to_new_customer(&self) -> NewCustomer {
        NewCustomer {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            status: self.status,
        }
    }

    /// Merges a partial update onto the current values.
    ///
    /// Fields left as `None` in the patch keep their current value.
    pub fn merged_with(&self, patch: CustomerPatch) -> NewCustomer {
        let current = self.to_new_customer();

        NewCustomer {
            name: patch.name.unwrap_or(current.name),
            email: patch.email.unwrap_or(current.email),
            phone: patch.phone.or(current.phone),
            address: patch.address.or(current.address),
            status: patch.status.unwrap_or(current.status),
        }
    }
}

/// Values for creating a customer, or for replacing every field of an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
}

impl NewCustomer {
    /// Trims the name and normalizes the email to lowercase.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

/// Partial update for an existing customer.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
}

/// Canonical form used for storing and comparing emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer() -> Customer {
        let now = Utc::now();
        Customer {
            id: 1,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            address: Some("1 Main St".to_string()),
            status: CustomerStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("active".parse::<CustomerStatus>().unwrap(), CustomerStatus::Active);
        assert_eq!("INACTIVE".parse::<CustomerStatus>().unwrap(), CustomerStatus::Inactive);
        assert_eq!(" Suspended ".parse::<CustomerStatus>().unwrap(), CustomerStatus::Suspended);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let err = "archived".parse::<CustomerStatus>().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(CustomerStatus::Inactive).unwrap(), "inactive");
        assert_eq!(CustomerStatus::default(), CustomerStatus::Active);
    }

    #[test]
    fn test_status_deserializes_any_case() {
        let status: CustomerStatus = serde_json::from_str("\"SUSPENDED\"").unwrap();
        assert_eq!(status, CustomerStatus::Suspended);
        assert!(serde_json::from_str::<CustomerStatus>("\"gone\"").is_err());
    }

    #[test]
    fn test_merge_changes_only_provided_fields() {
        let customer = sample_customer();
        let patch = CustomerPatch {
            email: Some("new@x.com".to_string()),
            ..Default::default()
        };

        let merged = customer.merged_with(patch);

        assert_eq!(merged.email, "new@x.com");
        assert_eq!(merged.name, "John Doe");
        assert_eq!(merged.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(merged.address.as_deref(), Some("1 Main St"));
        assert_eq!(merged.status, CustomerStatus::Active);
    }

    #[test]
    fn test_empty_patch_keeps_everything() {
        let customer = sample_customer();
        let merged = customer.merged_with(CustomerPatch::default());
        assert_eq!(merged, customer.to_new_customer());
    }

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let new_customer = NewCustomer {
            name: "  Jane  ".to_string(),
            email: " Jane@Example.COM ".to_string(),
            phone: None,
            address: None,
            status: CustomerStatus::Active,
        }
        .normalized();

        assert_eq!(new_customer.name, "Jane");
        assert_eq!(new_customer.email, "jane@example.com");
    }
}
