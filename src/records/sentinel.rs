//! Wildcard profiles the rate service recognizes by id or type.
//!
//! Built once per process and shared by every record.

use std::sync::{Arc, LazyLock};

use serde_json::json;

use crate::domain::{LocationProfile, ProfileRef, ProfileType};

pub const ALL_CUSTOMERS_ID: &str = "6509789287550d5c4aba54aa";
pub const ALL_DRIVERS_ID: &str = "6811db7c60b4869eb9e26742";

static ALL_CUSTOMERS: LazyLock<ProfileRef> = LazyLock::new(|| {
    Arc::new(LocationProfile {
        id: Some(ALL_CUSTOMERS_ID.to_string()),
        name: "All Customers".to_string(),
        profile_type: ProfileType::CustomerGroup,
        profile: None,
        profile_group: Vec::new(),
    })
});

static MATCH_CUSTOMER: LazyLock<ProfileRef> = LazyLock::new(|| {
    Arc::new(LocationProfile {
        id: None,
        name: "Match Customer".to_string(),
        profile_type: ProfileType::MatchCustomer,
        profile: Some(json!({ "name": "Match Customer" })),
        profile_group: Vec::new(),
    })
});

static ALL_DRIVERS: LazyLock<ProfileRef> = LazyLock::new(|| {
    Arc::new(LocationProfile {
        id: Some(ALL_DRIVERS_ID.to_string()),
        name: "All Driver Group".to_string(),
        profile_type: ProfileType::AllDriverGroups,
        profile: None,
        profile_group: Vec::new(),
    })
});

/// "All Customers" group: audience and pickup wildcard.
pub fn all_customers() -> ProfileRef {
    Arc::clone(&ALL_CUSTOMERS)
}

/// Bill-to wildcard used inside every charge group.
pub fn match_customer() -> ProfileRef {
    Arc::clone(&MATCH_CUSTOMER)
}

/// Vendor wildcard for driver-mode templates.
pub fn all_drivers() -> ProfileRef {
    Arc::clone(&ALL_DRIVERS)
}
