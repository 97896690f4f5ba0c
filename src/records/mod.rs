//! Record builder.
//!
//! Pure construction of the two objects sent per rate group: the charge
//! template and the rate record that embeds the template's server result.
//! Nothing here touches the network.

use std::sync::Arc;

use serde_json::json;

use crate::domain::{
    ChargeProfileRef, ChargeTemplateSpec, LocationProfile, ProfileType, Rate, RateGroup, RateRecordSpec,
    RecordDefaults, Terminal,
};

pub mod sentinel;

/// `{terminal_name}-{rate}`, shared by the template and the record.
pub fn record_name(terminal: &Terminal, rate: Rate) -> String {
    format!("{}-{}", terminal.name, rate)
}

/// Delivery profile for a single zip code.
pub fn zip_code_profile(zip: &str) -> LocationProfile {
    LocationProfile {
        id: None,
        name: zip.to_string(),
        profile_type: ProfileType::ZipCode,
        profile: Some(json!({ "name": zip, "zipCode": zip })),
        profile_group: Vec::new(),
    }
}

pub fn build_charge_template(terminal: &Terminal, rate: Rate, defaults: &RecordDefaults) -> ChargeTemplateSpec {
    ChargeTemplateSpec {
        name: record_name(terminal, rate),
        charge_name: defaults.charge_name.clone(),
        charge_code: defaults.charge_code.clone(),
        description: defaults.charge_description.clone(),
        amount: rate.to_string(),
    }
}

/// Build the rate record for a group around an already-created template.
pub fn build_rate_record(
    group: &RateGroup,
    terminal: &Terminal,
    defaults: &RecordDefaults,
    charge_profile: ChargeProfileRef,
) -> RateRecordSpec {
    debug_assert!(!group.locations.is_empty(), "rate groups are never empty");

    RateRecordSpec {
        name: record_name(terminal, group.rate),
        description: defaults.description.clone(),
        load_types: defaults.load_types.clone(),
        customers: vec![sentinel::all_customers()],
        pickup_locations: vec![sentinel::all_customers()],
        delivery_locations: group
            .locations
            .iter()
            .map(|zip| Arc::new(zip_code_profile(zip)))
            .collect(),
        terminals: vec![Arc::new(terminal.profile())],
        effective: defaults.effective,
        charge_profile,
        charge_profile_groups: defaults.charge_profile_groups.clone(),
        classification: defaults.classification.clone(),
    }
}
