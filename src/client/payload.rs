//! Wire payloads for the rate service.
//!
//! Field names here are the compatibility surface; keep them in camelCase exactly
//! as the service expects.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{ChargeProfileRef, ChargeTemplateSpec, OperatingMode, ProfileRef, RateRecordSpec};
use crate::error::TaskError;
use crate::records::sentinel;

/// Charge template create request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload<'a> {
    auto_add: bool,
    system_generated: bool,
    is_active: bool,
    is_deleted: bool,
    rules: Vec<Rule>,
    name: &'a str,
    charge_name: &'a str,
    charge_code: &'a str,
    description: &'a str,
    from_event: Option<Value>,
    to_event: Option<Value>,
    unit_of_measure: &'static str,
    charges: Vec<ChargeAmount>,
    exact_events: Option<Value>,
    in_event: Option<Value>,
    #[serde(flatten)]
    vendor: Option<VendorFields>,
}

impl<'a> TemplatePayload<'a> {
    pub fn new(spec: &'a ChargeTemplateSpec, mode: OperatingMode) -> Result<Self, TaskError> {
        let amount = serde_json::Number::from_str(spec.amount.trim())
            .map_err(|_| TaskError::InvalidRequest(format!("invalid charge amount '{}'", spec.amount)))?;

        Ok(Self {
            auto_add: true,
            system_generated: false,
            is_active: true,
            is_deleted: false,
            rules: vec![Rule::match_all()],
            name: &spec.name,
            charge_name: &spec.charge_name,
            charge_code: &spec.charge_code,
            description: &spec.description,
            from_event: None,
            to_event: None,
            unit_of_measure: "fixed",
            charges: vec![ChargeAmount {
                minimum_amount: 0,
                amount,
                free_units: 0,
            }],
            exact_events: None,
            in_event: None,
            vendor: mode.vendor_type().map(VendorFields::all_drivers),
        })
    }
}

/// Root of the template's rule tree; an empty AND group matches everything.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Rule {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'static str,
    is_negated: bool,
    children: Vec<Rule>,
}

impl Rule {
    fn match_all() -> Self {
        Self {
            kind: "GROUP",
            value: "AND",
            is_negated: false,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeAmount {
    minimum_amount: u32,
    amount: serde_json::Number,
    free_units: u32,
}

/// Vendor linkage sent with driver-mode templates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorFields {
    vendor_type: &'static str,
    vendor: ProfileRef,
    vendor_id: Option<String>,
    vendor_profile_type: &'static str,
}

impl VendorFields {
    fn all_drivers(vendor_type: &'static str) -> Self {
        let vendor = sentinel::all_drivers();
        Self {
            vendor_type,
            vendor_profile_type: "driverGroups/all",
            vendor,
            vendor_id: None,
        }
    }
}

/// Rate record create request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecordPayload<'a> {
    load_type: &'a [String],
    customers: &'a [ProfileRef],
    pickup_location: &'a [ProfileRef],
    delivery_location: &'a [ProfileRef],
    terminals: &'a [ProfileRef],
    name: &'a str,
    effective_start_date: String,
    effective_end_date: String,
    #[serde(flatten)]
    classification: serde_json::Map<String, Value>,
    charge_groups: Vec<ChargeGroup<'a>>,
    description: &'a str,
    is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_type: Option<&'static str>,
}

impl<'a> RateRecordPayload<'a> {
    pub fn new(spec: &'a RateRecordSpec, mode: OperatingMode) -> Self {
        Self {
            load_type: &spec.load_types,
            customers: &spec.customers,
            pickup_location: &spec.pickup_locations,
            delivery_location: &spec.delivery_locations,
            terminals: &spec.terminals,
            name: &spec.name,
            effective_start_date: wire_timestamp(spec.effective.start()),
            effective_end_date: wire_timestamp(spec.effective.end()),
            classification: spec.classification.to_wire(),
            charge_groups: vec![ChargeGroup {
                bill_to: sentinel::match_customer(),
                one_off_charges: Vec::new(),
                charge_profiles: vec![&spec.charge_profile],
                charge_profile_groups: spec
                    .charge_profile_groups
                    .iter()
                    .map(|id| ObjectId { oid: id })
                    .collect(),
            }],
            description: &spec.description,
            is_active: true,
            vendor_type: mode.vendor_type(),
        }
    }
}

/// Wraps the template result with the wildcard bill-to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeGroup<'a> {
    bill_to: ProfileRef,
    one_off_charges: Vec<Value>,
    charge_profiles: Vec<&'a ChargeProfileRef>,
    charge_profile_groups: Vec<ObjectId<'a>>,
}

#[derive(Debug, Serialize)]
struct ObjectId<'a> {
    #[serde(rename = "$oid")]
    oid: &'a str,
}

/// Zip-code group profile create request.
#[derive(Debug, Serialize)]
pub struct ZipGroupPayload<'a> {
    group: ZipGroup<'a>,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> ZipGroupPayload<'a> {
    pub fn new(name: &'a str, zip_codes: &'a [String]) -> Self {
        Self {
            group: ZipGroup { name, zipcodes: zip_codes },
            kind: "ZIP_CODE",
        }
    }
}

#[derive(Debug, Serialize)]
struct ZipGroup<'a> {
    name: &'a str,
    zipcodes: &'a [String],
}

/// Response envelope; the created object lives under `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// `None` only when the field is absent; `"data": null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    pub data: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(de).map(Some)
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn wire_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
