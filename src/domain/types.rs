//! Shared domain types.
//!
//! Everything here lives for one run: grouped input, the objects sent to the rate
//! service, and the per-group outcomes collected by the batch runner.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TaskError;

/// Which rate flow the remote service should run.
///
/// Only `driver` selects the vendor endpoints; everything else is the customer flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Customer rate records.
    #[default]
    Standard,
    /// Driver (vendor) load tariffs.
    Driver,
}

impl OperatingMode {
    /// Value of the `vendorType` wire field, if the mode sends one.
    pub fn vendor_type(self) -> Option<&'static str> {
        match self {
            OperatingMode::Standard => None,
            OperatingMode::Driver => Some("driver"),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            OperatingMode::Standard => "standard",
            OperatingMode::Driver => "driver",
        }
    }
}

/// A rate value parsed from the input.
///
/// Numerically equal inputs (`"100"`, `"100.00"`) are the same rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
    /// Parse a decimal rate; rejects non-numeric and non-finite values.
    pub fn parse(raw: &str) -> Option<Self> {
        let v = raw.trim().parse::<f64>().ok()?;
        Self::new(v)
    }

    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // Fold -0.0 into 0.0 so both land in one group.
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Exact grouping key.
    pub(crate) fn key(self) -> u64 {
        self.0.to_bits()
    }
}

impl fmt::Display for Rate {
    /// Shortest round-trip form, always with a decimal point (`100.0`, `85.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Location keys sharing one rate: the unit of work for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct RateGroup {
    /// 1-based position of the rate in first-seen order.
    pub index: usize,
    pub rate: Rate,
    pub locations: Vec<String>,
}

/// All groups of a run, in the order their rate first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateGroups {
    groups: Vec<RateGroup>,
}

impl RateGroups {
    pub(crate) fn from_groups(groups: Vec<RateGroup>) -> Self {
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RateGroup> {
        self.groups.iter()
    }

    pub fn get(&self, rate: Rate) -> Option<&RateGroup> {
        self.groups.iter().find(|g| g.rate.key() == rate.key())
    }

    pub fn total_locations(&self) -> usize {
        self.groups.iter().map(|g| g.locations.len()).sum()
    }

    /// Groups ordered by ascending rate (for display).
    pub fn sorted_by_rate(&self) -> Vec<&RateGroup> {
        let mut sorted: Vec<&RateGroup> = self.groups.iter().collect();
        sorted.sort_by(|a, b| a.rate.value().total_cmp(&b.rate.value()));
        sorted
    }
}

impl<'a> IntoIterator for &'a RateGroups {
    type Item = &'a RateGroup;
    type IntoIter = std::slice::Iter<'a, RateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Profile-type tag understood by the rate service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProfileType {
    CustomerGroup,
    ZipCode,
    Terminal,
    AllDriverGroups,
    MatchCustomer,
    /// Any tag we don't model; sent back unchanged.
    Other(String),
}

impl ProfileType {
    pub fn as_str(&self) -> &str {
        match self {
            ProfileType::CustomerGroup => "customer/group",
            ProfileType::ZipCode => "zipCode",
            ProfileType::Terminal => "terminal",
            ProfileType::AllDriverGroups => "driverGroups/all",
            ProfileType::MatchCustomer => "matchCustomer",
            ProfileType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ProfileType {
    fn from(tag: &str) -> Self {
        match tag {
            "customer/group" => ProfileType::CustomerGroup,
            "zipCode" => ProfileType::ZipCode,
            "terminal" => ProfileType::Terminal,
            "driverGroups/all" => ProfileType::AllDriverGroups,
            "matchCustomer" => ProfileType::MatchCustomer,
            other => ProfileType::Other(other.to_string()),
        }
    }
}

impl Serialize for ProfileType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProfileType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ProfileType::from(tag.as_str()))
    }
}

/// A typed reference to a party or place (customer, zip code, terminal, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub profile_type: ProfileType,
    /// Raw nested profile payload, forwarded as-is.
    pub profile: Option<Value>,
    #[serde(default)]
    pub profile_group: Vec<LocationProfile>,
}

/// Profiles are shared between records (sentinels) so records hold them by `Arc`.
pub type ProfileRef = Arc<LocationProfile>;

/// The terminal every record in a run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub id: String,
    pub name: String,
}

impl Terminal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn profile(&self) -> LocationProfile {
        LocationProfile {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            profile_type: ProfileType::Terminal,
            profile: Some(serde_json::json!({ "_id": self.id, "name": self.name })),
            profile_group: Vec::new(),
        }
    }
}

/// A priced charge definition, created once per rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeTemplateSpec {
    pub name: String,
    pub charge_name: String,
    pub charge_code: String,
    pub description: String,
    /// Decimal amount in its canonical text form.
    pub amount: String,
}

/// Server-assigned result of creating a charge template.
///
/// Opaque: forwarded verbatim into the rate record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChargeProfileRef(Value);

impl ChargeProfileRef {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Inclusive validity interval of a rate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl EffectiveWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if start > end {
            return Err(format!(
                "Effective start {} is after effective end {}.",
                start.to_rfc3339(),
                end.to_rfc3339()
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Default for EffectiveWindow {
    /// 2025-06-24T05:00:00.000Z ..= 2032-03-02T04:59:59.999Z
    fn default() -> Self {
        Self {
            start: DateTime::UNIX_EPOCH + TimeDelta::milliseconds(1_750_741_200_000),
            end: DateTime::UNIX_EPOCH + TimeDelta::milliseconds(1_961_816_399_999),
        }
    }
}

/// Classification fields of a rate record. All default to null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassificationKey {
    ReturnLocation,
    ContainerType,
    ContainerSize,
    Ssl,
    Csr,
    CustomerDepartment,
    ChassisType,
    ChassisSize,
    ChassisOwner,
    Commodity,
    Hazmat,
    Overweight,
    Liquor,
    Hot,
    Genset,
    Domestic,
    Ev,
    Waste,
    Gdp,
    IsRail,
    Scale,
    IsStreetTurn,
}

impl ClassificationKey {
    pub const ALL: [ClassificationKey; 22] = [
        ClassificationKey::ReturnLocation,
        ClassificationKey::ContainerType,
        ClassificationKey::ContainerSize,
        ClassificationKey::Ssl,
        ClassificationKey::Csr,
        ClassificationKey::CustomerDepartment,
        ClassificationKey::ChassisType,
        ClassificationKey::ChassisSize,
        ClassificationKey::ChassisOwner,
        ClassificationKey::Commodity,
        ClassificationKey::Hazmat,
        ClassificationKey::Overweight,
        ClassificationKey::Liquor,
        ClassificationKey::Hot,
        ClassificationKey::Genset,
        ClassificationKey::Domestic,
        ClassificationKey::Ev,
        ClassificationKey::Waste,
        ClassificationKey::Gdp,
        ClassificationKey::IsRail,
        ClassificationKey::Scale,
        ClassificationKey::IsStreetTurn,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ClassificationKey::ReturnLocation => "returnLocation",
            ClassificationKey::ContainerType => "containerType",
            ClassificationKey::ContainerSize => "containerSize",
            ClassificationKey::Ssl => "ssl",
            ClassificationKey::Csr => "csr",
            ClassificationKey::CustomerDepartment => "customerDepartment",
            ClassificationKey::ChassisType => "chassisType",
            ClassificationKey::ChassisSize => "chassisSize",
            ClassificationKey::ChassisOwner => "chassisOwner",
            ClassificationKey::Commodity => "commodity",
            ClassificationKey::Hazmat => "hazmat",
            ClassificationKey::Overweight => "overweight",
            ClassificationKey::Liquor => "liquor",
            ClassificationKey::Hot => "hot",
            ClassificationKey::Genset => "genset",
            ClassificationKey::Domestic => "domestic",
            ClassificationKey::Ev => "ev",
            ClassificationKey::Waste => "waste",
            ClassificationKey::Gdp => "gdp",
            ClassificationKey::IsRail => "isRail",
            ClassificationKey::Scale => "scale",
            ClassificationKey::IsStreetTurn => "isStreetTurn",
        }
    }
}

impl FromStr for ClassificationKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ClassificationKey::ALL
            .into_iter()
            .find(|key| key.wire_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown classification key '{s}'."))
    }
}

/// Explicit classification overrides; every other key is sent as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    overrides: BTreeMap<ClassificationKey, Value>,
}

static NULL: Value = Value::Null;

impl Classification {
    pub fn set(&mut self, key: ClassificationKey, value: Value) {
        self.overrides.insert(key, value);
    }

    pub fn get(&self, key: ClassificationKey) -> &Value {
        self.overrides.get(&key).unwrap_or(&NULL)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Every known key with its value (null unless overridden).
    pub fn to_wire(&self) -> serde_json::Map<String, Value> {
        ClassificationKey::ALL
            .into_iter()
            .map(|key| (key.wire_name().to_string(), self.get(key).clone()))
            .collect()
    }
}

/// Run-wide settings copied into every record and template.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDefaults {
    pub load_types: Vec<String>,
    pub effective: EffectiveWindow,
    pub description: String,
    pub charge_name: String,
    pub charge_code: String,
    pub charge_description: String,
    pub charge_profile_groups: Vec<String>,
    pub classification: Classification,
}

impl RecordDefaults {
    /// Check the record invariants that depend only on run settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.load_types.is_empty() || self.load_types.iter().any(|t| t.trim().is_empty()) {
            return Err("At least one non-empty load type is required.".to_string());
        }
        Ok(())
    }
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            load_types: vec!["IMPORT".to_string(), "EXPORT".to_string(), "ROAD".to_string()],
            effective: EffectiveWindow::default(),
            description: "-".to_string(),
            charge_name: "Line Haul".to_string(),
            charge_code: "Base Price".to_string(),
            charge_description: "Line Haul".to_string(),
            charge_profile_groups: Vec::new(),
            classification: Classification::default(),
        }
    }
}

/// Full rate-record request.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecordSpec {
    pub name: String,
    pub description: String,
    pub load_types: Vec<String>,
    pub customers: Vec<ProfileRef>,
    pub pickup_locations: Vec<ProfileRef>,
    pub delivery_locations: Vec<ProfileRef>,
    pub terminals: Vec<ProfileRef>,
    pub effective: EffectiveWindow,
    pub charge_profile: ChargeProfileRef,
    pub charge_profile_groups: Vec<String>,
    pub classification: Classification,
}

/// Terminal status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Error,
}

/// Result of one rate-group task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub rate: Rate,
    pub location_count: usize,
    /// Server response on success; the captured error otherwise.
    pub result: Result<Value, TaskError>,
}

impl TaskOutcome {
    pub fn new(group: &RateGroup, result: Result<Value, TaskError>) -> Self {
        Self {
            rate: group.rate,
            location_count: group.locations.len(),
            result,
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self.result {
            Ok(_) => TaskStatus::Success,
            Err(_) => TaskStatus::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == TaskStatus::Success
    }

    pub fn error(&self) -> Option<&TaskError> {
        self.result.as_ref().err()
    }
}
