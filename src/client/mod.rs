//! Rate service client.
//!
//! Two dependent create operations (charge template, then rate record) plus
//! the zip-code group profile call. Endpoints and vendor fields depend on the
//! run's `OperatingMode`, fixed at construction. The client holds only
//! read-only state, so one instance is shared by every worker.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{ChargeProfileRef, ChargeTemplateSpec, OperatingMode, RateRecordSpec};
use crate::error::TaskError;

pub mod payload;
pub mod transport;

pub use transport::{HttpResponse, HttpTransport, Transport};

use payload::{Envelope, RateRecordPayload, TemplatePayload, ZipGroupPayload};

pub const ZIP_GROUP_PATH: &str = "/user/create-group-profile-settings";

/// Service paths for one operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub charge_template: &'static str,
    pub rate_record: &'static str,
}

impl Endpoints {
    pub fn for_mode(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Standard => Self {
                charge_template: "/charge-templates",
                rate_record: "/customer-rate-record",
            },
            OperatingMode::Driver => Self {
                charge_template: "/rate-engine/vendor-rate/charge-profile",
                rate_record: "/rate-engine/vendor-rate/load-tariff",
            },
        }
    }
}

pub struct RateClient<T> {
    transport: T,
    mode: OperatingMode,
    endpoints: Endpoints,
}

impl<T: Transport> RateClient<T> {
    pub fn new(transport: T, mode: OperatingMode) -> Self {
        Self {
            transport,
            mode,
            endpoints: Endpoints::for_mode(mode),
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a charge template and return the server's `data` object.
    pub fn create_charge_template(&self, spec: &ChargeTemplateSpec) -> Result<ChargeProfileRef, TaskError> {
        let payload = TemplatePayload::new(spec, self.mode)?;
        let body = self.post(self.endpoints.charge_template, &payload)?;

        let envelope: Envelope = serde_json::from_value(body)
            .map_err(|e| TaskError::Shape(format!("charge template response: {e}")))?;
        let data = match envelope.data {
            None => return Err(TaskError::Shape("charge template response has no `data` field".to_string())),
            Some(Value::Null) => return Err(TaskError::Shape("charge template response has a null `data` field".to_string())),
            Some(data) => data,
        };

        Ok(ChargeProfileRef::new(data))
    }

    /// Create the rate record; returns the full response body.
    pub fn create_rate_record(&self, spec: &RateRecordSpec) -> Result<Value, TaskError> {
        let payload = RateRecordPayload::new(spec, self.mode);
        self.post(self.endpoints.rate_record, &payload)
    }

    /// Create a named zip-code group profile.
    pub fn create_zip_group(&self, name: &str, zip_codes: &[String]) -> Result<Value, TaskError> {
        self.post(ZIP_GROUP_PATH, &ZipGroupPayload::new(name, zip_codes))
    }

    fn post<P: Serialize>(&self, path: &str, payload: &P) -> Result<Value, TaskError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| TaskError::InvalidRequest(format!("serializing request for {path}: {e}")))?;

        let resp = self.transport.post_json(path, &body)?;
        if !resp.is_success() {
            return Err(TaskError::Remote {
                status: resp.status,
                body: resp.body,
            });
        }

        serde_json::from_str(&resp.body)
            .map_err(|e| TaskError::Shape(format!("response from {path} is not JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::transport::fake::FakeTransport;
    use super::*;
    use crate::domain::{Rate, RateGroup, RecordDefaults, Terminal};
    use crate::records;

    fn template() -> ChargeTemplateSpec {
        records::build_charge_template(
            &Terminal::new("T1", "Norfolk"),
            Rate::parse("100.0").unwrap(),
            &RecordDefaults::default(),
        )
    }

    fn record(charge: ChargeProfileRef) -> RateRecordSpec {
        let group = RateGroup {
            index: 1,
            rate: Rate::parse("100.0").unwrap(),
            locations: vec!["23451".to_string()],
        };
        records::build_rate_record(&group, &Terminal::new("T1", "Norfolk"), &RecordDefaults::default(), charge)
    }

    #[test]
    fn standard_mode_uses_customer_endpoints() {
        let client = RateClient::new(FakeTransport::ok(), OperatingMode::Standard);
        let charge = client.create_charge_template(&template()).unwrap();
        assert_eq!(charge.as_value()["_id"], "id-Norfolk-100.0");

        client.create_rate_record(&record(charge)).unwrap();
        assert_eq!(
            client.transport().paths(),
            vec!["/charge-templates", "/customer-rate-record"]
        );
    }

    #[test]
    fn driver_mode_uses_vendor_endpoints() {
        let client = RateClient::new(FakeTransport::ok(), OperatingMode::Driver);
        let charge = client.create_charge_template(&template()).unwrap();
        client.create_rate_record(&record(charge)).unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].0, "/rate-engine/vendor-rate/charge-profile");
        assert_eq!(requests[0].1["vendorType"], "driver");
        assert_eq!(requests[1].0, "/rate-engine/vendor-rate/load-tariff");
        assert_eq!(requests[1].1["vendorType"], "driver");
    }

    #[test]
    fn template_result_is_forwarded_verbatim() {
        let data = json!({ "_id": "t-1", "charges": [{ "amount": 100.0 }], "extra": { "nested": true } });
        let transport = FakeTransport::ok().respond_when(
            |path, _| path == "/charge-templates",
            Ok(HttpResponse::new(200, json!({ "data": data.clone() }).to_string())),
        );
        let client = RateClient::new(transport, OperatingMode::Standard);

        let charge = client.create_charge_template(&template()).unwrap();
        assert_eq!(charge.as_value(), &data);

        client.create_rate_record(&record(charge)).unwrap();
        let requests = client.transport().requests();
        assert_eq!(requests[1].1["chargeGroups"][0]["chargeProfiles"][0], data);
    }

    #[test]
    fn non_2xx_is_a_remote_error_with_status_and_body() {
        let transport = FakeTransport::ok().respond_when(
            |_, _| true,
            Ok(HttpResponse::new(500, "internal error")),
        );
        let client = RateClient::new(transport, OperatingMode::Standard);
        let err = client.create_charge_template(&template()).unwrap_err();
        assert_eq!(
            err,
            TaskError::Remote {
                status: 500,
                body: "internal error".to_string()
            }
        );
    }

    #[test]
    fn missing_data_field_is_a_shape_error() {
        let transport = FakeTransport::ok().respond_when(
            |_, _| true,
            Ok(HttpResponse::new(200, r#"{"message":"created"}"#)),
        );
        let client = RateClient::new(transport, OperatingMode::Standard);
        assert!(matches!(
            client.create_charge_template(&template()),
            Err(TaskError::Shape(_))
        ));
    }

    #[test]
    fn null_data_field_is_reported_as_null() {
        let transport = FakeTransport::ok().respond_when(|_, _| true, Ok(HttpResponse::new(200, r#"{"data":null}"#)));
        let client = RateClient::new(transport, OperatingMode::Standard);
        assert_eq!(
            client.create_charge_template(&template()),
            Err(TaskError::Shape("charge template response has a null `data` field".to_string()))
        );
        assert_eq!(client.transport().calls_to("/customer-rate-record"), 0);
    }

    #[test]
    fn non_json_body_is_a_shape_error() {
        let transport = FakeTransport::ok().respond_when(|_, _| true, Ok(HttpResponse::new(201, "OK")));
        let client = RateClient::new(transport, OperatingMode::Standard);
        let charge = ChargeProfileRef::new(json!({ "_id": "x" }));
        assert!(matches!(
            client.create_rate_record(&record(charge)),
            Err(TaskError::Shape(_))
        ));
    }

    #[test]
    fn transport_errors_pass_through() {
        let transport = FakeTransport::ok().respond_when(
            |_, _| true,
            Err(TaskError::Transport("connection refused".to_string())),
        );
        let client = RateClient::new(transport, OperatingMode::Standard);
        assert_eq!(
            client.create_charge_template(&template()).unwrap_err(),
            TaskError::Transport("connection refused".to_string())
        );
    }

    #[test]
    fn zip_group_posts_to_group_settings() {
        let client = RateClient::new(FakeTransport::ok(), OperatingMode::Standard);
        client
            .create_zip_group("Zipcode Group 2", &["23460".to_string()])
            .unwrap();
        let requests = client.transport().requests();
        assert_eq!(requests[0].0, ZIP_GROUP_PATH);
        assert_eq!(requests[0].1["group"]["name"], "Zipcode Group 2");
        assert_eq!(requests[0].1["type"], "ZIP_CODE");
    }
}
