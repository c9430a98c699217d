use std::collections::BTreeMap;
use std::time::Duration;

use roxmltree::Document;
use tracing::{debug, warn};

use crate::decode;
use crate::error::{Error, Result};
use crate::logger::MessageLogger;
use crate::protocol;
use crate::schema::{
    encode_temperature, DEVICE_PARAMS, READ_PATH, WIRE_OP_MODE, WIRE_SETPOINT, WIRE_WEEK_PROGRAM,
    WRITE_PATH,
};
use crate::types::*;

// Each exchange is independent and short-lived; the timeout applies
// per request, not per poll cycle.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TouchlineClientBuilder {
    host: String,
    protocol: String,
    timeout: Duration,
    log_path: Option<String>,
}

impl TouchlineClientBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            protocol: "http".to_string(),
            timeout: DEFAULT_TIMEOUT,
            log_path: None,
        }
    }

    pub fn protocol(mut self, proto: &str) -> Self {
        self.protocol = proto.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn message_log(mut self, path: impl Into<String>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> TouchlineClient {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("failed to build HTTP client");

        let logger = self
            .log_path
            .map(|path| MessageLogger::new(&path).expect("failed to open log file"));

        TouchlineClient {
            http,
            base_url: format!("{}://{}", self.protocol, self.host),
            logger,
        }
    }
}

/// Client for the TouchLine controller's LAN XML API.
///
/// The controller is sessionless: every operation is one POST and one
/// response, with no connection state kept between calls.
pub struct TouchlineClient {
    http: reqwest::Client,
    base_url: String,
    logger: Option<MessageLogger>,
}

impl TouchlineClient {
    pub fn builder(host: impl Into<String>) -> TouchlineClientBuilder {
        TouchlineClientBuilder::new(host)
    }

    async fn read_values(&mut self, request: String) -> Result<String> {
        let url = format!("{}{}", self.base_url, READ_PATH);
        debug!(url = %url, "sending read request");

        if let Some(ref mut logger) = self.logger {
            logger.log_read(READ_PATH, &request);
        }

        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "text/xml")
            .body(request)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.error_for_status()?.text().await?;

        if let Some(ref mut logger) = self.logger {
            logger.log_response(status, &body);
        }

        Ok(body)
    }

    /// Total number of zones the controller manages.
    pub async fn get_device_count(&mut self) -> Result<u32> {
        let request = protocol::read_request(&[protocol::device_count_query()]);
        let body = self.read_values(request).await?;
        let doc = Document::parse(&body)?;
        let value = decode::first_item_value(&doc)
            .ok_or_else(|| Error::Malformed("device count query returned no value".into()))?;
        value
            .trim()
            .parse()
            .map_err(|_| Error::Malformed(format!("device count is not an integer: {value:?}")))
    }

    /// Raw system status code. See [`SystemStatus::from_raw`] for the
    /// semantic mapping.
    pub async fn get_system_status(&mut self) -> Result<String> {
        let request = protocol::read_request(&[protocol::system_status_query()]);
        let body = self.read_values(request).await?;
        let doc = Document::parse(&body)?;
        decode::first_item_value(&doc)
            .ok_or_else(|| Error::Malformed("system status query returned no value".into()))
    }

    /// Full parameter set of one zone. Individual parameters the
    /// controller cannot supply come back as
    /// [`ParamValue::Unavailable`], not as an error.
    pub async fn get_device_data(&mut self, device_index: usize) -> Result<DeviceSnapshot> {
        let request = protocol::read_request(&[protocol::device_query(device_index)]);
        let body = self.read_values(request).await?;
        let doc = Document::parse(&body)?;
        let item = decode::first_item(&doc).ok_or_else(|| {
            Error::Malformed(format!("device {device_index} response has no item"))
        })?;
        Ok(decode::decode_device_item(item, DEVICE_PARAMS))
    }

    /// One full poll: device count, system status, then every zone in
    /// turn. A zone that fails to read is logged and recorded as
    /// [`DeviceResult::Failed`] without aborting the rest.
    pub async fn get_all_devices_data(&mut self) -> Result<SystemSnapshot> {
        let device_count = self.get_device_count().await?;
        let system_status = self.get_system_status().await?;

        let mut devices = BTreeMap::new();
        for index in 0..device_count as usize {
            match self.get_device_data(index).await {
                Ok(snapshot) => {
                    devices.insert(index, DeviceResult::Snapshot(snapshot));
                }
                Err(e) => {
                    warn!(device = index, error = %e, "zone read failed, recording error entry");
                    devices.insert(index, DeviceResult::Failed(e.to_string()));
                }
            }
        }

        let failed = devices.values().filter(|d| d.is_failed()).count();
        debug!(count = device_count, failed, "poll complete");

        Ok(SystemSnapshot {
            device_count,
            system_status,
            devices,
        })
    }

    /// Write one raw parameter value. Writes are fire-and-forget user
    /// actions: every failure path resolves to `false` after logging,
    /// never an error.
    pub async fn set_parameter(
        &mut self,
        device_index: usize,
        wire_name: &str,
        raw_value: &str,
    ) -> bool {
        let payload = protocol::write_payload(device_index, wire_name, raw_value);
        let url = format!("{}{}", self.base_url, WRITE_PATH);
        debug!(url = %url, payload = %payload, "sending write");

        let result = self
            .http
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(payload.clone())
            .send()
            .await;

        let ok = match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = resp.status().as_u16(), payload = %payload, "write rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, payload = %payload, "write failed");
                false
            }
        };

        if let Some(ref mut logger) = self.logger {
            logger.log_write(&payload, ok);
        }

        ok
    }

    /// Set a zone's setpoint in degrees Celsius.
    pub async fn set_target_temperature(&mut self, device_index: usize, celsius: f64) -> bool {
        let raw = encode_temperature(celsius);
        self.set_parameter(device_index, WIRE_SETPOINT, &raw.to_string())
            .await
    }

    pub async fn set_operation_mode(&mut self, device_index: usize, mode: OperationMode) -> bool {
        self.set_parameter(device_index, WIRE_OP_MODE, &mode.code().to_string())
            .await
    }

    pub async fn set_week_program(&mut self, device_index: usize, program: WeekProgram) -> bool {
        self.set_parameter(device_index, WIRE_WEEK_PROGRAM, &program.code().to_string())
            .await
    }
}
