use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::schema::{
    DISPLAY_CONTROLLER_ID, DISPLAY_DEVICE_ID, DISPLAY_NAME, DISPLAY_OP_MODE, DISPLAY_SETPOINT,
    DISPLAY_SETPOINT_MAX, DISPLAY_SETPOINT_MIN, DISPLAY_TEMPERATURE, DISPLAY_WEEK_PROGRAM,
};

/// A decoded parameter value. `Unavailable` is the controller saying
/// nothing usable, distinct from a valid zero or empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParamValue {
    Numeric(i64),
    Temperature(f64),
    Text(String),
    Unavailable,
}

impl ParamValue {
    pub fn is_available(&self) -> bool {
        !matches!(self, ParamValue::Unavailable)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Numeric(n) => write!(f, "{n}"),
            ParamValue::Temperature(t) => write!(f, "{t:.2}\u{00b0}C"),
            ParamValue::Text(s) => write!(f, "{s}"),
            ParamValue::Unavailable => write!(f, "n/a"),
        }
    }
}

/// Zone operation mode codes. Unknown codes pass through untouched;
/// the controller owns the value space, not this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationMode {
    Auto,
    Heat,
    Eco,
    Off,
    Other(i64),
}

impl OperationMode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => OperationMode::Auto,
            1 => OperationMode::Heat,
            2 => OperationMode::Eco,
            3 => OperationMode::Off,
            other => OperationMode::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            OperationMode::Auto => 0,
            OperationMode::Heat => 1,
            OperationMode::Eco => 2,
            OperationMode::Off => 3,
            OperationMode::Other(code) => *code,
        }
    }
}

/// Week program selection, 0 meaning no custom schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeekProgram {
    None,
    Program1,
    Program2,
    Program3,
    Program4,
    Other(i64),
}

impl WeekProgram {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => WeekProgram::None,
            1 => WeekProgram::Program1,
            2 => WeekProgram::Program2,
            3 => WeekProgram::Program3,
            4 => WeekProgram::Program4,
            other => WeekProgram::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            WeekProgram::None => 0,
            WeekProgram::Program1 => 1,
            WeekProgram::Program2 => 2,
            WeekProgram::Program3 => 3,
            WeekProgram::Program4 => 4,
            WeekProgram::Other(code) => *code,
        }
    }
}

/// Semantic reading of the raw `R0.SystemStatus` code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SystemStatus {
    Ok,
    Warning,
    Error,
    Other(String),
}

impl SystemStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "0" => SystemStatus::Ok,
            "1" => SystemStatus::Warning,
            "2" => SystemStatus::Error,
            other => SystemStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemStatus::Ok => write!(f, "OK"),
            SystemStatus::Warning => write!(f, "Warning"),
            SystemStatus::Error => write!(f, "Error"),
            SystemStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Decoded parameter set of one zone. Holds exactly one entry per
/// schema row, available or not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceSnapshot {
    /// Compact id parsed out of the first response name (`G<id>.name`).
    pub unique_id: Option<u32>,
    pub values: BTreeMap<String, ParamValue>,
}

impl DeviceSnapshot {
    pub fn value(&self, display_name: &str) -> Option<&ParamValue> {
        self.values.get(display_name)
    }

    fn text(&self, display_name: &str) -> Option<&str> {
        match self.values.get(display_name) {
            Some(ParamValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    fn temperature(&self, display_name: &str) -> Option<f64> {
        match self.values.get(display_name) {
            Some(ParamValue::Temperature(t)) => Some(*t),
            _ => None,
        }
    }

    fn numeric(&self, display_name: &str) -> Option<i64> {
        match self.values.get(display_name) {
            Some(ParamValue::Numeric(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.text(DISPLAY_NAME)
    }

    /// Measured room temperature in degrees Celsius.
    pub fn current_temperature(&self) -> Option<f64> {
        self.temperature(DISPLAY_TEMPERATURE)
    }

    /// Setpoint in degrees Celsius.
    pub fn target_temperature(&self) -> Option<f64> {
        self.temperature(DISPLAY_SETPOINT)
    }

    pub fn setpoint_min(&self) -> Option<f64> {
        self.temperature(DISPLAY_SETPOINT_MIN)
    }

    pub fn setpoint_max(&self) -> Option<f64> {
        self.temperature(DISPLAY_SETPOINT_MAX)
    }

    pub fn operation_mode(&self) -> Option<OperationMode> {
        self.numeric(DISPLAY_OP_MODE).map(OperationMode::from_code)
    }

    pub fn week_program(&self) -> Option<WeekProgram> {
        self.numeric(DISPLAY_WEEK_PROGRAM).map(WeekProgram::from_code)
    }

    pub fn device_id(&self) -> Option<i64> {
        self.numeric(DISPLAY_DEVICE_ID)
    }

    pub fn controller_id(&self) -> Option<i64> {
        self.numeric(DISPLAY_CONTROLLER_ID)
    }
}

/// Outcome slot of one zone inside a full poll. A failed fetch keeps
/// its slot so callers can tell "zone failed" from "no zones".
#[derive(Debug, Clone, Serialize)]
pub enum DeviceResult {
    Snapshot(DeviceSnapshot),
    Failed(String),
}

impl DeviceResult {
    pub fn snapshot(&self) -> Option<&DeviceSnapshot> {
        match self {
            DeviceResult::Snapshot(snap) => Some(snap),
            DeviceResult::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DeviceResult::Failed(_))
    }
}

/// One full poll of the controller. Built fresh on every cycle and
/// owned by the caller; nothing is mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub device_count: u32,
    /// Raw status code string as returned by the controller.
    pub system_status: String,
    /// Keyed by zone index, one slot per index `0..device_count`.
    pub devices: BTreeMap<usize, DeviceResult>,
}

impl SystemSnapshot {
    pub fn status(&self) -> SystemStatus {
        SystemStatus::from_raw(&self.system_status)
    }

    pub fn device(&self, index: usize) -> Option<&DeviceResult> {
        self.devices.get(&index)
    }
}
