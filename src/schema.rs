pub(crate) const READ_PATH: &str = "/cgi-bin/ILRReadValues.cgi";
pub(crate) const WRITE_PATH: &str = "/cgi-bin/writeVal.cgi";

// Fixed client identity the controller expects in every read envelope.
pub(crate) const PROTOCOL_VERSION: &str = "1.0";
pub(crate) const CLIENT_NAME: &str = "IMaster6_02_00";
pub(crate) const CLIENT_VERSION: &str = "6.02.0006";
pub(crate) const FILE_NAME: &str = "room";

pub(crate) const DEVICE_COUNT_QUERY: &str = "totalNumberOfDevices";
pub(crate) const SYSTEM_STATUS_QUERY: &str = "R0.SystemStatus";

/// Wire name of the setpoint parameter, the usual write target.
pub const WIRE_SETPOINT: &str = "SollTemp";
/// Wire name of the operation mode parameter.
pub const WIRE_OP_MODE: &str = "OPMode";
/// Wire name of the week program parameter.
pub const WIRE_WEEK_PROGRAM: &str = "WeekProg";

/// Temperatures travel as integer hundredths of a degree Celsius.
const TEMP_SCALE: f64 = 100.0;

/// How a parameter's raw text is interpreted after the positional walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer, passed through unvalidated (mode codes, device ids).
    Numeric,
    /// Integer hundredths of a degree Celsius, scaled to f64 on read.
    Temperature,
    /// Raw string.
    Text,
}

/// One row of the static parameter table.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub wire_name: &'static str,
    pub display_name: &'static str,
    pub kind: ParamKind,
}

pub const DISPLAY_NAME: &str = "Name";
pub const DISPLAY_SETPOINT_MAX: &str = "Setpoint max";
pub const DISPLAY_SETPOINT_MIN: &str = "Setpoint min";
pub const DISPLAY_WEEK_PROGRAM: &str = "Week program";
pub const DISPLAY_OP_MODE: &str = "Operation mode";
pub const DISPLAY_SETPOINT: &str = "Setpoint";
pub const DISPLAY_TEMPERATURE: &str = "Temperature";
pub const DISPLAY_DEVICE_ID: &str = "Device ID";
pub const DISPLAY_CONTROLLER_ID: &str = "Controller ID";

/// Per-zone parameter table. The order is load-bearing: the controller
/// replies with bare name/value pairs and the decoder realigns them
/// against this table positionally, so request building and response
/// decoding must walk the same rows in the same order.
pub const DEVICE_PARAMS: &[ParameterSpec] = &[
    ParameterSpec { wire_name: "name", display_name: DISPLAY_NAME, kind: ParamKind::Text },
    ParameterSpec { wire_name: "SollTempMaxVal", display_name: DISPLAY_SETPOINT_MAX, kind: ParamKind::Temperature },
    ParameterSpec { wire_name: "SollTempMinVal", display_name: DISPLAY_SETPOINT_MIN, kind: ParamKind::Temperature },
    ParameterSpec { wire_name: WIRE_WEEK_PROGRAM, display_name: DISPLAY_WEEK_PROGRAM, kind: ParamKind::Numeric },
    ParameterSpec { wire_name: WIRE_OP_MODE, display_name: DISPLAY_OP_MODE, kind: ParamKind::Numeric },
    ParameterSpec { wire_name: WIRE_SETPOINT, display_name: DISPLAY_SETPOINT, kind: ParamKind::Temperature },
    ParameterSpec { wire_name: "RaumTemp", display_name: DISPLAY_TEMPERATURE, kind: ParamKind::Temperature },
    ParameterSpec { wire_name: "kurzID", display_name: DISPLAY_DEVICE_ID, kind: ParamKind::Numeric },
    ParameterSpec { wire_name: "ownerKurzID", display_name: DISPLAY_CONTROLLER_ID, kind: ParamKind::Numeric },
];

/// Raw wire integer to degrees Celsius.
pub fn decode_temperature(raw: i64) -> f64 {
    raw as f64 / TEMP_SCALE
}

/// Degrees Celsius to the raw wire integer used on the write path.
pub fn encode_temperature(celsius: f64) -> i64 {
    (celsius * TEMP_SCALE).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_round_trip() {
        let raw = encode_temperature(21.5);
        assert_eq!(raw, 2150);
        assert!((decode_temperature(raw) - 21.5).abs() < 0.01);
    }

    #[test]
    fn temperature_rounds_to_nearest_hundredth() {
        assert_eq!(encode_temperature(21.499), 2150);
        assert_eq!(encode_temperature(21.494), 2149);
        assert_eq!(encode_temperature(-0.5), -50);
    }

    #[test]
    fn first_row_is_the_name_parameter() {
        // The decoder extracts the compact id from the first row's name
        // node, which only works while "name" stays in front.
        assert_eq!(DEVICE_PARAMS[0].wire_name, "name");
        assert_eq!(DEVICE_PARAMS[0].kind, ParamKind::Text);
    }
}
