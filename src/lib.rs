mod client;
mod decode;
mod error;
mod logger;
mod protocol;
mod schema;
mod types;

pub use client::{TouchlineClient, TouchlineClientBuilder};
pub use error::{Error, Result};
pub use schema::{
    decode_temperature, encode_temperature, ParamKind, ParameterSpec, DEVICE_PARAMS,
    DISPLAY_CONTROLLER_ID, DISPLAY_DEVICE_ID, DISPLAY_NAME, DISPLAY_OP_MODE, DISPLAY_SETPOINT,
    DISPLAY_SETPOINT_MAX, DISPLAY_SETPOINT_MIN, DISPLAY_TEMPERATURE, DISPLAY_WEEK_PROGRAM,
    WIRE_OP_MODE, WIRE_SETPOINT, WIRE_WEEK_PROGRAM,
};
pub use types::*;
