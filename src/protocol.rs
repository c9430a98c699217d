use std::fmt::Write;

use crate::schema::{
    CLIENT_NAME, CLIENT_VERSION, DEVICE_COUNT_QUERY, DEVICE_PARAMS, FILE_NAME, PROTOCOL_VERSION,
    SYSTEM_STATUS_QUERY,
};

/// Wrap pre-built `<i>` item fragments in the fixed read envelope.
///
/// Wire names all come from the static schema, so no XML escaping is
/// done here; arbitrary text must not be routed through this builder.
pub(crate) fn read_request(items: &[String]) -> String {
    let mut body = String::with_capacity(256);
    body.push_str("<body>");
    let _ = write!(body, "<version>{PROTOCOL_VERSION}</version>");
    let _ = write!(body, "<client>{CLIENT_NAME}</client>");
    let _ = write!(body, "<client_ver>{CLIENT_VERSION}</client_ver>");
    let _ = write!(body, "<file_name>{FILE_NAME}</file_name>");
    // The controller ignores this field but expects it present.
    body.push_str("<item_list_size>0</item_list_size>");
    body.push_str("<item_list>");
    for item in items {
        body.push_str(item);
    }
    body.push_str("</item_list>");
    body.push_str("</body>");
    body
}

/// One item holding a single bare named query.
pub(crate) fn single_query(name: &str) -> String {
    format!("<i><n>{name}</n></i>")
}

pub(crate) fn device_count_query() -> String {
    single_query(DEVICE_COUNT_QUERY)
}

pub(crate) fn system_status_query() -> String {
    single_query(SYSTEM_STATUS_QUERY)
}

/// One batched item covering every schema row for a zone, addressed
/// as `G<index>.<wire>` in table order.
pub(crate) fn device_query(device_index: usize) -> String {
    let mut item = String::from("<i>");
    for spec in DEVICE_PARAMS {
        let _ = write!(item, "<n>G{device_index}.{}</n>", spec.wire_name);
    }
    item.push_str("</i>");
    item
}

/// Form-encoded write payload, `G<index>.<wire>=<raw>`.
pub(crate) fn write_payload(device_index: usize, wire_name: &str, raw_value: &str) -> String {
    format!("G{device_index}.{wire_name}={raw_value}")
}
