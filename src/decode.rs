use roxmltree::{Document, Node};
use tracing::trace;

use crate::schema::{decode_temperature, ParamKind, ParameterSpec};
use crate::types::{DeviceSnapshot, ParamValue};

const NAME_TAG: &str = "n";
/// The controller's own marker for a field it cannot report.
const NA_TEXT: &str = "NA";

/// Outcome of one step of the positional walk.
enum Slot<'a> {
    /// A name node followed by a (possibly empty) value node.
    Pair {
        name: Option<&'a str>,
        value: Option<&'a str>,
    },
    /// Something other than a name node where a name was expected.
    /// The walk re-synchronizes on the following element.
    Misaligned,
    /// No elements left; remaining schema rows stay unavailable.
    Exhausted,
}

/// Cursor over an item's flattened element children.
///
/// The response carries no correlation keys, only order. A zone can
/// drop a single slot for an optional field without shifting the rest
/// of the stream, so a misaligned step advances by one element instead
/// of two and the next schema row re-examines the following element.
struct SlotWalk<'a, 'input> {
    elems: Vec<Node<'a, 'input>>,
    pos: usize,
}

impl<'a, 'input> SlotWalk<'a, 'input> {
    fn new(item: Node<'a, 'input>) -> Self {
        Self {
            elems: item.children().filter(Node::is_element).collect(),
            pos: 0,
        }
    }

    fn next_slot(&mut self) -> Slot<'a> {
        let Some(head) = self.elems.get(self.pos) else {
            return Slot::Exhausted;
        };
        if head.tag_name().name() != NAME_TAG {
            self.pos += 1;
            return Slot::Misaligned;
        }
        let slot = Slot::Pair {
            name: head.text(),
            value: self.elems.get(self.pos + 1).and_then(|n| n.text()),
        };
        self.pos += 2;
        slot
    }
}

/// Rebuild one zone's parameter set from a response item.
///
/// Produces exactly one entry per schema row; rows the stream cannot
/// supply come back as [`ParamValue::Unavailable`], never as an error.
pub(crate) fn decode_device_item(item: Node, schema: &[ParameterSpec]) -> DeviceSnapshot {
    let mut walk = SlotWalk::new(item);
    let mut snapshot = DeviceSnapshot::default();

    for (row, spec) in schema.iter().enumerate() {
        let decoded = match walk.next_slot() {
            Slot::Exhausted => ParamValue::Unavailable,
            Slot::Misaligned => {
                trace!(row, param = spec.display_name, "misaligned slot, re-syncing");
                ParamValue::Unavailable
            }
            Slot::Pair { name, value } => match value {
                Some(text) if !text.is_empty() && text != NA_TEXT => {
                    // The first row's wire name carries the zone's
                    // compact id as its `G<id>.` prefix.
                    if row == 0 {
                        snapshot.unique_id = name.and_then(parse_compact_id);
                    }
                    coerce(spec.kind, text)
                }
                _ => ParamValue::Unavailable,
            },
        };
        snapshot.values.insert(spec.display_name.to_string(), decoded);
    }

    snapshot
}

fn coerce(kind: ParamKind, raw: &str) -> ParamValue {
    match kind {
        ParamKind::Text => ParamValue::Text(raw.to_string()),
        ParamKind::Numeric => match raw.trim().parse() {
            Ok(n) => ParamValue::Numeric(n),
            Err(_) => ParamValue::Unavailable,
        },
        ParamKind::Temperature => match raw.trim().parse::<i64>() {
            Ok(n) => ParamValue::Temperature(decode_temperature(n)),
            Err(_) => ParamValue::Unavailable,
        },
    }
}

/// `G7.name` -> `7`. Anything without the delimiter or prefix is None.
fn parse_compact_id(wire_name: &str) -> Option<u32> {
    let (head, _) = wire_name.split_once('.')?;
    head.strip_prefix('G')?.parse().ok()
}

pub(crate) fn find_item_list<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    doc.root_element()
        .children()
        .find(|n| n.has_tag_name("item_list"))
}

pub(crate) fn first_item<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    find_item_list(doc)?.children().find(|n| n.has_tag_name("i"))
}

/// Value of the first item's `<v>` node, for single bare queries.
pub(crate) fn first_item_value(doc: &Document) -> Option<String> {
    first_item(doc)?
        .children()
        .find(|n| n.has_tag_name("v"))
        .and_then(|v| v.text())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParamKind, DEVICE_PARAMS};

    const TEST_SCHEMA: &[ParameterSpec] = &[
        ParameterSpec { wire_name: "name", display_name: "Name", kind: ParamKind::Text },
        ParameterSpec { wire_name: "a", display_name: "A", kind: ParamKind::Numeric },
        ParameterSpec { wire_name: "b", display_name: "B", kind: ParamKind::Temperature },
        ParameterSpec { wire_name: "c", display_name: "C", kind: ParamKind::Numeric },
    ];

    fn decode(item_xml: &str, schema: &[ParameterSpec]) -> DeviceSnapshot {
        let doc_xml = format!("<body><item_list>{item_xml}</item_list></body>");
        let doc = Document::parse(&doc_xml).unwrap();
        let item = first_item(&doc).unwrap();
        decode_device_item(item, schema)
    }

    #[test]
    fn full_response_decodes_every_row() {
        let snap = decode(
            "<i><n>G7.name</n><v>Kitchen</v>\
             <n>G7.a</n><v>2</v>\
             <n>G7.b</n><v>2150</v>\
             <n>G7.c</n><v>12</v></i>",
            TEST_SCHEMA,
        );
        assert_eq!(snap.values.len(), 4);
        assert_eq!(snap.value("Name"), Some(&ParamValue::Text("Kitchen".into())));
        assert_eq!(snap.value("A"), Some(&ParamValue::Numeric(2)));
        assert_eq!(snap.value("B"), Some(&ParamValue::Temperature(21.5)));
        assert_eq!(snap.value("C"), Some(&ParamValue::Numeric(12)));
        assert_eq!(snap.unique_id, Some(7));
    }

    #[test]
    fn missing_name_slot_does_not_desynchronize_later_rows() {
        // Second row's name node is gone; its value arrives bare. The
        // walk must flag row 2 unavailable and still decode rows 3 and 4.
        let snap = decode(
            "<i><n>G7.name</n><v>Kitchen</v>\
             <v>2</v>\
             <n>G7.b</n><v>2150</v>\
             <n>G7.c</n><v>12</v></i>",
            TEST_SCHEMA,
        );
        assert_eq!(snap.values.len(), 4);
        assert_eq!(snap.value("A"), Some(&ParamValue::Unavailable));
        assert_eq!(snap.value("B"), Some(&ParamValue::Temperature(21.5)));
        assert_eq!(snap.value("C"), Some(&ParamValue::Numeric(12)));
    }

    #[test]
    fn short_response_fills_remaining_rows_unavailable() {
        let snap = decode("<i><n>G7.name</n><v>Kitchen</v></i>", TEST_SCHEMA);
        assert_eq!(snap.values.len(), 4);
        assert_eq!(snap.value("Name"), Some(&ParamValue::Text("Kitchen".into())));
        assert_eq!(snap.value("A"), Some(&ParamValue::Unavailable));
        assert_eq!(snap.value("B"), Some(&ParamValue::Unavailable));
        assert_eq!(snap.value("C"), Some(&ParamValue::Unavailable));
    }

    #[test]
    fn empty_item_yields_all_unavailable() {
        let snap = decode("<i></i>", TEST_SCHEMA);
        assert_eq!(snap.values.len(), 4);
        assert!(snap.values.values().all(|v| !v.is_available()));
        assert_eq!(snap.unique_id, None);
    }

    #[test]
    fn na_and_empty_values_become_unavailable() {
        let snap = decode(
            "<i><n>G7.name</n><v>NA</v>\
             <n>G7.a</n><v></v>\
             <n>G7.b</n><v>2150</v>\
             <n>G7.c</n><v>12</v></i>",
            TEST_SCHEMA,
        );
        assert_eq!(snap.value("Name"), Some(&ParamValue::Unavailable));
        assert_eq!(snap.value("A"), Some(&ParamValue::Unavailable));
        assert_eq!(snap.value("B"), Some(&ParamValue::Temperature(21.5)));
    }

    #[test]
    fn unparsable_numerics_become_unavailable() {
        let snap = decode(
            "<i><n>G7.name</n><v>Kitchen</v>\
             <n>G7.a</n><v>abc</v>\
             <n>G7.b</n><v>21.5</v>\
             <n>G7.c</n><v>12</v></i>",
            TEST_SCHEMA,
        );
        assert_eq!(snap.value("A"), Some(&ParamValue::Unavailable));
        // Wire temperatures are integers; a decimal string is bogus.
        assert_eq!(snap.value("B"), Some(&ParamValue::Unavailable));
        assert_eq!(snap.value("C"), Some(&ParamValue::Numeric(12)));
    }

    #[test]
    fn unique_id_skipped_when_first_value_missing() {
        let snap = decode(
            "<i><n>G7.name</n><v>NA</v>\
             <n>G7.a</n><v>2</v></i>",
            TEST_SCHEMA,
        );
        assert_eq!(snap.unique_id, None);
    }

    #[test]
    fn malformed_first_name_leaves_unique_id_unset() {
        let snap = decode(
            "<i><n>noprefix</n><v>Kitchen</v>\
             <n>G7.a</n><v>2</v></i>",
            TEST_SCHEMA,
        );
        assert_eq!(snap.unique_id, None);
        assert_eq!(snap.value("Name"), Some(&ParamValue::Text("Kitchen".into())));
    }

    #[test]
    fn compact_id_parsing() {
        assert_eq!(parse_compact_id("G7.name"), Some(7));
        assert_eq!(parse_compact_id("G12.SollTemp"), Some(12));
        assert_eq!(parse_compact_id("name"), None);
        assert_eq!(parse_compact_id("R0.SystemStatus"), None);
        assert_eq!(parse_compact_id("Gx.name"), None);
    }

    #[test]
    fn production_schema_decodes_a_real_zone() {
        let snap = decode(
            "<i><n>G1.name</n><v>Bad</v>\
             <n>G1.SollTempMaxVal</n><v>3000</v>\
             <n>G1.SollTempMinVal</n><v>500</v>\
             <n>G1.WeekProg</n><v>0</v>\
             <n>G1.OPMode</n><v>1</v>\
             <n>G1.SollTemp</n><v>2200</v>\
             <n>G1.RaumTemp</n><v>2153</v>\
             <n>G1.kurzID</n><v>1</v>\
             <n>G1.ownerKurzID</n><v>3</v></i>",
            DEVICE_PARAMS,
        );
        assert_eq!(snap.values.len(), DEVICE_PARAMS.len());
        assert_eq!(snap.unique_id, Some(1));
        assert_eq!(snap.name(), Some("Bad"));
        assert_eq!(snap.setpoint_max(), Some(30.0));
        assert_eq!(snap.setpoint_min(), Some(5.0));
        assert_eq!(snap.target_temperature(), Some(22.0));
        assert!((snap.current_temperature().unwrap() - 21.53).abs() < 1e-9);
        assert_eq!(snap.operation_mode(), Some(crate::types::OperationMode::Heat));
        assert_eq!(snap.week_program(), Some(crate::types::WeekProgram::None));
        assert_eq!(snap.device_id(), Some(1));
        assert_eq!(snap.controller_id(), Some(3));
    }

    #[test]
    fn first_item_value_extraction() {
        let doc = Document::parse(
            "<body><item_list><i><n>totalNumberOfDevices</n><v>4</v></i></item_list></body>",
        )
        .unwrap();
        assert_eq!(first_item_value(&doc), Some("4".to_string()));
    }

    #[test]
    fn first_item_value_missing_nodes() {
        let doc = Document::parse("<body><item_list></item_list></body>").unwrap();
        assert_eq!(first_item_value(&doc), None);
        let doc = Document::parse("<body></body>").unwrap();
        assert_eq!(first_item_value(&doc), None);
        let doc = Document::parse("<body><item_list><i><n>x</n></i></item_list></body>").unwrap();
        assert_eq!(first_item_value(&doc), None);
    }
}
