//! Simple decoder to inspect a serialized auxiliary data entry.
//!
//! Usage: `decode_auxdata <file> <type descriptor>`

use std::fs;

use ir_auxdata::{decode, format_id, parse_type, Element, NoNodes, Value};

fn format_value(v: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match v {
        Value::Int64(i) => out.push_str(&format!("{}{}\n", indent, i)),
        Value::Uint64(u) => out.push_str(&format!("{}{:#x}\n", indent, u)),
        Value::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.len() > 80 {
                out.push_str(&format!("{}\"{}...\"\n", indent, preview));
            } else {
                out.push_str(&format!("{}\"{}\"\n", indent, preview));
            }
        }
        Value::Uuid(id) => out.push_str(&format!("{}{}\n", indent, format_id(id))),
        Value::Node(node) => {
            out.push_str(&format!("{}NODE({})\n", indent, format_id(&node.uuid())))
        }
        Value::Offset(o) => {
            let element = match &o.element {
                Element::Id(id) => format_id(id),
                Element::Node(node) => format!("NODE({})", format_id(&node.uuid())),
            };
            out.push_str(&format!("{}OFFSET({}+{})\n", indent, element, o.displacement))
        }
        Value::Mapping(m) => {
            out.push_str(&format!("{}MAPPING[{}]\n", indent, m.len()));
            for (k, v) in m.iter().take(20) {
                format_value(k, depth + 1, out);
                format_value(v, depth + 2, out);
            }
            if m.len() > 20 {
                out.push_str(&format!("{}  ... and {} more entries\n", indent, m.len() - 20));
            }
        }
        Value::Sequence(items) | Value::Tuple(items) => {
            let kind = if matches!(v, Value::Tuple(_)) { "TUPLE" } else { "SEQUENCE" };
            out.push_str(&format!("{}{}[{}]\n", indent, kind, items.len()));
            for item in items.iter().take(20) {
                format_value(item, depth + 1, out);
            }
            if items.len() > 20 {
                out.push_str(&format!("{}  ... and {} more items\n", indent, items.len() - 20));
            }
        }
        Value::Set(items) => {
            out.push_str(&format!("{}SET[{}]\n", indent, items.len()));
            for item in items.iter().take(20) {
                format_value(item, depth + 1, out);
            }
        }
        Value::Unknown(blob) => {
            out.push_str(&format!("{}UNKNOWN[{} bytes]\n", indent, blob.as_bytes().len()))
        }
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: decode_auxdata <file> <type descriptor>");
    let type_name = args.next().expect("usage: decode_auxdata <file> <type descriptor>");

    let tree = parse_type(&type_name).expect("Malformed type descriptor");
    println!("Type: {}", tree);

    let data = fs::read(&path).expect("Failed to read file");
    println!("Size: {} bytes", data.len());

    let value = decode(&data, &type_name, &NoNodes).expect("Failed to decode");

    let mut out = String::new();
    format_value(&value, 0, &mut out);
    println!("\n=== Value ===\n{}", out);
}
