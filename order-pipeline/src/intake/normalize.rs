//! Payload normalization
//!
//! Turns a [`Payload`] into a canonical record through an ordered fallback
//! chain. Each step runs only when the previous one produced nothing:
//!
//! 1. structured mapping, used as is
//! 2. bytes, decoded as UTF-8 JSON (no further fallback)
//! 3. text as a JSON object
//! 4. text as base64 of a JSON object
//! 5. text in the loose `cliente:Joao,itens:[Pizza,Refri],mesa:5` form

use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use regex::Regex;
use serde_json::{Map, Value};
use shared::error::{AppError, AppResult};

use super::payload::Payload;

/// Canonical order record, keyed by `cliente`, `itens`, `mesa`
pub type CanonicalRecord = Map<String, Value>;

pub const MSG_ABSENT: &str = "Body inválido ou ausente";
pub const MSG_MALFORMED_TEXT: &str = "Body inválido: JSON/base64 malformado";
pub const MSG_MALFORMED_BYTES: &str = "Body inválido: JSON malformado";

static CUSTOMER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"cliente\s*:\s*([^,}]+)").expect("Invalid customer regex pattern")
});

static TABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mesa\s*:\s*([0-9]+)").expect("Invalid table regex pattern"));

static ITEMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"itens\s*:\s*\[([^\]]*)\]").expect("Invalid items regex pattern")
});

/// Normalize a raw payload into a canonical record
pub fn normalize(payload: Payload) -> AppResult<CanonicalRecord> {
    match payload {
        Payload::Structured(map) => Ok(map),
        Payload::Bytes(bytes) => parse_bytes(&bytes),
        Payload::Text(text) => parse_text(&text),
        Payload::Absent | Payload::Unsupported(_) => Err(AppError::invalid_format(MSG_ABSENT)),
    }
}

/// UTF-8 JSON object from raw bytes
pub fn parse_bytes(bytes: &[u8]) -> AppResult<CanonicalRecord> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(parse_json_text)
        .ok_or_else(|| AppError::invalid_format(MSG_MALFORMED_BYTES))
}

/// Text through the JSON, base64 and loose-form steps in order
pub fn parse_text(text: &str) -> AppResult<CanonicalRecord> {
    parse_json_text(text)
        .or_else(|| parse_base64_text(text))
        .or_else(|| parse_lenient(text))
        .ok_or_else(|| AppError::invalid_format(MSG_MALFORMED_TEXT))
}

/// Text holding a JSON object; any other JSON value is no match
pub fn parse_json_text(text: &str) -> Option<CanonicalRecord> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Text holding base64 of a UTF-8 JSON object
///
/// Characters outside the base64 alphabet are discarded before decoding.
pub fn parse_base64_text(text: &str) -> Option<CanonicalRecord> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let decoded = STANDARD.decode(cleaned).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    parse_json_text(&decoded)
}

/// Loose `key:value` extraction
///
/// Backslashes go first, then one pair of enclosing braces, then every
/// quote. All three fields must match. Labels containing `,` or `:` are
/// split as they come.
pub fn parse_lenient(text: &str) -> Option<CanonicalRecord> {
    let unescaped = text.replace('\\', "");
    let trimmed = unescaped.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);
    let cleaned = inner.replace(['"', '\''], "");

    let customer = CUSTOMER_PATTERN.captures(&cleaned)?.get(1)?.as_str().trim();
    let table: i64 = TABLE_PATTERN.captures(&cleaned)?.get(1)?.as_str().parse().ok()?;
    let items: Vec<Value> = ITEMS_PATTERN
        .captures(&cleaned)?
        .get(1)?
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| Value::String(item.to_string()))
        .collect();

    let mut record = CanonicalRecord::new();
    record.insert("cliente".into(), Value::String(customer.to_string()));
    record.insert("itens".into(), Value::Array(items));
    record.insert("mesa".into(), Value::from(table));
    Some(record)
}
