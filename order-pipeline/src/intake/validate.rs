//! Order field validation

use serde_json::Value;
use shared::error::{AppError, AppResult};
use shared::models::OrderDraft;

use super::normalize::CanonicalRecord;

pub const MSG_CUSTOMER: &str = "Campo 'cliente' é obrigatório e deve ser string";
pub const MSG_ITEMS: &str = "Campo 'itens' é obrigatório e deve ser uma lista";
pub const MSG_TABLE: &str = "Campo 'mesa' é obrigatório e deve ser inteiro positivo";

/// Check `cliente`, then `itens`, then `mesa`, stopping at the first failure
///
/// The customer is kept exactly as sent; only the emptiness check trims it.
pub fn validate(record: &CanonicalRecord) -> AppResult<OrderDraft> {
    let customer = match record.get("cliente") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return Err(field_error("cliente", MSG_CUSTOMER)),
    };

    let items = match record.get("itens") {
        Some(Value::Array(values)) if !values.is_empty() => values
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| field_error("itens", MSG_ITEMS))?,
        _ => return Err(field_error("itens", MSG_ITEMS)),
    };

    let table_number = match record.get("mesa").and_then(Value::as_i64) {
        Some(n) if n > 0 => n,
        _ => return Err(field_error("mesa", MSG_TABLE)),
    };

    Ok(OrderDraft {
        customer,
        items,
        table_number,
    })
}

fn field_error(field: &'static str, message: &str) -> AppError {
    AppError::validation(message).with_detail("field", field)
}
