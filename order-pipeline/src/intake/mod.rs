//! Ingress stage: payload normalization, validation and the submit handler

mod handler;
mod normalize;
mod payload;
mod validate;

pub use handler::{IngressHandler, InvocationResponse, MSG_QUEUE_URL_MISSING};
pub use normalize::{
    CanonicalRecord, MSG_ABSENT, MSG_MALFORMED_BYTES, MSG_MALFORMED_TEXT, normalize,
    parse_base64_text, parse_bytes, parse_json_text, parse_lenient, parse_text,
};
pub use payload::{InvocationEvent, Payload};
pub use validate::{MSG_CUSTOMER, MSG_ITEMS, MSG_TABLE, validate};
