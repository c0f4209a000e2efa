//! Order receipt renderer
//!
//! Renders the order fields into a receipt document and derives its
//! storage key.

use tracing::instrument;

use crate::builder::ReceiptBuilder;
use crate::error::{ReceiptError, ReceiptResult};

/// Content type stored alongside every receipt
pub const CONTENT_TYPE: &str = "application/pdf";

/// Value printed for fields of an order that could not be found
pub const PLACEHOLDER: &str = "-";

/// Fixed closing line of every receipt
const TRAILER: &str = "Obrigado pela preferência!";

/// Storage key for the receipt of an order
pub fn receipt_key(order_id: &str) -> String {
    format!("pedido-{order_id}.pdf")
}

/// The order fields a receipt prints, already in display form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSubject {
    pub order_id: String,
    pub customer: String,
    pub table: String,
    pub items: Vec<String>,
}

impl ReceiptSubject {
    pub fn new(
        order_id: impl Into<String>,
        customer: impl Into<String>,
        table: impl Into<String>,
        items: Vec<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer: customer.into(),
            table: table.into(),
            items,
        }
    }

    /// Subject for an order id with no stored order behind it
    pub fn placeholder(order_id: impl Into<String>) -> Self {
        Self::new(order_id, PLACEHOLDER, PLACEHOLDER, Vec::new())
    }

    pub fn is_placeholder(&self) -> bool {
        self.customer == PLACEHOLDER && self.table == PLACEHOLDER && self.items.is_empty()
    }
}

/// A rendered receipt, ready for the blob store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub key: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render a receipt for the given subject
///
/// Output is deterministic: the same subject always yields the same bytes.
#[instrument(skip_all, fields(order_id = %subject.order_id))]
pub fn render_receipt(subject: &ReceiptSubject) -> ReceiptResult<Receipt> {
    if subject.order_id.trim().is_empty() {
        return Err(ReceiptError::MissingOrderId);
    }

    let mut b = ReceiptBuilder::new();
    b.line("Comprovante de Pedido");
    b.field("ID", &subject.order_id);
    b.field("Cliente", &subject.customer);
    b.field("Mesa", &subject.table);
    b.field("Itens", &subject.items.join(", "));
    b.field("Status", "PROCESSADO");
    b.blank();
    b.line(TRAILER);

    Ok(Receipt {
        key: receipt_key(&subject.order_id),
        content_type: CONTENT_TYPE,
        bytes: b.build(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(receipt: &Receipt) -> String {
        String::from_utf8(receipt.bytes.clone()).unwrap()
    }

    #[test]
    fn test_render_full_order() {
        let subject = ReceiptSubject::new(
            "abc-123",
            "Joao",
            "5",
            vec!["Pizza".to_string(), "Refri".to_string()],
        );
        let receipt = render_receipt(&subject).unwrap();

        assert_eq!(receipt.key, "pedido-abc-123.pdf");
        assert_eq!(receipt.content_type, "application/pdf");
        assert_eq!(
            text_of(&receipt),
            "%PDF-1.4\n% Comprovante simulado gerado localmente\n\
             Comprovante de Pedido\n\
             ID: abc-123\n\
             Cliente: Joao\n\
             Mesa: 5\n\
             Itens: Pizza, Refri\n\
             Status: PROCESSADO\n\
             \n\
             Obrigado pela preferência!"
        );
    }

    #[test]
    fn test_render_placeholder() {
        let subject = ReceiptSubject::placeholder("missing");
        assert!(subject.is_placeholder());

        let text = text_of(&render_receipt(&subject).unwrap());
        assert!(text.contains("Cliente: -\n"));
        assert!(text.contains("Mesa: -\n"));
        assert!(text.contains("Itens: \n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let subject = ReceiptSubject::new("x", "Ana", "2", vec!["Suco".to_string()]);
        assert_eq!(
            render_receipt(&subject).unwrap(),
            render_receipt(&subject).unwrap()
        );
    }

    #[test]
    fn test_render_requires_id() {
        let subject = ReceiptSubject::placeholder("  ");
        assert_eq!(render_receipt(&subject), Err(ReceiptError::MissingOrderId));
    }
}
