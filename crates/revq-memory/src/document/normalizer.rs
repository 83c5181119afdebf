//! Header removal, monetary validation, and global revenue sort.

use rust_decimal::Decimal;

use super::error::DocumentError;
use super::money::{CURRENCY_MARKER, parse_revenue};
use super::types::Document;

/// Reduce the loaded page documents to a single document whose lines are
/// sorted ascending by revenue.
///
/// The first line of every page is a fixed-format header and is dropped.
/// Every remaining non-blank line must carry a monetary value; validation
/// is all-or-nothing because chunk metadata derivation downstream assumes
/// total validity. The output reuses the first page's metadata.
///
/// # Errors
///
/// - [`DocumentError::EmptyInput`] when `documents` is empty.
/// - [`DocumentError::MalformedLine`] for a non-blank line without the
///   currency marker.
/// - [`DocumentError::Parse`] when a marked line fails monetary parsing.
pub fn normalize(documents: Vec<Document>) -> Result<Document, DocumentError> {
    if documents.is_empty() {
        return Err(DocumentError::EmptyInput);
    }

    let mut entries: Vec<(&str, Decimal)> = Vec::new();
    for doc in &documents {
        for line in doc.content.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            if line.contains(CURRENCY_MARKER) {
                entries.push((line, parse_revenue(line)?));
            } else {
                return Err(DocumentError::MalformedLine(line.to_owned()));
            }
        }
    }

    // Stable: lines with equal revenue keep their document order.
    entries.sort_by(|a, b| a.1.cmp(&b.1));
    let content = entries
        .iter()
        .map(|(line, _)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    tracing::debug!(
        pages = documents.len(),
        lines = entries.len(),
        "normalized revenue document"
    );

    let metadata = documents
        .into_iter()
        .next()
        .ok_or(DocumentError::EmptyInput)?
        .metadata;
    Ok(Document { content, metadata })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::types::DocumentMetadata;

    fn page(content: &str, page_number: usize) -> Document {
        Document {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source: "revenues.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                extra: HashMap::from([("page".to_owned(), page_number.to_string())]),
            },
        }
    }

    #[test]
    fn sorts_lines_ascending_by_value() {
        let docs = vec![page("Header\nA R$ 1.000,00\nB R$ 500,00", 1)];
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.content, "B R$ 500,00\nA R$ 1.000,00");
    }

    #[test]
    fn merges_pages_and_drops_every_header() {
        let docs = vec![
            page("Nome Faturamento Ano\nA R$ 3,00\nB R$ 1,00", 1),
            page("Nome Faturamento Ano\nC R$ 2,00\nD R$ 4,00", 2),
        ];
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.content, "B R$ 1,00\nC R$ 2,00\nA R$ 3,00\nD R$ 4,00");
        assert!(!doc.content.contains("Nome"));
    }

    #[test]
    fn sort_is_numeric_not_lexicographic() {
        // "900,00" > "1.000,00" as strings but not as amounts
        let docs = vec![page("Header\nA R$ 900,00\nB R$ 1.000,00", 1)];
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.content, "A R$ 900,00\nB R$ 1.000,00");
    }

    #[test]
    fn tie_keeps_original_order() {
        let docs = vec![page("Header\nFirst R$ 5,00\nSecond R$ 5,00", 1)];
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.content, "First R$ 5,00\nSecond R$ 5,00");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let docs = vec![page("Header\n\nA R$ 2,00\n   \nB R$ 1,00", 1)];
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.content, "B R$ 1,00\nA R$ 2,00");
    }

    #[test]
    fn non_monetary_line_aborts() {
        let docs = vec![page("Header\nA R$ 1,00\nEmpresa sem faturamento", 1)];
        let err = normalize(docs).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedLine(line) if line.contains("Empresa")));
    }

    #[test]
    fn unparseable_amount_aborts() {
        let docs = vec![page("Header\nC R$ abc", 1)];
        let err = normalize(docs).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = normalize(vec![]).unwrap_err();
        assert!(matches!(err, DocumentError::EmptyInput));
    }

    #[test]
    fn header_only_pages_produce_empty_document() {
        let docs = vec![page("Header", 1), page("Header", 2)];
        let doc = normalize(docs).unwrap();
        assert!(doc.content.is_empty());
    }

    #[test]
    fn reuses_first_document_metadata() {
        let docs = vec![
            page("Header\nA R$ 1,00", 1),
            page("Header\nB R$ 2,00", 7),
        ];
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.metadata.extra.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn line_count_is_pages_times_rows() {
        let docs: Vec<Document> = (0..4)
            .map(|p| page("Header\nA R$ 1,00\nB R$ 2,00\nC R$ 3,00", p + 1))
            .collect();
        let doc = normalize(docs).unwrap();
        assert_eq!(doc.content.lines().count(), 12);
    }
}
