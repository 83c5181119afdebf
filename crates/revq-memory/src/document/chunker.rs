//! Chunk metadata derivation.
//!
//! Every chunk of the normalized document gets fresh metadata computed from
//! its own content: the minimum and maximum revenue among its lines plus
//! file provenance. Metadata inherited from splitting is discarded.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::error::DocumentError;
use super::money::{CURRENCY_MARKER, parse_revenue};
use super::splitter::TextSplitter;
use super::types::{Chunk, ChunkMetadata, Document};

/// Split `document` and derive [`ChunkMetadata`] for every resulting chunk.
///
/// # Errors
///
/// - [`DocumentError::MetadataDerivation`] when a marked line inside a chunk
///   fails monetary parsing.
/// - [`DocumentError::EmptyChunk`] when a chunk contains no monetary values.
pub fn derive_chunks(
    document: &Document,
    splitter: &TextSplitter,
    file_name: &str,
    ingested_at: &str,
) -> Result<Vec<Chunk>, DocumentError> {
    let splits = splitter.split(document);
    let mut chunks = Vec::with_capacity(splits.len());

    for split in splits {
        let mut min: Option<Decimal> = None;
        let mut max: Option<Decimal> = None;

        for line in split.content.lines() {
            if !line.contains(CURRENCY_MARKER) {
                continue;
            }
            let value = parse_revenue(line).map_err(|source| {
                DocumentError::MetadataDerivation {
                    chunk_index: split.index,
                    source,
                }
            })?;
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
        }

        let (Some(min), Some(max)) = (min, max) else {
            return Err(DocumentError::EmptyChunk {
                chunk_index: split.index,
            });
        };

        chunks.push(Chunk {
            content: split.content,
            metadata: ChunkMetadata {
                min_revenue: min.to_f64().unwrap_or_default(),
                max_revenue: max.to_f64().unwrap_or_default(),
                file_name: file_name.to_owned(),
                creation_date: ingested_at.to_owned(),
            },
            chunk_index: split.index,
        });
    }

    tracing::debug!(chunks = chunks.len(), file_name, "derived chunk metadata");
    Ok(chunks)
}
