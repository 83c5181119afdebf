use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub source: String,
    pub content_type: String,
    pub extra: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Raw output of the text splitter. Carries the parent document's metadata,
/// which the chunker discards when it derives [`ChunkMetadata`].
#[derive(Debug, Clone)]
pub struct Split {
    pub content: String,
    pub metadata: DocumentMetadata,
    pub index: usize,
}

/// Metadata derived per chunk. Replaces anything inherited from splitting;
/// revenue bounds are stored as floats for vector-store filter compatibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetadata {
    pub min_revenue: f64,
    pub max_revenue: f64,
    pub file_name: String,
    pub creation_date: String,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub chunk_index: usize,
}
