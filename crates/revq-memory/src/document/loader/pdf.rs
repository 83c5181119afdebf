use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use super::super::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata,
};

/// Loads a PDF file as one [`Document`] per page so that per-page headers
/// can be stripped downstream.
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;

            let meta = tokio::fs::metadata(&path).await?;
            if meta.len() > max_size {
                return Err(DocumentError::FileTooLarge(meta.len()));
            }

            let source = path.display().to_string();
            let path_buf = path.clone();
            let text = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text(&path_buf).map_err(|e| DocumentError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| DocumentError::Io(std::io::Error::other(e)))??;

            tracing::debug!(%source, bytes = meta.len(), "extracted pdf text");
            Ok(paginate(&text, &source))
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Split extracted text on form feeds into per-page documents. Pages that
/// extract to nothing but whitespace are dropped.
fn paginate(text: &str, source: &str) -> Vec<Document> {
    text.split('\u{c}')
        .map(|page| page.trim_matches('\n'))
        .filter(|page| !page.trim().is_empty())
        .enumerate()
        .map(|(i, page)| Document {
            content: page.to_owned(),
            metadata: DocumentMetadata {
                source: source.to_owned(),
                content_type: "application/pdf".to_owned(),
                extra: HashMap::from([("page".to_owned(), (i + 1).to_string())]),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_splits_on_form_feed() {
        let docs = paginate("Header\nA R$ 1,00\n\u{c}Header\nB R$ 2,00\n", "f.pdf");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Header\nA R$ 1,00");
        assert_eq!(docs[1].content, "Header\nB R$ 2,00");
    }

    #[test]
    fn paginate_numbers_pages_from_one() {
        let docs = paginate("a\u{c}b\u{c}c", "f.pdf");
        let pages: Vec<_> = docs
            .iter()
            .map(|d| d.metadata.extra.get("page").unwrap().as_str())
            .collect();
        assert_eq!(pages, vec!["1", "2", "3"]);
    }

    #[test]
    fn paginate_drops_blank_pages() {
        let docs = paginate("a\u{c}\n\n\u{c}b", "f.pdf");
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn paginate_single_page() {
        let docs = paginate("only page", "f.pdf");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.source, "f.pdf");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let loader = PdfLoader::default();
        let err = loader.load(Path::new("/nonexistent/file.pdf")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; 128]).unwrap();

        let loader = PdfLoader { max_file_size: 64 };
        let err = loader.load(&path).await.unwrap_err();
        assert!(matches!(err, DocumentError::FileTooLarge(128)));
    }

    #[test]
    fn supported_extensions() {
        assert_eq!(PdfLoader::default().supported_extensions(), &["pdf"]);
    }
}
