use std::sync::Arc;
use tracing::{debug, info};

use crate::{error::ExtractError, models::RawDocument};

/// Reads the text layer of a document, one string per page in page order.
pub trait PageTextReader: Send + Sync {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// Digital-PDF reader backed by the `pdf-extract` crate.
pub struct PdfPageReader;

impl PageTextReader for PdfPageReader {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractError::DocumentParse(e.to_string()))
    }
}

/// Turns a [`RawDocument`] into one flat string.
#[derive(Clone)]
pub struct TextExtractor {
    reader: Arc<dyn PageTextReader>,
}

impl TextExtractor {
    pub fn new(reader: Arc<dyn PageTextReader>) -> Self {
        Self { reader }
    }

    pub fn pdf() -> Self {
        Self::new(Arc::new(PdfPageReader))
    }

    /// Page texts joined with no separator. A document without pages yields "".
    pub fn extract_text(&self, document: &RawDocument) -> Result<String, ExtractError> {
        let pages = self.reader.page_texts(&document.bytes)?;
        debug!(pages = pages.len(), "Read document pages");
        Ok(pages.concat())
    }

    /// Runs the parser on the blocking pool. A parser panic becomes a parse error.
    pub async fn extract_text_blocking(&self, document: RawDocument) -> Result<String, ExtractError> {
        let extractor = self.clone();
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&document))
            .await
            .map_err(|e| ExtractError::DocumentParse(format!("parser aborted: {}", e)))??;

        info!(characters = text.len(), "Extracted document text");
        Ok(text)
    }
}
