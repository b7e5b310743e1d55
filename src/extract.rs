use std::path::Path;

use lopdf::Document;

use crate::error::Result;

/// Extract text per page, in page order. A page whose text extraction fails
/// or yields only whitespace is reported as `None` so the parser can skip it;
/// a document that cannot be loaded at all is an error.
pub fn extract_pages(path: &Path) -> Result<Vec<Option<String>>> {
    let document = Document::load(path)?;
    let mut pages = Vec::new();
    for (page_number, _object_id) in document.get_pages() {
        match document.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => pages.push(Some(text)),
            _ => pages.push(None),
        }
    }
    Ok(pages)
}
