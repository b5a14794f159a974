//! PDF text extraction for uploaded bank statements.
//!
//! Pages are extracted independently and concatenated with a single newline
//! after each page that yields text. Pages with no extractable text contribute
//! nothing (no placeholder, no blank line), so a scanned or image-only page is
//! simply skipped.

use lopdf::Document;

use crate::types::{AppError, AppResult};

/// Extract plain text from PDF bytes, page by page.
///
/// Returns an empty string when the document parses but no page yields text
/// (image-only/scanned statements); the caller decides how to respond to that.
pub fn extract_statement_text(bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Pdf(format!("failed to parse PDF: {}", e)))?;

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut text = String::new();
    for number in page_numbers {
        let page_text = match doc.extract_text(&[number]) {
            Ok(t) => t,
            Err(e) => {
                // A page without decodable text behaves like an empty page.
                tracing::debug!(page = number, error = %e, "skipping page with no extractable text");
                continue;
            }
        };

        let content = page_text.trim();
        if content.is_empty() {
            continue;
        }
        text.push_str(content);
        text.push('\n');
    }

    Ok(text)
}

/// Hard character-count cutoff applied before prompting. Counts characters,
/// not bytes, so a multi-byte code point is never split.
pub fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build an in-memory PDF with one page per entry in `pages`, each page
    /// showing its string with a single Tj operator.
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode page content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize test PDF");
        bytes
    }

    #[test]
    fn concatenates_pages_with_newlines_and_skips_empty_pages() {
        let bytes = pdf_with_pages(&["A", "", "B"]);
        let text = extract_statement_text(&bytes).unwrap();
        assert_eq!(text, "A\nB\n");
    }

    #[test]
    fn empty_document_yields_empty_string() {
        let bytes = pdf_with_pages(&["", "   "]);
        let text = extract_statement_text(&bytes).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        let err = extract_statement_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Pdf(_)));
    }

    #[test]
    fn truncate_shortens_long_text() {
        let mut text = "a".repeat(15);
        truncate_chars(&mut text, 10);
        assert_eq!(text, "a".repeat(10));
    }

    #[test]
    fn truncate_is_a_noop_below_the_limit() {
        let mut text = String::from("short");
        truncate_chars(&mut text, 10);
        assert_eq!(text, "short");

        let mut exact = "x".repeat(10);
        truncate_chars(&mut exact, 10);
        assert_eq!(exact.chars().count(), 10);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        // 'é' is two bytes in UTF-8; cutting at a byte offset would panic.
        let mut text = "é".repeat(8);
        truncate_chars(&mut text, 5);
        assert_eq!(text, "é".repeat(5));
    }
}
