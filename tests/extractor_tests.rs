/// Tests for document text extraction
/// DOCX fixtures are built in memory through the same zip/xml path the
/// extractor reads
use rust_contract_api::errors::AppError;
use rust_contract_api::extractor::{extract_text, MIME_DOCX, MIME_PDF};
use std::io::Write;
use zip::write::SimpleFileOptions;

/// Build a minimal DOCX archive containing the given paragraphs.
fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let document_xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buf
}

#[test]
fn test_docx_text_extraction() {
    let docx = build_docx(&["SERVICE AGREEMENT", "between Acme Corp and Globex Inc."]);
    let text = extract_text(&docx, MIME_DOCX).unwrap();
    assert!(text.contains("SERVICE AGREEMENT"));
    assert!(text.contains("between Acme Corp and Globex Inc."));
    // Paragraphs become separate lines
    assert!(text.lines().count() >= 2);
}

#[test]
fn test_docx_entities_unescaped() {
    let docx = build_docx(&["Fees &amp; Expenses"]);
    let text = extract_text(&docx, MIME_DOCX).unwrap();
    assert!(text.contains("Fees & Expenses"));
}

#[test]
fn test_unsupported_mime_rejected() {
    // A PNG upload is rejected before any extraction happens
    let err = extract_text(b"\x89PNG\r\n\x1a\n", "image/png").unwrap_err();
    match err {
        AppError::UnsupportedMediaType(mime) => assert_eq!(mime, "image/png"),
        other => panic!("expected UnsupportedMediaType, got {:?}", other),
    }
}

#[test]
fn test_corrupted_pdf_rejected() {
    // Valid MIME type, unparsable bytes
    let err = extract_text(b"definitely not a pdf document", MIME_PDF).unwrap_err();
    assert!(matches!(err, AppError::DocumentParseError(_)));
}

#[test]
fn test_docx_without_document_xml_rejected() {
    // A valid zip that is not a DOCX
    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        writer
            .start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();
    }
    let err = extract_text(&buf, MIME_DOCX).unwrap_err();
    assert!(matches!(err, AppError::DocumentParseError(_)));
}

#[test]
fn test_docx_with_only_whitespace_rejected() {
    let docx = build_docx(&["   ", " "]);
    let err = extract_text(&docx, MIME_DOCX).unwrap_err();
    assert!(matches!(err, AppError::DocumentParseError(_)));
}
