//! DOCX text via `docx-rs`: paragraphs become lines, run tabs and breaks are kept.

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::ExtractionError;

pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            push_paragraph(&mut text, paragraph);
            text.push('\n');
        }
    }

    Ok(text.trim_end().to_string())
}

fn push_paragraph(out: &mut String, paragraph: &Paragraph) {
    push_children(out, &paragraph.children);
}

fn push_children(out: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(out, &link.children),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};

    use docx_rs::{Docx, Run};
    use zip::{write::FileOptions, ZipArchive, ZipWriter};

    const DOCUMENT_PART: &str = "word/document.xml";

    fn build_docx(paragraphs: Vec<Paragraph>) -> Vec<u8> {
        let mut docx = Docx::new();
        for paragraph in paragraphs {
            docx = docx.add_paragraph(paragraph);
        }
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    /// Rewrites `word/document.xml` inside an existing package.
    fn rewrite_document(bytes: &[u8], edit: impl Fn(String) -> String) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let name = entry.name().to_string();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            if name == DOCUMENT_PART {
                content = edit(String::from_utf8(content).unwrap()).into_bytes();
            }
            writer.start_file(name, FileOptions::default()).unwrap();
            writer.write_all(&content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_tabs_and_breaks() {
        let bytes = build_docx(vec![
            Paragraph::new().add_run(Run::new().add_text("Senior Barista")),
            Paragraph::new()
                .add_run(Run::new().add_text("Responsibilities: "))
                .add_run(Run::new().add_text("espresso & latte art")),
            Paragraph::new().add_run(Run::new().add_text("Pay").add_tab().add_text("<negotiable>")),
        ]);

        assert_eq!(
            extract(&bytes).unwrap(),
            "Senior Barista\nResponsibilities: espresso & latte art\nPay\t<negotiable>"
        );
    }

    #[test]
    fn test_numeric_character_references_are_decoded() {
        let bytes = build_docx(vec![Paragraph::new()
            .add_run(Run::new().add_text("Cafe Lead - Barista's role"))]);
        let bytes = rewrite_document(&bytes, |xml| {
            xml.replace("Cafe Lead - Barista's role", "Caf&#233; Lead &#x2013; Barista&#8217;s role")
                .replace("Cafe Lead - Barista&apos;s role", "Caf&#233; Lead &#x2013; Barista&#8217;s role")
        });

        assert_eq!(extract(&bytes).unwrap(), "Café Lead – Barista’s role");
    }

    #[test]
    fn test_not_a_docx_fails() {
        assert!(matches!(
            extract(b"plain bytes"),
            Err(ExtractionError::Docx(_))
        ));
    }
}
