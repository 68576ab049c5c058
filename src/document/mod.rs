mod parts;

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::HighlightsError;
use crate::model::SeriesRecord;

/// File name offered for download
pub const DOCUMENT_FILENAME: &str = "highlights.docx";
/// Media type of the generated document
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Title paragraph at the top of the document
pub const DOCUMENT_TITLE: &str = "היילייטס סדרות";
pub const DATE_LABEL: &str = "תאריך עלייה:";
pub const EPISODES_LABEL: &str = "מספר פרקים:";
pub const SUMMARY_HEADING: &str = "תקציר:";
pub const SEPARATOR: &str = "----------------------------------------";

/// Colour of the premiere date line (navy)
pub const DATE_COLOR: &str = "000080";
/// Size of the premiere date line in half-points (12pt)
const DATE_SIZE: &str = "24";

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

#[derive(Debug, Default, Clone, Copy)]
struct ParagraphStyle<'a> {
    style: Option<&'a str>,
    centered: bool,
    color: Option<&'a str>,
    size: Option<&'a str>,
}

/// Render `records` into a complete `.docx` file held in memory.
///
/// One title paragraph, then a section per record in input order. No sorting,
/// merging or deduplication.
pub fn assemble(records: &[SeriesRecord]) -> Result<Vec<u8>, HighlightsError> {
    let body = document_xml(records)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let entries: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", parts::CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", parts::PACKAGE_RELS.as_bytes()),
        ("docProps/core.xml", parts::CORE_PROPERTIES.as_bytes()),
        ("word/_rels/document.xml.rels", parts::DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", parts::STYLES.as_bytes()),
        ("word/document.xml", &body),
    ];

    for (name, data) in entries {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(
        "Assembled document with {} sections ({} bytes)",
        records.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn document_xml(records: &[SeriesRecord]) -> Result<Vec<u8>, HighlightsError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    paragraph(
        &mut writer,
        ParagraphStyle {
            style: Some("Title"),
            centered: true,
            ..Default::default()
        },
        DOCUMENT_TITLE,
    )?;

    for record in records {
        section(&mut writer, record)?;
    }

    // A4 page
    writer.write_event(Event::Start(BytesStart::new("w:sectPr")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("w:pgSz").with_attributes([("w:w", "11906"), ("w:h", "16838")]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new("w:sectPr")))?;

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    Ok(writer.into_inner().into_inner())
}

fn section<W: Write>(writer: &mut Writer<W>, record: &SeriesRecord) -> std::io::Result<()> {
    let heading = |style| ParagraphStyle {
        style: Some(style),
        ..Default::default()
    };

    paragraph(writer, heading("Heading1"), &record.name)?;
    paragraph(
        writer,
        ParagraphStyle {
            color: Some(DATE_COLOR),
            size: Some(DATE_SIZE),
            ..Default::default()
        },
        &format!("{} {}", DATE_LABEL, record.first_air_date),
    )?;
    paragraph(
        writer,
        ParagraphStyle::default(),
        &format!("{} {}", EPISODES_LABEL, record.episodes),
    )?;
    paragraph(writer, heading("Heading2"), SUMMARY_HEADING)?;
    paragraph(writer, ParagraphStyle::default(), &record.summary)?;
    paragraph(writer, ParagraphStyle::default(), SEPARATOR)
}

/// Write a right-to-left paragraph with a single run
fn paragraph<W: Write>(
    writer: &mut Writer<W>,
    style: ParagraphStyle<'_>,
    text: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;

    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
    if let Some(name) = style.style {
        writer.write_event(Event::Empty(
            BytesStart::new("w:pStyle").with_attributes([("w:val", name)]),
        ))?;
    }
    writer.write_event(Event::Empty(BytesStart::new("w:bidi")))?;
    if style.centered {
        writer.write_event(Event::Empty(
            BytesStart::new("w:jc").with_attributes([("w:val", "center")]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;

    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    if let Some(color) = style.color {
        writer.write_event(Event::Empty(
            BytesStart::new("w:color").with_attributes([("w:val", color)]),
        ))?;
    }
    if let Some(size) = style.size {
        writer.write_event(Event::Empty(
            BytesStart::new("w:sz").with_attributes([("w:val", size)]),
        ))?;
        writer.write_event(Event::Empty(
            BytesStart::new("w:szCs").with_attributes([("w:val", size)]),
        ))?;
    }
    writer.write_event(Event::Empty(BytesStart::new("w:rtl")))?;
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;

    // Line breaks inside a summary become <w:br/> between text elements
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            writer.write_event(Event::Empty(BytesStart::new("w:br")))?;
        }
        writer.write_event(Event::Start(
            BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(&xml_chars(line))))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    writer.write_event(Event::End(BytesEnd::new("w:p")))
}

/// Drop characters outside the XML 1.0 `Char` production (C0 controls other
/// than tab/LF/CR, U+FFFE, U+FFFF). Word rejects documents containing them.
fn xml_chars(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EpisodeCount;
    use quick_xml::Reader;
    use std::io::Read;

    #[derive(Debug, Default)]
    struct Paragraph {
        style: Option<String>,
        color: Option<String>,
        text: String,
    }

    fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key)
            .map(|a| String::from_utf8_lossy(&a.value).into_owned())
    }

    fn paragraphs(docx: &[u8]) -> Vec<Paragraph> {
        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        let mut reader = Reader::from_str(&xml);
        let mut result = Vec::new();
        let mut current: Option<Paragraph> = None;
        let mut in_text = false;

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:p" => current = Some(Paragraph::default()),
                    b"w:t" => in_text = true,
                    _ => {}
                },
                Event::Empty(e) => {
                    if let Some(p) = current.as_mut() {
                        match e.name().as_ref() {
                            b"w:pStyle" => p.style = attr(&e, b"w:val"),
                            b"w:color" => p.color = attr(&e, b"w:val"),
                            b"w:br" => p.text.push('\n'),
                            _ => {}
                        }
                    }
                }
                Event::Text(e) if in_text => {
                    if let Some(p) = current.as_mut() {
                        p.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:p" => result.extend(current.take()),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        result
    }

    fn record(name: &str, summary: &str) -> SeriesRecord {
        SeriesRecord {
            name: name.to_string(),
            overview: summary.to_string(),
            first_air_date: "2008-01-20".to_string(),
            episodes: EpisodeCount::Count(62),
            summary: summary.to_string(),
            lookup_failure: None,
            summary_failure: None,
        }
    }

    #[test]
    fn test_empty_document_has_only_title() {
        let docx = assemble(&[]).unwrap();
        let paragraphs = paragraphs(&docx);

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].style.as_deref(), Some("Title"));
        assert_eq!(paragraphs[0].text, DOCUMENT_TITLE);
    }

    #[test]
    fn test_package_contains_required_parts() {
        let docx = assemble(&[]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing {}", part);
        }
    }

    #[test]
    fn test_section_layout() {
        let docx = assemble(&[record("Breaking Bad", "תקציר בדיקה")]).unwrap();
        let paragraphs = paragraphs(&docx);

        assert_eq!(paragraphs.len(), 7);
        assert_eq!(paragraphs[1].style.as_deref(), Some("Heading1"));
        assert_eq!(paragraphs[1].text, "Breaking Bad");
        assert_eq!(paragraphs[2].text, format!("{} 2008-01-20", DATE_LABEL));
        assert_eq!(paragraphs[2].color.as_deref(), Some(DATE_COLOR));
        assert_eq!(paragraphs[3].text, format!("{} 62", EPISODES_LABEL));
        assert!(paragraphs[3].color.is_none());
        assert_eq!(paragraphs[4].style.as_deref(), Some("Heading2"));
        assert_eq!(paragraphs[4].text, SUMMARY_HEADING);
        assert_eq!(paragraphs[5].text, "תקציר בדיקה");
        assert_eq!(paragraphs[6].text, SEPARATOR);
    }

    #[test]
    fn test_sections_follow_input_order() {
        let records = [record("Zeta", "z"), record("Alpha", "a"), record("Zeta", "z")];
        let docx = assemble(&records).unwrap();
        let headings: Vec<String> = paragraphs(&docx)
            .into_iter()
            .filter(|p| p.style.as_deref() == Some("Heading1"))
            .map(|p| p.text)
            .collect();

        assert_eq!(headings, vec!["Zeta", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_special_characters_and_line_breaks() {
        let docx = assemble(&[record("Law & Order", "line one\nline two")]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(docx.clone())).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        assert!(xml.contains("Law &amp; Order"));
        let summary = &paragraphs(&docx)[5];
        assert_eq!(summary.text, "line one\nline two");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        // Form feed is what tesseract emits at the end of a page
        let docx = assemble(&[record("Dark\u{c}", "line\u{1}one\u{FFFF}")]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(docx.clone())).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        let illegal: Vec<char> = xml
            .chars()
            .filter(|&c| {
                (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}'
            })
            .collect();
        assert!(illegal.is_empty(), "illegal XML characters: {:?}", illegal);

        let paragraphs = paragraphs(&docx);
        assert_eq!(paragraphs[1].text, "Dark");
        assert_eq!(paragraphs[5].text, "lineone");
    }

    #[test]
    fn test_xml_chars_borrows_clean_text() {
        assert!(matches!(xml_chars("Breaking Bad"), Cow::Borrowed(_)));
        assert_eq!(xml_chars("a\u{0}b\tc"), "ab\tc");
    }

    #[test]
    fn test_unknown_episode_placeholder_rendered() {
        let mut unknown = record("Fauda", "s");
        unknown.episodes = EpisodeCount::Unknown;
        let docx = assemble(&[unknown]).unwrap();

        assert_eq!(
            paragraphs(&docx)[3].text,
            format!("{} {}", EPISODES_LABEL, crate::placeholders::UNKNOWN)
        );
    }
}
