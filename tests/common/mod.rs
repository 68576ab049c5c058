#![allow(dead_code)]

use quick_xml::events::Event;
use quick_xml::Reader;
use series_highlights::config::OcrBackend;
use series_highlights::AppConfig;
use std::io::{Cursor, Read};

/// A small valid PNG to upload
pub fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
        .unwrap();
    data
}

/// Configuration pointing every remote stage at `base_url`
pub fn mocked_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.ocr.backend = OcrBackend::OcrSpace;
    config.ocr.api_key = Some("ocr-key".to_string());
    config.ocr.base_url = base_url.to_string();
    config.tmdb.api_key = Some("tmdb-key".to_string());
    config.tmdb.base_url = base_url.to_string();
    config.openai.api_key = Some("openai-key".to_string());
    config.openai.base_url = base_url.to_string();
    config
}

pub fn ocr_response(text: &str) -> String {
    serde_json::json!({
        "ParsedResults": [{ "ParsedText": text }],
        "IsErroredOnProcessing": false
    })
    .to_string()
}

pub fn chat_response(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

/// Text of every paragraph in `word/document.xml`, in order
pub fn paragraph_texts(docx: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"w:br" => {
                if let Some(p) = current.as_mut() {
                    p.push('\n');
                }
            }
            Event::Text(e) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs
}
