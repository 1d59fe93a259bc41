//! Mock verse service endpoints.
//!
//! Unmatched requests get wiremock's default 404, which the client treats as
//! "verse does not exist".

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn verse_path(translation: &str, book: u32, chapter: u32, verse: u32) -> String {
    format!("/get-verse/{translation}/{book}/{chapter}/{verse}/")
}

pub fn verse_body(book: u32, chapter: u32, verse: u32, text: &str) -> serde_json::Value {
    json!({
        "pk": book * 1_000_000 + chapter * 1_000 + verse,
        "translation": "TEST",
        "book": book,
        "chapter": chapter,
        "verse": verse,
        "text": text,
    })
}

pub async fn mount_verse(
    server: &MockServer,
    translation: &str,
    book: u32,
    chapter: u32,
    verse: u32,
    text: &str,
) {
    Mock::given(method("GET"))
        .and(path(verse_path(translation, book, chapter, verse)))
        .respond_with(ResponseTemplate::new(200).set_body_json(verse_body(book, chapter, verse, text)))
        .mount(server)
        .await;
}

/// Serves verses `1..=count` of a chapter with marked-up text.
pub async fn mount_chapter(server: &MockServer, translation: &str, book: u32, chapter: u32, count: u32) {
    for verse in 1..=count {
        let text = format!("<i>Chapter {chapter}</i> verse {verse}<br/>");
        mount_verse(server, translation, book, chapter, verse, &text).await;
    }
}

/// Answers one verse with a body that is not a verse payload.
pub async fn mount_broken_verse(
    server: &MockServer,
    translation: &str,
    book: u32,
    chapter: u32,
    verse: u32,
) {
    Mock::given(method("GET"))
        .and(path(verse_path(translation, book, chapter, verse)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(server)
        .await;
}

pub async fn mount_random(server: &MockServer, translation: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/get-random-verse/{translation}/")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
