//! Free speech synthesis through the Google Translate voice endpoint.
//!
//! The endpoint rejects long inputs, so text is split at word boundaries
//! into short chunks and the MP3 responses are concatenated.

use super::{http_client, truncate_body, write_asset, GenerationBackend};
use crate::config_loader::Settings;
use crate::error::{AssetError, Result};
use reqwest::blocking::Client;
use std::path::Path;

const MAX_CHUNK_CHARS: usize = 100;

pub struct GttsBackend {
    client: Client,
    url: String,
    language: String,
}

impl GttsBackend {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: http_client(settings)?,
            url: settings.gtts_url.clone(),
            language: settings.tts_language.clone(),
        })
    }

    pub fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AssetError::Backend("nothing to speak".to_string()));
        }

        let mut audio = Vec::new();
        for chunk in chunks {
            tracing::debug!("gTTS request ({} chars, lang {})", chunk.chars().count(), self.language);
            let resp = self
                .client
                .get(&self.url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", self.language.as_str()),
                    ("q", chunk.as_str()),
                ])
                .send()?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(AssetError::Backend(format!(
                    "gTTS returned {}: {}",
                    status,
                    truncate_body(&body, 200)
                )));
            }
            audio.extend_from_slice(&resp.bytes()?);
        }
        Ok(audio)
    }
}

impl GenerationBackend for GttsBackend {
    fn id(&self) -> &'static str {
        "gtts"
    }

    fn generate(&self, text: &str, output: &Path) -> Result<()> {
        let audio = self.synthesize(text)?;
        write_asset(output, &audio)
    }
}

/// Greedy word packing; a single word longer than `max` is cut by characters.
fn split_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= max {
            current.push(' ');
            current.push_str(word);
        } else {
            chunks.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_split_short_text() {
        assert_eq!(split_text("حان وقت الإجابة", 100), vec!["حان وقت الإجابة"]);
        assert!(split_text("   ", 100).is_empty());
    }

    #[test]
    fn test_split_long_text() {
        let text = "aaaa bbbb cccc dddd";
        assert_eq!(split_text(text, 9), vec!["aaaa bbbb", "cccc dddd"]);
        assert_eq!(split_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        for chunk in split_text(&"كلمة ".repeat(60), MAX_CHUNK_CHARS) {
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS);
        }
    }

    #[test]
    fn test_generate_writes_mp3() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/translate_tts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("tl".into(), "ar".into()),
                Matcher::UrlEncoded("client".into(), "tw-ob".into()),
                Matcher::UrlEncoded("q".into(), "عمل جيد".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(b"ID3fake")
            .create();

        let settings = Settings {
            gtts_url: format!("{}/translate_tts", server.url()),
            ..Settings::default()
        };
        let backend = GttsBackend::from_settings(&settings).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio").join("instruction-good_job.mp3");
        backend.generate("عمل جيد", &out).unwrap();

        mock.assert();
        assert_eq!(std::fs::read(&out).unwrap(), b"ID3fake");
    }

    #[test]
    fn test_generate_reports_http_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/translate_tts")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("Too Many Requests")
            .create();

        let settings = Settings {
            gtts_url: format!("{}/translate_tts", server.url()),
            ..Settings::default()
        };
        let backend = GttsBackend::from_settings(&settings).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("item-موز.mp3");
        let err = backend.generate("موز", &out).unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(!out.exists());
    }
}
