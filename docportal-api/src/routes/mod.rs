/// API route handlers
///
/// - `health`: Health check
/// - `auth`: Login, logout, current session
/// - `subjects`: Subjects and the "download all" archive
/// - `lessons`: Lessons under a subject
/// - `documents`: Upload, serve, rename, delete

pub mod auth;
pub mod documents;
pub mod health;
pub mod lessons;
pub mod subjects;

use axum::{body::Body, http::HeaderValue};
use bytes::Bytes;

/// Chunk size for streamed file bodies
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Wraps a finished buffer in a chunked streaming body
///
/// `Bytes::slice` shares the buffer, so chunking copies nothing.
pub fn chunked_body(bytes: Bytes) -> Body {
    let chunks: Vec<Result<Bytes, std::io::Error>> = (0..bytes.len())
        .step_by(STREAM_CHUNK_SIZE)
        .map(|start| {
            let end = (start + STREAM_CHUNK_SIZE).min(bytes.len());
            Ok(bytes.slice(start..end))
        })
        .collect();

    Body::from_stream(futures::stream::iter(chunks))
}

/// Whether the browser should display the file or save it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    fn as_str(&self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }
}

/// Builds a `Content-Disposition` value
///
/// The quoted `filename` is an ASCII fallback; `filename*` carries the
/// exact UTF-8 name (RFC 6266).
pub fn content_disposition(disposition: Disposition, file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let value = if fallback == file_name {
        format!("{}; filename=\"{}\"", disposition.as_str(), fallback)
    } else {
        format!(
            "{}; filename=\"{}\"; filename*=UTF-8''{}",
            disposition.as_str(),
            fallback,
            percent_encode(file_name)
        )
    };

    // Every byte is visible ASCII at this point
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Trims a required text field; None when blank
pub(crate) fn required_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trims an optional text field; blank becomes None
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(required_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        let value = content_disposition(Disposition::Inline, "notes.pdf");
        assert_eq!(value, "inline; filename=\"notes.pdf\"");

        let value = content_disposition(Disposition::Attachment, "math_documents.zip");
        assert_eq!(value, "attachment; filename=\"math_documents.zip\"");
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let value = content_disposition(Disposition::Attachment, "say \"hi\".txt");
        let value = value.to_str().unwrap();
        assert!(value.starts_with("attachment; filename=\"say _hi_.txt\""));
        assert!(value.ends_with("filename*=UTF-8''say%20%22hi%22.txt"));
    }

    #[test]
    fn test_content_disposition_unicode() {
        let value = content_disposition(Disposition::Inline, "física.pdf");
        assert_eq!(
            value,
            "inline; filename=\"f_sica.pdf\"; filename*=UTF-8''f%C3%ADsica.pdf"
        );
    }

    #[tokio::test]
    async fn test_chunked_body_preserves_bytes() {
        let data: Vec<u8> = (0..(STREAM_CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        let body = chunked_body(Bytes::from(data.clone()));

        let collected = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(collected.as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn test_chunked_body_empty() {
        let collected = axum::body::to_bytes(chunked_body(Bytes::new()), usize::MAX).await.unwrap();
        assert!(collected.is_empty());
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(required_text("  Algebra "), Some("Algebra".to_string()));
        assert_eq!(required_text("   "), None);
        assert_eq!(optional_text(Some(" ".to_string())), None);
        assert_eq!(optional_text(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(optional_text(None), None);
    }
}
