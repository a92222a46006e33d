/// Zip bundling for "download all"
///
/// Builds a single zip container from a set of named byte buffers. Entry
/// names are reduced to their final path component and made unique, so the
/// archive always extracts flat into one directory.
///
/// Building is synchronous and CPU-bound; async callers should run it on a
/// blocking thread (`tokio::task::spawn_blocking`).
///
/// # Example
///
/// ```
/// use docportal_shared::archive::{build_zip, ArchiveEntry};
///
/// let entries = vec![
///     ArchiveEntry::new("notes.txt", b"hello".to_vec()),
///     ArchiveEntry::new("notes.txt", b"again".to_vec()),
/// ];
///
/// let zip = build_zip(&entries).unwrap();
/// assert_eq!(&zip.bytes[..2], b"PK");
/// assert_eq!(zip.entry_names, vec!["notes.txt", "notes (1).txt"]);
/// ```

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::document::{sanitize_file_name, Document};

/// Deflate level used for every entry
pub const COMPRESSION_LEVEL: i64 = 9;

/// Error type for archive building
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The zip writer rejected an entry or failed to finish
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing entry content failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One file to place in the archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }
}

impl From<Document> for ArchiveEntry {
    fn from(document: Document) -> Self {
        Self {
            file_name: document.file_name,
            data: document.file_data,
        }
    }
}

/// A finished archive
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    /// The zip container bytes
    pub bytes: Vec<u8>,

    /// Entry names in the order they were written
    pub entry_names: Vec<String>,
}

/// Builds a zip container from `entries`
///
/// Entries whose name is empty after sanitizing are skipped. Any error
/// aborts the whole archive.
pub fn build_zip(entries: &[ArchiveEntry]) -> Result<BuiltArchive, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut used = HashSet::new();
    let mut entry_names = Vec::with_capacity(entries.len());

    for entry in entries {
        let base = sanitize_file_name(&entry.file_name);
        if base.is_empty() {
            tracing::debug!(file_name = %entry.file_name, "Skipping archive entry without a usable name");
            continue;
        }

        let name = unique_entry_name(&base, &mut used);
        writer.start_file(name.as_str(), options)?;
        writer.write_all(&entry.data)?;
        entry_names.push(name);
    }

    let cursor = writer.finish()?;

    Ok(BuiltArchive {
        bytes: cursor.into_inner(),
        entry_names,
    })
}

/// Returns `name`, or `name (n).ext` for the first free `n`, and records it
fn unique_entry_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_lowercase()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };

    let mut n = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

/// Download name for a subject's archive
///
/// Every character outside `[A-Za-z0-9]` becomes `_` and the result is
/// lowercased, e.g. `"Intro to C++"` → `"intro_to_c___documents.zip"`.
pub fn archive_file_name(subject_name: &str) -> String {
    let slug: String = subject_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("{}_documents.zip", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_back(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut files = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            files.push((file.name().to_string(), content));
        }
        files
    }

    #[test]
    fn test_build_zip_contains_every_entry() {
        let entries = vec![
            ArchiveEntry::new("syllabus.pdf", b"%PDF-1.4 fake".to_vec()),
            ArchiveEntry::new("notes.txt", b"lecture notes".to_vec()),
        ];

        let built = build_zip(&entries).unwrap();
        let files = read_back(&built.bytes);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0], ("syllabus.pdf".to_string(), b"%PDF-1.4 fake".to_vec()));
        assert_eq!(files[1], ("notes.txt".to_string(), b"lecture notes".to_vec()));
    }

    #[test]
    fn test_build_zip_uses_deflate() {
        let entries = vec![ArchiveEntry::new("big.txt", vec![b'a'; 64 * 1024])];

        let built = build_zip(&entries).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(built.bytes.as_slice())).unwrap();
        let file = archive.by_index(0).unwrap();

        assert_eq!(file.compression(), CompressionMethod::Deflated);
        assert!(file.compressed_size() < file.size());
    }

    #[test]
    fn test_build_zip_deduplicates_names() {
        let entries = vec![
            ArchiveEntry::new("notes.pdf", b"one".to_vec()),
            ArchiveEntry::new("notes.pdf", b"two".to_vec()),
            ArchiveEntry::new("NOTES.pdf", b"three".to_vec()),
            ArchiveEntry::new("README", b"four".to_vec()),
            ArchiveEntry::new("README", b"five".to_vec()),
        ];

        let built = build_zip(&entries).unwrap();
        assert_eq!(
            built.entry_names,
            vec!["notes.pdf", "notes (1).pdf", "NOTES (2).pdf", "README", "README (1)"]
        );

        let files = read_back(&built.bytes);
        assert_eq!(files[1].1, b"two".to_vec());
        assert_eq!(files[4].1, b"five".to_vec());
    }

    #[test]
    fn test_build_zip_flattens_paths_and_skips_unnamed() {
        let entries = vec![
            ArchiveEntry::new("../../evil.sh", b"x".to_vec()),
            ArchiveEntry::new("", b"nameless".to_vec()),
            ArchiveEntry::new("..", b"dots".to_vec()),
        ];

        let built = build_zip(&entries).unwrap();
        assert_eq!(built.entry_names, vec!["evil.sh"]);
        assert_eq!(read_back(&built.bytes).len(), 1);
    }

    #[test]
    fn test_build_zip_empty_input_is_valid_archive() {
        let built = build_zip(&[]).unwrap();
        assert!(built.entry_names.is_empty());
        assert!(read_back(&built.bytes).is_empty());
    }

    #[test]
    fn test_unique_entry_name_dotfile() {
        let mut used = HashSet::new();
        assert_eq!(unique_entry_name(".env", &mut used), ".env");
        assert_eq!(unique_entry_name(".env", &mut used), ".env (1)");
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name("Mathematics"), "mathematics_documents.zip");
        assert_eq!(archive_file_name("Intro to C++"), "intro_to_c___documents.zip");
        assert_eq!(archive_file_name("Física 101"), "f_sica_101_documents.zip");
    }
}
