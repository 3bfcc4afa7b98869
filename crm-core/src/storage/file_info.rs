//! Attachment metadata
//!
//! Size formatting, type detection and file-name sanitizing for files
//! attached to documents.

use crate::config::MAX_FILE_NAME_LENGTH;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// A file picked in the document form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: sanitize_filename(file_name),
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size as shown in the document list, e.g. "1.5 KB"
    pub fn formatted_size(&self) -> String {
        format_file_size(self.size())
    }

    /// Lower-cased extension, if the name has one
    pub fn file_type(&self) -> Option<String> {
        file_type_from_name(&self.file_name)
    }
}

/// Format a byte count with 1024-based units and up to two decimals.
///
/// Trailing zeros are dropped: 1536 formats as "1.5 KB", 1024 as "1 KB".
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Extension of a file name, lower-cased
pub fn file_type_from_name(file_name: &str) -> Option<String> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}

/// Sanitize filename to prevent path traversal attacks
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .take(MAX_FILE_NAME_LENGTH)
        .collect::<String>()
        .trim()
        .to_string()
}
