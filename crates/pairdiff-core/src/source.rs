//! Source identities and line decomposition

use crate::error::{CompareError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One source line without its terminator
pub type Line = String;

/// How many leading bytes are inspected for NUL when sniffing binary content
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Identity of a compared source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// In-memory buffer owned by the host (may be unsaved)
    Buffer(String),
    /// Content on disk
    File(PathBuf),
}

impl SourceId {
    pub fn buffer(name: impl Into<String>) -> Self {
        SourceId::Buffer(name.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceId::File(path.into())
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceId::File(path) => Some(path),
            SourceId::Buffer(_) => None,
        }
    }

    /// Short label for tab titles and status lines
    pub fn label(&self) -> String {
        match self {
            SourceId::Buffer(name) if name.is_empty() => "untitled".to_string(),
            SourceId::Buffer(name) => name.clone(),
            SourceId::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Buffer(name) => write!(f, "[buffer] {}", name),
            SourceId::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Characters that end a line on their own; `\r\n` is handled as one break.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines on every Unicode line boundary: `\n`, `\r\n`,
/// `\r`, vertical tab, form feed, the file/group/record separators, NEL and
/// the line and paragraph separators.
///
/// A trailing terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(text[start..i].to_string());
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(text[start..].to_string());
    }
    lines
}

/// Check whether raw content looks binary (NUL in the leading bytes)
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Decode raw source bytes into lines.
///
/// Binary content is not decomposable into lines and fails with `InvalidInput`.
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_lines(bytes: &[u8]) -> Result<Vec<Line>> {
    if is_binary(bytes) {
        return Err(CompareError::invalid_input("binary content cannot be compared"));
    }
    Ok(split_lines(&String::from_utf8_lossy(bytes)))
}
