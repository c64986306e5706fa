//! Splitting a multi-document YAML stream into individual documents.
//!
//! A separator is any line starting with `---`. Only whitespace or a `#`
//! comment may follow the marker. Documents that hold nothing but blank lines
//! and comments are dropped, so leading, trailing and doubled separators
//! never produce empty resources.

use crate::error::{Error, Result};

pub const DOCUMENT_SEPARATOR: &str = "---";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One document cut out of a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentBlock {
    /// Position among the non-empty documents of the stream, from zero.
    pub index: usize,
    /// 1-based line on which the document starts.
    pub line: usize,
    pub text: String,
}

impl DocumentBlock {
    pub fn new(index: usize, line: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            line,
            text: text.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Split `bytes` into its non-empty documents, in order.
///
/// Fails with a parse error when the input is not UTF-8 or when a separator
/// line carries content after the marker.
///
/// ```rust
/// use manifold_resource::split_documents;
///
/// let docs = split_documents(b"---\nkind: A\n---\n# nothing\n---\nkind: B\n").unwrap();
/// assert_eq!(docs.len(), 2);
/// assert_eq!(docs[1].text, "kind: B\n");
/// assert_eq!(docs[1].line, 6);
/// ```
pub fn split_documents(bytes: &[u8]) -> Result<Vec<DocumentBlock>> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Parse {
        message: format!("input is not valid UTF-8: {e}"),
    })?;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut start_line = 1;

    for (i, line) in text.split_inclusive('\n').enumerate() {
        let line_number = i + 1;
        let content = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

        if let Some(rest) = content.strip_prefix(DOCUMENT_SEPARATOR) {
            let rest = rest.trim();
            if !rest.is_empty() && !rest.starts_with('#') {
                return Err(Error::Parse {
                    message: format!(
                        "invalid document separator on line {line_number}: {content:?}"
                    ),
                });
            }
            flush(&mut blocks, &mut current, start_line);
            start_line = line_number + 1;
            continue;
        }

        current.push_str(line);
    }
    flush(&mut blocks, &mut current, start_line);

    tracing::trace!(documents = blocks.len(), "split stream");
    Ok(blocks)
}

fn flush(blocks: &mut Vec<DocumentBlock>, current: &mut String, line: usize) {
    if is_blank_document(current) {
        current.clear();
        return;
    }
    let index = blocks.len();
    blocks.push(DocumentBlock::new(index, line, std::mem::take(current)));
}

/// True if every line is blank or a comment.
fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}
