/*!
 * Output encoding: plain JSON or Base64 split into bounded lines
 */

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::OutputFormat;
use crate::error::{Repo2TreeError, Result};

/// Width of one Base64 group; chunk boundaries never split a group
const GROUP: usize = 4;

/// Encoded output, one entry per output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResult {
    /// Format the lines were produced in
    pub format: OutputFormat,
    /// Output lines without separators
    pub lines: Vec<String>,
}

impl EncodingResult {
    /// Join the lines into the final output string
    pub fn into_output(self) -> String {
        self.lines.join("\n")
    }

    /// Concatenation of all lines, i.e. the full encoded payload
    pub fn payload(&self) -> String {
        self.lines.concat()
    }
}

/// Chunk size actually used for a requested line length
pub fn effective_chunk_size(chunk_size: usize) -> usize {
    chunk_size - chunk_size % GROUP
}

/// Encode the serialized document.
///
/// With [`OutputFormat::Base64`] the Base64 payload is split into lines of
/// `chunk_size` rounded down to a multiple of 4; all lines but the last have
/// exactly that length. Empty input yields a single empty line.
pub fn encode(serialized: &str, format: OutputFormat, chunk_size: usize) -> Result<EncodingResult> {
    match format {
        OutputFormat::Utf8 => Ok(EncodingResult {
            format,
            lines: vec![serialized.to_string()],
        }),
        OutputFormat::Base64 => {
            let size = effective_chunk_size(chunk_size);
            if size == 0 {
                return Err(Repo2TreeError::EncodingDegenerate { chunk_size });
            }

            let encoded = STANDARD.encode(serialized.as_bytes());
            Ok(EncodingResult {
                format,
                lines: split_chunks(&encoded, size),
            })
        }
    }
}

/// Split ASCII `text` into consecutive pieces of `size` characters
fn split_chunks(text: &str, size: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    (0..text.len())
        .step_by(size)
        .map(|start| text[start..text.len().min(start + size)].to_string())
        .collect()
}
