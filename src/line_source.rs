//! Reads one JSONL file into non-empty trimmed
//! lines. A missing file is not an error. A torn trailing write (no
//! terminating newline on the last line) is dropped with a warning
//! rather than surfacing a partial record to the parser.

use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::error::{FoldError, FoldResult};

/// Per-line buffer ceiling: bounds memory against a writer that never
/// emits a newline.
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

pub fn read_lines(path: &Path) -> FoldResult<Vec<String>> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(FoldError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf: Vec<u8> = Vec::new();

    loop {
        let available = reader.fill_buf().map_err(|e| FoldError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if available.is_empty() {
            break;
        }

        let (chunk_len, terminated) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        buf.extend_from_slice(&available[..chunk_len]);
        reader.consume(chunk_len);

        if buf.len() > MAX_LINE_BYTES {
            return Err(FoldError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    ErrorKind::InvalidData,
                    "line exceeds 10MiB buffer ceiling",
                ),
            });
        }

        if terminated {
            let text = String::from_utf8_lossy(&buf).trim().to_string();
            if !text.is_empty() {
                lines.push(text);
            }
            buf.clear();
        }
    }

    if !buf.is_empty() {
        let text = String::from_utf8_lossy(&buf).trim().to_string();
        if !text.is_empty() {
            tracing::warn!(path = %path.display(), "dropping torn trailing line (no terminating newline)");
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.jsonl");
        assert_eq!(read_lines(&path).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.jsonl");
        std::fs::write(&path, "a\n\n  \nb\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn drops_torn_trailing_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.jsonl");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{{\"a\":1}}\n{{\"a\":2}}").unwrap(); // no trailing newline
        drop(f);
        assert_eq!(read_lines(&path).unwrap(), vec![r#"{"a":1}"#.to_string()]);
    }

    #[test]
    fn oversized_unterminated_line_errors_without_needing_full_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.jsonl");
        let mut f = std::fs::File::create(&path).unwrap();
        // One line past the ceiling, never terminated: the chunked
        // fill_buf/consume loop must abort once the running total
        // crosses MAX_LINE_BYTES rather than buffering the whole thing.
        let chunk = vec![b'a'; 64 * 1024];
        let mut written = 0usize;
        while written <= MAX_LINE_BYTES {
            f.write_all(&chunk).unwrap();
            written += chunk.len();
        }
        drop(f);
        assert!(read_lines(&path).is_err());
    }

    #[test]
    fn well_formed_prefix_matches_torn_read_p6() {
        let dir = tempfile::tempdir().unwrap();
        let well_formed = dir.path().join("well_formed.jsonl");
        std::fs::write(&well_formed, "{\"a\":1}\n{\"a\":2}\n").unwrap();
        let expected = read_lines(&well_formed).unwrap();

        let torn = dir.path().join("torn.jsonl");
        let mut f = std::fs::File::create(&torn).unwrap();
        write!(f, "{{\"a\":1}}\n{{\"a\":2}}\n{{\"a\":3").unwrap();
        drop(f);
        assert_eq!(read_lines(&torn).unwrap(), expected);
    }
}
