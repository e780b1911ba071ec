//! Line splitting for line-delimited JSON sources

use std::io::{self, BufRead};

/// One raw line of a dataset source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLine {
    /// Decoded line without its terminator
    Text(String),
    /// Line bytes that are not valid UTF-8
    InvalidUtf8,
}

impl DatasetLine {
    /// Whether the line holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

/// Iterator over the lines of a reader, tolerant of undecodable bytes.
///
/// Only read failures of the underlying reader surface as errors.
pub struct DatasetLines<R> {
    inner: io::Split<R>,
}

impl<R: BufRead> DatasetLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: reader.split(b'\n'),
        }
    }
}

impl<R: BufRead> Iterator for DatasetLines<R> {
    type Item = io::Result<DatasetLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|chunk| {
            chunk.map(|mut bytes| {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                match String::from_utf8(bytes) {
                    Ok(text) => DatasetLine::Text(text),
                    Err(_) => DatasetLine::InvalidUtf8,
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_splits_and_strips_terminators() {
        let data = b"{\"a\":1}\r\n\n  \n\xff\xfe\n{\"b\":2}".to_vec();
        let lines: Vec<_> = DatasetLines::new(Cursor::new(data))
            .collect::<io::Result<_>>()
            .unwrap();

        assert_eq!(
            lines,
            vec![
                DatasetLine::Text("{\"a\":1}".to_string()),
                DatasetLine::Text(String::new()),
                DatasetLine::Text("  ".to_string()),
                DatasetLine::InvalidUtf8,
                DatasetLine::Text("{\"b\":2}".to_string()),
            ]
        );
        assert!(lines[1].is_blank());
        assert!(lines[2].is_blank());
        assert!(!lines[3].is_blank());
    }
}
