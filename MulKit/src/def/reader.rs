//! DEF file tokenizer

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Key reported for a line whose first token is not an integer
const INVALID_KEY: i32 = -1;

/// One meaningful line of a DEF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefRecord {
    /// 1-based line number in the source file
    pub line: usize,
    /// Parsed first token, or `-1` if it was not an integer
    pub key: i32,
    /// Remaining tokens; a `{...}` group counts as one token
    tokens: Vec<String>,
}

impl DefRecord {
    /// Parse the value token as a group of integers.
    ///
    /// `{1, 2 3}` yields `[1, 2, 3]` (bad elements are dropped), a bare
    /// integer yields a one-element group. Returns `None` if there is no
    /// value token, it does not parse, or the group is empty.
    #[must_use]
    pub fn group(&self) -> Option<Vec<i32>> {
        let token = self.tokens.first()?;

        if let Some(inner) = token.strip_prefix('{') {
            let inner = inner.strip_suffix('}').unwrap_or(inner);
            let values: Vec<i32> = inner
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .filter_map(parse_int)
                .collect();
            return (!values.is_empty()).then_some(values);
        }

        parse_int(token).map(|v| vec![v])
    }

    /// Tokens after the value token (e.g. hue columns in other DEF kinds)
    #[must_use]
    pub fn extra(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }
}

/// Streaming reader over DEF records
pub struct DefReader<R: BufRead> {
    reader: R,
    line_no: usize,
    buf: Vec<u8>,
}

impl DefReader<BufReader<File>> {
    /// Open a DEF file from disk
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> DefReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    /// Read the next meaningful record, skipping blanks and comments.
    ///
    /// Lines are decoded lossily; bytes that are not UTF-8 only spoil the
    /// token they appear in.
    pub fn next_record(&mut self) -> Result<Option<DefRecord>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = String::from_utf8_lossy(&self.buf);
            let mut tokens = tokenize(&line);
            if tokens.is_empty() {
                continue;
            }

            let key = parse_int(&tokens.remove(0)).unwrap_or(INVALID_KEY);
            return Ok(Some(DefRecord {
                line: self.line_no,
                key,
                tokens,
            }));
        }
    }
}

impl<R: BufRead> Iterator for DefReader<R> {
    type Item = Result<DefRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Split a line into tokens, dropping comments. Braced groups stay whole.
fn tokenize(line: &str) -> Vec<String> {
    let line = line.trim();
    if line.starts_with("//") {
        return Vec::new();
    }
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_group = false;

    for c in line.chars() {
        match c {
            '{' if !in_group => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                in_group = true;
                current.push(c);
            }
            '}' if in_group => {
                current.push(c);
                tokens.push(std::mem::take(&mut current));
                in_group = false;
            }
            c if c.is_whitespace() && !in_group => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Parse a decimal or `0x` hexadecimal integer
fn parse_int(s: &str) -> Option<i32> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    let value = if negative { -value } else { value };

    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(text: &str) -> Vec<DefRecord> {
        DefReader::new(text.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let recs = records("\n# header\n   \n// also a comment\n5 6\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].line, 5);
        assert_eq!(recs[0].key, 5);
        assert_eq!(recs[0].group(), Some(vec![6]));
    }

    #[test]
    fn test_non_utf8_bytes_do_not_abort() {
        let input: &[u8] = b"# caf\xe9\n5 1\n6 {2\xff, 3}\n";
        let recs = DefReader::new(input)
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].key, 5);
        assert_eq!(recs[0].group(), Some(vec![1]));
        // Only the element holding the bad byte is lost
        assert_eq!(recs[1].group(), Some(vec![3]));
    }

    #[test]
    fn test_group_separators() {
        let recs = records("10 {1, 2 3,4}\n11\t{ 7 }\n");
        assert_eq!(recs[0].group(), Some(vec![1, 2, 3, 4]));
        assert_eq!(recs[1].key, 11);
        assert_eq!(recs[1].group(), Some(vec![7]));
    }

    #[test]
    fn test_inline_comment_and_extra_tokens() {
        let recs = records("0x10 {0x20, 33} 0 # trailing hue\n");
        assert_eq!(recs[0].key, 16);
        assert_eq!(recs[0].group(), Some(vec![32, 33]));
        assert_eq!(recs[0].extra(), ["0".to_string()]);
    }

    #[test]
    fn test_bad_key_and_missing_group() {
        let recs = records("abc {1}\n7\n8 {}\n9 {x, 2}\n");
        assert_eq!(recs[0].key, -1);
        assert_eq!(recs[1].group(), None);
        assert_eq!(recs[2].group(), None);
        assert_eq!(recs[3].group(), Some(vec![2]));
    }

    #[test]
    fn test_unterminated_group() {
        let recs = records("3 {4, 5\n");
        assert_eq!(recs[0].group(), Some(vec![4, 5]));
    }

    #[test]
    fn test_parse_int_edges() {
        assert_eq!(parse_int("-12"), Some(-12));
        assert_eq!(parse_int("+3"), Some(3));
        assert_eq!(parse_int("99999999999"), None);
        assert_eq!(parse_int("0xzz"), None);
    }
}
