use super::error::{FieldIoError, ParseErrorKind};
use std::io::BufRead;
use std::str::FromStr;

/// Line-oriented tokenizer that tracks line numbers and skips blank lines.
pub(crate) struct LineReader<'r, R: BufRead> {
    reader: &'r mut R,
    line_number: usize,
    buffer: String,
}

impl<'r, R: BufRead> LineReader<'r, R> {
    pub fn new(reader: &'r mut R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn error(&self, kind: ParseErrorKind) -> FieldIoError {
        FieldIoError::Parse {
            line: self.line_number,
            kind,
        }
    }

    /// Next non-blank line, split on whitespace.
    pub fn tokens(&mut self, expected: &str) -> Result<Vec<String>, FieldIoError> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Err(self.error(ParseErrorKind::UnexpectedEof {
                    expected: expected.to_string(),
                }));
            }
            self.line_number += 1;
            let tokens: Vec<String> = self.buffer.split_whitespace().map(str::to_string).collect();
            if !tokens.is_empty() {
                return Ok(tokens);
            }
        }
    }

    /// Reads a line that must start with `keyword`; returns the remaining tokens.
    pub fn keyword(&mut self, keyword: &str) -> Result<Vec<String>, FieldIoError> {
        let mut tokens = self.tokens(keyword)?;
        if tokens[0] != keyword {
            return Err(self.error(ParseErrorKind::UnexpectedKeyword {
                expected: keyword.to_string(),
                found: tokens[0].clone(),
            }));
        }
        tokens.remove(0);
        Ok(tokens)
    }

    /// Reads a line holding exactly one value.
    pub fn value<T: FromStr>(&mut self, expected: &str) -> Result<T, FieldIoError> {
        let tokens = self.tokens(expected)?;
        if tokens.len() != 1 {
            return Err(self.error(ParseErrorKind::FieldCount {
                expected: 1,
                found: tokens.len(),
            }));
        }
        self.parse(&tokens[0])
    }

    /// Reads a labelled block: the keyword line, then one value line.
    pub fn labelled<T: FromStr>(&mut self, keyword: &str) -> Result<T, FieldIoError> {
        self.keyword(keyword)?;
        self.value(keyword)
    }

    pub fn parse<T: FromStr>(&self, token: &str) -> Result<T, FieldIoError> {
        token.parse::<T>().map_err(|_| {
            let value = token.to_string();
            if token.contains(['.', 'e', 'E']) {
                self.error(ParseErrorKind::InvalidFloat { value })
            } else {
                self.error(ParseErrorKind::InvalidInt { value })
            }
        })
    }

    pub fn parse_all<T: FromStr>(&self, tokens: &[String]) -> Result<Vec<T>, FieldIoError> {
        tokens.iter().map(|token| self.parse(token)).collect()
    }
}
