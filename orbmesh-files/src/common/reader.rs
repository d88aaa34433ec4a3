use std::io::BufRead;

use crate::ParserError;
use crate::common::types::{C2Vector, C3Vector, CColor};

/// Types that are built from a fixed number of whitespace separated tokens of one line.
pub(crate) trait Parseable<T> {
    const TOKEN_COUNT: usize;

    fn parse(tokens: &[&str], line: usize) -> Result<T, ParserError>;
}

impl Parseable<C3Vector> for C3Vector {
    const TOKEN_COUNT: usize = 3;

    fn parse(tokens: &[&str], line: usize) -> Result<C3Vector, ParserError> {
        Ok(C3Vector {
            x: parse_f32(tokens[0], line)?,
            y: parse_f32(tokens[1], line)?,
            z: parse_f32(tokens[2], line)?,
        })
    }
}

impl Parseable<C2Vector> for C2Vector {
    const TOKEN_COUNT: usize = 2;

    fn parse(tokens: &[&str], line: usize) -> Result<C2Vector, ParserError> {
        Ok(C2Vector {
            x: parse_f32(tokens[0], line)?,
            y: parse_f32(tokens[1], line)?,
        })
    }
}

impl Parseable<CColor> for CColor {
    const TOKEN_COUNT: usize = 4;

    // colors only appear in material blocks, hence the material specific error
    fn parse(tokens: &[&str], line: usize) -> Result<CColor, ParserError> {
        Ok(CColor {
            r: parse_material_f32(tokens[0], line)?,
            g: parse_material_f32(tokens[1], line)?,
            b: parse_material_f32(tokens[2], line)?,
            a: parse_material_f32(tokens[3], line)?,
        })
    }
}

pub(crate) fn parse_f32(token: &str, line: usize) -> Result<f32, ParserError> {
    token
        .parse::<f32>()
        .map_err(|_| ParserError::malformed(line, format!("{:?} is not a number", token)))
}

pub(crate) fn parse_material_f32(token: &str, line: usize) -> Result<f32, ParserError> {
    token
        .parse::<f32>()
        .map_err(|_| ParserError::InvalidMaterialValue {
            line,
            value: token.to_string(),
        })
}

pub(crate) fn parse_usize(token: &str, line: usize) -> Result<usize, ParserError> {
    token
        .parse::<usize>()
        .map_err(|_| ParserError::malformed(line, format!("{:?} is not an unsigned integer", token)))
}

/// Mesh flags are usually written in decimal, but hand written files tend to use hex.
pub(crate) fn parse_flag(token: &str, line: usize) -> Result<u32, ParserError> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => token.parse::<u32>(),
    };

    parsed.map_err(|_| ParserError::malformed(line, format!("{:?} is not a valid FLAG value", token)))
}

pub(crate) fn strip_comment(raw: &str) -> &str {
    match raw.split_once(';') {
        Some((content, _comment)) => content,
        None => raw,
    }
}

/// One line of a text mesh with the comment already stripped.
#[derive(Debug, Clone)]
pub(crate) struct Statement {
    pub line: usize,
    pub text: String,
}

impl Statement {
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// The first token, upper-cased, since keywords are case-insensitive.
    pub fn keyword(&self) -> String {
        self.text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase()
    }

    /// Everything after the keyword.
    pub fn rest(&self) -> &str {
        let trimmed = self.text.trim_start();
        match trimmed.find(char::is_whitespace) {
            Some(idx) => trimmed[idx..].trim(),
            None => "",
        }
    }

    pub fn parse<T: Parseable<T>>(&self) -> Result<T, ParserError> {
        let tokens = self.tokens();
        if tokens.len() != T::TOKEN_COUNT {
            return Err(ParserError::malformed(
                self.line,
                format!("expected {} values, found {}", T::TOKEN_COUNT, tokens.len()),
            ));
        }

        T::parse(&tokens, self.line)
    }
}

/// Hands out a text mesh line by line, keeping track of the (1-based) line number for error reporting.
pub(crate) struct LineReader<R: BufRead> {
    rdr: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(rdr: R) -> Self {
        LineReader { rdr, line: 0 }
    }

    /// The number of the line that was read last.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_line(&mut self) -> Result<Option<Statement>, ParserError> {
        let mut buf = String::new();
        if self.rdr.read_line(&mut buf)? == 0 {
            return Ok(None);
        }

        self.line += 1;
        Ok(Some(Statement {
            line: self.line,
            text: strip_comment(&buf).trim().to_string(),
        }))
    }

    /// Like [`LineReader::next_line`], but skipping lines that are blank after removing comments.
    pub fn next_statement(&mut self) -> Result<Option<Statement>, ParserError> {
        while let Some(statement) = self.next_line()? {
            if !statement.text.is_empty() {
                return Ok(Some(statement));
            }
        }

        Ok(None)
    }

    pub fn expect_statement(&mut self, expected: &str) -> Result<Statement, ParserError> {
        match self.next_statement()? {
            Some(statement) => Ok(statement),
            None => Err(ParserError::malformed(
                self.line + 1,
                format!("unexpected end of file, expected {}", expected),
            )),
        }
    }
}
