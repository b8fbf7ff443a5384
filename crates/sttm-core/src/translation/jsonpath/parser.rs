//! Path expression parser
//!
//! A small recursive descent parser for the dotted/bracketed subset of
//! JSONPath used by catalogs: `$`, `.name`, `['name']`, `["name"]`, `[index]`.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use super::error::JSONPathError;
use super::{FieldPath, Segment};

type ParseResult<T> = std::result::Result<T, JSONPathError>;

/// Path expression parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Characters with their byte offsets
    chars: Vec<(usize, char)>,
    /// Index into `chars`
    cursor: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> ParseResult<Self> {
        if input.trim().is_empty() {
            return Err(JSONPathError::parse("Empty path expression", 0, input));
        }

        Ok(Self {
            input,
            chars: input.char_indices().collect(),
            cursor: 0,
        })
    }

    /// Parse the expression into a compiled path
    pub fn parse(mut self) -> ParseResult<FieldPath> {
        self.skip_whitespace();
        self.parse_root()?;

        let mut segments = Vec::new();
        loop {
            self.skip_whitespace();
            match self.current_char() {
                None => break,
                Some('.') => segments.push(self.parse_dot_segment()?),
                Some('[') => segments.push(self.parse_bracket_segment()?),
                Some(ch) => {
                    return Err(JSONPathError::syntax(
                        "Unexpected character after segment",
                        self.position(),
                        self.input,
                        vec![".".to_string(), "[".to_string()],
                        ch.to_string(),
                    ));
                }
            }
        }

        Ok(FieldPath {
            raw: self.input.trim().to_string(),
            segments,
        })
    }

    fn parse_root(&mut self) -> ParseResult<()> {
        if self.current_char() != Some('$') {
            return Err(JSONPathError::syntax(
                "Path must start with the root marker",
                self.position(),
                self.input,
                vec!["$".to_string()],
                self.found(),
            ));
        }
        self.advance();
        Ok(())
    }

    /// Parse `.name`
    fn parse_dot_segment(&mut self) -> ParseResult<Segment> {
        self.advance(); // consume '.'

        match self.current_char() {
            Some('.') => Err(JSONPathError::unsupported("recursive descent (..)", self.input)),
            Some('*') => Err(JSONPathError::unsupported("wildcard (*)", self.input)),
            _ => {
                let start = self.position();
                let mut name = String::new();
                while let Some(ch) = self.current_char() {
                    if ch == '.' || ch == '[' || ch.is_whitespace() {
                        break;
                    }
                    name.push(ch);
                    self.advance();
                }

                if name.is_empty() {
                    return Err(JSONPathError::syntax(
                        "Expected a field name after '.'",
                        start,
                        self.input,
                        vec!["field name".to_string()],
                        self.found(),
                    ));
                }
                Ok(Segment::Key(name))
            }
        }
    }

    /// Parse `['name']`, `["name"]` or `[index]`
    fn parse_bracket_segment(&mut self) -> ParseResult<Segment> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let segment = match self.current_char() {
            Some(quote @ ('\'' | '"')) => Segment::Key(self.parse_quoted(quote)?),
            Some(ch) if ch.is_ascii_digit() => Segment::Index(self.parse_index()?),
            Some('*') => return Err(JSONPathError::unsupported("wildcard ([*])", self.input)),
            Some('?') => return Err(JSONPathError::unsupported("filter expression", self.input)),
            Some('-') => return Err(JSONPathError::unsupported("negative index", self.input)),
            Some(':') => return Err(JSONPathError::unsupported("array slice", self.input)),
            _ => {
                return Err(JSONPathError::syntax(
                    "Invalid bracket selector",
                    self.position(),
                    self.input,
                    vec!["quoted name".to_string(), "index".to_string()],
                    self.found(),
                ));
            }
        };

        self.skip_whitespace();
        match self.current_char() {
            Some(']') => {
                self.advance();
                Ok(segment)
            }
            Some(':') => Err(JSONPathError::unsupported("array slice", self.input)),
            Some(',') => Err(JSONPathError::unsupported("union selector", self.input)),
            _ => Err(JSONPathError::syntax(
                "Unclosed bracket selector",
                self.position(),
                self.input,
                vec!["]".to_string()],
                self.found(),
            )),
        }
    }

    fn parse_quoted(&mut self, quote: char) -> ParseResult<String> {
        let start = self.position();
        self.advance(); // consume opening quote

        let mut value = String::new();
        loop {
            match self.current_char() {
                None => {
                    return Err(JSONPathError::parse("Unterminated string", start, self.input));
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some(escaped) => {
                            value.push(escaped);
                            self.advance();
                        }
                        None => {
                            return Err(JSONPathError::parse(
                                "Unterminated escape sequence",
                                self.position(),
                                self.input,
                            ));
                        }
                    }
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(value);
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn parse_index(&mut self) -> ParseResult<usize> {
        let start = self.position();
        let mut digits = String::new();
        while let Some(ch) = self.current_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.advance();
        }

        digits
            .parse::<usize>()
            .map_err(|_| JSONPathError::parse(format!("Index out of range: {}", digits), start, self.input))
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.cursor).map(|(_, ch)| *ch)
    }

    fn position(&self) -> usize {
        self.chars
            .get(self.cursor)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.input.len())
    }

    fn found(&self) -> String {
        self.current_char()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "EOF".to_string())
    }

    fn advance(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseResult<FieldPath> {
        Parser::new(input)?.parse()
    }

    #[test]
    fn test_root_only() {
        let path = parse("$").unwrap();
        assert!(path.segments().is_empty());
    }

    #[test]
    fn test_dot_and_bracket_segments() {
        let path = parse("$.applicant['first name'][2].value").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("applicant".to_string()),
                Segment::Key("first name".to_string()),
                Segment::Index(2),
                Segment::Key("value".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_quote_in_bracket() {
        let path = parse(r#"$["say \"hi\""]"#).unwrap();
        assert_eq!(path.segments(), &[Segment::Key("say \"hi\"".to_string())]);
    }

    #[test]
    fn test_missing_root_is_syntax_error() {
        let err = parse("Gender").unwrap_err();
        assert!(matches!(err, JSONPathError::Syntax { position: 0, .. }));
    }

    #[test]
    fn test_empty_expression() {
        assert!(matches!(parse("  ").unwrap_err(), JSONPathError::Parse { .. }));
    }

    #[test]
    fn test_unsupported_constructs() {
        for input in ["$..name", "$.*", "$[*]", "$[?(@.a)]", "$[-1]", "$[0:2]", "$[0,1]"] {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(err, JSONPathError::Unsupported { .. }),
                "{} should be unsupported, got {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_unclosed_bracket_reports_position() {
        let err = parse("$['a'").unwrap_err();
        assert_eq!(err.position(), Some(5));
    }

    #[test]
    fn test_trailing_dot() {
        assert!(parse("$.a.").is_err());
    }
}
