//! git-config style text encoding
//!
//! Supported syntax:
//! - `[section]`, `[section "subsection"]` and the legacy `[section.subsection]`
//! - `key = value`, and a bare `key` meaning `true`
//! - `#` and `;` comments, quoted values, `\n \r \t \b \" \\` escapes
//! - backslash line continuation

use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::model::{Config, ConfigBuilder};
use crate::{Error, Result};

impl Config {
    /// Decode configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        Parser::new(text).parse()
    }

    /// Encode as configuration text. An empty config encodes as `""`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            match &section.subsection {
                Some(sub) => {
                    out.push('[');
                    out.push_str(&section.name);
                    out.push_str(" \"");
                    out.push_str(&escape_subsection(sub));
                    out.push_str("\"]\n");
                }
                None => {
                    out.push('[');
                    out.push_str(&section.name);
                    out.push_str("]\n");
                }
            }
            for entry in &section.entries {
                for value in &entry.values {
                    out.push('\t');
                    out.push_str(&entry.key);
                    if value.is_empty() {
                        out.push_str(" =\n");
                    } else {
                        out.push_str(" = ");
                        out.push_str(&escape_value(value));
                        out.push('\n');
                    }
                }
            }
        }
        out
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Config::parse(s)
    }
}

fn escape_subsection(sub: &str) -> String {
    let mut out = String::with_capacity(sub.len());
    for c in sub.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_value(value: &str) -> String {
    let needs_quotes = value.starts_with([' ', '\t'])
        || value.ends_with([' ', '\t'])
        || value.contains(['#', ';']);

    let mut out = String::with_capacity(value.len() + 2);
    if needs_quotes {
        out.push('"');
    }
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            other => out.push(other),
        }
    }
    if needs_quotes {
        out.push('"');
    }
    out
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(self.line, message)
    }

    fn parse(mut self) -> Result<Config> {
        let mut builder = ConfigBuilder::new();
        let mut current: Option<(String, Option<String>)> = None;

        while let Some(&c) = self.chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' | ';' => self.skip_line(),
                '[' => {
                    self.bump();
                    let (name, sub) = self.parse_header()?;
                    builder.add_section(&name, sub.as_deref());
                    current = Some((name, sub));
                }
                c if c.is_ascii_alphabetic() => {
                    let Some((section, sub)) = current.as_ref() else {
                        return Err(self.error("key outside of any section"));
                    };
                    let key = self.parse_key();
                    let value = self.parse_assignment()?;
                    builder.push_value(section, sub.as_deref(), &key, value);
                }
                other => return Err(self.error(format!("unexpected character '{other}'"))),
            }
        }

        Ok(builder.build())
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.chars.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    fn parse_header(&mut self) -> Result<(String, Option<String>)> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error("empty section name"));
        }

        match self.chars.peek().copied() {
            Some(']') => {
                self.bump();
                match name.split_once('.') {
                    Some((section, sub)) if !section.is_empty() && !sub.is_empty() => {
                        Ok((section.to_string(), Some(sub.to_ascii_lowercase())))
                    }
                    Some(_) => Err(self.error(format!("invalid section name '{name}'"))),
                    None => Ok((name, None)),
                }
            }
            Some(' ' | '\t') => {
                self.bump();
                if name.contains('.') {
                    return Err(self.error(format!("invalid section name '{name}'")));
                }
                self.skip_blanks();
                if self.bump() != Some('"') {
                    return Err(self.error("expected '\"' before subsection name"));
                }
                let sub = self.parse_subsection()?;
                if self.bump() != Some(']') {
                    return Err(self.error("expected ']' after subsection name"));
                }
                Ok((name, Some(sub)))
            }
            _ => Err(self.error("unterminated section header")),
        }
    }

    fn parse_subsection(&mut self) -> Result<String> {
        let mut sub = String::new();
        loop {
            if matches!(self.chars.peek(), Some('\n') | None) {
                return Err(self.error("unterminated subsection name"));
            }
            match self.bump() {
                Some('"') => return Ok(sub),
                Some('\\') => match self.bump() {
                    Some('\n') | None => return Err(self.error("unterminated subsection name")),
                    Some(c) => sub.push(c),
                },
                Some(c) => sub.push(c),
                None => return Err(self.error("unterminated subsection name")),
            }
        }
    }

    fn parse_key(&mut self) -> String {
        let mut key = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '-' {
                key.push(c);
                self.bump();
            } else {
                break;
            }
        }
        key
    }

    fn parse_assignment(&mut self) -> Result<String> {
        self.skip_blanks();
        match self.chars.peek() {
            Some('=') => {
                self.bump();
                self.parse_value()
            }
            None | Some('\n') | Some('\r') => {
                self.skip_line();
                Ok("true".to_string())
            }
            Some('#') | Some(';') => {
                self.skip_line();
                Ok("true".to_string())
            }
            Some(&other) => Err(self.error(format!("unexpected character '{other}' after key"))),
        }
    }

    fn parse_value(&mut self) -> Result<String> {
        self.skip_blanks();

        let mut value = String::new();
        // Length of `value` up to the last character that must be kept;
        // unquoted trailing whitespace past it is dropped.
        let mut kept = 0;
        let mut quoted = false;

        loop {
            if quoted && self.chars.peek() == Some(&'\n') {
                return Err(self.error("newline in quoted value"));
            }
            let Some(c) = self.bump() else {
                if quoted {
                    return Err(self.error("unterminated quoted value"));
                }
                break;
            };
            match c {
                '\n' => break,
                '\r' if self.chars.peek() == Some(&'\n') => {}
                '#' | ';' if !quoted => {
                    self.skip_line();
                    break;
                }
                '"' => quoted = !quoted,
                '\\' => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('b') => '\u{8}',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('\n') => continue,
                        Some('\r') if self.chars.peek() == Some(&'\n') => {
                            self.bump();
                            continue;
                        }
                        Some(other) => {
                            return Err(self.error(format!("invalid escape '\\{other}'")));
                        }
                        None => return Err(self.error("dangling escape at end of input")),
                    };
                    value.push(escaped);
                    kept = value.len();
                }
                ' ' | '\t' if !quoted => value.push(c),
                other => {
                    value.push(other);
                    kept = value.len();
                }
            }
        }

        value.truncate(kept);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_text() {
        let config = Config::parse("").unwrap();
        assert!(config.is_empty());
        assert_eq!(config.to_text(), "");
    }

    #[test]
    fn test_parse_quoted_subsection_with_escapes() {
        let config = Config::parse("[remote \"we\\\"ird\\\\name\"]\n\turl = x\n").unwrap();
        assert_eq!(config.subsections("remote"), vec!["we\"ird\\name"]);
    }

    #[test]
    fn test_legacy_dotted_header_lowercases_subsection() {
        let config = Config::parse("[remote.Origin]\nurl = x\n").unwrap();
        assert_eq!(config.get_string("remote", Some("origin"), "url"), Some("x"));
    }

    #[test]
    fn test_bare_key_is_true() {
        let config = Config::parse("[core]\n\tbare\n").unwrap();
        assert_eq!(config.get_string("core", None, "bare"), Some("true"));
    }

    #[test]
    fn test_inline_comment_and_trailing_whitespace() {
        let config = Config::parse("[a]\n\tk = some value   # comment\n").unwrap();
        assert_eq!(config.get_string("a", None, "k"), Some("some value"));
    }

    #[test]
    fn test_quoted_value_keeps_whitespace_and_comment_chars() {
        let config = Config::parse("[a]\n\tk = \"  x ; y  \"\n").unwrap();
        assert_eq!(config.get_string("a", None, "k"), Some("  x ; y  "));
    }

    #[test]
    fn test_line_continuation() {
        let config = Config::parse("[a]\n\tk = one \\\ntwo\n").unwrap();
        assert_eq!(config.get_string("a", None, "k"), Some("one two"));
    }

    #[test]
    fn test_repeated_keys_are_multi_valued() {
        let config = Config::parse("[r]\n\tpush = a\n\tpush = b\n[r]\n\tpush = c\n").unwrap();
        assert_eq!(
            config.get_string_list("r", None, "push"),
            &["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_error_reports_line_number() {
        let err = Config::parse("[a]\n\tk = v\n[b\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "got {err:?}");
    }

    #[test]
    fn test_key_outside_section_is_rejected() {
        assert!(Config::parse("k = v\n").is_err());
    }

    #[test]
    fn test_escape_value_quotes_when_needed() {
        assert_eq!(escape_value("plain"), "plain");
        assert_eq!(escape_value(" lead"), "\" lead\"");
        assert_eq!(escape_value("a#b"), "\"a#b\"");
        assert_eq!(escape_value("a\"b\\c"), "a\\\"b\\\\c");
    }

    #[test]
    fn test_carriage_return_survives_encoding() {
        for value in ["line\r", "a\rb", "\r\n"] {
            let mut builder = ConfigBuilder::new();
            builder.set_string("core", None, "eol", value);
            let text = builder.build().to_text();
            assert!(!text.contains('\r'), "{text:?}");
            assert_eq!(
                Config::parse(&text).unwrap().get_string("core", None, "eol"),
                Some(value)
            );
        }
    }
}
