//! List-valued field parsing.
//!
//! Dataset exports encode list columns inconsistently: JSON arrays, Python-style
//! literal lists (`['Action', 'RPG']`) or bare comma-separated text. Each encoding is
//! a strategy; strategies are tried in [`ListEncoding::ORDER`] and the first one
//! that decodes the cell wins.

use serde_json::Value;

use super::cell::CellValue;

/// A way of encoding a list inside a single text cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEncoding {
    /// `["Action", "RPG"]`
    JsonArray,
    /// `['Action', 'RPG']`, `('Action',)`, `{'Action'}`
    LiteralCollection,
    /// `Action,RPG`
    CommaSeparated,
}

impl ListEncoding {
    /// Strategies in the order they are tried.
    pub const ORDER: [ListEncoding; 3] = [
        ListEncoding::JsonArray,
        ListEncoding::LiteralCollection,
        ListEncoding::CommaSeparated,
    ];

    /// Try to decode `raw` with this encoding.
    pub fn decode(self, raw: &str) -> Option<Vec<String>> {
        match self {
            ListEncoding::JsonArray => decode_json_array(raw),
            ListEncoding::LiteralCollection => LiteralParser::new(raw).parse(),
            ListEncoding::CommaSeparated => Some(raw.split(',').map(str::to_string).collect()),
        }
    }
}

/// Convert one cell into an ordered list of strings.
///
/// Missing cells yield an empty list and decoded lists are returned unchanged.
/// Text goes through the [`ListEncoding`] chain; the comma split always succeeds,
/// so this never fails.
pub fn parse_list_field(cell: CellValue) -> Vec<String> {
    match cell {
        CellValue::Missing => Vec::new(),
        CellValue::List(values) => values,
        CellValue::Text(raw) => detect_encoding(&raw)
            .map(|(_, values)| values)
            .unwrap_or_default(),
    }
}

/// Find the first encoding that decodes `raw`, returning it with the decoded values.
pub fn detect_encoding(raw: &str) -> Option<(ListEncoding, Vec<String>)> {
    ListEncoding::ORDER
        .iter()
        .find_map(|encoding| encoding.decode(raw).map(|values| (*encoding, values)))
}

/// Strict JSON array decode. Non-array JSON is not a list and is rejected.
/// Nulls are dropped; other non-string scalars keep their JSON text.
fn decode_json_array(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => Some(s),
                Value::Array(_) | Value::Object(_) => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => None,
    }
}

/// Parser for a flat Python literal list, tuple or set.
///
/// Accepts single- or double-quoted strings, numbers and `True`/`False`/`None`
/// (`None` is dropped). Nested collections and dicts are rejected.
struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn new(raw: &str) -> Self {
        Self {
            chars: raw.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Option<Vec<String>> {
        self.skip_whitespace();
        let close = match self.bump()? {
            '[' => ']',
            '(' => ')',
            '{' => '}',
            _ => return None,
        };

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek()? == close {
                self.bump();
                break;
            }

            if let Some(item) = self.parse_item()? {
                items.push(item);
            }

            self.skip_whitespace();
            match self.bump()? {
                ',' => continue,
                c if c == close => break,
                _ => return None,
            }
        }

        self.skip_whitespace();
        if self.pos == self.chars.len() {
            Some(items)
        } else {
            None
        }
    }

    /// Parse one element. `Some(None)` is a literal `None`.
    fn parse_item(&mut self) -> Option<Option<String>> {
        match self.peek()? {
            quote @ ('\'' | '"') => {
                self.bump();
                self.parse_string(quote).map(Some)
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number().map(Some),
            c if c.is_alphabetic() => match self.take_while(|c| c.is_alphanumeric() || c == '_').as_str() {
                "None" => Some(None),
                word @ ("True" | "False") => Some(Some(word.to_string())),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_string(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    c @ ('\\' | '\'' | '"') => out.push(c),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                c => out.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Option<String> {
        let token =
            self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
        let digits = token.replace('_', "");
        if digits.parse::<i64>().is_ok() || digits.parse::<f64>().is_ok() {
            Some(token)
        } else {
            None
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }
}
