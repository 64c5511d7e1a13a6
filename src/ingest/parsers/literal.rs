//! Restricted-grammar parser for the Python literal text stored in result table cells.
//!
//! Recognized forms: dicts, lists, tuples, quoted strings, integers, floats,
//! `None`/`True`/`False`, and record constructors such as
//! `Score(precision=0.5, recall=0.4, fmeasure=0.44)` or `np.float64(0.5)`.
//! Nothing is ever evaluated; a record constructor is kept as data.

use crate::error::{RagdashError, Result};

/// Nesting limit for containers and records.
const MAX_DEPTH: usize = 64;

/// A decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
    /// `Name(arg, key=value)`, with the dotted name kept verbatim.
    Record {
        name: String,
        args: Vec<Literal>,
        fields: Vec<(String, Literal)>,
    },
}

impl Literal {
    /// Numeric view: ints, floats, and single-argument numeric wrappers like `np.float64(x)`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            Literal::Record { args, fields, .. } if args.len() == 1 && fields.is_empty() => {
                args[0].as_f64()
            }
            _ => None,
        }
    }

    /// Look up a string key in a dict.
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Dict(entries) => entries.iter().find_map(|(k, v)| match k {
                Literal::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Named attribute of a record, falling back to its positional argument.
    ///
    /// `Score(0.5, 0.4, 0.44)` and `Score(fmeasure=0.44, ...)` both answer
    /// `attr("fmeasure", 2)`. Dicts answer by key and plain tuples by position.
    pub fn attr(&self, name: &str, position: usize) -> Option<&Literal> {
        match self {
            Literal::Record { args, fields, .. } => fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v)
                .or_else(|| args.get(position)),
            Literal::Dict(_) => self.get(name),
            Literal::Tuple(items) | Literal::List(items) => items.get(position),
            _ => None,
        }
    }
}

/// Parse a complete literal. Trailing non-whitespace input is an error.
pub fn parse_literal(input: &str) -> Result<Literal> {
    let mut parser = LiteralParser { input, pos: 0 };
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct LiteralParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn error(&self, message: &str) -> RagdashError {
        RagdashError::Parse(format!("{} at offset {}", message, self.pos))
    }

    fn value(&mut self, depth: usize) -> Result<Literal> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.skip_ws();
        match self.peek() {
            Some('{') => self.dict(depth),
            Some('[') => {
                self.bump();
                Ok(Literal::List(self.sequence(']', depth)?.0))
            }
            Some('(') => self.parenthesized(depth),
            Some(q @ ('\'' | '"')) => self.string(q).map(Literal::Str),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name_or_record(depth),
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Comma-separated values up to `close`; reports whether a comma was seen.
    fn sequence(&mut self, close: char, depth: usize) -> Result<(Vec<Literal>, bool)> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            if self.eat(close) {
                return Ok((items, saw_comma));
            }
            items.push(self.value(depth + 1)?);
            if self.eat(',') {
                saw_comma = true;
                continue;
            }
            self.expect(close)?;
            return Ok((items, saw_comma));
        }
    }

    fn parenthesized(&mut self, depth: usize) -> Result<Literal> {
        self.bump();
        let (mut items, saw_comma) = self.sequence(')', depth)?;
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::Tuple(items))
    }

    fn dict(&mut self, depth: usize) -> Result<Literal> {
        self.bump();
        let mut entries = Vec::new();
        loop {
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            let key = self.value(depth + 1)?;
            self.expect(':')?;
            let value = self.value(depth + 1)?;
            entries.push((key, value));
            if self.eat(',') {
                continue;
            }
            self.expect('}')?;
            return Ok(Literal::Dict(entries));
        }
    }

    fn string(&mut self, quote: char) -> Result<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Literal> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == '.' {
                is_float = true;
                self.bump();
            } else {
                break;
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text = &self.input[start..self.pos];
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Literal::Int(i));
            }
        }
        text.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| RagdashError::Parse(format!("invalid number '{}' at offset {}", text, start)))
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '.') {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn name_or_record(&mut self, depth: usize) -> Result<Literal> {
        let name = self.identifier();
        self.skip_ws();
        if self.peek() == Some('(') {
            self.bump();
            return self.record(name.to_string(), depth);
        }
        match name {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            other => Err(self.error(&format!("unsupported name '{}'", other))),
        }
    }

    fn record(&mut self, name: String, depth: usize) -> Result<Literal> {
        let mut args = Vec::new();
        let mut fields = Vec::new();
        loop {
            if self.eat(')') {
                break;
            }
            self.skip_ws();
            let checkpoint = self.pos;
            let keyword = match self.peek() {
                Some(c) if c.is_alphabetic() || c == '_' => {
                    let ident = self.identifier();
                    if self.eat('=') {
                        Some(ident.to_string())
                    } else {
                        self.pos = checkpoint;
                        None
                    }
                }
                _ => None,
            };
            let value = self.value(depth + 1)?;
            match keyword {
                Some(key) => fields.push((key, value)),
                None if fields.is_empty() => args.push(value),
                None => return Err(self.error("positional argument after keyword argument")),
            }
            if self.eat(',') {
                continue;
            }
            self.expect(')')?;
            break;
        }
        Ok(Literal::Record { name, args, fields })
    }
}
