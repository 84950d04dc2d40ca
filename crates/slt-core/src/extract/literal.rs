//! Parser for the Python-literal fragments test firmware prints into logs.
//!
//! Logs carry payloads such as `{'ATE_CMD_UCM_ALL': set(), 'ATE_CMD_DDR_MCU_MEM': [3, 7]}`
//! or `{12: [4, 5], 19: [0, 2]}`.  The grammar accepted here is deliberately
//! small: integers, quoted strings, `True`/`False`/`None`, lists, tuples, sets,
//! dicts and the empty-set spelling `set()`.  Nothing is ever evaluated.

use std::fmt;

/// A parsed literal value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

impl Literal {
    /// Python truthiness: empty containers, `0`, `""`, `False` and `None` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Int(v) => *v != 0,
            Literal::Str(s) => !s.is_empty(),
            Literal::Bool(b) => *b,
            Literal::None => false,
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                !items.is_empty()
            }
            Literal::Dict(entries) => !entries.is_empty(),
        }
    }

    /// Every integer in the value, depth first, in source order.
    pub fn integers(&self) -> Vec<i64> {
        let mut out = Vec::new();
        self.collect_integers(&mut out);
        out
    }

    fn collect_integers(&self, out: &mut Vec<i64>) {
        match self {
            Literal::Int(v) => out.push(*v),
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                for item in items {
                    item.collect_integers(out);
                }
            }
            Literal::Dict(entries) => {
                for (k, v) in entries {
                    k.collect_integers(out);
                    v.collect_integers(out);
                }
            }
            _ => {}
        }
    }

    /// Key text used when a dict is keyed by test names.
    pub fn key_text(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Renders the value the way Python's `repr` would for the same literal.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::None => f.write_str("None"),
            Literal::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Literal::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Literal::Set(items) if items.is_empty() => f.write_str("set()"),
            Literal::Set(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Literal::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Parse a complete literal; trailing non-whitespace is an error.
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        src: input.as_bytes(),
        pos: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != parser.src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

// Nesting bound for hostile input; real payloads are at most three deep.
const MAX_DEPTH: usize = 64;

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), LiteralError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.value_at(0)
    }

    fn value_at(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'[') => {
                self.pos += 1;
                Ok(Literal::List(self.sequence(b']', depth)?))
            }
            Some(b'(') => {
                self.pos += 1;
                Ok(Literal::Tuple(self.sequence(b')', depth)?))
            }
            Some(b'{') => {
                self.pos += 1;
                self.braced(depth)
            }
            Some(b'\'') | Some(b'"') => self.string(),
            Some(c) if c == b'-' || c == b'+' || c.is_ascii_digit() => self.integer(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn sequence(&mut self, close: u8, depth: usize) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.value_at(depth + 1)?);
            if !self.eat(b',') {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn braced(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        if self.eat(b'}') {
            return Ok(Literal::Dict(Vec::new()));
        }
        let first = self.value_at(depth + 1)?;
        if self.eat(b':') {
            let mut entries = vec![(first, self.value_at(depth + 1)?)];
            while self.eat(b',') {
                if self.peek() == Some(b'}') {
                    break;
                }
                let key = self.value_at(depth + 1)?;
                self.expect(b':')?;
                entries.push((key, self.value_at(depth + 1)?));
            }
            self.expect(b'}')?;
            Ok(Literal::Dict(entries))
        } else {
            let mut items = vec![first];
            if self.eat(b',') {
                items.extend(self.sequence(b'}', depth)?);
            } else {
                self.expect(b'}')?;
            }
            Ok(Literal::Set(items))
        }
    }

    fn string(&mut self) -> Result<Literal, LiteralError> {
        let quote = self.src[self.pos];
        self.pos += 1;
        let mut out = Vec::new();
        while let Some(&c) = self.src.get(self.pos) {
            self.pos += 1;
            match c {
                b'\\' => {
                    let escaped = self
                        .src
                        .get(self.pos)
                        .copied()
                        .ok_or_else(|| self.error("unterminated escape"))?;
                    self.pos += 1;
                    out.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        other => other,
                    });
                }
                c if c == quote => {
                    return Ok(Literal::Str(String::from_utf8_lossy(&out).into_owned()));
                }
                other => out.push(other),
            }
        }
        Err(self.error("unterminated string"))
    }

    fn integer(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        if matches!(self.src.get(self.pos), Some(b'-') | Some(b'+')) {
            self.pos += 1;
        }
        while matches!(self.src.get(self.pos), Some(c) if c.is_ascii_digit() || *c == b'_') {
            self.pos += 1;
        }
        let text: String = std::str::from_utf8(&self.src[start..self.pos])
            .unwrap_or_default()
            .replace('_', "");
        text.parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| LiteralError {
                offset: start,
                message: format!("invalid integer '{text}'"),
            })
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while matches!(self.src.get(self.pos), Some(c) if c.is_ascii_alphanumeric() || *c == b'_')
        {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        match word {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            "set" => {
                self.expect(b'(')?;
                self.expect(b')')?;
                Ok(Literal::Set(Vec::new()))
            }
            _ => Err(LiteralError {
                offset: start,
                message: format!("unsupported name '{word}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_failures_by_test_dict() {
        let lit = parse_literal(
            "{'ATE_CMD_UCM_ALL': set(), 'ATE_CMD_DDR_MCU_MEM': [3, 7], 'ATE_CMD_BANK_PE_ACC': {1, 2}}",
        )
        .unwrap();
        let Literal::Dict(entries) = lit else {
            panic!("expected dict");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0.key_text(), "ATE_CMD_UCM_ALL");
        assert_eq!(entries[0].1, Literal::Set(vec![]));
        assert_eq!(
            entries[1].1,
            Literal::List(vec![Literal::Int(3), Literal::Int(7)])
        );
        assert_eq!(
            entries[2].1,
            Literal::Set(vec![Literal::Int(1), Literal::Int(2)])
        );
    }

    #[test]
    fn empty_braces_are_a_dict() {
        assert_eq!(parse_literal("{}").unwrap(), Literal::Dict(vec![]));
    }

    #[test]
    fn repr_matches_python_spelling() {
        let lit = parse_literal("{12: [4, 5], 'x': (1,), 'y': set(), 'z': None}").unwrap();
        assert_eq!(lit.to_string(), "{12: [4, 5], 'x': (1,), 'y': set(), 'z': None}");
    }

    #[test]
    fn truthiness_follows_python() {
        assert!(!parse_literal("set()").unwrap().is_truthy());
        assert!(!parse_literal("[]").unwrap().is_truthy());
        assert!(!parse_literal("0").unwrap().is_truthy());
        assert!(parse_literal("[0]").unwrap().is_truthy());
        assert!(parse_literal("3").unwrap().is_truthy());
    }

    #[test]
    fn integers_flatten_nested_coordinates() {
        let lit = parse_literal("[[1, 2], [3, 4]]").unwrap();
        assert_eq!(lit.integers(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn rejects_expressions() {
        assert!(parse_literal("__import__('os')").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("{1: 2, 3}").is_err());
        assert!(parse_literal("1 + 2").is_err());
    }

    #[test]
    fn bounded_nesting() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(parse_literal(&deep).is_err());
    }
}
