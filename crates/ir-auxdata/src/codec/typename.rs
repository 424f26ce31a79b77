//! Type descriptor parsing.
//!
//! A descriptor such as `mapping<UUID,sequence<Offset>>` names the codec for
//! each level of a value. Grammar:
//!
//! ```text
//! Type := Name ('<' Type (',' Type)* '>')?
//! Name := any run of characters other than '<', '>' and ','
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::TypeNameError;
use crate::limits::MAX_TYPE_DEPTH;

/// Parsed type descriptor: a codec name and the parsed subtypes it is
/// applied to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTree {
    pub name: String,
    pub subtypes: Vec<TypeTree>,
}

impl TypeTree {
    /// Creates a tree with no subtypes.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtypes: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, subtypes: Vec<TypeTree>) -> Self {
        Self {
            name: name.into(),
            subtypes,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.subtypes.is_empty()
    }
}

/// Renders the canonical descriptor, e.g. `mapping<UUID,sequence<Offset>>`.
impl fmt::Display for TypeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.subtypes.split_first() {
            write!(f, "<{}", first)?;
            for subtype in rest {
                write!(f, ",{}", subtype)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeTree {
    type Err = TypeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Name(&'a str),
    Open,
    Close,
    Comma,
}

fn tokenize(descriptor: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, c) in descriptor.char_indices() {
        let punct = match c {
            '<' => Token::Open,
            '>' => Token::Close,
            ',' => Token::Comma,
            _ => continue,
        };
        if start < i {
            tokens.push(Token::Name(&descriptor[start..i]));
        }
        tokens.push(punct);
        start = i + 1;
    }
    if start < descriptor.len() {
        tokens.push(Token::Name(&descriptor[start..]));
    }
    tokens
}

struct Parser<'a> {
    descriptor: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn error(&self) -> TypeNameError {
        TypeNameError::new(self.descriptor)
    }

    /// Parses one type; `depth` counts the brackets enclosing it.
    fn parse_type(&mut self, depth: usize) -> Result<TypeTree, TypeNameError> {
        let name = match self.next() {
            Some(Token::Name(name)) => name,
            _ => return Err(self.error()),
        };

        let mut subtypes = Vec::new();
        if self.peek() == Some(Token::Open) {
            if depth >= MAX_TYPE_DEPTH {
                return Err(self.error());
            }
            self.pos += 1;
            loop {
                subtypes.push(self.parse_type(depth + 1)?);
                match self.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::Close) => break,
                    _ => return Err(self.error()),
                }
            }
        }

        Ok(TypeTree::new(name, subtypes))
    }
}

/// Parses a type descriptor into its tree.
///
/// Fails on empty input, a subexpression that does not start with a name,
/// unbalanced brackets, nesting deeper than [`MAX_TYPE_DEPTH`], and anything
/// other than exactly one top-level type. The error always carries the full
/// `descriptor`.
pub fn parse_type(descriptor: &str) -> Result<TypeTree, TypeNameError> {
    let mut parser = Parser {
        descriptor,
        tokens: tokenize(descriptor),
        pos: 0,
    };
    let tree = parser.parse_type(0)?;
    // Trailing tokens mean a second top-level type or a stray bracket.
    if parser.pos != parser.tokens.len() {
        return Err(parser.error());
    }
    Ok(tree)
}
