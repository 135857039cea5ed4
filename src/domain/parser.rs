//! Formula lexer and recursive-descent parser.
//!
//! Precedence, tightest first: `~ [] <>` > `&` > `|` > `->`.
//! `->` associates to the right, `&` and `|` to the left.

use tracing::{debug, instrument};

use crate::domain::error::SyntaxError;
use crate::domain::formula::Formula;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Atom(String),
    Not,
    And,
    Or,
    Implies,
    Box,
    Diamond,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    /// character offset of the first character
    position: usize,
    text: String,
}

fn is_atom_start(c: char) -> bool {
    c.is_ascii_lowercase()
}

fn is_atom_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let chs: Vec<char> = input.chars().collect();
    let n = chs.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < n {
        let c = chs[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let pair = |second: char| i + 1 < n && chs[i + 1] == second;
        let (kind, width) = match c {
            '(' => (TokenKind::LParen, 1),
            ')' => (TokenKind::RParen, 1),
            '~' | '¬' => (TokenKind::Not, 1),
            '&' | '∧' => (TokenKind::And, 1),
            '|' | '∨' => (TokenKind::Or, 1),
            '→' => (TokenKind::Implies, 1),
            '□' | '◻' => (TokenKind::Box, 1),
            '◇' | '♢' | '◊' => (TokenKind::Diamond, 1),
            '-' if pair('>') => (TokenKind::Implies, 2),
            '[' if pair(']') => (TokenKind::Box, 2),
            '<' if pair('>') => (TokenKind::Diamond, 2),
            c if is_atom_start(c) => {
                let mut j = i;
                let mut name = String::new();
                while j < n && is_atom_char(chs[j]) {
                    name.push(chs[j]);
                    j += 1;
                }
                let width = j - i;
                (TokenKind::Atom(name), width)
            }
            other => {
                return Err(SyntaxError::UnknownToken {
                    found: other.to_string(),
                    position: i,
                })
            }
        };

        tokens.push(Token {
            kind,
            position: i,
            text: chs[i..i + width].iter().collect(),
        });
        i += width;
    }

    Ok(tokens)
}

/// Nesting levels (unary operators, parentheses, `->` chains) the
/// recursive descent accepts before giving up with `TooDeep`.
pub const MAX_NESTING: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn nested(
        &mut self,
        position: usize,
        parse: impl FnOnce(&mut Self) -> Result<Formula, SyntaxError>,
    ) -> Result<Formula, SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::TooDeep {
                limit: MAX_NESTING,
                position,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn parse_implies(&mut self) -> Result<Formula, SyntaxError> {
        let left = self.parse_or()?;
        if self.at(&TokenKind::Implies) {
            let position = self.bump().map_or(0, |t| t.position);
            let right = self.nested(position, Self::parse_implies)?;
            Ok(Formula::implies(left, right))
        } else {
            Ok(left)
        }
    }

    fn parse_or(&mut self) -> Result<Formula, SyntaxError> {
        let mut left = self.parse_and()?;
        while self.at(&TokenKind::Or) {
            self.bump();
            let right = self.parse_and()?;
            left = Formula::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Formula, SyntaxError> {
        let mut left = self.parse_unary()?;
        while self.at(&TokenKind::And) {
            self.bump();
            let right = self.parse_unary()?;
            left = Formula::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Formula, SyntaxError> {
        let tok = self.bump().ok_or(SyntaxError::UnexpectedEnd)?;
        match tok.kind {
            TokenKind::Not => self.nested(tok.position, Self::parse_unary).map(Formula::not),
            TokenKind::Box => self.nested(tok.position, Self::parse_unary).map(Formula::boxed),
            TokenKind::Diamond => self
                .nested(tok.position, Self::parse_unary)
                .map(Formula::diamond),
            TokenKind::Atom(name) => Ok(Formula::Atom(name)),
            TokenKind::LParen => {
                let inner = self.nested(tok.position, Self::parse_implies)?;
                match self.bump() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    None => Err(SyntaxError::UnbalancedParen {
                        position: tok.position,
                    }),
                    Some(other) => Err(SyntaxError::UnexpectedToken {
                        found: other.text,
                        position: other.position,
                    }),
                }
            }
            TokenKind::And | TokenKind::Or | TokenKind::Implies | TokenKind::RParen => {
                Err(SyntaxError::UnexpectedToken {
                    found: tok.text,
                    position: tok.position,
                })
            }
        }
    }
}

/// Parse formula text into an AST.
///
/// Fails on empty input, unknown characters, unbalanced parentheses,
/// misplaced operators, trailing tokens after a complete expression, and
/// nesting beyond [`MAX_NESTING`].
#[instrument(level = "debug")]
pub fn parse(text: &str) -> Result<Formula, SyntaxError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(SyntaxError::Empty);
    }

    let mut parser = Parser::new(tokens);
    let formula = parser.parse_implies()?;

    if let Some(tok) = parser.peek() {
        return Err(match tok.kind {
            TokenKind::RParen => SyntaxError::UnbalancedParen {
                position: tok.position,
            },
            _ => SyntaxError::TrailingInput {
                found: tok.text.clone(),
                position: tok.position,
            },
        });
    }

    debug!("parsed: {}", formula);
    Ok(formula)
}
