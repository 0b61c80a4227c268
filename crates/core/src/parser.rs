//! Recursive-descent parser: token stream -> Variable tree.
//!
//! ```text
//! spec      := composite | reference | literal | meta
//! composite := IDENT '(' (spec (',' spec)*)? ')'
//! reference := URN ':' NAME '(' (spec (',' spec)*)? ')'
//! literal   := STRING | LONG_LIT | alter
//! alter     := '#arg' '(' INT ',' QUOTED_STRING ')'
//! meta      := '$' '{' WORD '}'
//! ```

use crate::ast::{Mnemonic, Variable};
use crate::error::SyntaxError;
use crate::lexer::{self, Spanned, Token};
use crate::urn::Urn;

/// Nesting limit for composites and references within one spec.
pub const MAX_NESTING: usize = 128;

/// Parse spec text owned by `identity` into a Variable tree.
///
/// References in the text are recorded with `identity` as their caller.
pub fn parse(identity: &Urn, text: &str) -> Result<Variable, SyntaxError> {
    let tokens = lexer::lex(text)?;
    let mut parser = Parser::new(&tokens, identity);
    let root = parser.parse_spec()?;
    match parser.peek() {
        Token::Eof => Ok(root),
        other => Err(parser.err(format!("unexpected {} after end of spec", describe(other)))),
    }
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    identity: &'a Urn,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], identity: &'a Urn) -> Self {
        Parser {
            tokens,
            pos: 0,
            identity,
            depth: 0,
        }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn advance(&mut self) -> Token {
        let t = self.cur().token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.cur().line, msg)
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if self.peek() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!(
                "expected {}, got {}",
                describe(&expected),
                describe(self.peek())
            )))
        }
    }

    fn parse_spec(&mut self) -> Result<Variable, SyntaxError> {
        match self.peek().clone() {
            Token::Ident(type_name) => {
                self.advance();
                let children = self.parse_args()?;
                Ok(Variable::Composite {
                    type_name,
                    children,
                })
            }
            Token::Ref { owner, name } => {
                let owner: Urn = owner.parse().map_err(|e: crate::urn::UrnError| self.err(e.to_string()))?;
                self.advance();
                let overrides = self.parse_args()?;
                Ok(Variable::RefForeign {
                    caller: self.identity.clone(),
                    owner,
                    name,
                    overrides,
                })
            }
            Token::Str(value) | Token::Quoted(value) => {
                self.advance();
                Ok(Variable::Text { value })
            }
            Token::Long(n) => {
                self.advance();
                Ok(Variable::long(n))
            }
            Token::Hash => self.parse_alter(),
            Token::Dollar => self.parse_meta(),
            other => Err(self.err(format!("unexpected {}", describe(&other)))),
        }
    }

    /// `'(' (spec (',' spec)*)? ')'`
    fn parse_args(&mut self) -> Result<Vec<Variable>, SyntaxError> {
        self.expect(Token::LParen)?;
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.err(format!("nesting deeper than {} levels", MAX_NESTING)));
        }
        let mut args = Vec::new();
        if self.peek() == &Token::RParen {
            self.advance();
            self.depth -= 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_spec()?);
            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.err("unbalanced parentheses: missing ')'")),
                other => {
                    return Err(self.err(format!("expected ',' or ')', got {}", describe(other))))
                }
            }
        }
        self.depth -= 1;
        Ok(args)
    }

    /// `'#' 'arg' '(' INT ',' QUOTED_STRING ')'`
    fn parse_alter(&mut self) -> Result<Variable, SyntaxError> {
        self.expect(Token::Hash)?;
        match self.advance() {
            Token::Ident(w) if w == "arg" => {}
            other => return Err(self.err(format!("expected 'arg' after '#', got {}", describe(&other)))),
        }
        self.expect(Token::LParen)?;
        let index = match self.advance() {
            Token::Long(n) => u32::try_from(n)
                .map_err(|_| self.err(format!("argument index {} out of range", n)))?,
            other => return Err(self.err(format!("expected argument index, got {}", describe(&other)))),
        };
        self.expect(Token::Comma)?;
        let value = match self.advance() {
            Token::Str(s) | Token::Quoted(s) => s,
            other => return Err(self.err(format!("expected quoted string, got {}", describe(&other)))),
        };
        self.expect(Token::RParen)?;
        Ok(Variable::Alter { index, value })
    }

    /// `'$' '{' WORD '}'`
    fn parse_meta(&mut self) -> Result<Variable, SyntaxError> {
        self.expect(Token::Dollar)?;
        self.expect(Token::LBrace)?;
        let word = match self.advance() {
            Token::Ident(w) => w,
            other => return Err(self.err(format!("expected mnemonic, got {}", describe(&other)))),
        };
        let mnemonic: Mnemonic = word.parse().map_err(|e: String| self.err(e))?;
        self.expect(Token::RBrace)?;
        Ok(Variable::Meta { mnemonic })
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(w) => format!("identifier '{}'", w),
        Token::Ref { owner, name } => format!("reference '{}:{}'", owner, name),
        Token::Str(_) | Token::Quoted(_) => "string literal".to_owned(),
        Token::Long(n) => format!("integer {}", n),
        Token::LParen => "'('".to_owned(),
        Token::RParen => "')'".to_owned(),
        Token::LBrace => "'{'".to_owned(),
        Token::RBrace => "'}'".to_owned(),
        Token::Comma => "','".to_owned(),
        Token::Hash => "'#'".to_owned(),
        Token::Dollar => "'$'".to_owned(),
        Token::Eof => "end of input".to_owned(),
    }
}
