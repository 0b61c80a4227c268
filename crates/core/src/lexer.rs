use crate::error::SyntaxError;
use crate::urn::is_segment_char;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Dotted type name, or a bare word inside `${...}` / after `#`
    Ident(String),
    /// `urn:<nid>:<nss>:<unit>` -- owner URN text and unit name
    Ref { owner: String, name: String },
    /// Double-quoted string literal (escapes resolved)
    Str(String),
    /// Single-quoted string literal (escapes resolved)
    Quoted(String),
    /// Integer literal, with or without the `L` suffix
    Long(i64),
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Hash,
    Dollar,
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
}

pub fn lex(src: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];

        // Whitespace
        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
            }
            pos += 1;
            continue;
        }

        let tok_line = line;

        // String literals
        if c == '"' || c == '\'' {
            let (s, next) = lex_quoted(&chars, pos, tok_line)?;
            pos = next;
            let token = if c == '"' { Token::Str(s) } else { Token::Quoted(s) };
            tokens.push(Spanned {
                token,
                line: tok_line,
            });
            continue;
        }

        // Number
        if c.is_ascii_digit()
            || (c == '-' && pos + 1 < chars.len() && chars[pos + 1].is_ascii_digit())
        {
            let start = pos;
            if c == '-' {
                pos += 1;
            }
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            let s: String = chars[start..pos].iter().collect();
            let n: i64 = s
                .parse()
                .map_err(|_| SyntaxError::new(tok_line, format!("integer '{}' out of range", s)))?;
            if pos < chars.len() && chars[pos] == 'L' {
                pos += 1;
            }
            if pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                return Err(SyntaxError::new(
                    tok_line,
                    format!("unexpected character '{}' after integer", chars[pos]),
                ));
            }
            tokens.push(Spanned {
                token: Token::Long(n),
                line: tok_line,
            });
            continue;
        }

        // Punctuation
        let punct = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            ',' => Some(Token::Comma),
            '#' => Some(Token::Hash),
            '$' => Some(Token::Dollar),
            _ => None,
        };
        if let Some(token) = punct {
            tokens.push(Spanned {
                token,
                line: tok_line,
            });
            pos += 1;
            continue;
        }

        // Identifier or URN reference
        if c.is_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len()
                && (chars[pos].is_alphanumeric()
                    || chars[pos] == '_'
                    || chars[pos] == '$'
                    || chars[pos] == '.')
            {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();

            if word == "urn" && pos < chars.len() && chars[pos] == ':' {
                let (token, next) = lex_reference(&chars, pos, tok_line)?;
                pos = next;
                tokens.push(Spanned {
                    token,
                    line: tok_line,
                });
                continue;
            }

            if word.split('.').any(|seg| {
                !seg.chars()
                    .next()
                    .is_some_and(|f| f.is_alphabetic() || f == '_')
            }) {
                return Err(SyntaxError::new(
                    tok_line,
                    format!("invalid type name '{}'", word),
                ));
            }
            tokens.push(Spanned {
                token: Token::Ident(word),
                line: tok_line,
            });
            continue;
        }

        return Err(SyntaxError::new(
            tok_line,
            format!("unexpected character '{}'", c),
        ));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
    });
    Ok(tokens)
}

/// Lex a quoted literal starting at the opening quote; returns the
/// unescaped content and the position after the closing quote.
fn lex_quoted(chars: &[char], start: usize, line: u32) -> Result<(String, usize), SyntaxError> {
    let quote = chars[start];
    let mut pos = start + 1;
    let mut s = String::new();
    loop {
        let Some(&sc) = chars.get(pos) else {
            return Err(SyntaxError::new(line, "unterminated string literal"));
        };
        if sc == quote {
            return Ok((s, pos + 1));
        }
        match sc {
            '\\' => {
                pos += 1;
                let Some(&esc) = chars.get(pos) else {
                    return Err(SyntaxError::new(line, "unterminated escape in string"));
                };
                match esc {
                    '"' => s.push('"'),
                    '\'' => s.push('\''),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    'r' => s.push('\r'),
                    't' => s.push('\t'),
                    other => {
                        return Err(SyntaxError::new(
                            line,
                            format!("invalid escape '\\{}' in string", other),
                        ))
                    }
                }
            }
            '\n' => return Err(SyntaxError::new(line, "unterminated string literal")),
            _ => s.push(sc),
        }
        pos += 1;
    }
}

/// Lex `:<nid>:<nss>:<unit>` following the word `urn`.
fn lex_reference(chars: &[char], start: usize, line: u32) -> Result<(Token, usize), SyntaxError> {
    let mut pos = start;
    let mut segments: Vec<String> = Vec::new();
    while pos < chars.len() && chars[pos] == ':' {
        pos += 1;
        let seg_start = pos;
        while pos < chars.len() && is_segment_char(chars[pos]) {
            pos += 1;
        }
        if seg_start == pos {
            return Err(SyntaxError::new(line, "empty segment in reference"));
        }
        segments.push(chars[seg_start..pos].iter().collect());
    }
    if segments.len() != 3 {
        return Err(SyntaxError::new(
            line,
            format!(
                "reference 'urn:{}' must have the form urn:<nid>:<nss>:<unit>",
                segments.join(":")
            ),
        ));
    }
    let name = segments.pop().unwrap_or_default();
    let owner = format!("urn:{}", segments.join(":"));
    Ok((Token::Ref { owner, name }, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        lex(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn lexes_composite_with_literals() {
        assert_eq!(
            tokens("com.a.B(10L, \"x\\ny\", -3)"),
            vec![
                Token::Ident("com.a.B".into()),
                Token::LParen,
                Token::Long(10),
                Token::Comma,
                Token::Str("x\ny".into()),
                Token::Comma,
                Token::Long(-3),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_reference_with_hyphenated_unit() {
        assert_eq!(
            tokens("urn:facebook:1:some-ref-name()"),
            vec![
                Token::Ref {
                    owner: "urn:facebook:1".into(),
                    name: "some-ref-name".into()
                },
                Token::LParen,
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tracks_lines() {
        let spanned = lex("a(\n\n  1L\n)").unwrap();
        assert_eq!(spanned[2].line, 3);
        assert_eq!(spanned[3].line, 4);
    }

    #[test]
    fn rejects_unterminated_and_bad_escapes() {
        assert!(lex("\"abc").is_err());
        assert!(lex("\"a\nb\"").is_err());
        assert!(lex("\"a\\qb\"").is_err());
        assert!(lex("'open").is_err());
    }

    #[test]
    fn rejects_unknown_characters_and_overflow() {
        let err = lex("a(1L) ; b").unwrap_err();
        assert!(err.message.contains("unexpected character ';'"));
        assert!(lex("99999999999999999999").is_err());
        assert!(lex("12abc").is_err());
        assert!(lex("com..Thing").is_err());
    }

    #[test]
    fn rejects_short_reference() {
        assert!(lex("urn:facebook:1()").is_err());
    }
}
