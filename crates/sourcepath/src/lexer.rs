//! Tokeniser for path text.

use crate::error::ParseError;

/// One lexical token of path text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A keyword, axis name, or function name.
    Ident(String),
    /// A quoted string with the quotes stripped. No escapes.
    Literal(String),
    Star,
    Slash,
    DoubleSlash,
    ColonColon,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    Dot,
    AndAnd,
    OrOr,
    EqEq,
}

impl TokenKind {
    /// Returns a short description for error messages.
    pub(crate) const fn describe(&self) -> &'static str {
        match self {
            Self::Ident(_) => "an identifier",
            Self::Literal(_) => "a quoted string",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::DoubleSlash => "'//'",
            Self::ColonColon => "'::'",
            Self::OpenBracket => "'['",
            Self::CloseBracket => "']'",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::Dot => "'.'",
            Self::AndAnd => "'&&'",
            Self::OrOr => "'||'",
            Self::EqEq => "'=='",
        }
    }
}

/// A token plus the byte offset it started at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) offset: usize,
}

const fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

const fn is_ident_continue(ch: char) -> bool {
    // '-' appears in function names such as `starts-with`.
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Splits path text into tokens, skipping whitespace.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let kind = match ch {
            ch if ch.is_whitespace() => continue,
            '*' => TokenKind::Star,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '.' => TokenKind::Dot,
            '/' => {
                if chars.next_if(|&(_, next)| next == '/').is_some() {
                    TokenKind::DoubleSlash
                } else {
                    TokenKind::Slash
                }
            }
            ':' => {
                if chars.next_if(|&(_, next)| next == ':').is_some() {
                    TokenKind::ColonColon
                } else {
                    return Err(ParseError::malformed(offset, "'::'"));
                }
            }
            '&' => {
                if chars.next_if(|&(_, next)| next == '&').is_some() {
                    TokenKind::AndAnd
                } else {
                    return Err(ParseError::malformed(offset, "'&&'"));
                }
            }
            '|' => {
                if chars.next_if(|&(_, next)| next == '|').is_some() {
                    TokenKind::OrOr
                } else {
                    return Err(ParseError::malformed(offset, "'||'"));
                }
            }
            '=' => {
                if chars.next_if(|&(_, next)| next == '=').is_some() {
                    TokenKind::EqEq
                } else {
                    return Err(ParseError::malformed(offset, "'=='"));
                }
            }
            quote @ ('\'' | '"') => {
                let mut value = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == quote {
                        closed = true;
                        break;
                    }
                    value.push(next);
                }
                if !closed {
                    return Err(ParseError::malformed(offset, "a closing quote"));
                }
                TokenKind::Literal(value)
            }
            ch if is_ident_start(ch) => {
                let mut name = String::new();
                name.push(ch);
                while let Some(&(_, next)) = chars.peek() {
                    if !is_ident_continue(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                TokenKind::Ident(name)
            }
            _ => return Err(ParseError::malformed(offset, "a path token")),
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Token, TokenKind, tokenize};
    use crate::error::ParseError;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_segments_and_operators() {
        assert_eq!(
            kinds("//if[a && b]"),
            vec![
                TokenKind::DoubleSlash,
                TokenKind::Ident("if".to_owned()),
                TokenKind::OpenBracket,
                TokenKind::Ident("a".to_owned()),
                TokenKind::AndAnd,
                TokenKind::Ident("b".to_owned()),
                TokenKind::CloseBracket,
            ]
        );
    }

    #[test]
    fn tokenizes_calls_and_literals() {
        assert_eq!(
            kinds(".starts-with('te st')"),
            vec![
                TokenKind::Dot,
                TokenKind::Ident("starts-with".to_owned()),
                TokenKind::OpenParen,
                TokenKind::Literal("te st".to_owned()),
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn both_quote_styles_delimit_literals() {
        assert_eq!(
            kinds("\"don't\""),
            vec![TokenKind::Literal("don't".to_owned())]
        );
    }

    #[test]
    fn records_byte_offsets() {
        let tokens = tokenize("a :: b").expect("tokenize");
        assert_eq!(
            tokens,
            vec![
                Token {
                    kind: TokenKind::Ident("a".to_owned()),
                    offset: 0,
                },
                Token {
                    kind: TokenKind::ColonColon,
                    offset: 2,
                },
                Token {
                    kind: TokenKind::Ident("b".to_owned()),
                    offset: 5,
                },
            ]
        );
    }

    #[rstest]
    #[case("a & b", 2, "'&&'")]
    #[case("a = b", 2, "'=='")]
    #[case("a | b", 2, "'||'")]
    #[case("a:b", 1, "'::'")]
    #[case("'open", 0, "a closing quote")]
    #[case("#", 0, "a path token")]
    fn rejects_malformed_input(
        #[case] text: &str,
        #[case] position: usize,
        #[case] expected: &str,
    ) {
        let error = tokenize(text).expect_err("should fail");
        assert_eq!(error, ParseError::malformed(position, expected));
    }
}
