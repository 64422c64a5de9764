//! CDL tokenizer (C1).

use crate::error::{Error, Result};

/// The crystal-system keywords the lexer recognizes as `SYSTEM` tokens
/// (case-folded), rather than plain `IDENTIFIER`s.
const SYSTEM_KEYWORDS: &[&str] = &[
    "cubic",
    "hexagonal",
    "trigonal",
    "tetragonal",
    "orthorhombic",
    "monoclinic",
    "triclinic",
];

/// The enumerated point-group literal set (§4.1), used by the lexer's
/// point-group/number disambiguation rule.
const POINT_GROUPS: &[&str] = &[
    // cubic
    "m3m", "432", "-43m", "m3", "m-3", "23",
    // hexagonal
    "6/mmm", "6mm", "-6m2", "622", "6/m", "-6", "6",
    // trigonal
    "-3m", "3m", "32", "-3", "3",
    // tetragonal
    "4/mmm", "4mm", "-42m", "422", "4/m", "-4", "4",
    // orthorhombic
    "mmm", "mm2", "222",
    // monoclinic
    "2/m", "m", "2",
    // triclinic
    "-1", "1",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    System(String),
    PointGroup(String),
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Plus,
    Pipe,
    At,
    LParen,
    RParen,
    Integer(String),
    Float(f64),
    Identifier(String),
    Eof,
}

/// A token plus the char-index position of its first character in the
/// source text it was lexed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '/' || c == '-'
}

/// Chars eligible for the point-group disambiguation run: `[A-Za-z0-9/-]`
/// (no underscore).
fn is_pg_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '/' || c == '-'
}

/// Tokenize `text` into a stream of [`Token`]s (§4.1). `EOF` terminates the
/// stream.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '-' || is_ident_start(c) {
            if let Some((pg_text, new_i)) = try_point_group(&chars, i) {
                tokens.push(Token {
                    kind: TokenKind::PointGroup(pg_text),
                    pos: i,
                });
                i = new_i;
                continue;
            }

            if is_ident_start(c) {
                let start = i;
                let mut j = i + 1;
                while j < chars.len() && is_ident_char(chars[j]) {
                    j += 1;
                }
                let text: String = chars[start..j].iter().collect();
                let kind = if SYSTEM_KEYWORDS.contains(&text.to_ascii_lowercase().as_str()) {
                    TokenKind::System(text)
                } else {
                    TokenKind::Identifier(text)
                };
                tokens.push(Token { kind, pos: start });
                i = j;
                continue;
            }

            // Number: optional leading '-', digits, optional single '.' + digits.
            let start = i;
            let mut j = i;
            if chars[j] == '-' {
                j += 1;
            }
            let digits_start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if j == digits_start {
                return Err(Error::LexError { pos: start, char: c });
            }
            let mut is_float = false;
            if j < chars.len() && chars[j] == '.' && j + 1 < chars.len() && chars[j + 1].is_ascii_digit()
            {
                is_float = true;
                j += 1;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    j += 1;
                }
            }
            let raw: String = chars[start..j].iter().collect();
            let kind = if is_float {
                TokenKind::Float(raw.parse().map_err(|_| Error::LexError { pos: start, char: c })?)
            } else {
                TokenKind::Integer(raw)
            };
            tokens.push(Token { kind, pos: start });
            i = j;
            continue;
        }

        let single = match c {
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            '+' => Some(TokenKind::Plus),
            '|' => Some(TokenKind::Pipe),
            '@' => Some(TokenKind::At),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };

        match single {
            Some(kind) => {
                tokens.push(Token { kind, pos: i });
                i += 1;
            }
            None => return Err(Error::LexError { pos: i, char: c }),
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: chars.len(),
    });
    Ok(tokens)
}

/// Try matching a point-group literal starting at `start` (§4.1's
/// disambiguation rule). Returns the matched text and the index just past
/// it on success.
fn try_point_group(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut j = start;
    while j < chars.len() && is_pg_char(chars[j]) {
        j += 1;
    }
    if j == start {
        return None;
    }
    let run: String = chars[start..j].iter().collect();
    if POINT_GROUPS.contains(&run.as_str()) && chars.get(j) != Some(&'.') {
        Some((run, j))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_system_keyword_case_folded() {
        assert_eq!(
            kinds("Cubic"),
            vec![TokenKind::System("Cubic".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_alphabetic_point_group() {
        assert_eq!(
            kinds("m3m"),
            vec![TokenKind::PointGroup("m3m".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_numeric_point_group_vs_plain_integer() {
        // "-1" is a known point-group literal (triclinic).
        assert_eq!(
            kinds("-1"),
            vec![TokenKind::PointGroup("-1".to_string()), TokenKind::Eof]
        );
        // "-110" is not in the point-group set, so it's a plain integer.
        assert_eq!(
            kinds("-110"),
            vec![TokenKind::Integer("-110".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn point_group_not_matched_when_followed_by_dot() {
        // "1.2" must lex as a float, not POINT_GROUP("1") + ".2".
        assert_eq!(kinds("1.2"), vec![TokenKind::Float(1.2), TokenKind::Eof]);
    }

    #[test]
    fn ten_dash_ten_lexes_as_two_integer_tokens() {
        // The hexagonal 4-index idiom {10-10}: lexed as "10" then "-10",
        // later split digit-by-digit by the parser into (1,0,-1,0).
        assert_eq!(
            kinds("10-10"),
            vec![
                TokenKind::Integer("10".to_string()),
                TokenKind::Integer("-10".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_brackets_and_punctuation() {
        assert_eq!(
            kinds("[{:,+|@()}]"),
            vec![
                TokenKind::LBracket,
                TokenKind::LBrace,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Plus,
                TokenKind::Pipe,
                TokenKind::At,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::RBrace,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_character_fails() {
        assert_eq!(tokenize("~"), Err(Error::LexError { pos: 0, char: '~' }));
    }

    #[test]
    fn full_expression_tokenizes() {
        let tokens = kinds("cubic[m3m]:{100}@1 + {111}@1.2");
        assert!(tokens.contains(&TokenKind::System("cubic".to_string())));
        assert!(tokens.contains(&TokenKind::PointGroup("m3m".to_string())));
        assert!(tokens.contains(&TokenKind::Float(1.2)));
    }
}
