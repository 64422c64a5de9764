//! Recursive-descent CDL parser (C3).

use crate::ast::{
    Axis, CrystalForm, CrystalSystem, FormGroup, FormNode, MillerIndex, ModificationKind,
    ModificationSpec, ParseResult, TwinSpec,
};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::preprocessor::PreprocessResult;
use std::collections::HashMap;

/// Parse preprocessed CDL source into a [`ParseResult`], returning any
/// non-fatal diagnostics (§4.3's point-group/system cross-check) alongside.
pub fn parse(pre: &PreprocessResult) -> Result<(ParseResult, Vec<crate::error::Warning>)> {
    let tokens = crate::lexer::tokenize(&pre.text)?;
    let mut parser = Parser {
        tokens: &tokens,
        source: &pre.text,
        pos: 0,
        warnings: Vec::new(),
    };
    let (system, point_group, forms) = parser.parse_program()?;

    let tail_start = parser.tail_start_char();
    let (modifier, twin, modifications, phenomenon) = match tail_start {
        Some(start) => {
            let raw = pre.text[start..].to_string();
            let (twin, modifications, phenomenon) = parse_tail(&raw);
            (Some(raw), twin, modifications, phenomenon)
        }
        None => (None, None, Vec::new(), None),
    };

    let result = ParseResult {
        system,
        point_group,
        forms,
        modifier,
        phenomenon,
        twin,
        modifications,
        definitions: pre.definitions.clone(),
        doc_comments: pre.doc_comments.clone(),
    };
    Ok((result, parser.warnings))
}

struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
    warnings: Vec<crate::error::Warning>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_pos(&self) -> usize {
        self.tokens[self.pos].pos
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn describe(kind: &TokenKind) -> String {
        match kind {
            TokenKind::System(s) => format!("SYSTEM({s})"),
            TokenKind::PointGroup(s) => format!("POINT_GROUP({s})"),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::LBrace => "{".to_string(),
            TokenKind::RBrace => "}".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Pipe => "|".to_string(),
            TokenKind::At => "@".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Integer(s) => format!("INTEGER({s})"),
            TokenKind::Float(f) => format!("FLOAT({f})"),
            TokenKind::Identifier(s) => format!("IDENTIFIER({s})"),
            TokenKind::Eof => "EOF".to_string(),
        }
    }

    fn expect(&mut self, expected: &str, matches: impl Fn(&TokenKind) -> bool) -> Result<Token> {
        if matches(self.peek()) {
            Ok(self.advance().clone())
        } else {
            Err(Error::ParseError {
                expected: expected.to_string(),
                got: Self::describe(self.peek()),
                position: self.peek_pos(),
            })
        }
    }

    /// `program := SYSTEM '[' pg ']' ':' form_list ('|' tail)?`
    fn parse_program(&mut self) -> Result<(CrystalSystem, String, Vec<FormNode>)> {
        let sys_tok = self.expect("SYSTEM", |k| matches!(k, TokenKind::System(_)))?;
        let system = match &sys_tok.kind {
            TokenKind::System(s) => CrystalSystem::from_keyword(s)
                .ok_or_else(|| Error::UnknownSystem(s.clone()))?,
            _ => unreachable!(),
        };

        self.expect("[", |k| matches!(k, TokenKind::LBracket))?;
        let point_group = self.parse_point_group()?;
        self.expect("]", |k| matches!(k, TokenKind::RBracket))?;
        self.expect(":", |k| matches!(k, TokenKind::Colon))?;

        if !system.enumerated_point_groups().contains(&point_group.as_str()) {
            self.warnings.push(crate::error::Warning::UnknownPointGroup {
                point_group: point_group.clone(),
            });
        }

        let forms = self.parse_form_list()?;
        Ok((system, point_group, forms))
    }

    /// `pg := POINT_GROUP | IDENTIFIER`
    fn parse_point_group(&mut self) -> Result<String> {
        match self.peek().clone() {
            TokenKind::PointGroup(s) => {
                self.advance();
                Ok(s)
            }
            TokenKind::Identifier(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(Error::ParseError {
                expected: "POINT_GROUP or IDENTIFIER".to_string(),
                got: Self::describe(&other),
                position: self.peek_pos(),
            }),
        }
    }

    /// `form_list := form_or_group ('+' form_or_group)*`
    fn parse_form_list(&mut self) -> Result<Vec<FormNode>> {
        let mut nodes = vec![self.parse_form_or_group()?];
        while matches!(self.peek(), TokenKind::Plus) {
            self.advance();
            nodes.push(self.parse_form_or_group()?);
        }
        Ok(nodes)
    }

    /// `form_or_group := (IDENTIFIER ':' &('(' | '{'))? (group | form)`
    fn parse_form_or_group(&mut self) -> Result<FormNode> {
        let label = self.try_parse_label();

        let mut node = match self.peek() {
            TokenKind::LParen => self.parse_group()?,
            TokenKind::LBrace => self.parse_form()?,
            other => {
                return Err(Error::ParseError {
                    expected: "'(' or '{'".to_string(),
                    got: Self::describe(other),
                    position: self.peek_pos(),
                })
            }
        };

        if let Some(label) = label {
            match &mut node {
                FormNode::Form(f) => f.label = Some(label),
                FormNode::Group(g) => g.label = Some(label),
            }
        }
        Ok(node)
    }

    /// An `IDENTIFIER ':'` prefix, only consumed if followed by `(` or `{`.
    fn try_parse_label(&mut self) -> Option<String> {
        if let TokenKind::Identifier(name) = self.peek().clone() {
            if matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Colon)) {
                if let Some(after) = self.tokens.get(self.pos + 2) {
                    if matches!(after.kind, TokenKind::LParen | TokenKind::LBrace) {
                        self.advance();
                        self.advance();
                        return Some(name);
                    }
                }
            }
        }
        None
    }

    /// `group := '(' form_list ')' features?`
    fn parse_group(&mut self) -> Result<FormNode> {
        self.expect("(", |k| matches!(k, TokenKind::LParen))?;
        let children = self.parse_form_list()?;
        self.expect(")", |k| matches!(k, TokenKind::RParen))?;
        let features = self.try_parse_features()?;
        Ok(FormNode::Group(FormGroup {
            children,
            features,
            label: None,
        }))
    }

    /// `form := miller ('@' scale)? features?`
    fn parse_form(&mut self) -> Result<FormNode> {
        let miller = self.parse_miller()?;
        let scale = if matches!(self.peek(), TokenKind::At) {
            self.advance();
            self.parse_scale()?
        } else {
            1.0
        };
        let features = self.try_parse_features()?;
        Ok(FormNode::Form(CrystalForm {
            miller,
            scale,
            features,
            label: None,
        }))
    }

    /// `miller := '{' int_component+ (',' int_component*)* '}'`
    ///
    /// Each raw component token is digit-split per §4.3: a token with ≥2
    /// digit characters in its raw text contributes one component per
    /// digit (the sign, if any, attaches to the first).
    fn parse_miller(&mut self) -> Result<MillerIndex> {
        self.expect("{", |k| matches!(k, TokenKind::LBrace))?;
        let mut components: Vec<i32> = Vec::new();

        loop {
            match self.peek().clone() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::Integer(raw) => {
                    self.advance();
                    components.extend(split_digits(&raw));
                }
                TokenKind::PointGroup(raw) if is_signed_integer(&raw) => {
                    self.advance();
                    components.extend(split_digits(&raw));
                }
                TokenKind::RBrace => break,
                other => {
                    return Err(Error::ParseError {
                        expected: "Miller component or '}'".to_string(),
                        got: Self::describe(&other),
                        position: self.peek_pos(),
                    })
                }
            }
        }
        self.expect("}", |k| matches!(k, TokenKind::RBrace))?;

        match components.len() {
            3 => Ok(MillerIndex::hkl(components[0], components[1], components[2])),
            4 => Ok(MillerIndex::hkil(
                components[0],
                components[1],
                components[2],
                components[3],
            )),
            got => Err(Error::MillerArity { got }),
        }
    }

    /// `scale := FLOAT | INTEGER | numeric POINT_GROUP`
    fn parse_scale(&mut self) -> Result<f64> {
        match self.peek().clone() {
            TokenKind::Float(f) => {
                self.advance();
                Ok(f)
            }
            TokenKind::Integer(raw) => {
                self.advance();
                raw.parse::<f64>().map_err(|_| Error::ParseError {
                    expected: "numeric scale".to_string(),
                    got: raw,
                    position: self.peek_pos(),
                })
            }
            TokenKind::PointGroup(raw) if is_signed_integer(&raw) => {
                self.advance();
                raw.parse::<f64>().map_err(|_| Error::ParseError {
                    expected: "numeric scale".to_string(),
                    got: raw,
                    position: self.peek_pos(),
                })
            }
            other => Err(Error::ParseError {
                expected: "FLOAT, INTEGER, or numeric POINT_GROUP".to_string(),
                got: Self::describe(&other),
                position: self.peek_pos(),
            }),
        }
    }

    /// `features := '[' raw_until_matching_']' ']'`, tracking bracket depth
    /// on the token stream and slicing the original source text between the
    /// opening and closing token positions.
    fn try_parse_features(&mut self) -> Result<Option<String>> {
        if !matches!(self.peek(), TokenKind::LBracket) {
            return Ok(None);
        }
        let open_pos = self.peek_pos();
        self.advance();

        let mut depth = 1usize;
        let close_pos;
        loop {
            match self.peek() {
                TokenKind::LBracket => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        close_pos = self.peek_pos();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                TokenKind::Eof => return Err(Error::UnterminatedFeatures),
                _ => {
                    self.advance();
                }
            }
        }

        let inner = &self.source[open_pos + 1..close_pos];
        Ok(Some(inner.trim().to_string()))
    }

    /// The char index just after the top-level `|`, or `None` if there is
    /// none. We scan tokens (not tracking nesting) since a top-level `|`
    /// only ever occurs after the form list has fully closed.
    fn tail_start_char(&self) -> Option<usize> {
        self.tokens.iter().find_map(|t| match t.kind {
            TokenKind::Pipe => Some(t.pos + 1),
            _ => None,
        })
    }
}

fn is_signed_integer(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit())
}

/// Split a raw integer token's text into digit-by-digit components per
/// §4.3: a token with a single digit character contributes one component
/// (its value); a token with ≥2 digit characters splits into one component
/// per digit, the leading sign (if any) attaching to the first.
fn split_digits(raw: &str) -> Vec<i32> {
    let negative = raw.starts_with('-');
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 1 {
        return vec![raw.parse().unwrap_or(0)];
    }
    digits
        .iter()
        .enumerate()
        .map(|(idx, d)| {
            let v = d.to_digit(10).unwrap() as i32;
            if idx == 0 && negative {
                -v
            } else {
                v
            }
        })
        .collect()
}

/// Extract `twin(...)`, `elongate|flatten|scale(...)`, and
/// `phenomenon[...]` clauses from the raw modifier tail (§4.3). Uses a
/// hand-written forward scanner rather than a regex dependency, matching
/// the parser's existing hand-rolled-recursive-descent style.
fn parse_tail(
    raw: &str,
) -> (Option<TwinSpec>, Vec<ModificationSpec>, Option<String>) {
    let twin = extract_twin(raw);
    let modifications = extract_modifications(raw);
    let phenomenon = extract_phenomenon(raw);
    (twin, modifications, phenomenon)
}

fn extract_twin(raw: &str) -> Option<TwinSpec> {
    let lower = raw.to_ascii_lowercase();
    let idx = find_substr(&lower, "twin(")?;
    let open = idx + "twin(".len();
    let close_rel = raw[open..].find(')')?;
    let inner = raw[open..open + close_rel].trim();
    if inner.is_empty() || !inner.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(TwinSpec {
        law: inner.to_string(),
    })
}

fn extract_modifications(raw: &str) -> Vec<ModificationSpec> {
    let lower = raw.to_ascii_lowercase();
    let mut out = Vec::new();
    for (kind, keyword) in [
        (ModificationKind::Elongate, "elongate("),
        (ModificationKind::Flatten, "flatten("),
        (ModificationKind::Scale, "scale("),
    ] {
        let mut search_from = 0usize;
        while let Some(rel) = find_substr(&lower[search_from..], keyword) {
            let start = search_from + rel;
            let open = start + keyword.len();
            match raw[open..].find(')') {
                Some(close_rel) => {
                    let inner = &raw[open..open + close_rel];
                    if let Some(spec) = parse_modification_body(kind, inner) {
                        out.push((start, spec));
                    }
                    search_from = open + close_rel + 1;
                }
                None => break,
            }
        }
    }
    out.sort_by_key(|(pos, _)| *pos);
    out.into_iter().map(|(_, spec)| spec).collect()
}

fn parse_modification_body(kind: ModificationKind, body: &str) -> Option<ModificationSpec> {
    let (axis_part, factor_part) = body.split_once(':')?;
    let axis_char = axis_part.trim().chars().next()?;
    let axis = Axis::from_char(axis_char)?;
    let factor: f64 = factor_part.trim().parse().ok()?;
    if factor <= 0.0 {
        return None;
    }
    Some(ModificationSpec { kind, axis, factor })
}

fn extract_phenomenon(raw: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    let idx = find_substr(&lower, "phenomenon[")?;
    let open = idx + "phenomenon[".len();
    let close_rel = raw[open..].find(']')?;
    Some(raw[open..open + close_rel].to_string())
}

/// Case-sensitive substring search helper (the corpus avoids pulling in a
/// regex dependency for this kind of scan).
fn find_substr(haystack: &str, needle: &str) -> Option<usize> {
    haystack.find(needle)
}
