//! Named-capture pattern compiler.
//!
//! Grammar:
//!
//! - `:name` captures one segment (`[^/#?]+?`)
//! - `:name(re)` or `(re)` captures with a custom expression; unnamed
//!   captures are keyed `"0"`, `"1"`, ... in order
//! - `?`, `*`, `+` after a capture make it optional, repeated, or both
//! - `{...}` groups literal text around an optional capture
//! - `\` escapes the next character
//!
//! A `/` or `.` right before a capture belongs to it, so `/:id?` also
//! matches without the slash. The compiled expression is anchored at both
//! ends, case-insensitive, and accepts one trailing delimiter.

use crate::params::Params;
use crate::router::RouterError;

use std::fmt::Write;

use regex::Regex;

const DEFAULT_CAPTURE: &str = "[^/#?]+?";

#[derive(Debug, Clone)]
pub(crate) struct CaptureMatcher {
    regex: Regex,
    keys: Vec<Box<str>>,
}

impl CaptureMatcher {
    pub(crate) fn compile(pattern: &str) -> Result<Self, RouterError> {
        let tokens = lex(pattern)?;
        let parts = Parser { tokens, i: 0 }.parse()?;

        let mut route = String::from("(?i)^");
        let mut keys: Vec<Box<str>> = Vec::new();
        for part in &parts {
            match part {
                Part::Text(text) => route.push_str(&regex::escape(text)),
                Part::Key(key) => key.write_to(&mut route, &mut keys),
            }
        }
        route.push_str("[/#?]?$");

        let regex = Regex::new(&route)?;
        Ok(Self { regex, keys })
    }

    pub(crate) fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for (i, name) in self.keys.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.insert(&**name, m.as_str());
            }
        }
        Some(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Modifier,
    Escaped,
    Open,
    Close,
    Name,
    Pattern,
    Char,
    End,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: Kind,
    pos: usize,
    value: &'a str,
}

fn lex(src: &str) -> Result<Vec<Token<'_>>, RouterError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map(|&(p, _)| p).unwrap_or(src.len());
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        let end = byte_at(i + 1);
        let single = |kind: Kind| Token {
            kind,
            pos,
            value: &src[pos..end],
        };
        match c {
            '*' | '+' | '?' => {
                tokens.push(single(Kind::Modifier));
                i += 1;
            }
            '{' => {
                tokens.push(single(Kind::Open));
                i += 1;
            }
            '}' => {
                tokens.push(single(Kind::Close));
                i += 1;
            }
            '\\' => {
                if i + 1 >= chars.len() {
                    return Err(RouterError::invalid(pos, "dangling escape"));
                }
                tokens.push(Token {
                    kind: Kind::Escaped,
                    pos,
                    value: &src[byte_at(i + 1)..byte_at(i + 2)],
                });
                i += 2;
            }
            ':' => {
                let mut j = i + 1;
                while j < chars.len() && is_name_char(chars[j].1) {
                    j += 1;
                }
                if j == i + 1 {
                    return Err(RouterError::invalid(pos, "missing parameter name"));
                }
                tokens.push(Token {
                    kind: Kind::Name,
                    pos,
                    value: &src[byte_at(i + 1)..byte_at(j)],
                });
                i = j;
            }
            '(' => {
                let start = i + 1;
                if chars.get(start).map(|&(_, c)| c) == Some('?') {
                    return Err(RouterError::invalid(pos, "pattern cannot start with '?'"));
                }
                let mut depth = 1;
                let mut j = start;
                let mut end = None;
                while j < chars.len() {
                    match chars[j].1 {
                        '\\' => {
                            j += 2;
                            continue;
                        }
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                end = Some(j);
                                break;
                            }
                        }
                        '(' => {
                            depth += 1;
                            if chars.get(j + 1).map(|&(_, c)| c) != Some('?') {
                                return Err(RouterError::invalid(
                                    chars[j].0,
                                    "capturing groups are not allowed",
                                ));
                            }
                        }
                        _ => {}
                    }
                    j += 1;
                }
                let end = end.ok_or_else(|| RouterError::invalid(pos, "unbalanced pattern"))?;
                if end == start {
                    return Err(RouterError::invalid(pos, "missing pattern"));
                }
                tokens.push(Token {
                    kind: Kind::Pattern,
                    pos,
                    value: &src[byte_at(start)..byte_at(end)],
                });
                i = end + 1;
            }
            _ => {
                tokens.push(single(Kind::Char));
                i += 1;
            }
        }
    }

    tokens.push(Token {
        kind: Kind::End,
        pos: src.len(),
        value: "",
    });
    Ok(tokens)
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug)]
enum Part {
    Text(String),
    Key(Key),
}

#[derive(Debug)]
struct Key {
    name: String,
    prefix: String,
    suffix: String,
    pattern: String,
    modifier: &'static str,
}

impl Key {
    fn write_to(&self, route: &mut String, keys: &mut Vec<Box<str>>) {
        let prefix = regex::escape(&self.prefix);
        let suffix = regex::escape(&self.suffix);
        let pattern = &self.pattern;
        let modifier = self.modifier;
        let repeated = modifier == "+" || modifier == "*";

        // write! into a String never fails
        let _ = if pattern.is_empty() {
            write!(route, "(?:{}{}){}", prefix, suffix, modifier)
        } else {
            keys.push(self.name.as_str().into());
            if prefix.is_empty() && suffix.is_empty() {
                if repeated {
                    write!(route, "((?:{}){})", pattern, modifier)
                } else {
                    write!(route, "({}){}", pattern, modifier)
                }
            } else if repeated {
                let optional = if modifier == "*" { "?" } else { "" };
                write!(
                    route,
                    "(?:{p}((?:{re})(?:{s}{p}(?:{re}))*){s}){o}",
                    p = prefix,
                    re = pattern,
                    s = suffix,
                    o = optional
                )
            } else {
                write!(route, "(?:{}({}){}){}", prefix, pattern, suffix, modifier)
            }
        };
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    i: usize,
}

impl<'a> Parser<'a> {
    fn try_consume(&mut self, kind: Kind) -> Option<&'a str> {
        let token = self.tokens.get(self.i)?;
        if token.kind == kind {
            self.i += 1;
            Some(token.value)
        } else {
            None
        }
    }

    fn must_consume(&mut self, kind: Kind, msg: &'static str) -> Result<&'a str, RouterError> {
        match self.try_consume(kind) {
            Some(v) => Ok(v),
            None => {
                let pos = self.tokens.get(self.i).map(|t| t.pos).unwrap_or(0);
                Err(RouterError::invalid(pos, msg))
            }
        }
    }

    fn try_modifier(&mut self) -> &'static str {
        match self.try_consume(Kind::Modifier) {
            Some("?") => "?",
            Some("*") => "*",
            Some("+") => "+",
            _ => "",
        }
    }

    fn consume_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(v) = self
            .try_consume(Kind::Char)
            .or_else(|| self.try_consume(Kind::Escaped))
        {
            text.push_str(v);
        }
        text
    }

    fn parse(mut self) -> Result<Vec<Part>, RouterError> {
        let mut parts = Vec::new();
        let mut path = String::new();
        let mut next_key = 0_usize;
        let mut unnamed = || {
            next_key += 1;
            (next_key - 1).to_string()
        };

        while self.i < self.tokens.len() {
            let ch = self.try_consume(Kind::Char);
            let name = self.try_consume(Kind::Name);
            let pattern = self.try_consume(Kind::Pattern);

            if name.is_some() || pattern.is_some() {
                let mut prefix = ch.unwrap_or("");
                if prefix != "/" && prefix != "." {
                    path.push_str(prefix);
                    prefix = "";
                }
                if !path.is_empty() {
                    parts.push(Part::Text(std::mem::take(&mut path)));
                }
                parts.push(Part::Key(Key {
                    name: name.map(str::to_owned).unwrap_or_else(&mut unnamed),
                    prefix: prefix.to_owned(),
                    suffix: String::new(),
                    pattern: pattern.unwrap_or(DEFAULT_CAPTURE).to_owned(),
                    modifier: self.try_modifier(),
                }));
                continue;
            }

            if let Some(v) = ch.or_else(|| self.try_consume(Kind::Escaped)) {
                path.push_str(v);
                continue;
            }

            if !path.is_empty() {
                parts.push(Part::Text(std::mem::take(&mut path)));
            }

            if self.try_consume(Kind::Open).is_some() {
                let prefix = self.consume_text();
                let name = self.try_consume(Kind::Name);
                let pattern = self.try_consume(Kind::Pattern);
                let suffix = self.consume_text();
                self.must_consume(Kind::Close, "unclosed group")?;

                let key_name = match (name, pattern) {
                    (Some(n), _) => n.to_owned(),
                    (None, Some(_)) => unnamed(),
                    (None, None) => String::new(),
                };
                let key_pattern = match (name, pattern) {
                    (_, Some(p)) => p,
                    (Some(_), None) => DEFAULT_CAPTURE,
                    (None, None) => "",
                };
                parts.push(Part::Key(Key {
                    name: key_name,
                    prefix,
                    suffix,
                    pattern: key_pattern.to_owned(),
                    modifier: self.try_modifier(),
                }));
                continue;
            }

            self.must_consume(Kind::End, "unexpected token")?;
        }

        Ok(parts)
    }
}

#[cfg(test)]
fn caps(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let m = CaptureMatcher::compile(pattern).unwrap();
    m.captures(path).map(|p| p.into_iter().collect())
}

#[cfg(test)]
fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_owned(), v.to_owned())
}

#[test]
fn capture_named_segment() {
    assert_eq!(
        caps("/hello/:user_id", "/hello/100"),
        Some(vec![pair("user_id", "100")])
    );
    assert_eq!(
        caps("/hello/:user_id", "/hello/100/"),
        Some(vec![pair("user_id", "100")])
    );
    assert_eq!(caps("/hello/:user_id", "/hello/100/x"), None);
    assert_eq!(caps("/hello/:user_id", "/hello"), None);
}

#[test]
fn capture_regex_ignores_case() {
    assert!(caps("/Hello/:id", "/hello/1").is_some());
}

#[test]
fn capture_optional_takes_slash_prefix() {
    assert_eq!(caps("/u/:id?", "/u"), Some(vec![]));
    assert_eq!(caps("/u/:id?", "/u/7"), Some(vec![pair("id", "7")]));
}

#[test]
fn capture_repeated_segments() {
    assert_eq!(
        caps("/files/:rest+", "/files/a/b/c"),
        Some(vec![pair("rest", "a/b/c")])
    );
    assert_eq!(caps("/files/:rest+", "/files"), None);
    assert_eq!(caps("/files/:rest*", "/files"), Some(vec![]));
}

#[test]
fn capture_custom_and_unnamed_patterns() {
    assert_eq!(caps("/n/:id(\\d+)", "/n/42"), Some(vec![pair("id", "42")]));
    assert_eq!(caps("/n/:id(\\d+)", "/n/abc"), None);
    assert_eq!(
        caps("/(a|b)/(\\d+)", "/b/3"),
        Some(vec![pair("0", "b"), pair("1", "3")])
    );
}

#[test]
fn capture_groups_and_escapes() {
    assert_eq!(
        caps("/img{-:size}?.png", "/img-large.png"),
        Some(vec![pair("size", "large")])
    );
    assert_eq!(caps("/img{-:size}?.png", "/img.png"), Some(vec![]));
    assert!(caps("/a\\+b", "/a+b").is_some());
    assert!(caps("/a\\+b", "/aab").is_none());
}

#[test]
fn capture_rejects_malformed() {
    for bad in &[
        "/:",
        "/(",
        "/(?x)",
        "/((a))",
        "/{:a",
        "/a/*",
        "/:id/*",
        "/\\",
        "/()",
    ] {
        assert!(CaptureMatcher::compile(bad).is_err(), "{:?}", bad);
    }
}
