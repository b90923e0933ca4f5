mod parser;

use self::parser::CaptureMatcher;
use crate::params::Params;
use crate::router::RouterError;

/// Characters that hand a pattern over to the named-capture compiler.
const RESERVED: &[char] = &['+', '?', '\\', '{', '}', ':', '(', ')'];

const STAR: char = '*';
const SLASH: char = '/';

#[derive(Debug, Clone)]
enum Matcher {
    /// Whole remaining path equals the pattern.
    Exact(Box<str>),
    /// Decided by the literal prefix alone.
    Any,
    /// `prefix` followed by the end or by `/` and anything.
    Subpath(Box<str>),
    /// `prefix` with an optional single trailing `/`.
    OptionalSlash(Box<str>),
    Captures(CaptureMatcher),
}

/// A compiled route pattern: a literal prefix used to reject cheaply, and
/// the full matcher run only when the prefix agrees.
///
/// The prefix comparison is case-sensitive even though named-capture
/// regexes are not, so `/Hello/:id` only matches paths starting `/Hello`.
#[derive(Debug, Clone)]
pub(crate) struct PathPattern {
    source: Box<str>,
    prefix: Box<str>,
    matcher: Matcher,
}

impl PathPattern {
    pub(crate) fn compile(pattern: &str) -> Result<Self, RouterError> {
        if !pattern.starts_with(SLASH) {
            return Err(RouterError::MissingLeadingSlash);
        }

        let matcher = if pattern.contains(RESERVED) {
            Matcher::Captures(CaptureMatcher::compile(pattern)?)
        } else if let Some(base) = pattern.strip_suffix("/*") {
            Matcher::Subpath(base.into())
        } else if pattern.ends_with(STAR) {
            Matcher::Any
        } else if let Some(base) = pattern.strip_suffix(SLASH) {
            Matcher::OptionalSlash(base.into())
        } else {
            Matcher::Exact(pattern.into())
        };

        Ok(Self {
            source: pattern.into(),
            prefix: literal_prefix(pattern).into(),
            matcher,
        })
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.source
    }

    #[inline]
    pub(crate) fn prefix_matches(&self, path: &str) -> bool {
        path.starts_with(&*self.prefix)
    }

    /// Runs the full matcher. Captures are collected only for named-capture
    /// patterns; every other kind yields empty params on success, which
    /// still replace whatever an earlier match left on the request.
    pub(crate) fn match_path(&self, path: &str) -> Option<Params> {
        let matched = match &self.matcher {
            Matcher::Exact(lit) => path == &**lit,
            Matcher::Any => true,
            Matcher::Subpath(base) => path
                .strip_prefix(&**base)
                .map_or(false, |rest| rest.is_empty() || rest.starts_with(SLASH)),
            Matcher::OptionalSlash(base) => path
                .strip_prefix(&**base)
                .map_or(false, |rest| rest.is_empty() || rest == "/"),
            Matcher::Captures(m) => return m.captures(path),
        };
        if matched {
            Some(Params::new())
        } else {
            None
        }
    }

    /// The plain path when the pattern is an exact literal.
    pub(crate) fn as_literal(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Exact(lit) => Some(&**lit),
            _ => None,
        }
    }
}

/// Longest leading run before any pattern syntax, without a trailing `/`.
fn literal_prefix(pattern: &str) -> &str {
    let end = pattern
        .find(|c: char| c == STAR || RESERVED.contains(&c))
        .unwrap_or_else(|| pattern.len());
    let init = &pattern[..end];
    init.strip_suffix(SLASH).unwrap_or(init)
}

/// The `/*` pattern that covers everything under a mount prefix.
pub(crate) fn mount_pattern(prefix: &str) -> String {
    if prefix.ends_with(SLASH) {
        format!("{}*", prefix)
    } else {
        format!("{}/*", prefix)
    }
}

pub(crate) fn trim_trailing_slash(s: &str) -> &str {
    s.strip_suffix(SLASH).unwrap_or(s)
}

#[cfg(test)]
fn full_match(pattern: &str, path: &str) -> bool {
    let p = PathPattern::compile(pattern).unwrap();
    p.prefix_matches(path) && p.match_path(path).is_some()
}

#[test]
fn pattern_prefixes() {
    assert_eq!(literal_prefix("/hello/:id"), "/hello");
    assert_eq!(literal_prefix("/goodbye/*"), "/goodbye");
    assert_eq!(literal_prefix("/*"), "");
    assert_eq!(literal_prefix("/"), "");
    assert_eq!(literal_prefix("/static*"), "/static");
    assert_eq!(literal_prefix("/a/b"), "/a/b");
    assert_eq!(literal_prefix("/x{-:y}"), "/x");
}

#[test]
fn pattern_exact() {
    assert!(full_match("/routeTest", "/routeTest"));
    assert!(!full_match("/routeTest", "/routeTest/"));
    assert!(!full_match("/routeTest", "/routetest"));
    assert_eq!(
        PathPattern::compile("/a").unwrap().as_literal(),
        Some("/a")
    );
}

#[test]
fn pattern_subpath() {
    assert!(full_match("/goodbye/*", "/goodbye"));
    assert!(full_match("/goodbye/*", "/goodbye/"));
    assert!(full_match("/goodbye/*", "/goodbye/hello/100"));
    assert!(!full_match("/goodbye/*", "/goodbyes"));
    assert!(full_match("/*", ""));
    assert!(full_match("/*", "/anything"));
}

#[test]
fn pattern_any() {
    assert!(full_match("/static*", "/static"));
    assert!(full_match("/static*", "/statics/a"));
    assert!(!full_match("/static*", "/stat"));
}

#[test]
fn pattern_optional_slash() {
    assert!(full_match("/dir/", "/dir"));
    assert!(full_match("/dir/", "/dir/"));
    assert!(!full_match("/dir/", "/dir//"));
    assert!(!full_match("/dir/", "/dir/x"));
    assert!(full_match("/", ""));
    assert!(full_match("/", "/"));
}

#[test]
fn pattern_captures_delegated() {
    let p = PathPattern::compile("/hello/:user_id").unwrap();
    assert!(p.as_literal().is_none());
    assert!(!p.prefix_matches("/Hello/100"));
    let params = p.match_path("/hello/100").unwrap();
    assert_eq!(params.get("user_id"), Some("100"));
    assert!(PathPattern::compile("/hello/*")
        .unwrap()
        .match_path("/hello/100")
        .unwrap()
        .is_empty());
}

#[test]
fn pattern_leading_slash_required() {
    assert!(matches!(
        PathPattern::compile("hello"),
        Err(RouterError::MissingLeadingSlash)
    ));
    assert!(PathPattern::compile("").is_err());
}

#[test]
fn pattern_mount_patterns() {
    assert_eq!(mount_pattern("/goodbye/"), "/goodbye/*");
    assert_eq!(mount_pattern("/goodbye"), "/goodbye/*");
    assert_eq!(mount_pattern("/"), "/*");
}
