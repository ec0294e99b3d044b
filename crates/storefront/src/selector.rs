// Selector - Validated, typed selector expressions
//
// Page objects never splice raw strings into selectors. Every selector is
// built through one of the constructors below, tagged by match kind, and
// rendered to Playwright's selector-engine syntax on demand.
//
// Builders are infallible so that element accessors stay pure. Bad input
// (control characters, `>>` smuggled into a CSS body, a malformed regex)
// produces `Selector::Invalid`, which fails the first operation that tries to
// resolve it with `Error::InvalidSelector`.
//
// See: https://playwright.dev/docs/other-locators

use crate::error::{Error, Result};
use std::fmt;

/// How a text selector compares against element text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextMatch {
    /// Full, case-sensitive match after whitespace trimming
    Exact(String),
    /// Case-sensitive substring
    Containing(String),
    /// Regular expression (Rust `regex` syntax, checked at build time)
    Pattern(String),
}

/// A selector expression resolved lazily against the live document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS, possibly extended with Playwright pseudo-classes
    Css(String),
    /// Text engine
    Text(TextMatch),
    /// ARIA role engine, optionally filtered by accessible name
    Role { role: String, name: Option<String> },
    /// The nth (0-based) match of `base`
    Nth { base: Box<Selector>, index: i32 },
    /// `inner` resolved inside each match of `scope`
    Within {
        scope: Box<Selector>,
        inner: Box<Selector>,
    },
    /// Rejected builder input, reported when the selector is used
    Invalid(String),
}

impl Selector {
    /// CSS selector. Unions (`a, b`) are allowed; `>>` chaining is not.
    pub fn css(body: impl Into<String>) -> Self {
        let body = body.into();
        match check_css(&body) {
            Ok(()) => Selector::Css(body.trim().to_string()),
            Err(reason) => Selector::Invalid(reason),
        }
    }

    /// Element whose whole text equals `text` (case-sensitive).
    pub fn text_exact(text: impl Into<String>) -> Self {
        let text = text.into();
        match check_value(&text) {
            Ok(()) => Selector::Text(TextMatch::Exact(text)),
            Err(reason) => Selector::Invalid(reason),
        }
    }

    /// Smallest element whose text contains `text` (case-sensitive).
    pub fn text_containing(text: impl Into<String>) -> Self {
        let text = text.into();
        match check_value(&text) {
            Ok(()) => Selector::Text(TextMatch::Containing(text)),
            Err(reason) => Selector::Invalid(reason),
        }
    }

    /// Smallest element whose text matches `pattern`.
    pub fn text_matching(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        match check_pattern(&pattern) {
            Ok(()) => Selector::Text(TextMatch::Pattern(pattern)),
            Err(reason) => Selector::Invalid(reason),
        }
    }

    /// ARIA role, e.g. `Selector::role("button", Some("Checkout"))`.
    pub fn role(role: &str, name: Option<&str>) -> Self {
        if role.is_empty() || !role.chars().all(|c| c.is_ascii_lowercase()) {
            return Selector::Invalid(format!("role '{role}' must be lowercase ASCII letters"));
        }
        if let Some(name) = name {
            if let Err(reason) = check_value(name) {
                return Selector::Invalid(reason);
            }
        }
        Selector::Role {
            role: role.to_string(),
            name: name.map(str::to_string),
        }
    }

    /// Narrows a CSS selector to elements containing `text` anywhere inside
    /// (Playwright `:has-text`, case-insensitive).
    pub fn with_text(&self, text: &str) -> Self {
        self.css_filter(text, |body, quoted| format!(":is({body}):has-text({quoted})"))
    }

    /// Narrows a CSS selector to elements whose own text equals `text`
    /// (Playwright `:text-is`, case-sensitive).
    pub fn with_exact_text(&self, text: &str) -> Self {
        self.css_filter(text, |body, quoted| format!(":is({body}):text-is({quoted})"))
    }

    /// Narrows a CSS selector to elements whose text matches `pattern`
    /// (Playwright `:text-matches`).
    pub fn with_text_matching(&self, pattern: &str) -> Self {
        if let Err(reason) = check_pattern(pattern) {
            return Selector::Invalid(reason);
        }
        self.css_filter(pattern, |body, quoted| {
            format!(":is({body}):text-matches({quoted})")
        })
    }

    fn css_filter(&self, value: &str, build: impl FnOnce(&str, &str) -> String) -> Self {
        let Selector::Css(body) = self else {
            return match self {
                Selector::Invalid(_) => self.clone(),
                other => Selector::Invalid(format!(
                    "text filters apply to CSS selectors only, got '{other}'"
                )),
            };
        };
        match check_value(value) {
            Ok(()) => Selector::Css(build(body, &quote(value))),
            Err(reason) => Selector::Invalid(reason),
        }
    }

    /// The nth (0-based) match of this selector.
    pub fn nth(&self, index: usize) -> Self {
        match i32::try_from(index) {
            Ok(index) => self.nth_signed(index),
            Err(_) => Selector::Invalid(format!("index {index} is out of range")),
        }
    }

    /// The first match of this selector.
    pub fn first(&self) -> Self {
        self.nth_signed(0)
    }

    /// The last match of this selector.
    pub fn last(&self) -> Self {
        self.nth_signed(-1)
    }

    fn nth_signed(&self, index: i32) -> Self {
        if let Selector::Invalid(_) = self {
            return self.clone();
        }
        Selector::Nth {
            base: Box::new(self.clone()),
            index,
        }
    }

    /// `inner` searched within the subtree of each match of this selector.
    pub fn within(&self, inner: &Selector) -> Self {
        match (self, inner) {
            (Selector::Invalid(_), _) => self.clone(),
            (_, Selector::Invalid(_)) => inner.clone(),
            _ => Selector::Within {
                scope: Box::new(self.clone()),
                inner: Box::new(inner.clone()),
            },
        }
    }

    /// Returns an error if any part of this selector was rejected.
    pub fn validate(&self) -> Result<()> {
        match self {
            Selector::Invalid(reason) => Err(Error::InvalidSelector(reason.clone())),
            Selector::Nth { base, .. } => base.validate(),
            Selector::Within { scope, inner } => {
                scope.validate()?;
                inner.validate()
            }
            _ => Ok(()),
        }
    }

    /// Renders the selector for the browser backend.
    pub fn render(&self) -> Result<String> {
        self.validate()?;
        Ok(self.to_string())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(body) => write!(f, "css={body}"),
            Selector::Text(TextMatch::Exact(text)) => write!(f, "text={}", quote(text)),
            Selector::Text(TextMatch::Containing(text)) => {
                write!(f, "text=/{}/", escape_slashes(&regex::escape(text)))
            }
            Selector::Text(TextMatch::Pattern(pattern)) => {
                write!(f, "text=/{}/", escape_slashes(pattern))
            }
            Selector::Role { role, name: None } => write!(f, "role={role}"),
            Selector::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name={}]", quote(name)),
            Selector::Nth { base, index } => write!(f, "{base} >> nth={index}"),
            Selector::Within { scope, inner } => write!(f, "{scope} >> {inner}"),
            Selector::Invalid(reason) => write!(f, "<invalid selector: {reason}>"),
        }
    }
}

fn check_css(body: &str) -> std::result::Result<(), String> {
    if body.trim().is_empty() {
        return Err("CSS selector is empty".to_string());
    }
    if body.contains(">>") {
        return Err(format!("CSS selector '{body}' must not contain '>>'"));
    }
    if body.chars().any(char::is_control) {
        return Err(format!("CSS selector {body:?} contains control characters"));
    }
    Ok(())
}

fn check_value(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("selector text is empty".to_string());
    }
    if value.chars().any(char::is_control) {
        return Err(format!("selector text {value:?} contains control characters"));
    }
    Ok(())
}

fn check_pattern(pattern: &str) -> std::result::Result<(), String> {
    check_value(pattern)?;
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| format!("invalid pattern '{pattern}': {e}"))
}

// Double-quoted string literal understood by both the text engine and CSS.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

// Escapes `/` that is not already escaped, for `/.../` regex literals.
fn escape_slashes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    for c in pattern.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}
