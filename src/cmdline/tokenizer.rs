//! Command-line tokenizer
//!
//! A single left-to-right scan with one piece of pending state: the key that is
//! waiting for a value. Key forms are `--key`, `-k` and, in Windows
//! compatibility mode, `/key`. A key token containing `=` carries its own
//! explicit value and never consumes the next token.

use super::token::{TokenKey, TokenProperty, TokenStream};
use crate::error::{PropertyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Accept `/key` and `/key=value`
    pub windows_compat: bool,
    /// Fail on tokens that are neither a key nor a pending value
    pub strict_on_dangling: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self { windows_compat: false, strict_on_dangling: true }
    }
}

/// What one trimmed token turned out to be.
enum Classified<'a> {
    Long(&'a str),
    Short(&'a str),
    Plain(&'a str),
}

fn classify(token: &str, windows_compat: bool) -> Classified<'_> {
    if token.len() > 2 && token.starts_with("--") {
        Classified::Long(&token[2..])
    } else if token.len() > 1 && token.starts_with('-') && token != "--" {
        Classified::Short(&token[1..])
    } else if windows_compat && token.len() > 1 && token.starts_with('/') {
        Classified::Long(&token[1..])
    } else {
        Classified::Plain(token)
    }
}

/// Split `key=value` at the first `=`; both halves trimmed.
fn split_explicit(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (body.trim(), None),
    }
}

struct Scanner<'a> {
    args: &'a [String],
    options: TokenizerOptions,
    open: Option<TokenKey>,
    out: TokenStream,
}

impl<'a> Scanner<'a> {
    fn flush_open(&mut self) {
        if let Some(key) = self.open.take() {
            self.out.push(TokenProperty::adjacent(key, None));
        }
    }

    fn dangling(&mut self, token: &str) -> Result<()> {
        let args = self.args.join(" ");
        if self.options.strict_on_dangling {
            return Err(PropertyError::DanglingToken { token: token.to_string(), args });
        }
        tracing::warn!("Dangling token \"{}\" found in {}, skipping it", token, args);
        self.out.push_dangling(token.to_string());
        Ok(())
    }

    fn open_key(&mut self, raw: &str, body: &str, short: bool) -> Result<()> {
        self.flush_open();

        let (key_text, explicit_value) = split_explicit(body);
        let key = if short {
            if key_text.chars().nth(1).is_some() {
                tracing::debug!("Short key \"{}\" is read as its first character only", raw);
            }
            key_text.chars().next().map(TokenKey::Short)
        } else if key_text.is_empty() {
            None
        } else {
            Some(TokenKey::Long(key_text.to_string()))
        };

        let Some(key) = key else {
            // `--=value`, `-=value`: there is no key to attach anything to
            return self.dangling(raw);
        };

        match explicit_value {
            Some(value) => self.out.push(TokenProperty::explicit(key, value)),
            None => self.open = Some(key),
        }
        Ok(())
    }

    fn feed(&mut self, raw: &str) -> Result<()> {
        let token = raw.trim();
        match classify(token, self.options.windows_compat) {
            Classified::Long(body) => self.open_key(token, body, false),
            Classified::Short(body) => self.open_key(token, body, true),
            Classified::Plain(value) => match self.open.take() {
                Some(key) => {
                    self.out.push(TokenProperty::adjacent(key, Some(value.to_string())));
                    Ok(())
                }
                None => self.dangling(token),
            },
        }
    }
}

/// Turn raw arguments into ordered key/value properties.
pub fn tokenize(args: &[String], options: TokenizerOptions) -> Result<TokenStream> {
    let mut scanner = Scanner { args, options, open: None, out: TokenStream::new() };
    for arg in args {
        scanner.feed(arg)?;
    }
    scanner.flush_open();
    Ok(scanner.out)
}
