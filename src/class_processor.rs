use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use crate::catalog::ClassCatalog;

/// Class-name-shaped runs inside a token: word characters, hyphens and dots.
/// Variant separators such as `:` and `/` split a token into fragments.
static FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+").expect("fragment pattern is valid"));

fn is_fragment_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Whether the text in front of a fragment ends with a whole prefix, so the
/// fragment has already been rewritten.
///
/// The prefix must start its own fragment: with prefix `r:` the fragment in
/// `hover:r:flex` is prefixed but the one in `hover:flex` is not.
fn follows_prefix(before: &str, prefix: &str) -> bool {
    before
        .strip_suffix(prefix)
        .is_some_and(|rest| !rest.ends_with(is_fragment_char))
}

/// A class list after at least one class was prefixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenList {
    /// Tokens joined with single spaces
    pub text: String,
    /// Number of class fragments that received the prefix
    pub prefixed: usize,
}

/// Trait for rewriting class lists against a catalog of known utilities.
///
/// Implementors only supply the prefix and the catalog; the token rules are
/// shared so every caller (attribute values, `@apply` lines, tests) applies
/// exactly the same logic.
pub trait ClassListRewriter {
    /// Prefix every known utility class must carry
    fn prefix(&self) -> &str;

    /// Known utility class names
    fn catalog(&self) -> &ClassCatalog;

    /// Whether `token` already carries the prefix, directly or after a `-`.
    ///
    /// An empty prefix is carried by everything, which turns rewriting into a
    /// no-op.
    fn is_prefixed(&self, token: &str) -> bool {
        let prefix = self.prefix();
        token.starts_with(prefix)
            || token
                .strip_prefix('-')
                .is_some_and(|rest| rest.starts_with(prefix))
    }

    /// Prefix every catalog fragment of a single token.
    ///
    /// `sm:flex` becomes `sm:tw-flex` and `-mt-4` becomes `-tw-mt-4` for the
    /// prefix `tw-`. Fragments outside the catalog are returned unchanged, and
    /// so are fragments that directly follow a complete prefix (`sm:tw:flex`
    /// for the prefix `tw:`).
    ///
    /// # Returns
    /// The rewritten token and the number of fragments that were prefixed
    fn rewrite_token<'t>(&self, token: &'t str) -> (Cow<'t, str>, usize) {
        if self.is_prefixed(token) {
            return (Cow::Borrowed(token), 0);
        }

        let prefix = self.prefix();
        let catalog = self.catalog();
        let mut out = String::with_capacity(token.len() + prefix.len());
        let mut last = 0;
        let mut prefixed = 0;

        for fragment in FRAGMENT.find_iter(token) {
            // A negative fragment also matches its positive utility
            let known = catalog.contains(fragment.as_str())
                || fragment
                    .as_str()
                    .strip_prefix('-')
                    .is_some_and(|rest| catalog.contains(rest));

            if !known || follows_prefix(&token[..fragment.start()], prefix) {
                continue;
            }

            out.push_str(&token[last..fragment.start()]);
            match fragment.as_str().strip_prefix('-') {
                Some(rest) => {
                    out.push('-');
                    out.push_str(prefix);
                    out.push_str(rest);
                }
                None => {
                    out.push_str(prefix);
                    out.push_str(fragment.as_str());
                }
            }
            last = fragment.end();
            prefixed += 1;
        }

        if prefixed == 0 {
            return (Cow::Borrowed(token), 0);
        }

        out.push_str(&token[last..]);
        (Cow::Owned(out), prefixed)
    }

    /// Rewrite a whitespace-separated class list.
    ///
    /// When the first token already carries the prefix the whole list is
    /// considered prefixed and left alone.
    ///
    /// # Returns
    /// `None` when nothing was prefixed, so callers can keep the original
    /// text byte-for-byte
    fn rewrite_class_list(&self, list: &str) -> Option<RewrittenList> {
        let first = list.split_whitespace().next()?;
        if self.is_prefixed(first) {
            return None;
        }

        let mut prefixed = 0;
        let tokens: Vec<Cow<'_, str>> = list
            .split_whitespace()
            .map(|token| {
                let (rewritten, count) = self.rewrite_token(token);
                prefixed += count;
                rewritten
            })
            .collect();

        if prefixed == 0 {
            return None;
        }

        Some(RewrittenList {
            text: tokens.join(" "),
            prefixed,
        })
    }
}
