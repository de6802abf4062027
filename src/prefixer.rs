//! Text-level class prefixing.
//!
//! Two passes run over the same buffer: class attribute values first, then
//! `@apply` directives. Only the class text inside matched regions is ever
//! replaced; everything around it is copied through untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::catalog::ClassCatalog;
use crate::class_processor::ClassListRewriter;

/// `className="..."`, `class='...'` or ``className={`...`}``.
/// Quoted values may not contain either quote character. The attribute name
/// must not continue a longer name such as `data-class`; the character in
/// front of it is captured as part of `head`.
static CLASS_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<head>(?:^|[^\w-])(?:className|class)\s*=\s*)(?:"(?P<double>[^"']+)"|'(?P<single>[^"']+)'|\{`(?P<template>[^`]+)`\})"#,
    )
    .expect("class attribute pattern is valid")
});

/// `@apply` up to the end of its line
static APPLY_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<head>@apply[ \t]+)(?P<list>[^\r\n]*)")
        .expect("apply directive pattern is valid")
});

/// Result of prefixing one text buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Number of class fragments that received the prefix
    pub classes_prefixed: usize,
}

impl Rewrite {
    pub fn is_changed(&self) -> bool {
        self.classes_prefixed > 0
    }
}

/// Prefixes known utility classes in markup and stylesheets
#[derive(Debug, Clone, Copy)]
pub struct Prefixer<'a> {
    prefix: &'a str,
    catalog: &'a ClassCatalog,
}

impl<'a> Prefixer<'a> {
    pub fn new(prefix: &'a str, catalog: &'a ClassCatalog) -> Self {
        Self { prefix, catalog }
    }

    /// Prefix class lists in `text` and count the rewritten classes
    pub fn rewrite(&self, text: &str) -> Rewrite {
        let mut classes_prefixed = 0;

        let attributes = CLASS_ATTRIBUTE.replace_all(text, |caps: &Captures<'_>| {
            let (list, open, close) = if let Some(value) = caps.name("double") {
                (value.as_str(), "\"", "\"")
            } else if let Some(value) = caps.name("single") {
                (value.as_str(), "'", "'")
            } else if let Some(value) = caps.name("template") {
                (value.as_str(), "{`", "`}")
            } else {
                return caps[0].to_string();
            };

            match self.rewrite_class_list(list) {
                Some(rewritten) => {
                    classes_prefixed += rewritten.prefixed;
                    format!("{}{}{}{}", &caps["head"], open, rewritten.text, close)
                }
                None => caps[0].to_string(),
            }
        });

        let directives = APPLY_DIRECTIVE.replace_all(&attributes, |caps: &Captures<'_>| {
            match self.rewrite_class_list(&caps["list"]) {
                Some(rewritten) => {
                    classes_prefixed += rewritten.prefixed;
                    format!("{}{}", &caps["head"], rewritten.text)
                }
                None => caps[0].to_string(),
            }
        });

        Rewrite {
            text: directives.into_owned(),
            classes_prefixed,
        }
    }

    /// Prefix class lists in `text`
    pub fn prefix_text(&self, text: &str) -> String {
        self.rewrite(text).text
    }
}

impl ClassListRewriter for Prefixer<'_> {
    fn prefix(&self) -> &str {
        self.prefix
    }

    fn catalog(&self) -> &ClassCatalog {
        self.catalog
    }
}

/// Prefix every known utility class in `text` with `prefix`
pub fn prefix_text(prefix: &str, catalog: &ClassCatalog, text: &str) -> String {
    Prefixer::new(prefix, catalog).prefix_text(text)
}
