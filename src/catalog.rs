//! Class catalog: the ordered set of class names a compiled stylesheet defines.
//!
//! The catalog is built once (usually by the offline `catalog` command) and
//! then handed to the prefixer as a read-only value.

use chrono::Utc;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::errors::{PrefixerError, Result};

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

/// Text between a block boundary (or the start of input) and the next `{`.
/// At-rule preludes are excluded by refusing `@`.
static SELECTOR_PRELUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[{};])\s*([^{};@]+)\{").expect("selector prelude pattern is valid")
});

/// De-duplicated, order-preserving set of known utility class names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassCatalog {
    classes: IndexSet<String>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `class` is a known utility class
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class names in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Load a catalog from disk.
    ///
    /// `.css` files are scanned directly; anything else is read as JSON, either
    /// a catalog document written by the `catalog` command or a bare array of
    /// class names.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PrefixerError::CatalogError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("css") => Ok(build_catalog(&content)),
            _ => Self::from_json_str(&content).map_err(|e| PrefixerError::CatalogError {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse a catalog document or a bare JSON array of class names
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let source: CatalogSource = serde_json::from_str(json)?;
        Ok(match source {
            CatalogSource::Document(document) => document.classes.into_iter().collect(),
            CatalogSource::List(classes) => classes.into_iter().collect(),
        })
    }
}

impl FromIterator<String> for ClassCatalog {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogSource {
    Document(CatalogFile),
    List(Vec<String>),
}

/// On-disk catalog document produced by the `catalog` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Unique class names in first-seen order
    pub classes: Vec<String>,
    /// Stylesheet the catalog was built from
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sourceFile", default)]
    pub source_file: Option<String>,
    /// ISO timestamp of processing
    #[serde(rename = "processedAt", default)]
    pub processed_at: String,
    /// Crate version
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub stats: CatalogStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Count of class candidates before deduplication
    #[serde(rename = "originalCount")]
    pub original_count: usize,
    /// Count of unique classes
    #[serde(rename = "uniqueCount")]
    pub unique_count: usize,
}

impl CatalogFile {
    /// Scan `stylesheet` and wrap the result with provenance metadata
    pub fn from_stylesheet(stylesheet: &str, source_file: Option<String>) -> Self {
        let candidates = extract_class_names(stylesheet);
        let original_count = candidates.len();
        let catalog: ClassCatalog = candidates.into_iter().collect();

        Self {
            stats: CatalogStats {
                original_count,
                unique_count: catalog.len(),
            },
            classes: catalog.classes.into_iter().collect(),
            source_file,
            processed_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Build the catalog for a stylesheet. Never fails; a stylesheet without
/// class selectors yields an empty catalog.
pub fn build_catalog(stylesheet: &str) -> ClassCatalog {
    extract_class_names(stylesheet).into_iter().collect()
}

/// Class name candidates in stylesheet order, duplicates included.
///
/// Every comma-separated selector contributes the classes of its right-most
/// compound selector that carries any class, with CSS escapes decoded.
pub fn extract_class_names(stylesheet: &str) -> Vec<String> {
    let stylesheet = COMMENT.replace_all(stylesheet, "");
    let mut names = Vec::new();

    for caps in SELECTOR_PRELUDE.captures_iter(&stylesheet) {
        // Keyframe offsets such as `12.5%` are the only preludes starting with a digit
        for selector in split_selector_list(&caps[1])
            .into_iter()
            .filter(|selector| !selector.starts_with(|c: char| c.is_ascii_digit()))
        {
            names.extend(subject_classes(selector));
        }
    }

    names
}

fn split_selector_list(list: &str) -> Vec<&str> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                selectors.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    selectors.push(list[start..].trim());

    selectors.retain(|s| !s.is_empty());
    selectors
}

fn subject_classes(selector: &str) -> Vec<String> {
    let mut compounds: Vec<Vec<String>> = vec![Vec::new()];
    let mut chars = selector.chars().peekable();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                decode_escape(&mut chars);
            }
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            '.' => {
                let name = read_class_name(&mut chars);
                if !name.is_empty() {
                    if let Some(compound) = compounds.last_mut() {
                        compound.push(name);
                    }
                }
            }
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                if compounds.last().is_some_and(|compound| !compound.is_empty()) {
                    compounds.push(Vec::new());
                }
            }
            _ => {}
        }
    }

    compounds
        .into_iter()
        .rev()
        .find(|compound| !compound.is_empty())
        .unwrap_or_default()
}

fn read_class_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();

    while let Some(&c) = chars.peek() {
        if c == '\\' {
            chars.next();
            if let Some(decoded) = decode_escape(chars) {
                name.push(decoded);
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    name
}

/// Decode one CSS escape; the backslash has already been consumed.
fn decode_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let mut hex = String::new();
    while hex.len() < 6 {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                hex.push(*c);
                chars.next();
            }
            _ => break,
        }
    }

    if hex.is_empty() {
        return chars.next();
    }

    // A single whitespace terminates a hex escape
    if chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }

    let code = u32::from_str_radix(&hex, 16).ok()?;
    Some(
        char::from_u32(code)
            .filter(|c| *c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER),
    )
}
