//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Translation entries
//!
//! An entry is one translatable string together with its translated
//! variants. Entries use the gettext conventions for their lookup key:
//! context and original string joined by U+0004.

/// Separator between context and original string in a gettext key
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Separator between plural variants in a gettext string
pub const PLURAL_SEPARATOR: char = '\0';

/// A single translatable string and its translations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationEntry {
    /// Untranslated source string
    pub singular: String,
    /// Untranslated plural source string, if known
    pub plural: Option<String>,
    /// Disambiguation context
    pub context: Option<String>,
    /// Translated variants, indexed by plural form
    pub translations: Vec<String>,
    /// True when the entry has more than one variant
    pub is_plural: bool,
}

impl TranslationEntry {
    /// Create an untranslated entry
    pub fn new(singular: impl Into<String>) -> Self {
        TranslationEntry {
            singular: singular.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    /// Set the translated variants; more than one marks the entry plural
    pub fn with_translations<I, S>(mut self, translations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translations = translations.into_iter().map(Into::into).collect();
        self.is_plural = self.translations.len() > 1;
        self
    }

    /// Lookup key: `context` U+0004 `singular`, or just `singular`
    pub fn key(&self) -> String {
        make_key(self.context.as_deref(), &self.singular)
    }

    /// True if at least one variant is non-empty
    pub fn has_translations(&self) -> bool {
        self.translations.iter().any(|t| !t.is_empty())
    }
}

/// Build a lookup key from an optional context and an original string
pub fn make_key(context: Option<&str>, singular: &str) -> String {
    match context {
        Some(ctx) => {
            let mut key = String::with_capacity(ctx.len() + 1 + singular.len());
            key.push_str(ctx);
            key.push(CONTEXT_SEPARATOR);
            key.push_str(singular);
            key
        }
        None => singular.to_string(),
    }
}

/// Build an entry from a decoded catalog pair
///
/// `original` may carry a context prefix separated by U+0004, and
/// `translation` may hold several plural variants separated by NUL.
pub fn make_entry(original: &str, translation: &str) -> TranslationEntry {
    let mut entry = TranslationEntry::default();

    let mut parts = original.split(CONTEXT_SEPARATOR);
    let first = parts.next().unwrap_or_default();
    match parts.next() {
        Some(rest) => {
            entry.context = Some(first.to_string());
            entry.singular = rest.to_string();
        }
        None => entry.singular = first.to_string(),
    }

    entry.translations = translation
        .split(PLURAL_SEPARATOR)
        .map(str::to_string)
        .collect();
    entry.is_plural = entry.translations.len() > 1;

    entry
}
