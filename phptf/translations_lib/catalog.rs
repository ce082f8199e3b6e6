//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Translation catalog
//!
//! This module provides the `Catalog` type: catalog headers plus an
//! insertion-ordered set of translation entries keyed by their gettext key.
//! The `Plural-Forms` header is parsed once when it is set, and the parsed
//! rule is reused for every plural lookup.

use std::collections::{BTreeMap, HashMap};

use crate::translations_lib::entry::{make_key, TranslationEntry};
use crate::translations_lib::plural::{parse_plural_forms, PluralError, PluralForms};

pub const LANGUAGE_HEADER: &str = "Language";
pub const PLURAL_FORMS_HEADER: &str = "Plural-Forms";
pub const GENERATOR_HEADER: &str = "X-Generator";
pub const DOMAIN_HEADER: &str = "X-Domain";

/// Error type for catalog lookups
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("no plural form for count {count}: {source}")]
    PluralIndexOutOfRange {
        count: i64,
        #[source]
        source: PluralError,
    },
}

/// Translation catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    headers: BTreeMap<String, String>,
    entries: Vec<TranslationEntry>,
    /// Map from entry key to position in `entries`
    index: HashMap<String, usize>,
    plural_forms: PluralForms,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header; `Plural-Forms` also replaces the cached plural rule
    pub fn set_header(&mut self, name: &str, value: &str) {
        if name == PLURAL_FORMS_HEADER {
            self.plural_forms = match parse_plural_forms(value) {
                Ok(forms) => forms,
                Err(e) => {
                    log::warn!("ignoring Plural-Forms '{}': {}", value, e);
                    PluralForms::default()
                }
            };
        }
        self.headers.insert(name.to_string(), value.to_string());
    }

    pub fn set_headers<'a, I>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in headers {
            self.set_header(name, value);
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Number of plural forms of the current rule
    pub fn nplurals(&self) -> usize {
        self.plural_forms.nplurals
    }

    pub fn plural_forms(&self) -> &PluralForms {
        &self.plural_forms
    }

    /// Zero-based variant index for `count` under the current rule
    pub fn select_plural_form(&self, count: i64) -> Result<usize, CatalogError> {
        self.plural_forms
            .select(count)
            .map_err(|source| CatalogError::PluralIndexOutOfRange { count, source })
    }

    /// Add an entry, replacing any entry with the same key
    ///
    /// Entries without an original string are rejected.
    pub fn add_entry(&mut self, entry: TranslationEntry) -> bool {
        if entry.singular.is_empty() {
            return false;
        }
        self.insert(entry);
        true
    }

    fn insert(&mut self, entry: TranslationEntry) {
        let key = entry.key();
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Look up an entry by its key
    pub fn entry(&self, key: &str) -> Option<&TranslationEntry> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Look up an entry by original string and context
    pub fn find(&self, singular: &str, context: Option<&str>) -> Option<&TranslationEntry> {
        self.entry(&make_key(context, singular))
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` into this catalog, overwriting on key
    /// collision. Headers are left alone.
    pub fn merge_with(&mut self, other: &Catalog) {
        for entry in other.entries() {
            self.insert(entry.clone());
        }
    }

    /// Copy only the entries of `other` whose key is not present here
    pub fn merge_originals_with(&mut self, other: &Catalog) {
        for entry in other.entries() {
            if !self.index.contains_key(&entry.key()) {
                self.insert(entry.clone());
            }
        }
    }

    /// Look up a singular message
    ///
    /// Returns the first translated variant, or `singular` if there is none.
    pub fn translate<'a>(&'a self, singular: &'a str, context: Option<&str>) -> &'a str {
        self.find(singular, context)
            .and_then(|entry| entry.translations.first())
            .filter(|t| !t.is_empty())
            .map_or(singular, String::as_str)
    }

    /// Look up a plural message
    ///
    /// `Ok(None)` means the catalog has no translation for the message.
    /// A rule that fails to evaluate, or selects a variant the entry does
    /// not have, is an error.
    pub fn try_translate_plural(
        &self,
        singular: &str,
        count: i64,
        context: Option<&str>,
    ) -> Result<Option<&str>, CatalogError> {
        let entry = match self.find(singular, context) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let index = self.select_plural_form(count)?;
        match entry.translations.get(index) {
            Some(t) if t.is_empty() => Ok(None),
            Some(t) => Ok(Some(t.as_str())),
            None => Err(CatalogError::PluralIndexOutOfRange {
                count,
                source: PluralError::IndexOutOfRange {
                    index: index as i64,
                    nplurals: entry.translations.len(),
                },
            }),
        }
    }

    /// Look up a plural message, falling back to the untranslated strings
    ///
    /// Without a usable translation this returns `singular` when
    /// `count == 1` and `plural` otherwise.
    pub fn translate_plural<'a>(
        &'a self,
        singular: &'a str,
        plural: &'a str,
        count: i64,
        context: Option<&str>,
    ) -> &'a str {
        match self.try_translate_plural(singular, count, context) {
            Ok(Some(translated)) => translated,
            Ok(None) => english_plural(singular, plural, count),
            Err(e) => {
                log::debug!("falling back to untranslated '{}': {}", singular, e);
                english_plural(singular, plural, count)
            }
        }
    }
}

/// Germanic default: singular for exactly one, plural otherwise
pub fn english_plural<'a>(singular: &'a str, plural: &'a str, count: i64) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}
