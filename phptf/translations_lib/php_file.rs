//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! PHP translation file import and export
//!
//! A PHP translation file holds a catalog as a literal array returned by
//! the file, so the host can load it with a plain `include`:
//!
//! ```text
//! <?php
//! return ['translation-revision-date'=>'+0000','generator'=>'...','messages'=>['original'=>['translation']],'language'=>'fr_FR'];
//! ```
//!
//! The same structured form (an array with a `messages` key) is what an
//! MO decoder hands to [`import`].

use std::io;
use std::path::{Path, PathBuf};

use crate::translations_lib::catalog::{
    Catalog, DOMAIN_HEADER, GENERATOR_HEADER, LANGUAGE_HEADER, PLURAL_FORMS_HEADER,
};
use crate::translations_lib::entry::{make_entry, PLURAL_SEPARATOR};
use crate::translations_lib::host::Filesystem;
use crate::translations_lib::literal::{self, Key, LiteralError, Value};

/// Opening tag written at the top of every translation file
pub const PHP_PROLOGUE: &str = "<?php";

/// Placeholder revision date written into exported files
pub const REVISION_DATE: &str = "+0000";

/// Structured-form keys and the catalog headers they map to
const HEADER_MAP: &[(&str, &str)] = &[
    ("plural-forms", PLURAL_FORMS_HEADER),
    ("generator", GENERATOR_HEADER),
    ("domain", DOMAIN_HEADER),
    ("language", LANGUAGE_HEADER),
];

/// Error type for catalog import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("{}: no such file", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] LiteralError),
    #[error("invalid catalog format: {0}")]
    InvalidFormat(String),
}

/// Error type for catalog export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Serialize(#[from] LiteralError),
    #[error("{}: cannot write: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn invalid(msg: &str) -> ImportError {
    ImportError::InvalidFormat(msg.to_string())
}

/// Build a catalog from the structured form
///
/// The input must be an array with a `messages` array mapping original
/// strings (optionally prefixed by a context and U+0004) to a translation
/// string or a list of plural variants. Recognized header keys are copied
/// when non-empty.
pub fn import(source: &Value) -> Result<Catalog, ImportError> {
    if source.as_array().is_none() {
        return Err(invalid("catalog is not an array"));
    }
    let messages = source
        .get("messages")
        .ok_or_else(|| invalid("missing 'messages'"))?
        .as_array()
        .ok_or_else(|| invalid("'messages' is not an array"))?;

    let mut catalog = Catalog::new();

    for &(php_header, po_header) in HEADER_MAP {
        let value = match source.get(php_header) {
            Some(v) if v.is_truthy() => v,
            _ => continue,
        };
        let value = value.as_str().ok_or_else(|| {
            ImportError::InvalidFormat(format!("'{}' is not a string", php_header))
        })?;
        catalog.set_header(po_header, value);
    }

    for (key, translation) in messages {
        let original = match key {
            Key::Str(s) => s.clone(),
            // PHP turns numeric string keys into integers
            Key::Int(i) => i.to_string(),
        };

        let (joined, variants) = match translation {
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(|(_, v)| scalar_string(v))
                    .collect::<Option<Vec<String>>>()
                    .ok_or_else(|| {
                        ImportError::InvalidFormat(format!(
                            "translation of '{}' is not a list of strings",
                            original
                        ))
                    })?;
                (parts.join(&PLURAL_SEPARATOR.to_string()), parts.len())
            }
            other => {
                let s = scalar_string(other).ok_or_else(|| {
                    ImportError::InvalidFormat(format!(
                        "translation of '{}' is not a string",
                        original
                    ))
                })?;
                (s, 1)
            }
        };

        let mut entry = make_entry(&original, &joined);
        entry.is_plural = entry.is_plural || variants > 1;

        if !catalog.add_entry(entry) {
            log::debug!("skipping message without original string");
        }
    }

    log::debug!("imported {} entries", catalog.len());
    Ok(catalog)
}

/// String form of a scalar translation value
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Structured form of a catalog, as written by [`export`]
///
/// Entries whose variants are all empty are left out.
pub fn to_value(catalog: &Catalog, generator: &str) -> Value {
    let messages: Vec<(Key, Value)> = catalog
        .entries()
        .filter(|entry| entry.has_translations())
        .map(|entry| (Key::Str(entry.key()), Value::list(&entry.translations)))
        .collect();

    let mut fields = vec![
        (Key::from("translation-revision-date"), Value::from(REVISION_DATE)),
        (Key::from("generator"), Value::from(generator)),
        (Key::from("messages"), Value::Array(messages)),
    ];

    for (php_header, po_header) in [
        ("language", LANGUAGE_HEADER),
        ("plural-forms", PLURAL_FORMS_HEADER),
    ] {
        if let Some(value) = catalog.header(po_header).filter(|v| !v.is_empty()) {
            fields.push((Key::from(php_header), Value::from(value)));
        }
    }

    Value::Array(fields)
}

/// Render a catalog as the complete text of a PHP translation file
pub fn export(catalog: &Catalog, generator: &str) -> Result<String, ExportError> {
    let array = literal::serialize(&to_value(catalog, generator))?;
    Ok(format!("{}\nreturn {};\n", PHP_PROLOGUE, array))
}

/// Extract the returned literal from the text of a PHP translation file
pub fn parse_file(text: &str) -> Result<Value, ImportError> {
    let body = text
        .strip_prefix(PHP_PROLOGUE)
        .ok_or_else(|| invalid("missing '<?php' prologue"))?;
    let trimmed = body.trim_start();
    let return_start = text.len() - trimmed.len();

    let expr = trimmed
        .strip_prefix("return")
        .ok_or_else(|| invalid("missing 'return' statement"))?;
    let expr_trimmed = expr.trim_start();
    let offset = return_start + "return".len() + (expr.len() - expr_trimmed.len());

    let array = expr_trimmed
        .trim_end()
        .strip_suffix(';')
        .ok_or_else(|| invalid("missing ';' after literal"))?;

    literal::deserialize(array).map_err(|e| match e {
        LiteralError::ParseError { position, message } => {
            ImportError::Parse(LiteralError::ParseError {
                position: position + offset,
                message,
            })
        }
        other => ImportError::Parse(other),
    })
}

/// Path of the PHP translation file that sits next to an MO file
pub fn php_path_for(mo_path: &Path) -> PathBuf {
    mo_path.with_extension("php")
}

/// A catalog bound to the PHP translation file it was loaded from
#[derive(Debug, Clone, Default)]
pub struct PhpTranslations {
    catalog: Catalog,
    filename: Option<PathBuf>,
}

impl PhpTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        PhpTranslations {
            catalog,
            filename: None,
        }
    }

    /// The file this catalog was last loaded from
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Load headers and entries from a PHP translation file
    ///
    /// On failure nothing is changed.
    pub fn import_from_file(
        &mut self,
        path: &Path,
        fs: &dyn Filesystem,
    ) -> Result<(), ImportError> {
        let bytes = fs.read(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ImportError::NotFound(path.to_path_buf())
            } else {
                ImportError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let text = String::from_utf8(bytes).map_err(|_| invalid("file is not valid UTF-8"))?;
        let imported = import(&parse_file(&text)?)?;

        for (name, value) in imported.headers() {
            self.catalog.set_header(name, value);
        }
        self.catalog.merge_with(&imported);
        self.filename = Some(path.to_path_buf());

        log::debug!("{}: loaded {} entries", path.display(), imported.len());
        Ok(())
    }

    /// Write the catalog as a PHP translation file
    ///
    /// The file text is fully rendered before the single write call.
    pub fn export_to_file(
        &self,
        path: &Path,
        fs: &dyn Filesystem,
        generator: &str,
    ) -> Result<(), ExportError> {
        let text = export(&self.catalog, generator)?;
        fs.write(path, text.as_bytes())
            .map_err(|source| ExportError::WriteError {
                path: path.to_path_buf(),
                source,
            })
    }
}
