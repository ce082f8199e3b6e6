//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Host integration
//!
//! The transcoder does not decode MO files, touch global state or pick a
//! locale on its own. The host supplies those through the traits in this
//! module, and [`TextDomains`] replaces the host's global registry of
//! loaded text domains.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::translations_lib::catalog::english_plural;
use crate::translations_lib::literal::Value;
use crate::translations_lib::php_file::{
    self, php_path_for, ExportError, ImportError, PhpTranslations,
};

/// Error type for host operations
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("{}: no such file", .0.display())]
    NotFound(PathBuf),
    #[error("{}: cannot decode: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// File access used by the transcoder
pub trait Filesystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// The local filesystem
///
/// Writes go to a temporary sibling first and are renamed into place, so
/// readers never see a partial file.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
        })?;
        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(file_name);
        tmp_name.push(format!(".{}.tmp", std::process::id()));
        let tmp = path.with_file_name(tmp_name);

        if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Decoder for binary MO catalogs
///
/// Produces the structured form accepted by [`php_file::import`].
pub trait MoDecoder {
    fn decode(&self, path: &Path) -> Result<Value, HostError>;
}

impl<F> MoDecoder for F
where
    F: Fn(&Path) -> Result<Value, HostError>,
{
    fn decode(&self, path: &Path) -> Result<Value, HostError> {
        self(path)
    }
}

/// Host-provided values
pub trait HostEnvironment {
    /// Written as the `generator` of exported files
    fn version_string(&self) -> String;
    /// Locale translations are being loaded for
    fn current_locale(&self) -> String;
}

/// A host with fixed values
#[derive(Debug, Clone)]
pub struct StaticHost {
    pub version: String,
    pub locale: String,
}

impl StaticHost {
    pub fn new(version: impl Into<String>, locale: impl Into<String>) -> Self {
        StaticHost {
            version: version.into(),
            locale: locale.into(),
        }
    }
}

impl HostEnvironment for StaticHost {
    fn version_string(&self) -> String {
        self.version.clone()
    }

    fn current_locale(&self) -> String {
        self.locale.clone()
    }
}

/// Convert an MO file into a PHP translation file next to it
///
/// Returns the path of the written file.
pub fn create_php_file_from_mo_file(
    mo_path: &Path,
    decoder: &dyn MoDecoder,
    fs: &dyn Filesystem,
    host: &dyn HostEnvironment,
) -> Result<PathBuf, HostError> {
    let decoded = decoder.decode(mo_path)?;
    let catalog = php_file::import(&decoded)?;

    let php_path = php_path_for(mo_path);
    PhpTranslations::from_catalog(catalog).export_to_file(
        &php_path,
        fs,
        &host.version_string(),
    )?;

    log::debug!("{}: wrote {}", mo_path.display(), php_path.display());
    Ok(php_path)
}

/// Registry of loaded text domains
#[derive(Debug, Default)]
pub struct TextDomains {
    loaded: HashMap<String, PhpTranslations>,
    /// Directory each (domain, locale) was loaded from; `None` marks a failure
    locations: HashMap<(String, String), Option<PathBuf>>,
}

impl TextDomains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a text domain from the PHP translation file of `mo_path`
    ///
    /// The PHP file is generated from the MO file first if it does not
    /// exist. Entries of an already loaded catalog for the same domain
    /// take precedence over the newly loaded ones.
    pub fn load_textdomain(
        &mut self,
        domain: &str,
        mo_path: &Path,
        decoder: &dyn MoDecoder,
        fs: &dyn Filesystem,
        host: &dyn HostEnvironment,
    ) -> Result<(), HostError> {
        let locale = host.current_locale();

        if !fs.exists(mo_path) {
            return Err(HostError::NotFound(mo_path.to_path_buf()));
        }

        let php_path = php_path_for(mo_path);
        if !fs.exists(&php_path) {
            create_php_file_from_mo_file(mo_path, decoder, fs, host)?;
        }

        let mut translations = PhpTranslations::new();
        if let Err(e) = translations.import_from_file(&php_path, fs) {
            log::warn!("{}: {}", domain, e);
            self.locations
                .insert((domain.to_string(), locale), None);
            return Err(e.into());
        }

        if let Some(previous) = self.loaded.get(domain) {
            translations.catalog_mut().merge_with(previous.catalog());
        }

        self.loaded.insert(domain.to_string(), translations);
        self.locations.insert(
            (domain.to_string(), locale),
            mo_path.parent().map(Path::to_path_buf),
        );
        Ok(())
    }

    pub fn get(&self, domain: &str) -> Option<&PhpTranslations> {
        self.loaded.get(domain)
    }

    pub fn is_loaded(&self, domain: &str) -> bool {
        self.loaded.contains_key(domain)
    }

    /// Drop a loaded domain; returns whether it was loaded
    pub fn unload(&mut self, domain: &str) -> bool {
        self.loaded.remove(domain).is_some()
    }

    /// Directory the domain was loaded from for `locale`
    pub fn location(&self, domain: &str, locale: &str) -> Option<&Path> {
        self.locations
            .get(&(domain.to_string(), locale.to_string()))?
            .as_deref()
    }

    /// True if loading the domain for `locale` was attempted and failed
    pub fn failed(&self, domain: &str, locale: &str) -> bool {
        matches!(
            self.locations.get(&(domain.to_string(), locale.to_string())),
            Some(None)
        )
    }

    pub fn translate<'a>(
        &'a self,
        domain: &str,
        singular: &'a str,
        context: Option<&str>,
    ) -> &'a str {
        match self.loaded.get(domain) {
            Some(t) => t.catalog().translate(singular, context),
            None => singular,
        }
    }

    pub fn translate_plural<'a>(
        &'a self,
        domain: &str,
        singular: &'a str,
        plural: &'a str,
        count: i64,
        context: Option<&str>,
    ) -> &'a str {
        match self.loaded.get(domain) {
            Some(t) => t
                .catalog()
                .translate_plural(singular, plural, count, context),
            None => english_plural(singular, plural, count),
        }
    }
}
