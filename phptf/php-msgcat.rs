//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! php-msgcat - concatenate PHP translation files
//!
//! Reads each input file in order and writes one PHP translation file
//! holding all of their entries. An entry found in several inputs takes
//! its translation from the last one. Headers come from the first input
//! that has any.

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use phptf::translations_lib::catalog::Catalog;
use phptf::translations_lib::host::StdFilesystem;
use phptf::translations_lib::php_file::PhpTranslations;
use std::path::PathBuf;
use std::process::exit;

/// php-msgcat - concatenate PHP translation files
#[derive(Parser)]
#[command(
    version,
    about = gettext("php-msgcat - concatenate PHP translation files"),
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    #[arg(short = 'o', long = "output", help = gettext("Write the merged catalog to OUTPUT"))]
    output: PathBuf,

    #[arg(short = 'g', long = "generator", help = gettext("Generator recorded in the output file"))]
    generator: Option<String>,

    #[arg(short, long, action = clap::ArgAction::HelpLong, help = gettext("Print help"))]
    help: Option<bool>,

    #[arg(short = 'V', long, action = clap::ArgAction::Version, help = gettext("Print version"))]
    version: Option<bool>,

    #[arg(required = true, help = gettext("Input PHP translation files"))]
    files: Vec<PathBuf>,
}

fn concatenate(files: &[PathBuf]) -> Result<Catalog, String> {
    let mut merged = Catalog::new();

    for file in files {
        let mut input = PhpTranslations::new();
        input
            .import_from_file(file, &StdFilesystem)
            .map_err(|e| e.to_string())?;

        let catalog = input.into_catalog();
        if merged.headers().is_empty() {
            let headers = catalog.headers().iter();
            merged.set_headers(headers.map(|(k, v)| (k.as_str(), v.as_str())));
        }
        merged.merge_with(&catalog);
        log::debug!("{}: merged {} entries", file.display(), catalog.len());
    }

    Ok(merged)
}

fn main() {
    setlocale(LocaleCategory::LcAll, "");
    if textdomain("posixutils-rs").is_err() {
        // Ignore error - translation may not be available
    }
    let _ = bind_textdomain_codeset("posixutils-rs", "UTF-8");
    env_logger::init();

    let args = Args::parse();

    let catalog = match concatenate(&args.files) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("php-msgcat: {}", e);
            exit(1);
        }
    };

    let generator = args.generator.unwrap_or_else(|| {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    });

    let output = PhpTranslations::from_catalog(catalog);
    if let Err(e) = output.export_to_file(&args.output, &StdFilesystem, &generator) {
        eprintln!("php-msgcat: {}", e);
        exit(1);
    }
}
