//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! php-ngettext - translate message from a PHP translation file and choose plural form
//!
//! Looks up MSGID1 in a PHP translation file and prints the variant the
//! file's plural rule selects for COUNT. Without a usable file the English
//! rule applies: MSGID1 for a count of 1, MSGID2 otherwise.

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use phptf::translations_lib::host::StdFilesystem;
use phptf::translations_lib::php_file::PhpTranslations;
use std::path::PathBuf;
use std::process::exit;

/// php-ngettext - translate message and choose plural form
#[derive(Parser)]
#[command(
    version,
    about = gettext("php-ngettext - translate message and choose plural form"),
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    #[arg(short = 'f', long = "file", help = gettext("PHP translation file to look MSGID1 up in"))]
    file: Option<PathBuf>,

    #[arg(short = 'c', long = "context", help = gettext("Disambiguating context of MSGID1"))]
    context: Option<String>,

    #[arg(short, long, action = clap::ArgAction::HelpLong, help = gettext("Print help"))]
    help: Option<bool>,

    #[arg(short = 'V', long, action = clap::ArgAction::Version, help = gettext("Print version"))]
    version: Option<bool>,

    #[arg(help = gettext("Singular form (MSGID1)"))]
    msgid1: String,

    #[arg(help = gettext("Plural form (MSGID2)"))]
    msgid2: String,

    #[arg(allow_hyphen_values = true, help = gettext("Count for plural selection"))]
    count: String,
}

fn main() {
    setlocale(LocaleCategory::LcAll, "");
    if textdomain("posixutils-rs").is_err() {
        // Ignore error - translation may not be available
    }
    let _ = bind_textdomain_codeset("posixutils-rs", "UTF-8");
    env_logger::init();

    let args = Args::parse();

    let count: i64 = match args.count.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("php-ngettext: invalid count: {}", args.count);
            exit(1);
        }
    };

    let mut translations = PhpTranslations::new();
    if let Some(file) = &args.file {
        if let Err(e) = translations.import_from_file(file, &StdFilesystem) {
            log::warn!("{}", e);
        }
    }

    // An empty catalog carries the English plural rule
    let translated = translations.catalog().translate_plural(
        &args.msgid1,
        &args.msgid2,
        count,
        args.context.as_deref(),
    );

    println!("{}", translated);
}
