//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! php-gettext - retrieve text string from a PHP translation file

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use phptf::translations_lib::host::StdFilesystem;
use phptf::translations_lib::php_file::PhpTranslations;
use std::path::PathBuf;

/// php-gettext - retrieve text string from a PHP translation file
#[derive(Parser)]
#[command(
    version,
    about = gettext("php-gettext - retrieve text string from a PHP translation file"),
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    #[arg(short = 'f', long = "file", help = gettext("PHP translation file to look MSGID up in"))]
    file: Option<PathBuf>,

    #[arg(short = 'c', long = "context", help = gettext("Disambiguating context of MSGID"))]
    context: Option<String>,

    #[arg(short, long, action = clap::ArgAction::HelpLong, help = gettext("Print help"))]
    help: Option<bool>,

    #[arg(short = 'V', long, action = clap::ArgAction::Version, help = gettext("Print version"))]
    version: Option<bool>,

    #[arg(help = gettext("Message to translate (MSGID)"))]
    msgid: String,
}

fn main() {
    setlocale(LocaleCategory::LcAll, "");
    if textdomain("posixutils-rs").is_err() {
        // Ignore error - translation may not be available
    }
    let _ = bind_textdomain_codeset("posixutils-rs", "UTF-8");
    env_logger::init();

    let args = Args::parse();

    let mut translations = PhpTranslations::new();
    if let Some(file) = &args.file {
        if let Err(e) = translations.import_from_file(file, &StdFilesystem) {
            log::warn!("{}", e);
        }
    }

    println!(
        "{}",
        translations
            .catalog()
            .translate(&args.msgid, args.context.as_deref())
    );
}
