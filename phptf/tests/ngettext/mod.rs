//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{run_test, TestPlan};
use tempfile::TempDir;

const RU_CATALOG: &str = concat!(
    "<?php\nreturn ['language'=>'ru_RU',",
    "'plural-forms'=>'nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : ",
    "n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);',",
    "'messages'=>['file'=>['файл','файла','файлов'],",
    "'menu\u{4}file'=>['пункт','пункта','пунктов'],",
    "'dir'=>['','каталога','каталогов']]];\n",
);

fn write_catalog(dir: &TempDir) -> String {
    let path = dir.path().join("ru_RU.php");
    std::fs::write(&path, RU_CATALOG).unwrap();
    path.to_string_lossy().into_owned()
}

fn ngettext_test(args: &[&str], expected_out: &str) {
    run_test(TestPlan {
        cmd: String::from("php-ngettext"),
        args: args.iter().map(|s| s.to_string()).collect(),
        stdin_data: String::new(),
        expected_out: String::from(expected_out),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

#[test]
fn test_ngettext_no_catalog_singular() {
    ngettext_test(&["file", "files", "1"], "file\n");
}

#[test]
fn test_ngettext_no_catalog_plural() {
    ngettext_test(&["file", "files", "5"], "files\n");
    ngettext_test(&["file", "files", "0"], "files\n");
}

#[test]
fn test_ngettext_invalid_count() {
    run_test(TestPlan {
        cmd: String::from("php-ngettext"),
        args: vec![
            String::from("file"),
            String::from("files"),
            String::from("abc"),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::from("php-ngettext: invalid count: abc\n"),
        expected_exit_code: 1,
    });
}

#[test]
fn test_ngettext_catalog_plural_forms() {
    let dir = TempDir::new().unwrap();
    let file = write_catalog(&dir);

    for (count, expected) in [
        ("1", "файл\n"),
        ("3", "файла\n"),
        ("5", "файлов\n"),
        ("11", "файлов\n"),
        ("21", "файл\n"),
        ("22", "файла\n"),
    ] {
        ngettext_test(&["-f", &file, "file", "files", count], expected);
    }
}

#[test]
fn test_ngettext_context() {
    let dir = TempDir::new().unwrap();
    let file = write_catalog(&dir);

    ngettext_test(&["-f", &file, "-c", "menu", "file", "files", "2"], "пункта\n");
    ngettext_test(&["-f", &file, "-c", "other", "file", "files", "2"], "files\n");
}

#[test]
fn test_ngettext_empty_variant_falls_back() {
    let dir = TempDir::new().unwrap();
    let file = write_catalog(&dir);

    ngettext_test(&["-f", &file, "dir", "dirs", "1"], "dir\n");
    ngettext_test(&["-f", &file, "dir", "dirs", "3"], "каталога\n");
}

#[test]
fn test_ngettext_missing_catalog() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("none.php");
    assert!(!missing.exists());

    ngettext_test(
        &["-f", &missing.to_string_lossy(), "file", "files", "1"],
        "file\n",
    );
}

#[test]
fn test_ngettext_unusable_plural_forms_uses_english_rule() {
    let dir = TempDir::new().unwrap();
    let rules = [
        format!("{}n{}", "(".repeat(100_000), ")".repeat(100_000)),
        format!("0{}", "+0".repeat(100_000)),
        String::from("n % 10 ?"),
    ];

    for (i, rule) in rules.iter().enumerate() {
        let path = dir.path().join(format!("rule{}.php", i));
        let catalog = format!(
            "<?php\nreturn ['plural-forms'=>'nplurals=3; plural={};',\
             'messages'=>['file'=>['файл','файла','файлов']]];\n",
            rule
        );
        std::fs::write(&path, catalog).unwrap();
        let file = path.to_string_lossy().into_owned();

        ngettext_test(&["-f", &file, "file", "files", "1"], "файл\n");
        ngettext_test(&["-f", &file, "file", "files", "5"], "файла\n");
    }
}
