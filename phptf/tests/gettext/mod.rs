//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{run_test, run_test_base_with_env, run_test_with_env, TestPlan};
use tempfile::TempDir;

const DE_CATALOG: &str = concat!(
    "<?php\nreturn ['language'=>'de_DE',",
    "'messages'=>['Hello'=>'Hallo','Open'=>['Öffnen'],",
    "'file\u{4}Open'=>['Datei öffnen'],'It\\'s'=>['Es ist'],'grey'=>['']]];\n",
);

fn write_catalog(dir: &TempDir) -> String {
    let path = dir.path().join("de_DE.php");
    std::fs::write(&path, DE_CATALOG).unwrap();
    path.to_string_lossy().into_owned()
}

fn gettext_test(args: &[&str], expected_out: &str) {
    run_test(TestPlan {
        cmd: String::from("php-gettext"),
        args: args.iter().map(|s| s.to_string()).collect(),
        stdin_data: String::new(),
        expected_out: String::from(expected_out),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

#[test]
fn test_gettext_no_catalog() {
    gettext_test(&["Hello, World!"], "Hello, World!\n");
}

#[test]
fn test_gettext_translates() {
    let dir = TempDir::new().unwrap();
    let file = write_catalog(&dir);

    gettext_test(&["-f", &file, "Hello"], "Hallo\n");
    gettext_test(&["--file", &file, "Open"], "Öffnen\n");
    gettext_test(&["-f", &file, "It's"], "Es ist\n");
}

#[test]
fn test_gettext_context() {
    let dir = TempDir::new().unwrap();
    let file = write_catalog(&dir);

    gettext_test(&["-f", &file, "-c", "file", "Open"], "Datei öffnen\n");
    gettext_test(&["-f", &file, "--context", "edit", "Open"], "Open\n");
}

#[test]
fn test_gettext_untranslated() {
    let dir = TempDir::new().unwrap();
    let file = write_catalog(&dir);

    gettext_test(&["-f", &file, "Goodbye"], "Goodbye\n");
    gettext_test(&["-f", &file, "grey"], "grey\n");
}

#[test]
fn test_gettext_invalid_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.php");
    std::fs::write(&path, "<?php\nreturn [1,,2];\n").unwrap();

    gettext_test(&["-f", &path.to_string_lossy(), "Hello"], "Hello\n");

    // Not an error-level event: nothing is printed at the error filter
    run_test_with_env(
        TestPlan {
            cmd: String::from("php-gettext"),
            args: vec![
                String::from("-f"),
                path.to_string_lossy().into_owned(),
                String::from("Hello"),
            ],
            stdin_data: String::new(),
            expected_out: String::from("Hello\n"),
            expected_err: String::new(),
            expected_exit_code: 0,
        },
        &[("RUST_LOG", "error")],
    );
}

#[test]
fn test_gettext_invalid_catalog_logs_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.php");
    std::fs::write(&path, "<?php\nreturn [1,,2];\n").unwrap();

    let output = run_test_base_with_env(
        "php-gettext",
        &[
            String::from("-f"),
            path.to_string_lossy().into_owned(),
            String::from("Hello"),
        ],
        b"",
        &[("RUST_LOG", "warn")],
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARN"), "stderr: {}", stderr);
    assert!(stderr.contains("parse error at offset 16"), "stderr: {}", stderr);
}
