//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use plib::testing::{run_test, run_test_with_checker, TestPlan};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn msgcat_test(args: Vec<String>, expected_err: &str, expected_exit_code: i32) {
    run_test(TestPlan {
        cmd: String::from("php-msgcat"),
        args,
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::from(expected_err),
        expected_exit_code,
    });
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_msgcat_later_files_win() {
    let dir = TempDir::new().unwrap();
    let de = write_file(
        &dir,
        "de.php",
        "<?php\nreturn ['language'=>'de_DE','messages'=>['Hello'=>'Hallo','Bye'=>'Tschüss']];\n",
    );
    let fr = write_file(
        &dir,
        "fr.php",
        "<?php\nreturn ['language'=>'fr_FR','messages'=>['Hello'=>'Salut','Yes'=>'Oui']];\n",
    );
    let out = dir.path().join("out.php");

    msgcat_test(
        vec![
            String::from("-o"),
            path_arg(&out),
            String::from("-g"),
            String::from("test"),
            path_arg(&de),
            path_arg(&fr),
        ],
        "",
        0,
    );

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "<?php\nreturn ['translation-revision-date'=>'+0000','generator'=>'test',\
         'messages'=>['Hello'=>['Salut'],'Bye'=>['Tschüss'],'Yes'=>['Oui']],'language'=>'de_DE'];\n"
    );
}

#[test]
fn test_msgcat_headers_from_first_file_with_headers() {
    let dir = TempDir::new().unwrap();
    let bare = write_file(&dir, "bare.php", "<?php\nreturn ['messages'=>['a'=>'b']];\n");
    let fr = write_file(
        &dir,
        "fr.php",
        "<?php\nreturn ['language'=>'fr_FR','plural-forms'=>'nplurals=2; plural=n>1;',\
         'messages'=>['file'=>['fichier','fichiers']]];\n",
    );
    let out = dir.path().join("out.php");

    msgcat_test(
        vec![
            String::from("--output"),
            path_arg(&out),
            String::from("--generator"),
            String::from("test"),
            path_arg(&bare),
            path_arg(&fr),
        ],
        "",
        0,
    );

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "<?php\nreturn ['translation-revision-date'=>'+0000','generator'=>'test',\
         'messages'=>['a'=>['b'],'file'=>['fichier','fichiers']],\
         'language'=>'fr_FR','plural-forms'=>'nplurals=2; plural=n>1;'];\n"
    );
}

#[test]
fn test_msgcat_default_generator() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "in.php", "<?php\nreturn ['messages'=>[]];\n");
    let out = dir.path().join("out.php");

    let plan = TestPlan {
        cmd: String::from("php-msgcat"),
        args: vec![String::from("-o"), path_arg(&out), path_arg(&input)],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    };

    run_test_with_checker(plan, |plan, output| {
        assert_eq!(output.status.code(), Some(plan.expected_exit_code));
        assert!(output.stdout.is_empty());

        let text = std::fs::read_to_string(&out).unwrap();
        let generator = format!(
            "'generator'=>'php-translation-files/{}'",
            env!("CARGO_PKG_VERSION")
        );
        assert!(text.contains(&generator), "{}", text);
        assert!(text.contains("'messages'=>[]"));
    });
}

#[test]
fn test_msgcat_missing_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.php");
    let out = dir.path().join("out.php");

    msgcat_test(
        vec![String::from("-o"), path_arg(&out), path_arg(&missing)],
        &format!("php-msgcat: {}: no such file\n", missing.display()),
        1,
    );
    assert!(!out.exists());
}

#[test]
fn test_msgcat_invalid_input() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "bad.php", "<?php\nreturn 'foo';\n");
    let out = dir.path().join("out.php");

    msgcat_test(
        vec![String::from("-o"), path_arg(&out), path_arg(&input)],
        "php-msgcat: invalid catalog format: catalog is not an array\n",
        1,
    );
}
