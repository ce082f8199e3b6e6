//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! php-translation-files library
//!
//! Converts gettext MO catalogs into PHP translation files and serves
//! lookups from them:
//! - literal: PHP array literal serializer and parser
//! - catalog/entry/plural: translation catalog with plural selection
//! - php_file: import and export of PHP translation files
//! - host: filesystem, decoder and text domain registry seams

pub mod translations_lib;
