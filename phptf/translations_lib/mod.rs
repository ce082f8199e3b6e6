//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Translation file library
//!
//! This module provides the in-memory translation catalog, the PHP literal
//! format it is stored in, and the glue that turns decoded MO catalogs into
//! PHP translation files on disk.

pub mod catalog;
pub mod entry;
pub mod host;
pub mod literal;
pub mod php_file;
pub mod plural;
