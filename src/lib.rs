// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/lib.rs

// Library root.

// <>

//! A minimal stack machine
//!
//! Literals are read from a byte source directly onto a tagged value
//! stack; symbols name native procedures that work on that stack.

pub mod tf;
