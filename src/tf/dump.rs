// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/dump.rs

// Human readable views of a stack; neither one consumes anything.

// <>

use super::stack::TfStack;

/// Lists every item from the top down, one per line
///
/// Each line holds the item's position (0 is the top), its type, its
/// payload length, and its value.
pub fn stack_listing(stack: &TfStack) -> String {
    let mut out = String::new();

    for (idx, item) in stack.iter().enumerate() {
        let line = match item {
            Ok(item) => format!("{}: {} ({} bytes) {}\n", idx, item.typ, item.len(), item),
            Err(e) => format!("{}: {}\n", idx, e),
        };
        out.push_str(&line);
    }

    out
}

/// The used part of the buffer as hex bytes, bottom first
pub fn hex(stack: &TfStack) -> String {
    stack
        .as_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
