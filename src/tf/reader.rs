// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/reader.rs

// Streaming reader for TF source. Pulls bytes from a cursor and
// writes each literal straight onto the stack; strings and symbols are
// built in place before their trailer is known.

// <>

use super::cursor::{ByteCursor, SENTINEL};
use super::stack::TfStack;
use super::types::TfType;
use super::TfErr;

/// Separates tokens; the cursor sentinel counts as one
#[inline(always)]
fn separator_p(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | SENTINEL)
}

/// Reads one literal from the cursor onto the stack
///
/// Returns false only when the input ran out before any token began.
/// The first byte of a token picks the reader: a digit means a fixnum,
/// a double quote a string, anything else a symbol.
pub fn read_one<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    stack: &mut TfStack,
) -> Result<bool, TfErr> {
    while separator_p(cursor.peek()) {
        if !cursor.advance() {
            return Ok(false);
        }
    }

    let c = cursor.peek();
    if c.is_ascii_digit() {
        read_fixnum(cursor, stack)
    } else if c == b'"' {
        read_string(cursor, stack)
    } else {
        read_symbol(cursor, stack)
    }
}

/// Decimal digits only; the token must end at a separator
fn read_fixnum<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    stack: &mut TfStack,
) -> Result<bool, TfErr> {
    let mut acc: Vec<u8> = Vec::new();
    let mut value: i32 = 0;

    loop {
        let c = cursor.peek();
        if !c.is_ascii_digit() {
            break;
        }

        acc.push(c);
        value = value.wrapping_mul(10).wrapping_add(i32::from(c - b'0'));
        cursor.advance();
    }

    if !separator_p(cursor.peek()) {
        // drop the rest of the token with the bad digits
        loop {
            let c = cursor.peek();
            if separator_p(c) {
                break;
            }
            acc.push(c);
            cursor.advance();
        }

        return Err(TfErr::MalformedNumber(String::from_utf8_lossy(&acc).into_owned()));
    }

    stack.push_fixnum(value);
    Ok(true)
}

/// Everything up to the closing quote, verbatim
fn read_string<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    stack: &mut TfStack,
) -> Result<bool, TfErr> {
    let mut len = 0;

    // opening quote
    let mut more = cursor.advance();

    while more {
        let c = cursor.peek();
        if c == b'"' {
            cursor.advance();
            return close_item(stack, TfType::String, len);
        }

        stack.push_raw(&[c]);
        len += 1;
        more = cursor.advance();
    }

    stack.unwind_raw(len)?;
    Err(TfErr::UnterminatedString { len })
}

/// A run of anything but separators
fn read_symbol<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    stack: &mut TfStack,
) -> Result<bool, TfErr> {
    let mut len = 0;

    loop {
        let c = cursor.peek();
        if separator_p(c) {
            break;
        }

        stack.push_raw(&[c]);
        len += 1;
        if !cursor.advance() {
            break;
        }
    }

    if len == 0 {
        return Ok(false);
    }

    close_item(stack, TfType::Symbol, len)
}

/// Finishes an item built in place, dropping its bytes if it is refused
fn close_item(stack: &mut TfStack, typ: TfType, len: usize) -> Result<bool, TfErr> {
    if let Err(e) = stack.finish_item(typ, len) {
        stack.unwind_raw(len)?;
        return Err(e);
    }

    Ok(true)
}
