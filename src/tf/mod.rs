// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/mod.rs

// The TF language. Source is read one literal at a time straight onto
// a tagged value stack, and each new item is evaluated as soon as it
// lands: literals stay put, symbols run native procedures.

// <>

pub mod cursor;
pub mod dump;
pub mod eval;
pub mod reader;
pub mod stack;
pub mod stdenv;
pub mod types;

use cursor::{ArgsCursor, ByteCursor, StreamCursor};
use stack::TfStack;
use types::TfType;

use std::io::Read;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TfErr {
    #[error("stack underflow: needed {requested} bytes, {available} available")]
    StackUnderflow { requested: usize, available: usize },
    #[error("malformed number: {0}")]
    MalformedNumber(String),
    #[error("unterminated string after {len} bytes")]
    UnterminatedString { len: usize },
    #[error("unknown procedure: {0}")]
    UnknownProcedure(String),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TfType, found: TfType },
    #[error("corrupt item with tag {tag:#04x}")]
    CorruptItem { tag: u8 },
    #[error("item of {len} bytes does not fit a trailer")]
    ItemTooLarge { len: usize },
}

impl TfErr {
    /// Fatal errors mean the stack can no longer be trusted; a run
    /// stops at the first one
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TfErr::StackUnderflow { .. } | TfErr::CorruptItem { .. } | TfErr::ItemTooLarge { .. }
        )
    }
}

/// Reads and evaluates items from the cursor until it runs dry
///
/// Recoverable errors are logged and skipped over; they are returned
/// in the order they happened. The first fatal error ends the run.
pub fn run<C: ByteCursor + ?Sized>(
    stack: &mut TfStack,
    cursor: &mut C,
) -> Result<Vec<TfErr>, TfErr> {
    let mut reported = vec![];

    loop {
        let step = match reader::read_one(cursor, stack) {
            Ok(false) => break,
            Ok(true) => eval::eval_top(stack),
            Err(e) => Err(e),
        };

        if let Err(e) = step {
            if e.is_fatal() {
                log::error!("{}", e);
                return Err(e);
            }

            log::warn!("{}", e);
            reported.push(e);
        }
    }

    Ok(reported)
}

/// Runs a list of words, each followed by an implied space
pub fn run_args<I, S>(stack: &mut TfStack, words: I) -> Result<Vec<TfErr>, TfErr>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    run(stack, &mut ArgsCursor::new(words))
}

/// Runs everything the stream yields
pub fn run_stream<R: Read>(stack: &mut TfStack, src: R) -> Result<Vec<TfErr>, TfErr> {
    run(stack, &mut StreamCursor::new(src))
}

/// Interprets TF source, returning a listing of the final stack
pub fn interpret(code: &str) -> Result<String, TfErr> {
    let mut stack = TfStack::new();
    run_stream(&mut stack, code.as_bytes())?;

    Ok(dump::stack_listing(&stack))
}
