// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/eval.rs

// Evaluates the item on top of the stack. Symbols name native
// procedures and are applied; every other value evaluates to itself.

// <>

use super::stack::TfStack;
use super::stdenv;
use super::types::TfType;
use super::TfErr;

/// Evaluates the top item in place
///
/// A symbol is popped and its procedure run against the stack; an
/// unknown symbol stays popped and is reported. Anything else is left
/// where it is.
pub fn eval_top(stack: &mut TfStack) -> Result<(), TfErr> {
    if stack.peek_item()?.typ != TfType::Symbol {
        return Ok(());
    }

    let sym = stack.pop_item()?;
    match stdenv::lookup(sym.payload) {
        Some(proc) => {
            log::trace!("apply {}", sym);
            proc(stack)
        }
        None => Err(TfErr::UnknownProcedure(
            String::from_utf8_lossy(sym.payload).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_stay() {
        let mut stack = TfStack::new();
        stack.push_fixnum(4);
        stack.push_item(b"text", TfType::String).unwrap();
        let before = stack.as_bytes().to_vec();

        eval_top(&mut stack).unwrap();
        assert_eq!(stack.as_bytes(), before.as_slice());

        stack.pop_item().unwrap();
        eval_top(&mut stack).unwrap();
        assert_eq!(stack.pop_fixnum(), Ok(4));
    }

    #[test]
    fn raw_stays() {
        let mut stack = TfStack::new();
        stack.push_item(b"add", TfType::Raw).unwrap();
        eval_top(&mut stack).unwrap();
        assert_eq!(stack.depth(), Ok(1));
    }

    #[test]
    fn applies_symbols() {
        let mut stack = TfStack::new();
        stack.push_fixnum(5);
        stack.push_fixnum(10);
        stack.push_fixnum(7);

        stack.push_item(b"add", TfType::Symbol).unwrap();
        eval_top(&mut stack).unwrap();
        stack.push_item(b"add", TfType::Symbol).unwrap();
        eval_top(&mut stack).unwrap();

        assert_eq!(stack.depth(), Ok(1));
        assert_eq!(stack.pop_fixnum(), Ok(22));
    }

    #[test]
    fn unknown_symbol_is_dropped() {
        let mut stack = TfStack::new();
        stack.push_fixnum(1);
        let before = stack.as_bytes().to_vec();

        stack.push_item(b"frobnicate", TfType::Symbol).unwrap();
        assert_eq!(
            eval_top(&mut stack),
            Err(TfErr::UnknownProcedure(String::from("frobnicate")))
        );
        assert_eq!(stack.as_bytes(), before.as_slice());
    }

    #[test]
    fn empty_stack() {
        let mut stack = TfStack::new();
        assert!(matches!(
            eval_top(&mut stack),
            Err(TfErr::StackUnderflow { .. })
        ));
    }
}
