// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/stdenv.rs

// Native procedures built into every TF machine, and the table that
// maps their names to them.

// <>

use super::stack::TfStack;
use super::types::TfType;
use super::TfErr;

/// A native procedure; pops its own operands and pushes its results
pub type NativeFn = fn(&mut TfStack) -> Result<(), TfErr>;

/// Generates a slice of native TF procedures along with their names
///
/// The body sees the stack under the given name and must evaluate to
/// a `Result<(), TfErr>`.
macro_rules! tf_fn {
    ( const $array:ident; $stk:ident;
      $( $name:literal $body:block )+
    ) => {
        pub const $array: &[(&str, NativeFn)] =
            &[$(($name, |$stk: &mut TfStack| -> Result<(), TfErr> { $body })),+];
    };
}

// Arithmetic wraps around on overflow, as 32 bit machine words do.
tf_fn! {
    const PRIMS;
    stk;

    "add" {
        let (fst, snd) = pop_operands(stk)?;
        stk.push_fixnum(snd.wrapping_add(fst));
        Ok(())
    }

    // the first pop is the subtrahend: `a b sub` is a - b
    "sub" {
        let (fst, snd) = pop_operands(stk)?;
        stk.push_fixnum(snd.wrapping_sub(fst));
        Ok(())
    }

    "mult" {
        let (fst, snd) = pop_operands(stk)?;
        stk.push_fixnum(snd.wrapping_mul(fst));
        Ok(())
    }

    "dup" {
        let item = stk.pop_item()?;
        let (typ, payload) = (item.typ, item.payload.to_vec());
        stk.push_item(&payload, typ)?;
        stk.push_item(&payload, typ)
    }
}

/// Pops the top two fixnums, top first
///
/// Both items are type checked before either is popped, so a mismatch
/// leaves the stack as it was.
fn pop_operands(stk: &mut TfStack) -> Result<(i32, i32), TfErr> {
    for item in stk.iter().take(2) {
        let item = item?;
        if item.typ != TfType::Fixnum {
            return Err(TfErr::TypeMismatch {
                expected: TfType::Fixnum,
                found: item.typ,
            });
        }
    }

    let fst = stk.pop_fixnum()?;
    let snd = stk.pop_fixnum()?;
    Ok((fst, snd))
}

/// Finds the first procedure whose name matches exactly
pub fn lookup(name: &[u8]) -> Option<NativeFn> {
    PRIMS
        .iter()
        .find(|(nm, _)| nm.as_bytes() == name)
        .map(|&(_, proc)| proc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, stack: &mut TfStack) -> Result<(), TfErr> {
        lookup(name.as_bytes()).unwrap()(stack)
    }

    #[test]
    fn arithmetic() {
        let mut stack = TfStack::new();

        stack.push_fixnum(5);
        stack.push_fixnum(10);
        call("add", &mut stack).unwrap();
        assert_eq!(stack.pop_fixnum(), Ok(15));

        stack.push_fixnum(20);
        stack.push_fixnum(8);
        call("sub", &mut stack).unwrap();
        assert_eq!(stack.pop_fixnum(), Ok(12));

        stack.push_fixnum(-6);
        stack.push_fixnum(7);
        call("mult", &mut stack).unwrap();
        assert_eq!(stack.pop_fixnum(), Ok(-42));

        assert!(stack.is_empty());
    }

    #[test]
    fn wraps() {
        let mut stack = TfStack::new();
        stack.push_fixnum(i32::MAX);
        stack.push_fixnum(1);
        call("add", &mut stack).unwrap();
        assert_eq!(stack.pop_fixnum(), Ok(i32::MIN));
    }

    #[test]
    fn dup() {
        let mut stack = TfStack::new();
        stack.push_fixnum(3);
        call("dup", &mut stack).unwrap();
        assert_eq!(stack.pop_fixnum(), Ok(3));
        assert_eq!(stack.pop_fixnum(), Ok(3));

        stack.push_item(b"xy", TfType::String).unwrap();
        call("dup", &mut stack).unwrap();
        assert_eq!(stack.depth(), Ok(2));
        assert!(stack.iter().all(|i| i.unwrap().payload == b"xy"));
    }

    #[test]
    fn too_few_operands() {
        let mut stack = TfStack::new();
        stack.push_fixnum(1);
        assert!(matches!(
            call("add", &mut stack),
            Err(TfErr::StackUnderflow { .. })
        ));
        assert!(matches!(
            call("dup", &mut stack),
            Err(TfErr::StackUnderflow { .. })
        ));
    }

    #[test]
    fn operand_types() {
        let mismatch = Err(TfErr::TypeMismatch {
            expected: TfType::Fixnum,
            found: TfType::String,
        });

        // string under the top operand
        let mut stack = TfStack::new();
        stack.push_item(b"one", TfType::String).unwrap();
        stack.push_fixnum(1);
        let before = stack.as_bytes().to_vec();
        assert_eq!(call("mult", &mut stack), mismatch);
        assert_eq!(stack.as_bytes(), before.as_slice());

        // string on top
        let mut stack = TfStack::new();
        stack.push_fixnum(1);
        stack.push_item(b"one", TfType::String).unwrap();
        let before = stack.as_bytes().to_vec();
        for name in ["add", "sub", "mult"] {
            assert_eq!(call(name, &mut stack), mismatch);
            assert_eq!(stack.as_bytes(), before.as_slice());
        }
        assert_eq!(stack.depth(), Ok(2));
    }

    #[test]
    fn exact_names() {
        assert!(lookup(b"add").is_some());
        assert!(lookup(b"ADD").is_none());
        assert!(lookup(b"ad").is_none());
        assert!(lookup(b"add ").is_none());
        assert!(lookup(b"").is_none());
        assert_eq!(PRIMS.len(), 4);
    }
}
