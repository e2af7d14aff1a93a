// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/stack.rs

// The TF value stack. A single growable byte buffer holding a LIFO
// sequence of self-describing items, each laid out (low to high) as
// payload, one tag byte, then a four byte little-endian payload
// length. Reading the trailer backwards from the top is enough to pop
// an item without any forward scan.

// <>

use super::types::{TfType, FIXNUM_LEN, MIN_CAP, SIZE_LEN, TRAILER_LEN};
use super::TfErr;

use std::fmt;

/// TF value stack
pub struct TfStack {
    /// Backing memory; its length is the stack capacity
    buf: Vec<u8>,
    /// Offset of the next free byte
    top: usize,
}

/// View of one item on the stack
///
/// Borrowed from the stack, so it cannot outlive the next push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TfItem<'a> {
    pub typ: TfType,
    pub payload: &'a [u8],
}

impl TfItem<'_> {
    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Decodes the payload if this is a well formed fixnum
    pub fn as_fixnum(&self) -> Option<i32> {
        if self.typ != TfType::Fixnum {
            return None;
        }

        <[u8; FIXNUM_LEN]>::try_from(self.payload)
            .ok()
            .map(i32::from_le_bytes)
    }
}

impl fmt::Display for TfItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.typ {
            TfType::Fixnum => match self.as_fixnum() {
                Some(n) => write!(f, "{}", n),
                None => write!(f, "<bad fixnum {} bytes>", self.len()),
            },
            TfType::String => write!(f, "\"{}\"", String::from_utf8_lossy(self.payload)),
            TfType::Symbol => write!(f, "{}", String::from_utf8_lossy(self.payload)),
            TfType::Raw => write!(f, "<raw {} bytes>", self.len()),
        }
    }
}

/// Trailer length field for a payload of `len` bytes
fn trailer_size(len: usize) -> Result<u32, TfErr> {
    u32::try_from(len).map_err(|_| TfErr::ItemTooLarge { len })
}

impl TfStack {
    /// Creates an empty stack; nothing is allocated until the first push
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty stack with `cap` bytes already allocated
    pub fn with_capacity(cap: usize) -> Self {
        TfStack {
            buf: vec![0; cap],
            top: 0,
        }
    }

    /// Bytes currently allocated
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes currently in use
    #[inline(always)]
    pub fn top(&self) -> usize {
        self.top
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    /// The used part of the buffer, bottom first
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.top]
    }

    /// Drops every item; the buffer keeps its size
    pub fn clear(&mut self) {
        self.top = 0;
    }

    /// Grows the buffer until `extra` more bytes fit above the top
    ///
    /// Capacity doubles, starting from 16 bytes. Existing contents are
    /// preserved but may move, invalidating any outstanding item views.
    pub fn ensure_capacity(&mut self, extra: usize) {
        let need = self.top + extra;
        let old = self.buf.len();
        if need <= old {
            return;
        }

        let mut cap = old;
        while cap < need {
            cap = (cap * 2).max(MIN_CAP);
        }

        log::debug!("stack resize from {} to {}", old, cap);
        self.buf.resize(cap, 0);
    }

    /// Pushes a complete item
    ///
    /// Fails without touching the stack if the payload length does not
    /// fit the four byte trailer field.
    pub fn push_item(&mut self, payload: &[u8], typ: TfType) -> Result<(), TfErr> {
        let size = trailer_size(payload.len())?;
        self.ensure_capacity(payload.len() + TRAILER_LEN);
        self.push_raw(payload);
        self.write_trailer(typ, size);
        Ok(())
    }

    /// Appends bytes above the top without a trailer
    ///
    /// The bytes form the payload of an item still under construction;
    /// it must be closed with `finish_item` or discarded with
    /// `unwind_raw` before anything else reads the stack.
    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        let end = self.top + bytes.len();
        self.buf[self.top..end].copy_from_slice(bytes);
        self.top = end;
    }

    /// Closes an item whose last `len` payload bytes are already in place
    ///
    /// A length too wide for the trailer is refused and the stack is left
    /// as it was; the caller still owns the unfinished bytes.
    pub fn finish_item(&mut self, typ: TfType, len: usize) -> Result<(), TfErr> {
        let size = trailer_size(len)?;
        debug_assert!(len <= self.top);
        self.write_trailer(typ, size);
        Ok(())
    }

    fn write_trailer(&mut self, typ: TfType, size: u32) {
        self.ensure_capacity(TRAILER_LEN);
        self.buf[self.top] = typ as u8;
        self.top += 1;

        self.buf[self.top..self.top + SIZE_LEN].copy_from_slice(&size.to_le_bytes());
        self.top += SIZE_LEN;

        if cfg!(feature = "stkdbg") {
            log::trace!("push {} ({} bytes); top: {}", typ, size, self.top);
        }
    }

    /// Throws away `len` bytes of an unfinished item
    pub fn unwind_raw(&mut self, len: usize) -> Result<(), TfErr> {
        if len > self.top {
            return Err(TfErr::StackUnderflow {
                requested: len,
                available: self.top,
            });
        }

        self.top -= len;
        Ok(())
    }

    /// Finds the item whose trailer ends at `top`
    ///
    /// Returns its type and the payload bounds; every read is checked
    /// against `top` first.
    fn locate(&self, top: usize) -> Result<(TfType, usize, usize), TfErr> {
        if top < TRAILER_LEN {
            return Err(TfErr::StackUnderflow {
                requested: TRAILER_LEN,
                available: top,
            });
        }

        let mut size = [0; SIZE_LEN];
        size.copy_from_slice(&self.buf[top - SIZE_LEN..top]);
        let len = u32::from_le_bytes(size) as usize;

        let tag_at = top - TRAILER_LEN;
        if len > tag_at {
            return Err(TfErr::StackUnderflow {
                requested: len + TRAILER_LEN,
                available: top,
            });
        }

        let typ = TfType::try_from(self.buf[tag_at]).map_err(|tag| TfErr::CorruptItem { tag })?;

        Ok((typ, tag_at - len, tag_at))
    }

    /// Pops the top item, returning a view of it
    ///
    /// The bytes stay in the buffer; only the top moves. On error the
    /// stack is left untouched.
    pub fn pop_item(&mut self) -> Result<TfItem<'_>, TfErr> {
        let (typ, start, end) = self.locate(self.top)?;
        self.top = start;

        if cfg!(feature = "stkdbg") {
            log::trace!("pop {} ({} bytes); top: {}", typ, end - start, self.top);
        }

        Ok(TfItem {
            typ,
            payload: &self.buf[start..end],
        })
    }

    /// Reads the top item without popping it
    pub fn peek_item(&self) -> Result<TfItem<'_>, TfErr> {
        let (typ, start, end) = self.locate(self.top)?;
        Ok(TfItem {
            typ,
            payload: &self.buf[start..end],
        })
    }

    pub fn push_fixnum(&mut self, value: i32) {
        self.ensure_capacity(FIXNUM_LEN + TRAILER_LEN);
        self.push_raw(&value.to_le_bytes());
        self.write_trailer(TfType::Fixnum, FIXNUM_LEN as u32);
    }

    /// Pops a fixnum; an item of any other type stays where it is
    pub fn pop_fixnum(&mut self) -> Result<i32, TfErr> {
        let item = self.peek_item()?;
        if item.typ != TfType::Fixnum {
            return Err(TfErr::TypeMismatch {
                expected: TfType::Fixnum,
                found: item.typ,
            });
        }

        let value = item.as_fixnum().ok_or(TfErr::CorruptItem {
            tag: TfType::Fixnum as u8,
        })?;
        self.pop_item()?;

        Ok(value)
    }

    /// Walks the stack from top to bottom without consuming anything
    pub fn iter(&self) -> StackIter<'_> {
        StackIter {
            stack: self,
            pos: self.top,
        }
    }

    /// Number of items on the stack
    pub fn depth(&self) -> Result<usize, TfErr> {
        self.iter().try_fold(0, |n, item| item.map(|_| n + 1))
    }
}

impl Default for TfStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TfStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfStack")
            .field("capacity", &self.capacity())
            .field("top", &self.top)
            .finish()
    }
}

/// Top to bottom iterator over a stack
///
/// Yields an error and then stops if the stack does not decode
pub struct StackIter<'a> {
    stack: &'a TfStack,
    pos: usize,
}

impl<'a> Iterator for StackIter<'a> {
    type Item = Result<TfItem<'a>, TfErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == 0 {
            return None;
        }

        match self.stack.locate(self.pos) {
            Ok((typ, start, end)) => {
                self.pos = start;
                Some(Ok(TfItem {
                    typ,
                    payload: &self.stack.buf[start..end],
                }))
            }
            Err(e) => {
                self.pos = 0;
                Some(Err(e))
            }
        }
    }
}
