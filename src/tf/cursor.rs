// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/cursor.rs

// Byte sources for the reader. Each one offers a single byte of
// lookahead over some input: a live stream, or a list of words that
// has already been split apart (command line arguments).

// <>

use std::io::{self, Read};

/// Byte value seen before the first `advance` and after exhaustion
pub const SENTINEL: u8 = 0;

/// One byte lookahead over a byte source
///
/// A fresh cursor sits on `SENTINEL`; the first `advance` moves onto
/// the first real byte. Only `advance` returning false means the input
/// is exhausted. From then on `peek` returns `SENTINEL` and every
/// further `advance` returns false.
pub trait ByteCursor {
    /// The byte at the read position; does not consume it
    fn peek(&self) -> u8;

    /// Consumes the current byte; false when no byte follows
    fn advance(&mut self) -> bool;
}

/// Cursor over anything implementing `Read`, one byte at a time
///
/// Wrap unbuffered handles (such as stdin) in a `BufReader` first.
pub struct StreamCursor<R> {
    src: R,
    cur: u8,
    done: bool,
}

impl<R: Read> StreamCursor<R> {
    pub fn new(src: R) -> Self {
        StreamCursor {
            src,
            cur: SENTINEL,
            done: false,
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0; 1];
        loop {
            match self.src.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("input stream failed, treating as end: {}", e);
                    return None;
                }
            }
        }
    }
}

impl<R: Read> ByteCursor for StreamCursor<R> {
    fn peek(&self) -> u8 {
        self.cur
    }

    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }

        match self.read_byte() {
            Some(b) => {
                self.cur = b;
                true
            }
            None => {
                self.cur = SENTINEL;
                self.done = true;
                false
            }
        }
    }
}

/// Cursor over a list of pre-split words
///
/// Reads as if every word were followed by one space, so `["1", "2"]`
/// looks the same to the reader as the text `"1 2 "`.
pub struct ArgsCursor<S> {
    words: Vec<S>,
    /// Index of the word being read
    word: usize,
    /// Position inside that word; equal to its length on the implied space
    pos: usize,
    started: bool,
    done: bool,
}

impl<S: AsRef<[u8]>> ArgsCursor<S> {
    pub fn new<I: IntoIterator<Item = S>>(words: I) -> Self {
        ArgsCursor {
            words: words.into_iter().collect(),
            word: 0,
            pos: 0,
            started: false,
            done: false,
        }
    }
}

impl<S: AsRef<[u8]>> ByteCursor for ArgsCursor<S> {
    fn peek(&self) -> u8 {
        if !self.started || self.done {
            return SENTINEL;
        }

        let word = self.words[self.word].as_ref();
        if self.pos < word.len() {
            word[self.pos]
        } else {
            b' '
        }
    }

    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }

        if !self.started {
            self.started = true;
        } else if self.pos < self.words[self.word].as_ref().len() {
            self.pos += 1;
        } else {
            self.word += 1;
            self.pos = 0;
        }

        if self.word >= self.words.len() {
            self.done = true;
        }

        !self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<C: ByteCursor>(mut cursor: C) -> Vec<u8> {
        let mut out = vec![];
        while cursor.advance() {
            out.push(cursor.peek());
        }
        out
    }

    #[test]
    fn stream_bytes() {
        let mut cursor = StreamCursor::new(&b"ab"[..]);
        assert_eq!(cursor.peek(), SENTINEL);

        assert!(cursor.advance());
        assert_eq!(cursor.peek(), b'a');
        assert_eq!(cursor.peek(), b'a');

        assert!(cursor.advance());
        assert_eq!(cursor.peek(), b'b');

        assert!(!cursor.advance());
        assert_eq!(cursor.peek(), SENTINEL);
        assert!(!cursor.advance());
        assert!(!cursor.advance());
    }

    #[test]
    fn stream_empty() {
        let mut cursor = StreamCursor::new(io::empty());
        assert!(!cursor.advance());
        assert!(!cursor.advance());
        assert_eq!(cursor.peek(), SENTINEL);
    }

    #[test]
    fn args_implied_spaces() {
        assert_eq!(drain(ArgsCursor::new(vec!["12", "add"])), b"12 add ");
        assert_eq!(drain(ArgsCursor::new(vec!["\"a", "b\""])), b"\"a b\" ");
    }

    #[test]
    fn args_empty_words() {
        assert_eq!(drain(ArgsCursor::new(vec!["", "x", ""])), b" x  ");
        assert_eq!(drain(ArgsCursor::new(Vec::<String>::new())), b"");
    }

    #[test]
    fn args_exhaustion_is_sticky() {
        let mut cursor = ArgsCursor::new(vec![String::from("a")]);
        assert_eq!(cursor.peek(), SENTINEL);
        assert!(cursor.advance());
        assert_eq!(cursor.peek(), b'a');
        assert!(cursor.advance());
        assert_eq!(cursor.peek(), b' ');
        assert!(!cursor.advance());
        assert_eq!(cursor.peek(), SENTINEL);
        assert!(!cursor.advance());
    }

    #[test]
    fn matches_stream() {
        let words = vec!["5", "\"x", "y\"", "dup"];
        let text = b"5 \"x y\" dup ";
        assert_eq!(drain(ArgsCursor::new(words)), drain(StreamCursor::new(&text[..])));
    }
}
