// TF, a tiny machine for tagged stack programs.

// SPDX-FileCopyrightText: © 2024 Matthew Rothlisberger
// SPDX-License-Identifier: AGPL-3.0-only

// TF is licensed under the terms of the GNU Affero General Public
// License version 3. See the top-level LICENSES directory for the
// license text.

// Find full copyright information in the top-level COPYRIGHT file.

// <>

// src/tf/types.rs

// Type tags and layout constants for items on the TF stack.

// <>

use std::fmt;

/// Width of the type tag in an item trailer
pub const TYPE_LEN: usize = 1;
/// Width of the payload length in an item trailer
pub const SIZE_LEN: usize = 4;
/// Full trailer width; every item costs this much beyond its payload
pub const TRAILER_LEN: usize = TYPE_LEN + SIZE_LEN;
/// Payload width of a fixnum
pub const FIXNUM_LEN: usize = 4;
/// Smallest buffer a growing stack will allocate
pub const MIN_CAP: usize = 16;

macro_rules! enum_and_tryfrom {
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($(#[$vmeta:meta])* $vname:ident $(= $val:expr)?,)*
    }) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$vmeta])* $vname $(= $val)?,)*
        }

        impl std::convert::TryFrom<u8> for $name {
            type Error = u8;

            #[inline(always)]
            fn try_from(v: u8) -> Result<Self, Self::Error> {
                match v {
                    $(x if x == $name::$vname as u8 => Ok($name::$vname),)*
                    _ => Err(v),
                }
            }
        }
    }
}

enum_and_tryfrom! {
    /// Every item on the stack carries exactly one of these tags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    pub enum TfType {
        /// Untyped payload; never produced by the reader
        Raw = 0,
        Fixnum = 1,
        String = 2,
        Symbol = 3,
    }
}

impl TfType {
    /// Short lowercase name, as shown in stack dumps
    pub fn name(self) -> &'static str {
        match self {
            TfType::Raw => "raw",
            TfType::Fixnum => "fixnum",
            TfType::String => "string",
            TfType::Symbol => "symbol",
        }
    }
}

impl fmt::Display for TfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
