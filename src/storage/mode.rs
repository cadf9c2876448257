//! File open modes in the conventional `r` / `w` / `a` / `x` notation

use super::traits::StorageError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Access {
    Read,
    Write,
    Append,
    Exclusive,
}

/// How a file is opened.
///
/// Parsed from strings such as `"r"`, `"wb"`, `"a+"`. The `b` and `t`
/// flags are accepted and ignored; handles always deal in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenMode {
    access: Access,
    update: bool,
}

impl OpenMode {
    pub const READ: Self = Self { access: Access::Read, update: false };
    pub const WRITE: Self = Self { access: Access::Write, update: false };
    pub const APPEND: Self = Self { access: Access::Append, update: false };
    pub const CREATE_NEW: Self = Self { access: Access::Exclusive, update: false };

    /// The same mode with `+` (read and write)
    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    pub fn readable(&self) -> bool {
        self.access == Access::Read || self.update
    }

    pub fn writable(&self) -> bool {
        self.access != Access::Read || self.update
    }

    /// Existing content is discarded on open
    pub fn truncates(&self) -> bool {
        self.access == Access::Write
    }

    /// The object is created if missing
    pub fn creates(&self) -> bool {
        self.access != Access::Read
    }

    /// Opening fails if the object already exists
    pub fn is_exclusive(&self) -> bool {
        self.access == Access::Exclusive
    }

    /// Every write goes to the end
    pub fn is_append(&self) -> bool {
        self.access == Access::Append
    }
}

impl FromStr for OpenMode {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StorageError::InvalidMode(s.to_string());
        let mut access = None;
        let mut update = false;
        let mut binary = false;
        let mut text = false;

        for c in s.chars() {
            let next = match c {
                'r' => Access::Read,
                'w' => Access::Write,
                'a' => Access::Append,
                'x' => Access::Exclusive,
                '+' if !update => {
                    update = true;
                    continue;
                }
                'b' if !binary && !text => {
                    binary = true;
                    continue;
                }
                't' if !binary && !text => {
                    text = true;
                    continue;
                }
                _ => return Err(invalid()),
            };
            if access.replace(next).is_some() {
                return Err(invalid());
            }
        }

        access
            .map(|access| Self { access, update })
            .ok_or_else(invalid)
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self.access {
            Access::Read => 'r',
            Access::Write => 'w',
            Access::Append => 'a',
            Access::Exclusive => 'x',
        };
        if self.update {
            write!(f, "{}+", c)
        } else {
            write!(f, "{}", c)
        }
    }
}
