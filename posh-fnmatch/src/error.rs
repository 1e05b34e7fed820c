// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PatternError {
    #[error("invalid character class in pattern")]
    InvalidCharClass,
}
