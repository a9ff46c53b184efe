/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types for table generation.

use fixspec_dictionary::CompileError;
use thiserror::Error;

/// Error type for table generation.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The dictionary failed to compile; nothing is emitted.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Formatting into the output buffer failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    /// Returns the compile error, if generation failed because of the dictionary.
    #[must_use]
    pub fn compile_error(&self) -> Option<&CompileError> {
        match self {
            Self::Compile(err) => Some(err),
            _ => None,
        }
    }
}
