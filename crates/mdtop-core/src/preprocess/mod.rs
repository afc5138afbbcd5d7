//! # Conditional Text Preprocessor
//!
//! This module implements a line-oriented, C-style preprocessor for molecular
//! topology and force-field files. It is the single point through which all
//! directive-annotated text enters the library.
//!
//! ## Supported directives
//!
//! Only the directive subset that appears in topology and force-field files is
//! recognized:
//!
//! 1. Conditionals: `#ifdef NAME`, `#ifndef NAME`, `#else`, `#endif`
//! 2. Diagnostics: `#error MESSAGE`, `#warning MESSAGE`
//! 3. Macro definitions: `#define NAME [REPLACEMENT]`, `#undef NAME`
//! 4. File inclusion: `#include "path"`, `#include <path>` (the two forms
//!    differ in search order exactly as in ANSI C)
//!
//! ## Usage
//!
//! ```ignore
//! use mdtop::preprocess::Preprocessor;
//!
//! for line in Preprocessor::open("topol.top")? {
//!     let line = line?;
//!     println!("{}:{}: {}", line.file.display(), line.line, line.text);
//! }
//! ```
//!
//! The iterator is lazy and single-pass: each file (including nested includes)
//! is held open only while its lines are being drained. Macro definitions and
//! the conditional stack are shared across include boundaries, so a
//! conditional opened in an including file may be closed inside an included
//! file and vice versa.
//!
//! Structural problems (unbalanced `#else`/`#endif`, unknown directives,
//! unresolvable includes, include cycles, `#error` inside an enabled block)
//! are fatal and terminate the sequence. `#warning` directives are collected
//! on the preprocessor and reported through [`Preprocessor::warnings`].

mod directive;
mod reader;
mod state;

pub use directive::{ClassifyError, Directive, classify, strip_comment};
pub use reader::{PreprocessOptions, Preprocessor, SourceLine};
pub use state::PreprocessorState;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preprocessing a directive-annotated file tree.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("I/O error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unbalanced conditional at {}:{line}: {reason}", file.display())]
    MalformedConditional {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("unknown preprocessor directive '{directive}' at {}:{line}", file.display())]
    UnknownDirective {
        directive: String,
        file: PathBuf,
        line: usize,
    },

    #[error("malformed directive at {}:{line}: {text}", file.display())]
    MalformedDirective {
        file: PathBuf,
        line: usize,
        text: String,
    },

    #[error("include file '{name}' not found (searched: {})", format_searched(searched))]
    IncludeNotFound { name: String, searched: Vec<PathBuf> },

    #[error("include cycle: '{}' is already being processed", path.display())]
    IncludeCycle { path: PathBuf },

    #[error("#error directive at {}:{line}: {message}", file.display())]
    Directive {
        message: String,
        file: PathBuf,
        line: usize,
    },
}

fn format_searched(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "<no include directories>".to_string();
    }
    dirs.iter()
        .map(|d| d.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-fatal `#warning` diagnostic encountered during preprocessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessWarning {
    pub message: String,
    pub file: PathBuf,
    pub line: usize,
}
