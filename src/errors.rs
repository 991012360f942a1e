//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! All public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, MarrowError>`. Parse failures are
//! all-or-nothing: a malformed motion file never yields a partial clip,
//! and every parse error carries the offending line number (1-based)
//! together with the raw line text.

use thiserror::Error;

/// The main error type for the Marrow engine.
#[derive(Error, Debug)]
pub enum MarrowError {
    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Structural Parse Errors
    // ========================================================================
    /// Unexpected keyword or token.
    #[error("unexpected token at line {line}: {text:?}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// Raw line text
        text: String,
    },

    /// The file ended inside an unfinished section.
    #[error("unexpected end of file at line {line}")]
    UnexpectedEof { line: usize },

    /// Channel keyword not among the six recognized kinds.
    #[error("unknown channel keyword at line {line}: {name:?}")]
    UnknownChannel { line: usize, name: String },

    /// A token that should be a number could not be parsed as one.
    #[error("malformed number at line {line}: {text:?}")]
    BadNumber { line: usize, text: String },

    // ========================================================================
    // Integrity Errors
    // ========================================================================
    /// `CHANNELS` encountered before the joint's `OFFSET`.
    #[error("CHANNELS before OFFSET at line {line}: {text:?}")]
    MissingOffset { line: usize, text: String },

    /// An `End Site` block closed without declaring an `OFFSET`.
    #[error("End Site closed without an OFFSET at line {line}")]
    MissingEndSiteOffset { line: usize },

    /// `MOTION` encountered while a joint scope was still open.
    #[error("MOTION inside an open joint scope at line {line}")]
    UnbalancedHierarchy { line: usize },

    // ========================================================================
    // Frame Data Errors
    // ========================================================================
    /// A motion line's token count does not match the skeleton's total
    /// channel count.
    #[error("frame line {line} carries {found} values, expected {expected}")]
    FrameDataMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The declared `Frames:` value does not match the motion lines parsed.
    #[error("declared {declared} frames but parsed {parsed} motion lines")]
    FrameCountMismatch { declared: usize, parsed: usize },

    // ========================================================================
    // Playback Errors
    // ========================================================================
    /// Playback was started without a loaded clip.
    #[error("no motion clip loaded")]
    NoClipLoaded,
}

/// Alias for `Result<T, MarrowError>`.
pub type Result<T> = std::result::Result<T, MarrowError>;
