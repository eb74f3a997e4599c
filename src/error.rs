//! Parse errors.
//!
//! Every error here is fatal for the parse call that raised it: the
//! parser returns no partial result. Registrations performed by earlier
//! lines of the same call (definitions, type signatures) are kept, since
//! they happened before the failing line was reached.

use thiserror::Error;

/// A fatal parse error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A string literal ran past the end of its line.
    #[error("expected an ending quote before the end of the line (missing a space?)")]
    UnterminatedString,

    /// A list literal ran past the end of its line.
    #[error("expected a closing bracket before the end of the line (missing a space?)")]
    UnterminatedList,

    /// A word in type-signature position was not a known type token.
    #[error("unrecognized type: {0}")]
    UnknownType(String),

    /// A `|` appeared before the first `->` of a signature unit.
    #[error("type alternative specified before completion of a signature unit")]
    MisplacedAlternative,

    /// A token classified as numeric was rejected by the number library.
    #[error("malformed number `{token}`: {reason}")]
    InvalidNumber { token: String, reason: String },
}
