// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

/// An error raised while building or querying curves.
///
/// Numeric edge cases never surface here: queries with no answer return
/// `None` or an empty result. Only invalid input and impossible selections
/// are errors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// The input edge failed the validity check.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Two lines that must meet are parallel.
    #[error("invalid selection: lines are parallel")]
    ParallelLines,
}

/// An error raised while reading or writing persisted records.
///
/// A field whose value cannot be parsed is not an error; the reader marks
/// the record as partially restored instead. These errors cover a document
/// whose structure cannot be followed at all.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum PersistError {
    /// The XML itself is malformed.
    #[error("malformed XML at byte {position}: {message}")]
    Xml {
        /// Byte offset of the reader when the error occurred.
        position: u64,
        /// Description from the XML parser.
        message: String,
    },
    /// The input ended before the expected element was found.
    #[error("unexpected end of document while looking for <{0}>")]
    UnexpectedEof(String),
    /// A required attribute is missing from a structural element.
    #[error("element <{element}> has no attribute `{attribute}`")]
    MissingAttribute {
        /// The element name.
        element: String,
        /// The missing attribute.
        attribute: String,
    },
}
