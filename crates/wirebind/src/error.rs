// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the serializer.
//!
//! A single flat [`Error`] enum, grouped by the phase that produces it.
//! [`Error::kind`] maps every variant onto one of the four [`ErrorKind`]
//! categories so callers can branch on "configuration vs decoding" without
//! matching every variant.

use std::fmt;
use std::io;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised synchronously while building a serializer.
    Configuration,
    /// A peer's class-definition container does not match the local one.
    SchemaInconsistent,
    /// The input stream cannot be decoded.
    Decoding,
    /// Failure while executing a serialize or deserialize call.
    Execution,
}

/// Serializer error.
///
/// Configuration variants name the offending type and property; decoding
/// variants name the class id or canonical name so schema drift can be
/// diagnosed from the message alone.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Two bindings were registered under the same canonical name (or hash to the same id).
    DuplicateBinding { canonical_name: String },
    /// A class declares the same property twice.
    DuplicateProperty {
        canonical_name: String,
        property: String,
    },
    /// A marshaller was bound to a property the class does not declare.
    MissingProperty {
        canonical_name: String,
        property: String,
    },
    /// A property references a class or enum that was never registered.
    UnknownPropertyType {
        canonical_name: String,
        property: String,
        type_name: String,
    },
    /// A marshaller override does not accept the type it was bound to.
    IncompatibleMarshaller {
        marshaller: String,
        type_name: String,
    },
    /// Invalid configuration value.
    InvalidConfig(String),
    /// Configuration file not found at specified path.
    ConfigFileNotFound(String),

    // ========================================================================
    // Schema Errors
    // ========================================================================
    /// Remote class definitions disagree with the local ones.
    SchemaInconsistent {
        canonical_name: String,
        reason: String,
    },

    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// Stream references a class id absent from the active container.
    UnknownClassId(i64),
    /// Class id resolved to a canonical name with no local binding.
    UnknownCanonicalName(String),
    /// Null flag byte was neither 0 nor 1.
    MalformedNullFlag { offset: usize, value: u8 },
    /// Enum ordinal outside the local constant list.
    UnmatchedEnumOrdinal { canonical_name: String, ordinal: i32 },
    /// Reference id neither known nor the next expected id.
    InvalidReference { offset: usize, reference: i64 },
    /// Structurally invalid input (negative length, bad string encoding, ...).
    InvalidData { offset: usize, reason: String },
    /// Underlying read failed (includes truncated input).
    DecodeIo { offset: usize, source: io::Error },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Underlying write or read failed outside of decoding.
    Io {
        context: &'static str,
        source: io::Error,
    },
    /// Runtime value has no registered binding.
    UnregisteredType(String),
    /// Value does not have the shape the marshaller or accessor expects.
    TypeMismatch { expected: String, found: String },
    /// Null where the declared property or slot is not nullable.
    NullNotAllowed { context: String },
    /// Instantiator returned nothing for the named class.
    InstantiationFailed(String),
    /// Object graph nests deeper than `max_depth`.
    DepthExceeded(usize),
}

impl Error {
    /// Classify this error into one of the four categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateBinding { .. }
            | Error::DuplicateProperty { .. }
            | Error::MissingProperty { .. }
            | Error::UnknownPropertyType { .. }
            | Error::IncompatibleMarshaller { .. }
            | Error::InvalidConfig(_)
            | Error::ConfigFileNotFound(_) => ErrorKind::Configuration,
            Error::SchemaInconsistent { .. } => ErrorKind::SchemaInconsistent,
            Error::UnknownClassId(_)
            | Error::UnknownCanonicalName(_)
            | Error::MalformedNullFlag { .. }
            | Error::UnmatchedEnumOrdinal { .. }
            | Error::InvalidReference { .. }
            | Error::InvalidData { .. }
            | Error::DecodeIo { .. } => ErrorKind::Decoding,
            Error::Io { .. }
            | Error::UnregisteredType(_)
            | Error::TypeMismatch { .. }
            | Error::NullNotAllowed { .. }
            | Error::InstantiationFailed(_)
            | Error::DepthExceeded(_) => ErrorKind::Execution,
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn null_not_allowed(context: impl Into<String>) -> Self {
        Error::NullNotAllowed {
            context: context.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration
            Error::DuplicateBinding { canonical_name } => {
                write!(f, "Duplicate binding for class '{}'", canonical_name)
            }
            Error::DuplicateProperty {
                canonical_name,
                property,
            } => write!(
                f,
                "Class '{}' declares property '{}' more than once",
                canonical_name, property
            ),
            Error::MissingProperty {
                canonical_name,
                property,
            } => write!(
                f,
                "Class '{}' has no property '{}'",
                canonical_name, property
            ),
            Error::UnknownPropertyType {
                canonical_name,
                property,
                type_name,
            } => write!(
                f,
                "Property '{}::{}' references unregistered type '{}'",
                canonical_name, property, type_name
            ),
            Error::IncompatibleMarshaller {
                marshaller,
                type_name,
            } => write!(
                f,
                "Marshaller '{}' cannot handle type '{}'",
                marshaller, type_name
            ),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            // Schema
            Error::SchemaInconsistent {
                canonical_name,
                reason,
            } => write!(
                f,
                "Class definition for '{}' is inconsistent: {}",
                canonical_name, reason
            ),
            // Decoding
            Error::UnknownClassId(id) => write!(f, "Unknown class id {:#018x}", id),
            Error::UnknownCanonicalName(name) => {
                write!(f, "No local binding for class '{}'", name)
            }
            Error::MalformedNullFlag { offset, value } => write!(
                f,
                "Malformed null flag {:#04x} at offset {}",
                value, offset
            ),
            Error::UnmatchedEnumOrdinal {
                canonical_name,
                ordinal,
            } => write!(
                f,
                "Ordinal {} does not match any constant of enum '{}'",
                ordinal, canonical_name
            ),
            Error::InvalidReference { offset, reference } => write!(
                f,
                "Invalid object reference {} at offset {}",
                reference, offset
            ),
            Error::InvalidData { offset, reason } => {
                write!(f, "Invalid data at offset {}: {}", offset, reason)
            }
            Error::DecodeIo { offset, source } => {
                write!(f, "Decoding failed at offset {}: {}", offset, source)
            }
            // Execution
            Error::Io { context, source } => write!(f, "I/O error during {}: {}", context, source),
            Error::UnregisteredType(name) => write!(f, "No binding registered for '{}'", name),
            Error::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Error::NullNotAllowed { context } => write!(f, "Null not allowed for {}", context),
            Error::InstantiationFailed(name) => {
                write!(f, "Could not instantiate class '{}'", name)
            }
            Error::DepthExceeded(max) => write!(
                f,
                "Object graph exceeds maximum nesting depth of {}",
                max
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DecodeIo { source, .. } | Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            context: "stream",
            source,
        }
    }
}

/// Convenient alias for results using the crate [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
