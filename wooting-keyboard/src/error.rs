//! Keyboard interface error types

use std::fmt;

use thiserror::Error;
use wooting_transport::TransportError;

/// Matrix axis named in range errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "Row"),
            Axis::Column => write!(f, "Column"),
        }
    }
}

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// No capability metadata for this product
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Metadata resolved but the protocol generation is not supported
    #[error("Pre-version 2 devices are not supported: {0}")]
    UnsupportedProtocol(String),

    /// The LED grid does not fit into one raw colour report
    #[error("LED grid of {rows}x{columns} needs {needed} bytes, report holds {capacity}")]
    BufferTooSmall {
        rows: u8,
        columns: u8,
        needed: usize,
        capacity: usize,
    },

    /// Command issued on a closed device
    #[error("Device not open")]
    NotOpen,

    /// Matrix position outside the device's dimensions
    #[error("{axis} out of range, max index should be: {max}. Got: {index}")]
    PositionOutOfRange { axis: Axis, index: u8, max: u8 },

    /// Feature command parameter outside 0..=255
    #[error("Parameter {index} must be 0..255. Got: {value}")]
    ParameterOutOfRange { index: usize, value: i32 },

    /// Malformed textual colour
    #[error("Hex code invalid: {0:?}")]
    InvalidHexColour(String),
}
