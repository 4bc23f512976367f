//! Matrix position packing and parameter range checks

use crate::error::KeyboardError;

/// Row and column of a key in the LED matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MatrixPosition {
    pub row: u8,
    pub column: u8,
}

impl MatrixPosition {
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }
}

impl From<(u8, u8)> for MatrixPosition {
    fn from((row, column): (u8, u8)) -> Self {
        Self { row, column }
    }
}

/// Pack a position into one byte: row in bits 5-7, column in bits 0-4
///
/// Rows above 7 and columns above 31 wrap silently; validate first.
pub fn pack_position(pos: MatrixPosition) -> u8 {
    ((pos.row & 0x07) << 5) | (pos.column & 0x1F)
}

/// Inverse of [`pack_position`]
pub fn unpack_position(packed: u8) -> MatrixPosition {
    MatrixPosition {
        row: (packed >> 5) & 0x07,
        column: packed & 0x1F,
    }
}

/// Check that every value fits in a byte
///
/// Fails on the first offending value, reporting its index.
pub fn check_u8_range(values: &[i32]) -> Result<(), KeyboardError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(0..=255).contains(*v))
    {
        Some((index, &value)) => Err(KeyboardError::ParameterOutOfRange { index, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_roundtrip_valid_range() {
        for row in 0..8 {
            for column in 0..32 {
                let pos = MatrixPosition::new(row, column);
                assert_eq!(unpack_position(pack_position(pos)), pos);
            }
        }
    }

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_position(MatrixPosition::new(0, 0)), 0);
        assert_eq!(pack_position(MatrixPosition::new(1, 0)), 0b0010_0000);
        assert_eq!(pack_position(MatrixPosition::new(5, 20)), 0b1011_0100);
        assert_eq!(pack_position(MatrixPosition::new(7, 31)), 0xFF);
    }

    #[test]
    fn test_pack_wraps_out_of_range() {
        // row 9 keeps only its low 3 bits, column 33 only its low 5
        assert_eq!(
            unpack_position(pack_position(MatrixPosition::new(9, 33))),
            MatrixPosition::new(1, 1)
        );
    }

    #[test]
    fn test_check_u8_range() {
        assert!(check_u8_range(&[0, 128, 255]).is_ok());
        assert!(matches!(
            check_u8_range(&[0, 256, -1]),
            Err(KeyboardError::ParameterOutOfRange { index: 1, value: 256 })
        ));
        assert!(matches!(
            check_u8_range(&[-1]),
            Err(KeyboardError::ParameterOutOfRange { index: 0, value: -1 })
        ));
    }
}
