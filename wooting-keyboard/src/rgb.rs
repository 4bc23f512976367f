//! Per-key RGB control
//!
//! Colours are written into a row-major buffer with [`RgbDevice::set_rgb`] and
//! sent in one raw report by [`RgbDevice::flush_rgb_buffer`]. Single-key
//! commands bypass the buffer, so the two can disagree about what the
//! keyboard shows.

use tracing::debug;
use wooting_transport::BoxedHandle;

use crate::color::{encode_rgb, Rgb};
use crate::device::{DeviceBase, DeviceKind};
use crate::error::{Axis, KeyboardError};
use crate::keyboard_info::KeyboardInfo;
use crate::packing::{pack_position, MatrixPosition};
use crate::protocol::{cmd, MAGIC, REPORT_ID, RGB_REPORT_HEADER_LEN, RGB_REPORT_SIZE};

/// Keyboard with per-key RGB lighting
pub struct RgbDevice {
    base: DeviceBase,
    /// `buffer[row][column]`
    buffer: Vec<Vec<Rgb>>,
    dirty: bool,
}

impl RgbDevice {
    /// Create an RGB device for a handle
    ///
    /// Metadata is looked up by product id unless `info` is given.
    pub fn new(handle: BoxedHandle, info: Option<KeyboardInfo>) -> Result<Self, KeyboardError> {
        let base = DeviceBase::new(handle, DeviceKind::Rgb, info)?;
        let info = base.info();

        let needed = RGB_REPORT_HEADER_LEN + info.rows as usize * info.columns as usize * 2;
        if needed > RGB_REPORT_SIZE {
            return Err(KeyboardError::BufferTooSmall {
                rows: info.rows,
                columns: info.columns,
                needed,
                capacity: RGB_REPORT_SIZE,
            });
        }

        let buffer = vec![vec![Rgb::BLACK; info.columns as usize]; info.rows as usize];
        Ok(Self {
            base,
            buffer,
            dirty: false,
        })
    }

    pub fn base(&self) -> &DeviceBase {
        &self.base
    }

    pub fn printable_id(&self) -> String {
        self.base.printable_id()
    }

    pub fn info(&self) -> &KeyboardInfo {
        self.base.info()
    }

    pub fn is_open(&self) -> bool {
        self.base.is_open()
    }

    /// Number of LED rows
    pub fn row_count(&self) -> u8 {
        self.base.info().rows
    }

    /// Number of LED columns
    pub fn column_count(&self) -> u8 {
        self.base.info().columns
    }

    /// Whether the buffer has changes not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn validate_position(&self, pos: MatrixPosition) -> Result<(), KeyboardError> {
        let rows = self.buffer.len();
        if pos.row as usize >= rows {
            return Err(KeyboardError::PositionOutOfRange {
                axis: Axis::Row,
                index: pos.row,
                max: rows.saturating_sub(1) as u8,
            });
        }
        let columns = self.buffer[pos.row as usize].len();
        if pos.column as usize >= columns {
            return Err(KeyboardError::PositionOutOfRange {
                axis: Axis::Column,
                index: pos.column,
                max: columns.saturating_sub(1) as u8,
            });
        }
        Ok(())
    }

    /// Buffered colour at a position
    pub fn buffer_colour(&self, pos: MatrixPosition) -> Result<Rgb, KeyboardError> {
        self.validate_position(pos)?;
        Ok(self.buffer[pos.row as usize][pos.column as usize])
    }

    /// Set the buffered colour of one key
    ///
    /// Use [`flush_rgb_buffer`](Self::flush_rgb_buffer) to send it.
    pub fn set_rgb(&mut self, pos: MatrixPosition, colour: Rgb) -> Result<(), KeyboardError> {
        self.validate_position(pos)?;
        self.buffer[pos.row as usize][pos.column as usize] = colour;
        self.dirty = true;
        Ok(())
    }

    /// [`set_rgb`](Self::set_rgb) with plain numbers
    pub fn set_rgb_components(
        &mut self,
        row: u8,
        column: u8,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<(), KeyboardError> {
        self.set_rgb(MatrixPosition::new(row, column), Rgb::new(r, g, b))
    }

    /// Set every buffered key to one colour
    pub fn fill(&mut self, colour: Rgb) {
        for row in &mut self.buffer {
            row.fill(colour);
        }
        self.dirty = true;
    }

    /// Build the raw colour report: header then little-endian 5-6-5 per key
    fn encode_buffer(&self) -> [u8; RGB_REPORT_SIZE] {
        let mut report = [0u8; RGB_REPORT_SIZE];
        report[0] = MAGIC[0];
        report[1] = MAGIC[1];
        report[2] = cmd::RAW_COLORS_REPORT;

        let colours = self.buffer.iter().flatten().flat_map(|c| encode_rgb(*c).to_le_bytes());
        for (slot, byte) in report[RGB_REPORT_HEADER_LEN..].iter_mut().zip(colours) {
            *slot = byte;
        }
        report
    }

    /// Send the buffer to the keyboard
    ///
    /// Does nothing unless the buffer changed since the last flush or `force`
    /// is set. Returns whether a report was sent. The buffer counts as clean
    /// as soon as the report is handed to the transport.
    pub async fn flush_rgb_buffer(&mut self, force: bool) -> Result<bool, KeyboardError> {
        if !force && !self.dirty {
            return Ok(false);
        }
        if !self.base.is_open() {
            return Err(KeyboardError::NotOpen);
        }

        let report = self.encode_buffer();
        self.dirty = false;
        debug!("Flushing RGB buffer to {}", self.base.printable_id());
        self.base.handle().send_report(REPORT_ID, &report).await?;
        Ok(true)
    }

    /// Set one key immediately, bypassing the buffer
    ///
    /// The buffer is neither updated nor invalidated.
    pub async fn set_rgb_single(
        &self,
        pos: MatrixPosition,
        colour: Rgb,
    ) -> Result<(), KeyboardError> {
        let position = pack_position(pos);
        self.base
            .send_feature(
                cmd::SINGLE_COLOR,
                colour.b.into(),
                colour.g.into(),
                colour.r.into(),
                position.into(),
            )
            .await
    }

    /// Reset one key to the keyboard's own colour
    pub async fn reset_single(&self, pos: MatrixPosition) -> Result<(), KeyboardError> {
        let position = pack_position(pos);
        self.base
            .send_feature(cmd::SINGLE_RESET, position.into(), 0, 0, 0)
            .await
    }

    /// Reset all keys and let the keyboard resume its own lighting
    pub async fn reset_all(&self) -> Result<(), KeyboardError> {
        self.base.send_feature(cmd::RESET_ALL, 0, 0, 0, 0).await
    }

    /// All positions, row by row (left to right within a row)
    pub fn keys_by_row(&self) -> impl Iterator<Item = MatrixPosition> + Clone {
        let columns = self.column_count();
        (0..self.row_count())
            .flat_map(move |row| (0..columns).map(move |column| MatrixPosition { row, column }))
    }

    /// All positions, column by column (top to bottom within a column)
    pub fn keys_by_column(&self) -> impl Iterator<Item = MatrixPosition> + Clone {
        let rows = self.row_count();
        (0..self.column_count())
            .flat_map(move |column| (0..rows).map(move |row| MatrixPosition { row, column }))
    }

    /// Close the device
    pub async fn close(&self) -> Result<(), KeyboardError> {
        self.base.close().await
    }
}
