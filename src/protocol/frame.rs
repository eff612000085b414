//! Binary frame decoder
//!
//! Decodes the terminator-framed binary command encoding:
//!
//! ```text
//! [opcode: u8][sub_opcode: u8][key text][0x00][value text][0x00]
//! ```
//!
//! Frames carry no length prefix and may arrive split across arbitrary read
//! boundaries, so the decoder buffers bytes until both terminators are
//! present. Text fields are UTF-8 and cannot themselves contain a 0x00
//! byte; that is a limit of the encoding, not of this decoder.

use bytes::BytesMut;
use indexmap::IndexMap;

use crate::catalog::Literal;
use crate::command::Command;
use crate::error::{Error, Result};

/// Command family: row operations
pub const OPCODE_ROW: u8 = 1;
/// Row operation: insert
pub const SUBOP_INSERT: u8 = 9;

/// Column the frame's key text is bound to
pub const FRAME_KEY_COLUMN: &str = "key";
/// Column the frame's value text is bound to
pub const FRAME_VALUE_COLUMN: &str = "value";

/// Upper bound on one buffered frame. A prefix that grows past this without
/// supplying both terminators means the stream has lost frame alignment and
/// the connection cannot recover.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Incremental decoder for binary command frames.
///
/// Feed raw bytes as they arrive, then drain completed commands:
///
/// - `Ok(Some(command))` - one frame decoded and consumed
/// - `Ok(None)` - no complete frame buffered yet
/// - `Err(e)` - a bad frame (consumed) or a poisoned stream
#[derive(Debug)]
pub struct FrameDecoder {
    /// Bytes received but not yet decoded
    buffer: BytesMut,
    /// Table that row operations apply to
    table: String,
    /// Buffered-frame cap
    max_frame_size: usize,
}

impl FrameDecoder {
    /// Create a decoder whose row operations target the given table
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            buffer: BytesMut::new(),
            table: table.into(),
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Override the buffered-frame cap
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Append raw bytes from the stream
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes buffered but not yet decoded
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Try to decode the next complete frame.
    ///
    /// A frame with an unknown opcode pair or non-UTF-8 text is consumed
    /// before the error is returned, so decoding can continue at the next
    /// frame boundary.
    pub fn next_command(&mut self) -> Result<Option<Command>> {
        let key_end = match self.find_terminator(2) {
            Some(pos) => pos,
            None => return self.incomplete(),
        };
        let value_end = match self.find_terminator(key_end + 1) {
            Some(pos) => pos,
            None => return self.incomplete(),
        };

        let frame = self.buffer.split_to(value_end + 1);
        let opcode = frame[0];
        let sub_opcode = frame[1];

        if (opcode, sub_opcode) != (OPCODE_ROW, SUBOP_INSERT) {
            return Err(Error::UnknownCommand { opcode, sub_opcode });
        }

        let key = std::str::from_utf8(&frame[2..key_end]).map_err(|_| Error::InvalidFrameText)?;
        let value = std::str::from_utf8(&frame[key_end + 1..value_end])
            .map_err(|_| Error::InvalidFrameText)?;

        let mut values = IndexMap::new();
        values.insert(FRAME_KEY_COLUMN.to_string(), Literal::Str(key.to_string()));
        values.insert(
            FRAME_VALUE_COLUMN.to_string(),
            Literal::Str(value.to_string()),
        );

        Ok(Some(Command::InsertRow {
            table: self.table.clone(),
            values,
        }))
    }

    fn find_terminator(&self, from: usize) -> Option<usize> {
        self.buffer
            .get(from..)?
            .iter()
            .position(|&b| b == 0)
            .map(|i| from + i)
    }

    fn incomplete(&self) -> Result<Option<Command>> {
        if self.buffer.len() > self.max_frame_size {
            return Err(Error::FrameTooLarge(self.max_frame_size));
        }
        Ok(None)
    }
}

/// Encode one row-insert frame as a client would send it.
///
/// Key and value must not contain a 0x00 byte; the encoding cannot
/// represent one.
pub fn encode_insert_frame(key: &str, value: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(4 + key.len() + value.len());
    frame.push(OPCODE_ROW);
    frame.push(SUBOP_INSERT);
    frame.extend_from_slice(key.as_bytes());
    frame.push(0);
    frame.extend_from_slice(value.as_bytes());
    frame.push(0);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_insert(table: &str, key: &str, value: &str) -> Command {
        let mut values = IndexMap::new();
        values.insert(FRAME_KEY_COLUMN.to_string(), Literal::Str(key.to_string()));
        values.insert(
            FRAME_VALUE_COLUMN.to_string(),
            Literal::Str(value.to_string()),
        );
        Command::InsertRow {
            table: table.to_string(),
            values,
        }
    }

    #[test]
    fn test_decode_whole_frame() {
        let mut decoder = FrameDecoder::new("kv");
        decoder.feed(&encode_insert_frame("key", "value"));

        let command = decoder.next_command().unwrap().unwrap();
        assert_eq!(command, expected_insert("kv", "key", "value"));
        assert_eq!(decoder.buffered_len(), 0);
        assert!(decoder.next_command().unwrap().is_none());
    }

    #[test]
    fn test_decode_split_at_every_boundary() {
        let frame = encode_insert_frame("key", "value");
        let expected = expected_insert("kv", "key", "value");

        for split in 0..frame.len() {
            let mut decoder = FrameDecoder::new("kv");
            decoder.feed(&frame[..split]);
            assert!(
                decoder.next_command().unwrap().is_none(),
                "prefix of {} bytes decoded early",
                split
            );
            decoder.feed(&frame[split..]);
            assert_eq!(decoder.next_command().unwrap(), Some(expected.clone()));
        }
    }

    #[test]
    fn test_decode_back_to_back_frames() {
        let mut bytes = encode_insert_frame("a", "1");
        bytes.extend_from_slice(&encode_insert_frame("b", "2"));

        let mut decoder = FrameDecoder::new("kv");
        decoder.feed(&bytes);

        assert_eq!(
            decoder.next_command().unwrap(),
            Some(expected_insert("kv", "a", "1"))
        );
        assert_eq!(
            decoder.next_command().unwrap(),
            Some(expected_insert("kv", "b", "2"))
        );
        assert!(decoder.next_command().unwrap().is_none());
    }

    #[test]
    fn test_empty_fields_decode() {
        let mut decoder = FrameDecoder::new("kv");
        decoder.feed(&[OPCODE_ROW, SUBOP_INSERT, 0, 0]);

        assert_eq!(
            decoder.next_command().unwrap(),
            Some(expected_insert("kv", "", ""))
        );
    }

    #[test]
    fn test_unknown_command_consumes_frame() {
        let mut decoder = FrameDecoder::new("kv");
        decoder.feed(&[3, 7, b'x', 0, b'y', 0]);
        decoder.feed(&encode_insert_frame("key", "value"));

        let result = decoder.next_command();
        assert!(matches!(
            result,
            Err(Error::UnknownCommand {
                opcode: 3,
                sub_opcode: 7
            })
        ));

        // Decoding resumes at the next frame.
        assert_eq!(
            decoder.next_command().unwrap(),
            Some(expected_insert("kv", "key", "value"))
        );
    }

    #[test]
    fn test_invalid_utf8_consumes_frame() {
        let mut decoder = FrameDecoder::new("kv");
        decoder.feed(&[OPCODE_ROW, SUBOP_INSERT, 0xff, 0xfe, 0, b'v', 0]);
        decoder.feed(&encode_insert_frame("k", "v"));

        assert!(matches!(
            decoder.next_command(),
            Err(Error::InvalidFrameText)
        ));
        assert_eq!(
            decoder.next_command().unwrap(),
            Some(expected_insert("kv", "k", "v"))
        );
    }

    #[test]
    fn test_oversized_frame_is_unrecoverable() {
        let mut decoder = FrameDecoder::new("kv").with_max_frame_size(16);
        decoder.feed(&[1u8; 32]);

        let result = decoder.next_command();
        assert!(matches!(result, Err(Error::FrameTooLarge(16))));
        if let Err(e) = result {
            assert!(!e.is_recoverable());
        }
    }

    #[test]
    fn test_frame_table_is_configurable() {
        let mut decoder = FrameDecoder::new("frames");
        decoder.feed(&encode_insert_frame("k", "v"));

        let command = decoder.next_command().unwrap().unwrap();
        assert_eq!(command.table_name(), "frames");
    }
}
