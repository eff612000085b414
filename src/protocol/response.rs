//! Response frames for binary-mode connections
//!
//! A response is `[status: u8][len: u32 LE][message]` with a UTF-8 message.
//! The length field is little-endian to match the byte order of the command
//! encoding. Script-mode connections answer in JSON lines instead and never
//! see these frames.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Largest response message a client will accept
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// Command applied
    Ok = 0,
    /// Command rejected; the message says why
    Error = 1,
}

impl Status {
    fn from_byte(byte: u8) -> Result<Status> {
        match byte {
            0 => Ok(Status::Ok),
            1 => Ok(Status::Error),
            other => Err(Error::MalformedResponse(format!(
                "unknown status byte {}",
                other
            ))),
        }
    }
}

/// A response to one command on a binary-mode connection
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub message: String,
}

impl Response {
    /// Build a success response
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
        }
    }

    /// Build an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }
}

/// Write one response frame to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_u8(response.status as u8)?;
    writer.write_u32::<LittleEndian>(response.message.len() as u32)?;
    writer.write_all(response.message.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read one response frame from a stream (client side)
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let status = Status::from_byte(reader.read_u8()?)?;
    let len = reader.read_u32::<LittleEndian>()? as usize;
    if len > MAX_RESPONSE_SIZE {
        return Err(Error::MalformedResponse(format!(
            "message length {} exceeds cap",
            len
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    let message = String::from_utf8(payload)
        .map_err(|_| Error::MalformedResponse("message is not valid UTF-8".to_string()))?;

    Ok(Response { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_response_wire_layout() {
        let mut wire = Vec::new();
        write_response(&mut wire, &Response::ok("done")).unwrap();

        assert_eq!(wire[0], 0);
        assert_eq!(&wire[1..5], &4u32.to_le_bytes());
        assert_eq!(&wire[5..], b"done");
    }

    #[test]
    fn test_read_back_error_response() {
        let mut wire = Vec::new();
        write_response(&mut wire, &Response::error("no such table")).unwrap();

        let response = read_response(&mut Cursor::new(wire)).unwrap();
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.message, "no such table");
    }

    #[test]
    fn test_unknown_status_byte() {
        let wire = vec![9u8, 0, 0, 0, 0];
        let result = read_response(&mut Cursor::new(wire));
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_truncated_response() {
        let mut wire = Vec::new();
        write_response(&mut wire, &Response::ok("done")).unwrap();
        wire.truncate(wire.len() - 2);

        let result = read_response(&mut Cursor::new(wire));
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
