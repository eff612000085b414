//! Wire protocol module
//!
//! The binary command surface. A client sends terminator-framed command
//! frames and receives one length-prefixed response frame per command:
//!
//! ```text
//! request:  [opcode u8][sub_opcode u8][key \0][value \0]
//! response: [status u8][len u32 LE][message bytes]
//! ```
//!
//! The script surface shares the connection handling but none of this
//! framing; see the server module for how the two are told apart.

pub mod frame;
pub mod response;

pub use frame::{encode_insert_frame, FrameDecoder, MAX_FRAME_SIZE, OPCODE_ROW, SUBOP_INSERT};
pub use response::{read_response, write_response, Response, Status};
