//! Gimbal control protocol
//!
//! This crate defines the request/response protocol spoken between a web
//! client and the gimbal controller. Requests arrive as HTTP/1.1-style text
//! over a serial link that a CH9120 bridge chip exposes as a TCP socket.
//!
//! # Protocol Overview
//!
//! ```text
//! GET /set?tilt=1600 HTTP/1.1\r\n      single axis   -> "OK"
//! GET /set?zoom=1300&focus=1500 ...    zoom + focus  -> "<new focus µs>"
//! GET / HTTP/1.1\r\n                   control page  -> text/html
//! ...headers...\r\n
//! \r\n                                 blank line terminates the frame
//! ```
//!
//! Only the request line is interpreted. Only `GET` is supported and
//! there is a single request in flight at any time.

#![no_std]
#![deny(unsafe_code)]

pub mod axis;
pub mod frame;
pub mod request;
pub mod response;

pub use axis::Axis;
pub use frame::{Frame, FrameError, StreamFramer, FRAME_TERMINATOR, MAX_REQUEST_SIZE};
pub use request::{Command, RequestError, SetForm};
pub use response::{ContentType, Response, MAX_HEAD_SIZE, STATUS_LINE};
