//! Wire responses
//!
//! Every reply uses the same fixed header block:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Cache-Control: no-cache, no-store, must-revalidate\r\n
//! Content-Length: 2\r\n
//! Connection: close\r\n
//! \r\n
//! OK
//! ```

use core::fmt::{self, Write};

use heapless::String;

/// Status line sent with every response
pub const STATUS_LINE: &str = "HTTP/1.1 200 OK";

/// Capacity needed for the encoded header block
pub const MAX_HEAD_SIZE: usize = 160;

/// Body media type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentType {
    /// `text/plain`
    Text,
    /// `text/html`
    Html,
}

impl ContentType {
    /// MIME type string
    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text/plain",
            ContentType::Html => "text/html",
        }
    }
}

/// A response ready to be written to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
    /// Body media type
    pub content_type: ContentType,
    /// Body, sent verbatim
    pub body: &'a str,
}

impl<'a> Response<'a> {
    /// Create a `text/plain` response
    pub const fn text(body: &'a str) -> Self {
        Self {
            content_type: ContentType::Text,
            body,
        }
    }

    /// Create a `text/html` response
    pub const fn html(body: &'a str) -> Self {
        Self {
            content_type: ContentType::Html,
            body,
        }
    }

    /// Encode the status line and headers, including the blank line
    pub fn head(&self) -> String<MAX_HEAD_SIZE> {
        let mut head = String::new();
        // Capacity covers the longest content type and a five-digit length
        let _ = self.write_head(&mut head);
        head
    }

    /// Write the full response (head and body)
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        self.write_head(out)?;
        out.write_str(self.body)
    }

    fn write_head<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "{}\r\n\
             Content-Type: {}\r\n\
             Cache-Control: no-cache, no-store, must-revalidate\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            STATUS_LINE,
            self.content_type.as_str(),
            self.body.len()
        )
    }
}
