//! Command dispatch
//!
//! Applies a parsed [`Command`] to the motion controller and decides what
//! goes back on the wire. The two `/set` forms answer failures differently:
//!
//! - single axis: always answers `OK`, even when the query was rejected
//! - zoom + focus pair: answers nothing when the query was rejected

use core::fmt::Write;

use heapless::String;
use radcam_protocol::{Axis, Command, ContentType, RequestError, SetForm};

use crate::config::AxisRange;
use crate::focus::AutofocusEngine;
use crate::motion::MotionController;

/// Capacity for a plain-text reply body
pub const MAX_TEXT_BODY: usize = 8;

/// Body of the single-axis acknowledgement
pub const OK_BODY: &str = "OK";

/// What to send back for a handled request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Plain-text `OK`
    Ok,
    /// Plain-text decimal focus target
    Focus(u16),
    /// The HTML control page
    Page,
}

impl Reply {
    /// Body media type
    pub fn content_type(&self) -> ContentType {
        match self {
            Reply::Ok | Reply::Focus(_) => ContentType::Text,
            Reply::Page => ContentType::Html,
        }
    }

    /// Body for plain-text replies, `None` for the page
    pub fn text_body(&self) -> Option<String<MAX_TEXT_BODY>> {
        let mut body = String::new();
        match self {
            Reply::Ok => body.push_str(OK_BODY).ok()?,
            Reply::Focus(us) => write!(body, "{}", us).ok()?,
            Reply::Page => return None,
        }
        Some(body)
    }
}

/// Why a request changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejection {
    /// The `/set` query did not parse
    Request(RequestError),
    /// The value lies outside the configured target window
    OutsideWindow(u16),
}

/// Result of routing one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dispatch {
    /// Reply to write, if any
    pub reply: Option<Reply>,
    /// Targets changed and should be saved
    pub persist: bool,
    /// Set when a `/set` request was swallowed
    pub rejected: Option<Rejection>,
}

impl Dispatch {
    fn reply(reply: Reply) -> Self {
        Self {
            reply: Some(reply),
            ..Default::default()
        }
    }

    fn updated(reply: Reply) -> Self {
        Self {
            reply: Some(reply),
            persist: true,
            rejected: None,
        }
    }

    fn rejected(rejection: Rejection, reply: Option<Reply>) -> Self {
        Self {
            reply,
            persist: false,
            rejected: Some(rejection),
        }
    }
}

/// Maps commands onto motion and autofocus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandRouter {
    target_window: Option<AxisRange>,
}

impl CommandRouter {
    /// Create a router, optionally rejecting targets outside `target_window`
    pub const fn new(target_window: Option<AxisRange>) -> Self {
        Self { target_window }
    }

    /// The configured target window
    pub fn target_window(&self) -> Option<AxisRange> {
        self.target_window
    }

    /// Parse and apply one request line
    pub fn route(
        &self,
        request_line: &str,
        motion: &mut MotionController,
        autofocus: &AutofocusEngine,
    ) -> Dispatch {
        match Command::parse(request_line) {
            Ok(command) => self.dispatch(command, motion, autofocus),
            Err(err) => {
                let reply = match err.form() {
                    SetForm::Single => Some(Reply::Ok),
                    SetForm::Pair => None,
                };
                Dispatch::rejected(Rejection::Request(err), reply)
            }
        }
    }

    /// Apply a parsed command
    pub fn dispatch(
        &self,
        command: Command,
        motion: &mut MotionController,
        autofocus: &AutofocusEngine,
    ) -> Dispatch {
        match command {
            Command::SetAxis(axis, us) => {
                if !self.accepts(us) {
                    return Dispatch::rejected(Rejection::OutsideWindow(us), Some(Reply::Ok));
                }
                motion.set_target(axis, us);
                Dispatch::updated(Reply::Ok)
            }
            Command::SetZoomFocusPair {
                zoom_us,
                focus_reference_us,
            } => {
                if !self.accepts(zoom_us) {
                    return Dispatch::rejected(Rejection::OutsideWindow(zoom_us), None);
                }
                motion.set_target(Axis::Zoom, zoom_us);
                let focus = saturate_us(autofocus.calculate_autofocus(zoom_us, focus_reference_us));
                motion.set_target(Axis::Focus, focus);
                Dispatch::updated(Reply::Focus(focus))
            }
            Command::RenderPage => Dispatch::reply(Reply::Page),
            Command::Unrecognized => Dispatch::default(),
        }
    }

    fn accepts(&self, us: u16) -> bool {
        self.target_window.map_or(true, |window| window.contains(us))
    }
}

/// Clamp a computed position into the `u16` target range
fn saturate_us(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}
