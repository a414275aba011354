//! Request line tokenizer
//!
//! Turns the request line of a frame into a [`Command`]. Two routes are
//! recognised and their shapes are fixed:
//!
//! - `GET /set?<axis>=<int>` sets one axis target
//! - `GET /set?zoom=<int>&focus=<int>` sets zoom and derives focus; the
//!   parameter order is part of the contract
//! - `GET /` renders the control page
//!
//! Everything else is [`Command::Unrecognized`].

use crate::axis::Axis;

/// Route prefix for target updates
const SET_PREFIX: &str = "/set?";

/// A typed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set a single axis target (microseconds)
    SetAxis(Axis, u16),
    /// Set zoom and compute focus from a reference input (microseconds)
    SetZoomFocusPair { zoom_us: u16, focus_reference_us: u16 },
    /// Serve the control page
    RenderPage,
    /// Any other request
    Unrecognized,
}

/// Which `/set` shape a malformed request was attempting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetForm {
    /// `<axis>=<int>`
    Single,
    /// `zoom=<int>&focus=<int>`
    Pair,
}

/// Why a `/set` query was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Parameter is not `<name>=<value>`
    MalformedQuery(SetForm),
    /// Parameter name is not an axis
    UnknownAxis,
    /// Pair parameters are not exactly `zoom`, then `focus`
    WrongParameters,
    /// Value is not an unsigned 16-bit integer
    InvalidValue(SetForm),
}

impl RequestError {
    /// The `/set` shape the request was attempting
    pub fn form(&self) -> SetForm {
        match self {
            RequestError::MalformedQuery(form) | RequestError::InvalidValue(form) => *form,
            RequestError::UnknownAxis => SetForm::Single,
            RequestError::WrongParameters => SetForm::Pair,
        }
    }
}

impl Command {
    /// Parse a request line such as `GET /set?tilt=1600 HTTP/1.1`
    ///
    /// Returns `Err` only for `/set` requests whose query is malformed; the
    /// error records which form was attempted so callers can answer each
    /// form differently.
    pub fn parse(request_line: &str) -> Result<Self, RequestError> {
        let mut parts = request_line.split(' ');
        let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
            return Ok(Command::Unrecognized);
        };
        // A version token must follow the target
        if parts.next().is_none() {
            return Ok(Command::Unrecognized);
        }

        if target == "/" {
            return Ok(Command::RenderPage);
        }

        match target.strip_prefix(SET_PREFIX) {
            Some(query) if query.contains('&') => parse_pair(query),
            Some(query) => parse_single(query),
            None => Ok(Command::Unrecognized),
        }
    }
}

/// Parse `<axis>=<int>`
fn parse_single(query: &str) -> Result<Command, RequestError> {
    let (name, value) = split_param(query).ok_or(RequestError::MalformedQuery(SetForm::Single))?;
    let axis = Axis::from_name(name).ok_or(RequestError::UnknownAxis)?;
    let value = parse_value(value, SetForm::Single)?;
    Ok(Command::SetAxis(axis, value))
}

/// Parse `zoom=<int>&focus=<int>`
fn parse_pair(query: &str) -> Result<Command, RequestError> {
    let mut params = query.split('&');
    let (Some(first), Some(second), None) = (params.next(), params.next(), params.next()) else {
        return Err(RequestError::WrongParameters);
    };

    let (zoom_name, zoom) = split_param(first).ok_or(RequestError::MalformedQuery(SetForm::Pair))?;
    let (focus_name, focus) =
        split_param(second).ok_or(RequestError::MalformedQuery(SetForm::Pair))?;

    if zoom_name != Axis::Zoom.name() || focus_name != Axis::Focus.name() {
        return Err(RequestError::WrongParameters);
    }

    Ok(Command::SetZoomFocusPair {
        zoom_us: parse_value(zoom, SetForm::Pair)?,
        focus_reference_us: parse_value(focus, SetForm::Pair)?,
    })
}

/// Split `name=value`, requiring exactly one `=`
fn split_param(param: &str) -> Option<(&str, &str)> {
    let (name, value) = param.split_once('=')?;
    if value.contains('=') {
        return None;
    }
    Some((name, value))
}

fn parse_value(value: &str, form: SetForm) -> Result<u16, RequestError> {
    value.parse().map_err(|_| RequestError::InvalidValue(form))
}
