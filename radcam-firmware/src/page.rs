//! Control page
//!
//! One slider per axis, bounded by the configured range and initialised to
//! the current target. Tilt, focus and yaw send a single-axis update. Zoom
//! and the focus reference send the zoom/focus pair; the focus target
//! returned by the controller is shown and copied into the focus slider.

use core::fmt::{self, Write};

use heapless::String;
use radcam_core::config::AxisRange;
use radcam_core::{Axis, Gimbal};

/// Capacity for the rendered page
pub const PAGE_CAPACITY: usize = 6144;

/// Page title
const TITLE: &str = "RadCam RP2350-ETH Controller";

/// Focus reference slider: centre and travel match the autofocus input
const REFERENCE_RANGE: AxisRange = AxisRange::new(1300, 1700);
const REFERENCE_DEFAULT_US: u16 = 1500;

const HEAD: &str = "<!DOCTYPE html>\n\
<html>\n\
<head><meta charset='UTF-8'>\n\
  <title>";

const STYLE: &str = "</title>\n\
  <style>\n\
    body { font-family: sans-serif; max-width: 40em; margin: 1em auto; }\n\
    .slider-container { margin-bottom: 20px; }\n\
    input[type=range] { width: 100%; }\n\
  </style>\n\
</head>\n\
<body>\n";

const SCRIPT: &str = "<script>\n\
  const $ = id => document.getElementById(id);\n\
  function sendPair() {\n\
    fetch('/set?zoom=' + $('zoom').value + '&focus=' + $('ref').value)\n\
      .then(r => r.text())\n\
      .then(t => { $('focus').value = t; $('focus-val').value = t; $('auto').textContent = t; });\n\
  }\n\
  function link(id, send) {\n\
    const slider = $(id);\n\
    const number = $(id + '-val');\n\
    slider.oninput = () => number.value = slider.value;\n\
    slider.onchange = send;\n\
    number.onchange = () => { slider.value = number.value; send(); };\n\
  }\n\
  ['tilt', 'focus', 'yaw'].forEach(id =>\n\
    link(id, () => fetch('/set?' + id + '=' + $(id).value)));\n\
  ['zoom', 'ref'].forEach(id => link(id, sendPair));\n\
</script>\n\
</body>\n\
</html>\n";

/// Render the control page for the current gimbal state
pub fn render(gimbal: &Gimbal) -> Result<String<PAGE_CAPACITY>, fmt::Error> {
    let mut page = String::new();
    write_page(&mut page, gimbal)?;
    Ok(page)
}

fn write_page<W: Write>(out: &mut W, gimbal: &Gimbal) -> fmt::Result {
    let targets = gimbal.targets();
    let config = gimbal.config();

    out.write_str(HEAD)?;
    out.write_str(TITLE)?;
    out.write_str(STYLE)?;
    writeln!(out, "  <h1>{}</h1>", TITLE)?;

    for axis in [Axis::Tilt, Axis::Yaw, Axis::Zoom] {
        write_slider(out, axis.name(), axis.label(), config.axis(axis).range, targets.get(axis))?;
    }
    write_slider(out, "ref", "Focus reference", REFERENCE_RANGE, REFERENCE_DEFAULT_US)?;
    writeln!(
        out,
        "<p>Autofocus target: <span id='auto'>{}</span> µs</p>",
        targets.get(Axis::Focus)
    )?;
    write_slider(
        out,
        Axis::Focus.name(),
        Axis::Focus.label(),
        config.axis(Axis::Focus).range,
        targets.get(Axis::Focus),
    )?;

    out.write_str(SCRIPT)
}

fn write_slider<W: Write>(
    out: &mut W,
    id: &str,
    label: &str,
    range: AxisRange,
    value: u16,
) -> fmt::Result {
    write!(
        out,
        "<div class='slider-container'>\n\
  <label for='{id}'>{label}:</label><br>\n\
  <input type='range' min='{min}' max='{max}' step='1' value='{value}' name='{id}' id='{id}'>\n\
  <input type='number' id='{id}-val' value='{value}' min='{min}' max='{max}'> µs\n\
</div>\n",
        id = id,
        label = label,
        min = range.min_us,
        max = range.max_us,
        value = value,
    )
}
