//! Raw request bytes in, wire bytes and servo writes out.

use heapless::{String, Vec};
use radcam_core::config::{AxisTargets, GimbalConfig};
use radcam_core::focus::AutofocusEngine;
use radcam_core::motion::duty_from_us;
use radcam_core::router::Reply;
use radcam_core::traits::{ServoError, ServoOutput};
use radcam_core::{Axis, Gimbal, Receive};
use radcam_protocol::Response;

#[derive(Default)]
struct RecordingServos {
    writes: Vec<(Axis, u16), 512>,
}

impl ServoOutput for RecordingServos {
    fn write_duty(&mut self, axis: Axis, duty: u16) -> Result<(), ServoError> {
        self.writes.push((axis, duty)).map_err(|_| ServoError::Hardware)
    }
}

/// Render a text reply the way the control loop writes it
fn wire(reply: Reply) -> String<256> {
    let body = reply.text_body().unwrap();
    let mut out = String::new();
    Response::text(&body).write_to(&mut out).unwrap();
    out
}

fn handle(gimbal: &mut Gimbal, request: &[u8]) -> radcam_core::router::Dispatch {
    match gimbal.receive(request) {
        Receive::Handled(dispatch) => dispatch,
        other => panic!("expected a routed frame, got {:?}", other),
    }
}

#[test]
fn test_zoom_focus_pair_end_to_end() {
    let mut gimbal = Gimbal::new(&GimbalConfig::default(), &AxisTargets::new());
    let expected = AutofocusEngine::default().calculate_autofocus(1300, 1500);
    assert_eq!(expected, 1551);

    let dispatch = handle(
        &mut gimbal,
        b"GET /set?zoom=1300&focus=1500 HTTP/1.1\r\nHost: 192.168.1.200\r\n\r\n",
    );
    assert!(dispatch.persist);
    let reply = dispatch.reply.unwrap();

    assert_eq!(
        wire(reply).as_str(),
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/plain\r\n\
         Cache-Control: no-cache, no-store, must-revalidate\r\n\
         Content-Length: 4\r\n\
         Connection: close\r\n\
         \r\n\
         1551"
    );

    let targets = gimbal.targets();
    assert_eq!(targets.get(Axis::Zoom), 1300);
    assert_eq!(targets.get(Axis::Focus), expected as u16);
    assert_eq!(targets.get(Axis::Tilt), 1500);
    assert_eq!(targets.get(Axis::Yaw), 1500);
}

#[test]
fn test_single_axis_drives_servo_to_target() {
    let mut gimbal = Gimbal::new(&GimbalConfig::default(), &AxisTargets::new());
    let mut servos = RecordingServos::default();

    let primed = gimbal.prime(0, &mut servos);
    assert_eq!(primed.failed, 0);
    assert_eq!(servos.writes.len(), Axis::COUNT);
    servos.writes.clear();

    let dispatch = handle(&mut gimbal, b"GET /set?tilt=1600 HTTP/1.1\r\n\r\n");
    assert_eq!(wire(dispatch.reply.unwrap()).as_str().rsplit("\r\n").next(), Some("OK"));

    // 100 us at 10 us per 20 ms tick
    let mut now = 0;
    for _ in 0..20 {
        now += 20;
        gimbal.tick(now, &mut servos);
    }

    assert_eq!(servos.writes.len(), 10);
    assert!(servos.writes.iter().all(|(axis, _)| *axis == Axis::Tilt));
    assert_eq!(servos.writes.last(), Some(&(Axis::Tilt, duty_from_us(1600))));
    assert!(gimbal.motion().is_settled());
}

#[test]
fn test_restored_targets_are_primed() {
    let mut stored = AxisTargets::new();
    stored.set(Axis::Zoom, 1800);
    stored.set(Axis::Focus, 1200);

    let mut buffer = [0u8; radcam_core::config::MAX_TARGETS_SIZE];
    let bytes = stored.encode(&mut buffer).unwrap();
    let restored = AxisTargets::decode(bytes).unwrap();

    let mut gimbal = Gimbal::new(&GimbalConfig::default(), &restored);
    let mut servos = RecordingServos::default();
    gimbal.prime(0, &mut servos);

    assert!(servos.writes.contains(&(Axis::Zoom, duty_from_us(1800))));
    assert!(servos.writes.contains(&(Axis::Focus, duty_from_us(1200))));

    // Nothing pending after priming
    servos.writes.clear();
    gimbal.tick(1000, &mut servos);
    assert!(servos.writes.is_empty());
}

#[test]
fn test_bytes_after_terminator_do_not_leak() {
    let mut gimbal = Gimbal::new(&GimbalConfig::default(), &AxisTargets::new());

    let dispatch = handle(
        &mut gimbal,
        b"GET /set?yaw=1200 HTTP/1.1\r\n\r\nGET /set?yaw=1900 HTTP/1.1\r\n\r\n",
    );
    assert!(dispatch.persist);
    assert_eq!(gimbal.targets().get(Axis::Yaw), 1200);

    assert_eq!(gimbal.receive(b"Host: x\r\n"), Receive::Idle);
    gimbal.discard_pending();
    assert_eq!(gimbal.targets().get(Axis::Yaw), 1200);
}

#[test]
fn test_malformed_pair_sends_nothing() {
    let mut gimbal = Gimbal::new(&GimbalConfig::default(), &AxisTargets::new());
    let dispatch = handle(&mut gimbal, b"GET /set?zoom=13x0&focus=1500 HTTP/1.1\r\n\r\n");
    assert_eq!(dispatch.reply, None);
    assert!(!dispatch.persist);
    assert_eq!(gimbal.targets(), AxisTargets::new());
}
