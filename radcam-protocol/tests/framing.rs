//! Framing behaviour under arbitrary chunking.

use proptest::prelude::*;
use radcam_protocol::{Command, FrameError, StreamFramer, MAX_REQUEST_SIZE};

const REQUEST: &[u8] = b"GET /set?tilt=1600 HTTP/1.1\r\nHost: x\r\n\r\n";

proptest! {
    #[test]
    fn prop_split_delivery_yields_one_frame(split in 1usize..REQUEST.len()) {
        let mut framer = StreamFramer::new();
        let (first, second) = REQUEST.split_at(split);

        framer.feed(first).unwrap();
        prop_assert_eq!(framer.try_take_frame(), Ok(None));

        framer.feed(second).unwrap();
        let frame = framer.try_take_frame().unwrap().unwrap();
        prop_assert_eq!(frame.as_str().as_bytes(), REQUEST);
        prop_assert_eq!(frame.request_line(), "GET /set?tilt=1600 HTTP/1.1");

        // Taken exactly once
        prop_assert_eq!(framer.try_take_frame(), Ok(None));
        prop_assert!(framer.is_empty());
    }

    #[test]
    fn prop_arbitrary_chunking_yields_same_frame(
        cuts in prop::collection::vec(1usize..REQUEST.len(), 0..8),
    ) {
        let mut cuts = cuts;
        cuts.sort_unstable();
        cuts.dedup();

        let mut framer = StreamFramer::new();
        let mut frames = 0;
        let mut start = 0;
        for end in cuts.into_iter().chain(core::iter::once(REQUEST.len())) {
            framer.feed(&REQUEST[start..end]).unwrap();
            if let Some(frame) = framer.try_take_frame().unwrap() {
                prop_assert_eq!(frame.as_str().as_bytes(), REQUEST);
                frames += 1;
            }
            start = end;
        }
        prop_assert_eq!(frames, 1);
    }

    #[test]
    fn prop_trailing_bytes_never_reach_next_frame(
        trailing in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut framer = StreamFramer::new();
        let mut chunk = REQUEST.to_vec();
        chunk.extend_from_slice(&trailing);

        framer.feed(&chunk).unwrap();
        let frame = framer.try_take_frame().unwrap().unwrap();
        prop_assert_eq!(frame.as_str().as_bytes(), REQUEST);

        framer.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        let next = framer.try_take_frame().unwrap().unwrap();
        prop_assert_eq!(next.as_str(), "GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn prop_parse_never_panics(line in "\\PC{0,80}") {
        let _ = Command::parse(&line);
    }
}

#[test]
fn test_unterminated_stream_overflows() {
    let mut framer = StreamFramer::new();
    let chunk = [b'a'; 100];
    let mut result = Ok(());
    for _ in 0..(MAX_REQUEST_SIZE / chunk.len() + 1) {
        result = framer.feed(&chunk);
        if result.is_err() {
            break;
        }
    }
    assert_eq!(result, Err(FrameError::Overflow));
    assert!(framer.is_empty());
}
