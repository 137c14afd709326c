//! Fuzz target: `LineDecoder` + command dispatch
//!
//! Drives arbitrary byte sequences through the line decoder and answers
//! every completed line, asserting that it never panics, never yields a
//! line longer than the buffer, and always produces a well-formed reply.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermobox::app::events::AppEvent;
use thermobox::app::ports::{EventSink, LINE_CAPACITY};
use thermobox::app::service::AppService;
use thermobox::config::SystemConfig;
use thermobox::protocol::codec::LineDecoder;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();
    let mut app = AppService::new(SystemConfig::default());

    for &b in data {
        if let Some(line) = decoder.push(b) {
            assert!(line.len() <= LINE_CAPACITY, "line exceeds buffer");
            let reply = app.handle_line(&line, &mut Discard);
            assert!(!reply.is_empty(), "every line gets a reply");
            assert!(!reply.contains('\n'), "reply must be a single line");
        }
    }

    // After a reset the decoder holds nothing.
    decoder.reset();
    assert_eq!(decoder.pending(), 0);
});
