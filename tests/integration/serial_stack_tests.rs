//! End-to-end tests through the real serial stack: raw bytes in over a
//! [`Transport`], `SerialLink` line assembly, `AppService` dispatch and
//! CRLF-terminated replies back out.

use std::collections::VecDeque;

use crate::mock_hw::{MockClock, MockHardware, RecordingSink};

use thermobox::app::service::AppService;
use thermobox::config::{SystemConfig, WaitStrategy};
use thermobox::protocol::serial::SerialLink;
use thermobox::protocol::transport::Transport;
use thermobox::scheduler::Scheduler;

/// Host side of a byte pipe: chunks written by the test arrive one read
/// at a time; device output is collected.
#[derive(Default)]
struct Pipe {
    rx: VecDeque<Vec<u8>>,
    tx: Vec<u8>,
    /// `(buffer length, timeout)` of every timed read.
    timed_reads: Vec<(usize, u32)>,
}

impl Transport for Pipe {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let Some(mut chunk) = self.rx.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.rx.push_front(chunk.split_off(n));
        }
        Ok(n)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, ()> {
        self.timed_reads.push((buf.len(), timeout_ms));
        self.read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

struct Stack {
    app: AppService,
    hw: MockHardware,
    link: SerialLink<Pipe>,
    clock: MockClock,
    sink: RecordingSink,
    scheduler: Scheduler,
}

impl Stack {
    fn new() -> Self {
        let config = SystemConfig::default();
        let mut app = AppService::new(config.clone());
        let mut hw = MockHardware::healthy(20.0, 50.0, 22.0);
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            link: SerialLink::new(Pipe::default()),
            clock: MockClock::at(0),
            sink,
            scheduler: Scheduler::new(&config, 0),
        }
    }

    fn host_sends(&mut self, bytes: &[u8]) {
        self.link.transport_mut().rx.push_back(bytes.to_vec());
    }

    fn poll_at(&mut self, ms: u32) {
        self.clock.set(ms);
        self.scheduler.poll_once(
            &mut self.app,
            &mut self.hw,
            &mut self.link,
            &self.clock,
            &mut self.sink,
        );
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.link.transport().tx).into_owned()
    }
}

#[test]
fn identify_over_the_wire() {
    let mut s = Stack::new();
    s.host_sends(b"id?\r\n");
    s.poll_at(5);
    assert_eq!(s.output(), "Arduino, E. coli sauna\r\n");
}

#[test]
fn host_controller_query_gets_telemetry() {
    // The PC-side controller sends a bare "?" to request a reading.
    let mut s = Stack::new();
    s.poll_at(1000);
    s.host_sends(b"?\n");
    s.poll_at(1001);
    assert_eq!(s.output(), "1\t20.000\t50.0\t22.00\r\n");
}

#[test]
fn fragmented_and_batched_input() {
    let mut s = Stack::new();
    s.host_sends(b"i");
    s.host_sends(b"d?\nid?\n");
    for ms in 1..=4 {
        s.poll_at(ms);
    }
    assert_eq!(
        s.output(),
        "Arduino, E. coli sauna\r\nArduino, E. coli sauna\r\n"
    );
}

#[test]
fn overlong_line_truncated_then_answered() {
    let mut s = Stack::new();
    let mut junk = vec![b'x'; 200];
    junk.push(b'\n');
    s.host_sends(&junk);
    for ms in 1..=5 {
        s.poll_at(ms);
    }
    // One line, one telemetry reply.
    assert_eq!(s.output(), "0\tNaN\tNaN\tNaN\r\n");
}

#[test]
fn default_strategy_blocks_until_next_tick() {
    let mut s = Stack::new();
    assert_eq!(s.app.config().wait_strategy, WaitStrategy::UntilDeadline);
    s.poll_at(400);
    assert_eq!(s.link.transport().timed_reads, [(1, 600)]);
}

#[test]
fn command_mid_period_answered_without_waiting_for_tick() {
    let mut s = Stack::new();
    s.host_sends(b"id?\r\n");
    s.poll_at(400);
    // Only the first byte is awaited; the rest is drained without blocking.
    assert_eq!(s.link.transport().timed_reads, [(1, 600)]);
    assert_eq!(s.output(), "Arduino, E. coli sauna\r\n");
    assert_eq!(s.app.tick_count(), 0);
}
