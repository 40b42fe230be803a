//! Press decoder integration tests: hold durations, confirmation flashes
//! and command hand-off, with a virtual clock for the hold and a fast
//! confirmation pattern.

use crate::mock_hw::{AuditSink, ManualClock, RecordingExecutor, pipeline};
use holdcmd::app::ports::Clock;
use holdcmd::drivers::led_patterns::Pattern;
use holdcmd::fsm::decoder::{DecoderConfig, PressDecoder};
use holdcmd::fsm::{ButtonEdge, PressState};
use holdcmd::pins::Output;
use std::sync::Arc;
use std::time::Duration;

struct Rig {
    decoder: PressDecoder<Arc<ManualClock>, RecordingExecutor>,
    clock: Arc<ManualClock>,
    sink: AuditSink,
    executor: RecordingExecutor,
}

impl Rig {
    fn new() -> Self {
        let sink = AuditSink::new();
        let clock = ManualClock::new();
        let executor = RecordingExecutor::default();
        let config = DecoderConfig {
            status_output: Output::Red,
            confirm_pattern: Pattern::alternating(&[0.01, 0.01]).unwrap(),
            confirm_pause: Duration::from_secs(1),
            ..DecoderConfig::default()
        };
        let decoder = PressDecoder::new(pipeline(sink.clone()), Arc::clone(&clock), executor.clone(), config);
        Self {
            decoder,
            clock,
            sink,
            executor,
        }
    }

    /// Press, hold for `held` of virtual time, release.
    fn hold(&self, held: Duration) -> Option<u32> {
        self.decoder.handle_edge(ButtonEdge::Down).unwrap();
        self.clock.advance(held);
        let command = self.decoder.handle_edge(ButtonEdge::Up).unwrap();
        self.decoder.scheduler().writer().wait_drained();
        command.map(|c| c.index())
    }

    /// On-writes to the status LED after the release turned it off.
    fn confirmation_flashes(&self) -> usize {
        let writes = self.sink.for_output(Output::Red);
        let Some(off) = writes.iter().position(|w| !w.on) else {
            return 0;
        };
        writes[off..].iter().filter(|w| w.on).count()
    }
}

#[test]
fn just_under_one_second_selects_nothing() {
    let rig = Rig::new();
    assert_eq!(rig.hold(Duration::from_millis(990)), None);
    assert_eq!(rig.confirmation_flashes(), 0);
    assert!(rig.executor.indices().is_empty());
    assert_eq!(rig.decoder.state(), PressState::Idle);
}

#[test]
fn just_over_one_second_flashes_once() {
    let rig = Rig::new();
    assert_eq!(rig.hold(Duration::from_millis(1010)), Some(1));
    assert_eq!(rig.confirmation_flashes(), 1);
    assert_eq!(rig.executor.indices(), vec![1]);
}

#[test]
fn three_and_a_half_seconds_flashes_three_times() {
    let rig = Rig::new();
    assert_eq!(rig.hold(Duration::from_millis(3500)), Some(3));
    assert_eq!(rig.confirmation_flashes(), 3);
    assert_eq!(rig.executor.indices(), vec![3]);
    assert_eq!(rig.sink.last(Output::Red), Some(false));
}

#[test]
fn pause_runs_on_the_clock_before_confirmation() {
    let rig = Rig::new();
    let before = rig.clock.now();
    rig.hold(Duration::from_millis(2000));
    let after = rig.clock.now();
    assert_eq!(after - before, Duration::from_secs(3));
}

#[test]
fn feedback_uses_configured_status_output() {
    let rig = Rig::new();
    assert_eq!(rig.decoder.config().status_output, Output::Red);
    assert_eq!(rig.decoder.config().confirm_pause, Duration::from_secs(1));
    rig.hold(Duration::from_millis(1500));
    assert!(rig.sink.for_output(Output::Green).is_empty());
}

#[test]
fn stray_release_writes_nothing() {
    let rig = Rig::new();
    assert_eq!(rig.decoder.handle_edge(ButtonEdge::Up).unwrap(), None);
    rig.decoder.scheduler().writer().wait_drained();
    assert_eq!(rig.sink.len(), 0);
    assert_eq!(rig.decoder.state(), PressState::Idle);
}

#[test]
fn press_shows_armed_pattern_on_status_output() {
    let rig = Rig::new();
    rig.decoder.handle_edge(ButtonEdge::Down).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    rig.decoder.scheduler().writer().wait_drained();
    assert_eq!(rig.sink.last(Output::Red), Some(true));
    assert!(rig.sink.for_output(Output::Green).is_empty());
    assert_eq!(rig.decoder.state().name(), "Held");
}

#[test]
fn sessions_are_independent() {
    let rig = Rig::new();
    assert_eq!(rig.hold(Duration::from_millis(2100)), Some(2));
    assert_eq!(rig.hold(Duration::from_millis(500)), None);
    assert_eq!(rig.hold(Duration::from_millis(1200)), Some(1));
    assert_eq!(rig.executor.indices(), vec![2, 1]);
}
