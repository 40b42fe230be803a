//! Blink scheduler integration tests: timing, replacement and stop
//! conditions, observed through the audit sink.

use crate::mock_hw::{AuditSink, pipeline};
use holdcmd::drivers::blink::Repeat;
use holdcmd::drivers::led_patterns::{Pattern, Phase};
use holdcmd::drivers::led_writer::WriteBatch;
use holdcmd::pins::Output;
use std::time::{Duration, Instant};

fn fast_pattern() -> Pattern {
    Pattern::alternating(&[0.01, 0.01]).unwrap()
}

#[test]
fn phase_boundaries_do_not_drift() {
    let sink = AuditSink::with_delay(Duration::from_millis(2));
    let sched = pipeline(sink.clone());
    let pattern = Pattern::alternating(&[0.02, 0.03]).unwrap();
    let offsets = [Duration::ZERO, Duration::from_millis(20)];
    let period = pattern.period();

    sched
        .start_blink(Output::Red, pattern, Repeat::times(20).unwrap(), None)
        .unwrap()
        .wait();
    sched.writer().wait_drained();

    let writes = sink.for_output(Output::Red);
    assert_eq!(writes.len(), 40);
    let t0 = writes[0].at;
    let tolerance = Duration::from_millis(15);
    for (k, w) in writes.iter().enumerate() {
        let ideal = t0 + period * (k / 2) as u32 + offsets[k % 2];
        let deviation = if w.at > ideal { w.at - ideal } else { ideal - w.at };
        assert!(
            deviation < tolerance,
            "write {} deviates {:?} from its boundary",
            k,
            deviation
        );
    }
}

#[test]
fn phases_alternate_and_repeat_limit_is_exact() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    sched
        .start_blink(Output::Green, fast_pattern(), Repeat::times(4).unwrap(), None)
        .unwrap()
        .wait();
    sched.writer().wait_drained();

    let states: Vec<bool> = sink.for_output(Output::Green).iter().map(|w| w.on).collect();
    assert_eq!(states, [true, false].repeat(4));
}

/// A pattern whose every phase drives the output to `on`.
fn solid(on: bool, ms: u64) -> Pattern {
    let phase = Phase::new(Duration::from_millis(ms), on).unwrap();
    Pattern::new(vec![phase; 2]).unwrap()
}

#[test]
fn restart_supersedes_previous_job() {
    let sink = AuditSink::with_delay(Duration::from_millis(1));
    let sched = pipeline(sink.clone());
    let old = sched
        .start_blink(Output::Red, solid(false, 2), Repeat::Forever, None)
        .unwrap();
    std::thread::sleep(Duration::from_millis(40));

    let new = sched
        .start_blink(Output::Red, solid(true, 2), Repeat::times(10).unwrap(), None)
        .unwrap();
    old.wait();
    new.wait();
    sched.writer().wait_drained();

    let writes = sink.for_output(Output::Red);
    let first_new = writes
        .iter()
        .position(|w| w.on)
        .expect("new job never wrote");
    assert!(first_new > 0, "old job never wrote");
    assert!(
        writes[first_new..].iter().all(|w| w.on),
        "superseded job wrote after its successor"
    );
    assert_eq!(writes[first_new..].len(), 20);
}

#[test]
fn two_jobs_share_one_ordered_audit() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    let red = sched
        .start_blink(Output::Red, fast_pattern(), Repeat::times(5).unwrap(), None)
        .unwrap();
    let green = sched
        .start_blink(Output::Green, Pattern::alternating(&[0.007, 0.013]).unwrap(), Repeat::times(5).unwrap(), None)
        .unwrap();
    red.wait();
    green.wait();
    sched.writer().wait_drained();

    let writes = sink.writes();
    assert!(writes.windows(2).all(|w| w[0].at <= w[1].at), "audit out of order");
    for output in Output::ALL {
        let states: Vec<bool> = sink.for_output(output).iter().map(|w| w.on).collect();
        assert_eq!(states, [true, false].repeat(5), "{} sequence", output);
    }
}

#[test]
fn control_calls_return_promptly_behind_a_backlog() {
    let sink = AuditSink::with_delay(Duration::from_millis(20));
    let sched = pipeline(sink.clone());
    let writer = sched.writer().clone();
    for i in 0..96 {
        writer.submit(WriteBatch::single(Output::Green, i % 2 == 0));
    }
    let _job = sched
        .start_blink(Output::Red, Pattern::alternating(&[0.001, 0.001]).unwrap(), Repeat::Forever, None)
        .unwrap();
    std::thread::sleep(Duration::from_millis(30));

    let limit = Duration::from_millis(50);
    let t = Instant::now();
    sched.set_state(Output::Red, false);
    assert!(t.elapsed() < limit, "set_state blocked for {:?}", t.elapsed());

    let t = Instant::now();
    sched.stop_blink(Output::Red);
    assert!(t.elapsed() < limit, "stop_blink blocked for {:?}", t.elapsed());

    let t = Instant::now();
    let job = sched
        .start_blink(Output::Red, fast_pattern(), Repeat::times(1).unwrap(), None)
        .unwrap();
    assert!(t.elapsed() < limit, "start_blink blocked for {:?}", t.elapsed());
    sched.stop_blink(Output::Red);
    job.wait();
}

#[test]
fn jobs_on_different_outputs_are_independent() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    let red = sched
        .start_blink(Output::Red, fast_pattern(), Repeat::times(2).unwrap(), None)
        .unwrap();
    let green = sched
        .start_blink(Output::Green, fast_pattern(), Repeat::times(3).unwrap(), None)
        .unwrap();
    red.wait();
    green.wait();
    sched.writer().wait_drained();

    assert_eq!(sink.for_output(Output::Red).len(), 4);
    assert_eq!(sink.for_output(Output::Green).len(), 6);
}

#[test]
fn set_state_then_stop_leaves_output_on() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    let _job = sched
        .start_blink(Output::Green, fast_pattern(), Repeat::Forever, None)
        .unwrap();
    std::thread::sleep(Duration::from_millis(30));

    sched.set_state(Output::Green, true);
    sched.stop_blink(Output::Green);
    std::thread::sleep(Duration::from_millis(50));
    sched.writer().wait_drained();

    assert_eq!(sink.last(Output::Green), Some(true));
}

#[test]
fn stop_blink_keeps_last_state_and_is_idempotent() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    sched.stop_blink(Output::Red);
    sched.stop_blink(Output::Red);
    sched.writer().wait_drained();
    assert_eq!(sink.len(), 0);
}

#[test]
fn deadline_wins_over_repeat_limit() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    let pattern = Pattern::alternating(&[2.5, 2.5]).unwrap();

    let started = Instant::now();
    sched
        .start_blink(
            Output::Red,
            pattern,
            Repeat::times(3).unwrap(),
            Some(Duration::from_millis(50)),
        )
        .unwrap()
        .wait();
    let elapsed = started.elapsed();
    sched.writer().wait_drained();

    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_secs(2), "deadline ignored: {:?}", elapsed);
    assert_eq!(sink.for_output(Output::Red).len(), 1);
}

#[test]
fn repeat_limit_wins_over_deadline() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());

    let started = Instant::now();
    sched
        .start_blink(
            Output::Red,
            fast_pattern(),
            Repeat::times(2).unwrap(),
            Some(Duration::from_secs(10)),
        )
        .unwrap()
        .wait();

    assert!(started.elapsed() < Duration::from_secs(2));
    sched.writer().wait_drained();
    assert_eq!(sink.for_output(Output::Red).len(), 4);
}

#[test]
fn stale_deadline_does_not_stop_successor() {
    let sink = AuditSink::new();
    let sched = pipeline(sink.clone());
    let first = sched
        .start_blink(
            Output::Green,
            Pattern::alternating(&[5.0, 5.0]).unwrap(),
            Repeat::Forever,
            Some(Duration::from_millis(30)),
        )
        .unwrap();
    let second = sched
        .start_blink(Output::Green, fast_pattern(), Repeat::times(5).unwrap(), None)
        .unwrap();
    first.wait();
    second.wait();
    sched.writer().wait_drained();

    let on_writes = sink.for_output(Output::Green).iter().filter(|w| w.on).count();
    assert!(on_writes >= 5, "successor cut short: {} on-writes", on_writes);
}
