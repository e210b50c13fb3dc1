//! Elapsed clock accounting across pause/resume cycles

use std::time::{Duration, Instant};

use fleet_sim::simulation::ElapsedClock;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn test_paused_time_is_excluded() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.start_at(t0);
    clock.pause_at(t0 + secs(2));
    clock.resume_at(t0 + secs(5));
    clock.stop_at(t0 + secs(6));

    assert_eq!(clock.elapsed_at(t0 + secs(100)), secs(3));
}

#[test]
fn test_elapsed_while_active_includes_open_interval() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.start_at(t0);
    assert_eq!(clock.elapsed_at(t0 + secs(4)), secs(4));
    assert!(clock.is_active());
}

#[test]
fn test_elapsed_while_paused_is_frozen() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.start_at(t0);
    clock.pause_at(t0 + secs(1));
    assert_eq!(clock.elapsed_at(t0 + secs(10)), secs(1));
    assert_eq!(clock.elapsed_at(t0 + secs(20)), secs(1));
}

#[test]
fn test_double_pause_and_double_resume_are_noops() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.start_at(t0);
    clock.pause_at(t0 + secs(1));
    clock.pause_at(t0 + secs(3));
    clock.resume_at(t0 + secs(4));
    clock.resume_at(t0 + secs(6));
    clock.stop_at(t0 + secs(7));

    assert_eq!(clock.elapsed_at(t0 + secs(7)), secs(4));
}

#[test]
fn test_resume_without_pause_does_not_start() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.resume_at(t0);
    assert!(!clock.is_active());
    assert_eq!(clock.elapsed_at(t0 + secs(5)), Duration::ZERO);
}

#[test]
fn test_stop_while_paused_keeps_accumulated() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.start_at(t0);
    clock.pause_at(t0 + secs(2));
    clock.stop_at(t0 + secs(9));
    clock.stop_at(t0 + secs(12));

    assert_eq!(clock.elapsed_at(t0 + secs(15)), secs(2));
    assert!(!clock.is_paused());
}

#[test]
fn test_reset_clears_everything() {
    let t0 = Instant::now();
    let mut clock = ElapsedClock::new();

    clock.start_at(t0);
    clock.stop_at(t0 + secs(3));
    clock.reset();

    assert_eq!(clock.elapsed(), Duration::ZERO);
    assert_eq!(clock.elapsed_seconds(), 0);
    assert!(!clock.is_active());
}
