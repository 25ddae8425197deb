//! Host-side tests for the collision cycle: the driver runs without any
//! display surface, so every phase property is checked frame by frame.

use frc_viz::config::Config;
use frc_viz::driver::{Driver, Phase};

/// Fake wall clock advancing a fixed amount per frame.
struct Clock {
    now_ms: f64,
    step_ms: f64,
}

impl Clock {
    fn new(step_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            step_ms,
        }
    }

    fn tick(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }
}

/// Step until the phase changes; returns the number of frames spent in the
/// phase that was active on entry.
fn run_phase(driver: &mut Driver, clock: &mut Clock) -> u32 {
    let entered = driver.phase();
    let mut frames = 0;
    while driver.phase() == entered {
        driver.step(clock.tick());
        frames += 1;
        assert!(frames < 10_000, "phase {entered:?} never ended");
    }
    frames
}

#[test]
fn idle_timer_counts_and_scale_stays_in_pulse_band() {
    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut clock = Clock::new(16.0);

    for expected_timer in 1..=config.wait_frames {
        driver.step(clock.tick());
        assert_eq!(driver.phase(), Phase::Idle);
        assert_eq!(driver.timer(), expected_timer);

        let scale = driver.left().scale;
        let band = config.pulse_amplitude + 1e-6;
        assert!(
            (scale - 1.0).abs() <= band,
            "idle scale {scale} outside pulse band at frame {expected_timer}"
        );
    }
}

#[test]
fn idle_ends_exactly_when_timer_exceeds_wait() {
    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut clock = Clock::new(16.0);

    let frames = run_phase(&mut driver, &mut clock);
    assert_eq!(frames, config.wait_frames + 1);
    assert_eq!(driver.phase(), Phase::Colliding);
    assert_eq!(driver.timer(), 0);
}

#[test]
fn colliding_is_mirror_symmetric_and_ends_at_center() {
    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut clock = Clock::new(16.0);
    run_phase(&mut driver, &mut clock); // leave Idle

    let mut frames = 0;
    while driver.phase() == Phase::Colliding {
        let before = driver.left().x;
        driver.step(clock.tick());
        frames += 1;

        let left = driver.left();
        let right = driver.right();
        assert_eq!(left.x, -right.x, "mirror symmetry broken at frame {frames}");
        assert!(left.x > before, "left blob moved away from center");
        if driver.phase() == Phase::Colliding {
            assert!(left.x < 0.0, "still colliding past the center line");
        }
    }

    assert_eq!(driver.phase(), Phase::Merged);
    assert!(driver.left().x >= 0.0);

    // ceil(4.5 / 0.08) = 57 with the default constants.
    let expected = (config.start_offset / config.collision_speed).ceil() as u32;
    assert_eq!(frames, expected);
    assert_eq!(frames, 57);
}

#[test]
fn merged_fades_out_and_grows_until_snap() {
    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut clock = Clock::new(16.0);
    run_phase(&mut driver, &mut clock); // Idle
    run_phase(&mut driver, &mut clock); // Colliding

    assert_eq!(driver.phase(), Phase::Merged);
    let mut frames = 0;
    let mut last_scale = driver.left().scale;
    let mut last_opacity = driver.left().opacity;
    while driver.phase() == Phase::Merged {
        driver.step(clock.tick());
        frames += 1;
        if driver.phase() == Phase::Merged {
            let blob = driver.left();
            assert!(blob.scale >= last_scale, "flash scale shrank");
            assert!(blob.opacity <= last_opacity, "flash opacity grew");
            last_scale = blob.scale;
            last_opacity = blob.opacity;
        }
    }

    // Timer runs 1..=merged_frames, plus the frame that crosses the limit.
    assert_eq!(frames, config.merged_frames + 1);
    assert_eq!(frames, 51);
    assert_eq!(driver.phase(), Phase::Resetting);
}

#[test]
fn resetting_restores_start_values_then_ramps_opacity() {
    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut clock = Clock::new(16.0);
    run_phase(&mut driver, &mut clock); // Idle
    run_phase(&mut driver, &mut clock); // Colliding
    run_phase(&mut driver, &mut clock); // Merged

    // Entry into Resetting snaps everything back before the fade-in starts.
    assert_eq!(driver.phase(), Phase::Resetting);
    let left = driver.left();
    let right = driver.right();
    assert_eq!(left.x, -config.start_offset);
    assert_eq!(right.x, config.start_offset);
    assert_eq!(left.scale, 1.0);
    assert_eq!(left.opacity, config.opacity_floor);

    let mut frames = 0;
    let mut last_opacity = driver.left().opacity;
    while driver.phase() == Phase::Resetting {
        driver.step(clock.tick());
        frames += 1;
        let opacity = driver.left().opacity;
        assert!(opacity > last_opacity, "fade-in not increasing");
        assert_eq!(driver.left().x, -config.start_offset, "position moved during fade-in");
        last_opacity = opacity;
    }

    // floor 0.0 to steady 0.8 in steps of 0.02.
    assert_eq!(frames, 40);
    assert_eq!(driver.phase(), Phase::Idle);
    assert_eq!(driver.left().opacity, config.steady_opacity);
}

#[test]
fn full_cycle_is_deterministic() {
    let config = Config::default();
    let mut driver = Driver::new(config);
    let mut clock = Clock::new(16.0);

    let idle = run_phase(&mut driver, &mut clock);
    let colliding = run_phase(&mut driver, &mut clock);
    let merged = run_phase(&mut driver, &mut clock);
    let resetting = run_phase(&mut driver, &mut clock);

    assert_eq!((idle, colliding, merged, resetting), (201, 57, 51, 40));
    assert_eq!(driver.phase(), Phase::Idle);

    // Second lap matches the first exactly.
    let lap2 = (
        run_phase(&mut driver, &mut clock),
        run_phase(&mut driver, &mut clock),
        run_phase(&mut driver, &mut clock),
        run_phase(&mut driver, &mut clock),
    );
    assert_eq!(lap2, (idle, colliding, merged, resetting));
}

#[test]
fn wall_clock_rate_never_affects_phase_timing() {
    // The clock only drives the cosmetic idle pulse; transitions are frame
    // counted, so wildly different frame rates produce identical timing.
    for step_ms in [4.0, 16.0, 33.0, 250.0] {
        let mut driver = Driver::new(Config::default());
        let mut clock = Clock::new(step_ms);
        let durations = (
            run_phase(&mut driver, &mut clock),
            run_phase(&mut driver, &mut clock),
            run_phase(&mut driver, &mut clock),
            run_phase(&mut driver, &mut clock),
        );
        assert_eq!(durations, (201, 57, 51, 40), "step_ms = {step_ms}");
    }
}
