//! Fixed-timestep frame clock.
//!
//! The game simulates in whole 60 Hz ticks regardless of how fast the host
//! redraws: wall-clock time feeds an accumulator, and the frame loop runs
//! `while should_step()` to consume it one fixed slice at a time. A frame
//! that arrives late runs several ticks; a frame that arrives early runs
//! none. The accumulator is capped so a long stall (debugger, window drag)
//! cannot queue up seconds of catch-up simulation.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub tick_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            tick_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let mut real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Spiral-of-death cap
        if real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms — capping accumulator to {:.0}ms",
                real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            real_dt = self.max_accumulator;
        }

        self.accumulator += real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.tick_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulated_time_yields_whole_steps() {
        let mut clock = FrameClock::new();
        // Inject exactly 3.5 fixed steps worth of time.
        clock.accumulator = clock.fixed_dt * 3.5;
        let mut steps = 0;
        while clock.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(clock.tick_count, 3);
        // The half step stays queued for the next frame.
        assert!(clock.accumulator > 0.0 && clock.accumulator < clock.fixed_dt);
    }

    #[test]
    fn no_step_without_accumulated_time() {
        let mut clock = FrameClock::new();
        clock.accumulator = 0.0;
        assert!(!clock.should_step());
        assert_eq!(clock.steps_this_frame, 0);
    }
}
