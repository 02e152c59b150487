// The redraw loop as an explicit task: the window asks for a frame, the
// FrameLoop decides whether the task runs (running / paused / cancelled).
// Also: FPS counter and a small debouncer for window resizes.

use crate::types::FrameBuffer;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Something that draws one frame into the screen buffer.
pub trait Tick {
    fn tick(&mut self, screen: &mut FrameBuffer);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
    Cancelled,
}

pub struct FrameLoop {
    state: LoopState,
    frames: u64, // ticks actually run
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self { state: LoopState::Running, frames: 0 }
    }

    /// Run one frame of `task` unless paused or cancelled. Returns true if it ran.
    /// Visual: while paused the last frame stays frozen on screen.
    pub fn step<T: Tick>(&mut self, task: &mut T, screen: &mut FrameBuffer) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        task.tick(screen);
        self.frames += 1;
        true
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            LoopState::Running => LoopState::Paused,
            LoopState::Paused => LoopState::Running,
            LoopState::Cancelled => LoopState::Cancelled,
        };
        debug!("Frame loop {:?}", self.state);
    }

    /// Stops the loop for good; there is no way back to Running.
    pub fn cancel(&mut self) {
        self.state = LoopState::Cancelled;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == LoopState::Cancelled
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Once-per-second FPS counter (prints to the log).
pub struct FpsMeter {
    since: Instant,
    frames: u32,
    last: f32,
}

impl FpsMeter {
    pub fn new(now: Instant) -> Self {
        Self { since: now, frames: 0, last: 0.0 }
    }

    /// Count a presented frame; returns the new FPS once a second has passed.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        self.last = self.frames as f32 / elapsed.as_secs_f32();
        info!("FPS: {:.1}", self.last);
        self.frames = 0;
        self.since = now;
        Some(self.last)
    }

    pub fn last(&self) -> f32 {
        self.last
    }
}

/// Holds back a value until it has stopped changing for `delay`.
/// Visual: dragging the window edge does not rebuild the text on every pixel of movement.
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T: PartialEq> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record a new value; a repeat of the pending value does not restart the timer.
    pub fn push(&mut self, value: T, now: Instant) {
        let repeat = matches!(&self.pending, Some((v, _)) if *v == value);
        if !repeat {
            self.pending = Some((value, now));
        }
    }

    /// The settled value, once `delay` has passed since it last changed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let settled = matches!(&self.pending, Some((_, at)) if now.duration_since(*at) >= self.delay);
        if settled { self.pending.take().map(|(v, _)| v) } else { None }
    }

    /// Drop the pending value, e.g. when things went back to how they were.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Tick for Counter {
        fn tick(&mut self, screen: &mut FrameBuffer) {
            self.0 += 1;
            screen.clear(self.0);
        }
    }

    #[test]
    fn paused_and_cancelled_loops_do_not_tick() {
        let mut lp = FrameLoop::new();
        let mut task = Counter(0);
        let mut screen = FrameBuffer::new(2, 2);

        assert!(lp.step(&mut task, &mut screen));
        lp.toggle_pause();
        assert_eq!(lp.state(), LoopState::Paused);
        assert!(!lp.step(&mut task, &mut screen));
        lp.toggle_pause();
        assert!(lp.step(&mut task, &mut screen));
        assert_eq!((task.0, lp.frames()), (2, 2));

        lp.cancel();
        lp.toggle_pause();
        assert!(lp.is_cancelled());
        assert!(!lp.step(&mut task, &mut screen));
        assert_eq!(screen.pixels[0], 2);
    }

    #[test]
    fn fps_reports_once_per_second() {
        let t0 = Instant::now();
        let mut fps = FpsMeter::new(t0);
        for i in 1..30 {
            assert_eq!(fps.frame(t0 + Duration::from_millis(i * 30)), None);
        }
        let reported = fps.frame(t0 + Duration::from_secs(1)).unwrap();
        assert!((reported - 30.0).abs() < 0.01);
        assert_eq!(fps.last(), reported);
    }

    #[test]
    fn debounce_waits_for_the_value_to_settle() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut d = Debounce::new(ms(100));
        assert_eq!(d.poll(t0), None);

        d.push((800, 600), t0);
        d.push((810, 600), t0 + ms(50));
        assert_eq!(d.poll(t0 + ms(120)), None);
        // Same value again does not restart the clock
        d.push((810, 600), t0 + ms(140));
        assert_eq!(d.poll(t0 + ms(150)), Some((810, 600)));
        assert_eq!(d.poll(t0 + ms(400)), None);
    }

    #[test]
    fn cancelled_value_is_never_delivered() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut d = Debounce::new(ms(100));

        // Window goes 400x500 -> 410x500 -> back to 400x500 within the delay.
        d.push((410, 500), t0);
        assert!(d.is_pending());
        d.cancel();
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + ms(500)), None);

        // A later change still goes through.
        d.push((420, 500), t0 + ms(600));
        assert_eq!(d.poll(t0 + ms(700)), Some((420, 500)));
    }
}
