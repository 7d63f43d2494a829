//! Time-based animation channels.
//!
//! A channel holds its current value implicitly: the start value, the
//! target, when the run started and for how long. Sampling at any instant
//! yields the eased value, and retargeting mid-run starts the new run from
//! wherever the old one was, so toggles never queue.

use std::time::{Duration, Instant};

use gpui::Rgba;

use crate::motion::Easing;

/// Identifies one run of a channel. Stale tickets are ignored on completion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SettleTicket {
    generation: u64,
    ends_at: Instant,
}

impl SettleTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.ends_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.ends_at.saturating_duration_since(now)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedValue {
    from: f32,
    to: f32,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
    generation: u64,
}

impl AnimatedValue {
    pub fn new_at(value: f32, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            started_at: now,
            duration: Duration::ZERO,
            easing: Easing::EaseInOut,
            generation: 0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            return self.to;
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.easing.apply(progress);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_running_at(&self, now: Instant) -> bool {
        !self.duration.is_zero() && now < self.started_at + self.duration
    }

    /// Starts a run from the value at `now` toward `to`.
    pub fn retarget_at(&mut self, to: f32, duration: Duration, now: Instant) -> SettleTicket {
        self.from = self.value_at(now);
        self.to = to;
        self.started_at = now;
        self.duration = duration;
        self.generation = self.generation.wrapping_add(1);
        SettleTicket {
            generation: self.generation,
            ends_at: now + duration,
        }
    }

    pub fn is_current(&self, ticket: SettleTicket) -> bool {
        ticket.generation == self.generation
    }
}

/// Piecewise-linear mapping from an input range onto scalar outputs.
/// Inputs outside the range clamp to the end points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interpolation<const N: usize> {
    input: [f32; N],
    output: [f32; N],
}

impl<const N: usize> Interpolation<N> {
    pub const fn new(input: [f32; N], output: [f32; N]) -> Self {
        Self { input, output }
    }

    pub fn sample(&self, x: f32) -> f32 {
        let (index, t) = segment(&self.input, x);
        if N == 1 {
            return self.output[0];
        }
        let a = self.output[index];
        let b = self.output[index + 1];
        a + (b - a) * t
    }
}

/// Same as [`Interpolation`] with colors as outputs, blended per channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorInterpolation<const N: usize> {
    input: [f32; N],
    output: [Rgba; N],
}

impl<const N: usize> ColorInterpolation<N> {
    pub const fn new(input: [f32; N], output: [Rgba; N]) -> Self {
        Self { input, output }
    }

    pub fn sample(&self, x: f32) -> Rgba {
        if N == 1 {
            return self.output[0];
        }
        let (index, t) = segment(&self.input, x);
        lerp_rgba(self.output[index], self.output[index + 1], t)
    }
}

pub fn lerp_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    Rgba {
        r: a.r + (b.r - a.r) * t,
        g: a.g + (b.g - a.g) * t,
        b: a.b + (b.b - a.b) * t,
        a: a.a + (b.a - a.a) * t,
    }
}

fn segment<const N: usize>(input: &[f32; N], x: f32) -> (usize, f32) {
    if N < 2 {
        return (0, 0.0);
    }
    if !x.is_finite() || x <= input[0] {
        return (0, 0.0);
    }
    if x >= input[N - 1] {
        return (N - 2, 1.0);
    }
    let mut index = 0;
    while index + 2 < N && x > input[index + 1] {
        index += 1;
    }
    let span = input[index + 1] - input[index];
    let t = if span.abs() <= f32::EPSILON {
        1.0
    } else {
        (x - input[index]) / span
    };
    (index, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(r: f32, g: f32, b: f32) -> Rgba {
        Rgba { r, g, b, a: 1.0 }
    }

    #[test]
    fn value_reaches_target_after_duration() {
        let start = Instant::now();
        let mut channel = AnimatedValue::new_at(0.0, start);
        channel.retarget_at(1.0, Duration::from_millis(200), start);

        assert_eq!(channel.value_at(start), 0.0);
        let midway = channel.value_at(start + Duration::from_millis(100));
        assert!(midway > 0.0 && midway < 1.0);
        assert_eq!(channel.value_at(start + Duration::from_millis(200)), 1.0);
        assert!(!channel.is_running_at(start + Duration::from_millis(250)));
    }

    #[test]
    fn retarget_mid_run_starts_from_the_sampled_value() {
        let start = Instant::now();
        let mut channel = AnimatedValue::new_at(0.0, start).with_easing(Easing::Linear);
        channel.retarget_at(1.0, Duration::from_millis(100), start);

        let halfway = start + Duration::from_millis(50);
        let first = channel.retarget_at(-1.0, Duration::from_millis(100), halfway);
        assert!((channel.value_at(halfway) - 0.5).abs() < 1e-3);
        assert_eq!(channel.target(), -1.0);
        assert!(channel.is_current(first));

        let second = channel.retarget_at(0.0, Duration::from_millis(100), halfway);
        assert!(!channel.is_current(first));
        assert!(channel.is_current(second));
    }

    #[test]
    fn zero_duration_jumps_immediately() {
        let start = Instant::now();
        let mut channel = AnimatedValue::new_at(0.0, start);
        let ticket = channel.retarget_at(1.0, Duration::ZERO, start);
        assert_eq!(channel.value_at(start), 1.0);
        assert!(ticket.is_due(start));
    }

    #[test]
    fn three_point_interpolation_clamps_and_blends() {
        let width = Interpolation::new([-1.0, 0.0, 1.0], [2.0, 0.5, 2.0]);
        assert_eq!(width.sample(-3.0), 2.0);
        assert_eq!(width.sample(0.0), 0.5);
        assert!((width.sample(0.5) - 1.25).abs() < 1e-5);
        assert_eq!(width.sample(4.0), 2.0);
    }

    #[test]
    fn color_interpolation_hits_each_stop() {
        let error = rgba(1.0, 0.0, 0.0);
        let base = rgba(0.5, 0.5, 0.5);
        let tint = rgba(0.0, 0.0, 1.0);
        let colors = ColorInterpolation::new([-1.0, 0.0, 1.0], [error, base, tint]);
        assert_eq!(colors.sample(-1.0), error);
        assert_eq!(colors.sample(0.0), base);
        assert_eq!(colors.sample(1.0), tint);
        let between = colors.sample(-0.5);
        assert!((between.r - 0.75).abs() < 1e-5);
    }
}
