use std::time::Instant;

/// Frame timing for the main loop.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Option<Instant>,
    frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: None,
            frame: 0,
        }
    }

    /// Seconds since the previous tick; the first tick returns 0.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        self.frame += 1;
        dt
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Number of ticks so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_tick_is_zero_then_deltas() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert_eq!(clock.tick_at(t0), 0.0);
        let dt = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn clock_going_backwards_is_zero() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(t0);
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 - Duration::from_millis(5)), 0.0);
    }
}
