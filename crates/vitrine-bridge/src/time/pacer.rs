use std::time::{Duration, Instant};

/// Fixed-rate pacer for an external render loop.
///
/// Call [`tick`] at the top of every loop iteration: it sleeps until the next
/// frame deadline, then advances it by one interval. If the loop falls more
/// than one interval behind (debugger, stall, heavy frame) the deadline
/// resynchronizes to now instead of bursting to catch up.
///
/// Achieved frame rate is reported to the log at debug level once per `rate`
/// frames, mirroring what a renderer's animator would print.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    deadline: Instant,
    frames: u32,
    report_every: u32,
    report_start: Instant,
}

impl FramePacer {
    /// Creates a pacer targeting `rate` frames per second (clamped to ≥1).
    pub fn new(rate: u32) -> Self {
        let rate = rate.max(1);
        let now = Instant::now();
        Self {
            interval: Duration::from_secs(1) / rate,
            deadline: now,
            frames: 0,
            report_every: rate,
            report_start: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps until the next frame deadline and advances it.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.deadline > now {
            std::thread::sleep(self.deadline - now);
        }
        self.deadline += self.interval;

        let now = Instant::now();
        if now > self.deadline + self.interval {
            self.deadline = now + self.interval;
        }

        self.frames += 1;
        if self.frames >= self.report_every {
            let elapsed = now.saturating_duration_since(self.report_start);
            if !elapsed.is_zero() {
                let fps = self.frames as f64 / elapsed.as_secs_f64();
                log::debug!("render loop: {fps:.1} fps over {} frames", self.frames);
            }
            self.frames = 0;
            self.report_start = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_clamped_to_at_least_one() {
        assert_eq!(FramePacer::new(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn interval_divides_one_second() {
        assert_eq!(FramePacer::new(50).interval(), Duration::from_millis(20));
    }

    #[test]
    fn ticks_are_spaced_by_the_interval() {
        // 500 fps keeps the test fast while still observing real sleeps.
        let mut pacer = FramePacer::new(500);
        let start = Instant::now();
        pacer.tick();
        pacer.tick();
        pacer.tick();
        // First tick fires immediately; the next two wait one interval each.
        assert!(start.elapsed() >= 2 * pacer.interval());
    }
}
