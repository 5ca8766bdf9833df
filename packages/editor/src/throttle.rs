/// Leading-edge throttle keyed on event timestamps (milliseconds)
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// `true` if an event at `now` should be handled.
    pub fn ready(&mut self, now: f64) -> bool {
        match self.last {
            Some(last) if now - last < self.interval_ms && now >= last => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Record `now` as handled without asking.
    pub fn mark(&mut self, now: f64) {
        self.last = Some(now);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_events_inside_interval() {
        let mut throttle = Throttle::new(10.0);
        assert!(throttle.ready(100.0));
        assert!(!throttle.ready(105.0));
        assert!(!throttle.ready(109.9));
        assert!(throttle.ready(110.0));
    }

    #[test]
    fn test_mark_starts_a_new_interval() {
        let mut throttle = Throttle::new(10.0);
        assert!(throttle.ready(100.0));
        throttle.mark(105.0);
        assert!(!throttle.ready(112.0));
        assert!(throttle.ready(115.0));
    }

    #[test]
    fn test_clock_going_backwards_is_accepted() {
        let mut throttle = Throttle::new(10.0);
        assert!(throttle.ready(500.0));
        assert!(throttle.ready(20.0));
    }
}
