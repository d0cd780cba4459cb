/// Single-shot timer on the stack clock (seconds).
///
/// State changes never touch the deadline directly. They place a signed request
/// which the control loop applies once per iteration through [`Timer::apply`]:
/// a positive duration (re)arms, a negative one cancels, zero leaves the timer alone.
/// An expiry handler can therefore rearm its own timer without racing the running check.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    deadline: Option<f64>,
    request: f64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the timer to fire `duration` seconds after the next `apply`
    pub fn start(&mut self, duration: f64) {
        assert!(duration > 0.0, "timer duration must be positive");
        self.request = duration;
    }

    /// Request cancellation on the next `apply`
    pub fn stop(&mut self) {
        self.request = -1.0;
    }

    /// Apply the pending request, if any, relative to `now`
    pub fn apply(&mut self, now: f64) {
        if self.request > 0.0 {
            self.deadline = Some(now + self.request);
        } else if self.request < 0.0 {
            self.deadline = None;
        }
        self.request = 0.0;
    }

    /// Returns true exactly once when the deadline has passed, disarming the timer.
    /// A pending request supersedes the old deadline, so nothing fires until it is applied.
    pub fn poll_expired(&mut self, now: f64) -> bool {
        if self.request != 0.0 {
            return false;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// True if armed, or if an arm request is waiting to be applied
    pub fn is_running(&self) -> bool {
        self.request > 0.0 || (self.deadline.is_some() && self.request == 0.0)
    }

    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|d| (d - now).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_applied_on_next_iteration() {
        let mut t = Timer::new();
        t.start(2.0);
        assert!(t.is_running());
        assert!(!t.poll_expired(10.0), "not armed before apply");
        t.apply(10.0);
        assert!(!t.poll_expired(11.9));
        assert!(t.poll_expired(12.0));
        assert!(!t.poll_expired(12.5), "fires only once");
        assert!(!t.is_running());
    }

    #[test]
    fn test_cancel_and_rearm() {
        let mut t = Timer::new();
        t.start(1.0);
        t.apply(0.0);
        t.stop();
        t.apply(0.5);
        assert!(!t.poll_expired(5.0));

        t.start(1.0);
        t.apply(5.0);
        t.start(3.0);
        t.apply(5.5);
        assert!(!t.poll_expired(6.0));
        assert_eq!(t.remaining(6.0), Some(2.5));
        assert!(t.poll_expired(8.5));
    }

    #[test]
    fn test_zero_request_leaves_timer_alone() {
        let mut t = Timer::new();
        t.start(1.0);
        t.apply(0.0);
        t.apply(0.5);
        t.apply(0.9);
        assert!(t.poll_expired(1.0));
    }

    #[test]
    fn test_pending_request_masks_old_deadline() {
        let mut t = Timer::new();
        t.start(1.0);
        t.apply(0.0);
        t.stop();
        assert!(!t.poll_expired(2.0));
        t.apply(2.0);
        assert!(!t.poll_expired(3.0));
    }
}
