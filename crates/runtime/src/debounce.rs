use foundation::time::Millis;

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    value: T,
    deadline: Millis,
}

/// Trailing-edge debouncer.
///
/// Every [`push`](Debouncer::push) replaces the pending value and restarts
/// the quiet period, so a value is only released by [`poll`](Debouncer::poll)
/// once no newer push arrived for `delay_ms`. At most one value is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Schedule `value`, cancelling whatever was pending.
    ///
    /// Returns `true` if an earlier value was superseded.
    pub fn push(&mut self, now: Millis, value: T) -> bool {
        let superseded = self.pending.is_some();
        self.pending = Some(Pending {
            value,
            deadline: now.saturating_add(self.delay_ms),
        });
        superseded
    }

    /// Release the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use foundation::time::Millis;

    #[test]
    fn coalesces_rapid_pushes_into_last_value() {
        let mut d = Debouncer::new(500);
        assert!(!d.push(Millis(0), "a"));
        assert!(d.push(Millis(100), "ab"));
        assert!(d.push(Millis(200), "abc"));

        let mut released = Vec::new();
        for t in (0..=1_500).step_by(10) {
            if let Some(v) = d.poll(Millis(t)) {
                released.push((t, v));
            }
        }
        assert_eq!(released, vec![(700, "abc")]);
    }

    #[test]
    fn not_released_before_quiet_period() {
        let mut d = Debouncer::new(500);
        d.push(Millis(1_000), 1);
        assert_eq!(d.poll(Millis(1_499)), None);
        assert_eq!(d.deadline(), Some(Millis(1_500)));
        assert_eq!(d.poll(Millis(1_500)), Some(1));
        assert_eq!(d.poll(Millis(2_000)), None);
    }

    #[test]
    fn separate_quiet_periods_release_separately() {
        let mut d = Debouncer::new(500);
        d.push(Millis(0), "first");
        assert_eq!(d.poll(Millis(600)), Some("first"));
        d.push(Millis(700), "second");
        assert_eq!(d.poll(Millis(1_199)), None);
        assert_eq!(d.poll(Millis(1_200)), Some("second"));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut d = Debouncer::new(500);
        d.push(Millis(0), 5);
        assert!(d.cancel());
        assert!(!d.cancel());
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(Millis(10_000)), None);
    }
}
