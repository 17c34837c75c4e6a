use std::time::Duration;

/// Exponential retry schedule: `initial, 2*initial, 4*initial, ...`,
/// at most `max_retries` delays.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Backoff {
    initial: Duration,
    max_retries: usize,
}

impl Backoff {
    /// Schedule of `max_retries` delays starting at `initial`.
    pub fn new(initial: Duration, max_retries: usize) -> Self {
        Self {
            initial,
            max_retries,
        }
    }

    /// Delay before the first retry.
    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// Retries allowed after the initial attempt.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Upper bound on attempts for one logical request.
    pub fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    /// Starts a fresh delay sequence for one logical request.
    pub fn delays(&self) -> Delays {
        Delays {
            next: self.initial,
            remaining: self.max_retries,
        }
    }
}

/// Iterator over the delays of one [`Backoff`] schedule.
#[derive(Clone, Debug)]
pub struct Delays {
    next: Duration,
    remaining: usize,
}

impl Iterator for Delays {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = current.saturating_mul(2);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Delays {}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Backoff;

    #[test]
    fn delays_double_from_initial() {
        let delays: Vec<_> = Backoff::new(Duration::from_millis(100), 4).delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
            ]
        );
    }

    #[test]
    fn zero_retries_yields_no_delay() {
        let backoff = Backoff::new(Duration::from_secs(1), 0);
        assert_eq!(backoff.delays().next(), None);
        assert_eq!(backoff.max_attempts(), 1);
    }

    #[test]
    fn doubling_saturates() {
        let mut delays = Backoff::new(Duration::MAX, 3).delays();
        assert_eq!(delays.next(), Some(Duration::MAX));
        assert_eq!(delays.next(), Some(Duration::MAX));
        assert_eq!(delays.len(), 1);
    }
}
