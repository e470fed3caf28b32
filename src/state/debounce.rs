//! Coalescing of rapid document edits

/// Trailing-edge debouncer driven by caller-supplied timestamps
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period after the last change (ms)
    delay_ms: u64,
    /// When the pending change settles
    deadline: Option<u64>,
    /// Changes folded into the pending one
    coalesced: usize,
    /// Set by `flush`; later notifications cannot push it back
    forced: bool,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
            coalesced: 0,
            forced: false,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Record a change; restarts the quiet period
    pub fn notify(&mut self, now_ms: u64) {
        if self.deadline.is_some() {
            self.coalesced += 1;
            log::debug!("Coalescing edit ({} pending)", self.coalesced + 1);
        }
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Make the pending change due immediately
    pub fn flush(&mut self) {
        self.forced = true;
    }

    /// Check if a change is waiting to settle
    pub fn is_pending(&self) -> bool {
        self.forced || self.deadline.is_some()
    }

    /// True once per settled change
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let settled = matches!(self.deadline, Some(deadline) if now_ms >= deadline);
        if !(self.forced || settled) {
            return false;
        }
        self.deadline = None;
        self.coalesced = 0;
        self.forced = false;
        true
    }
}

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_after_delay() {
        let mut debouncer = Debouncer::new(300);
        assert!(!debouncer.poll(0));

        debouncer.notify(1000);
        assert!(debouncer.is_pending());
        assert!(!debouncer.poll(1299));
        assert!(debouncer.poll(1300));
        assert!(!debouncer.poll(1301));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_rapid_edits_coalesce() {
        let mut debouncer = Debouncer::new(300);
        let mut fired = 0;
        for t in (0..1000).step_by(50) {
            debouncer.notify(t);
            if debouncer.poll(t) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert!(debouncer.poll(950 + 300));
    }

    #[test]
    fn test_flush_is_immediate() {
        let mut debouncer = Debouncer::new(300);
        debouncer.notify(10);
        debouncer.flush();
        assert!(debouncer.poll(10));
    }

    #[test]
    fn test_flush_survives_later_notify() {
        let mut debouncer = Debouncer::new(300);
        debouncer.flush();
        debouncer.notify(20);
        assert!(debouncer.poll(20));
        // The edit folded into the flushed run
        assert!(!debouncer.poll(400));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_clock_advances() {
        assert!(now_ms() > 0);
    }
}
