use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

// Per-client request limiter; the handler only sees this trait
pub trait RequestLimiter: Send + Sync {
    // true = allowed and recorded, false = rejected and not recorded
    fn check_and_record(&self, client_id: &str) -> bool;
}

/// Sliding-window limiter keeping the accepted request timestamps per client.
///
/// In-process only: each server instance counts on its own.
pub struct SlidingWindowLimiter {
    log: DashMap<String, VecDeque<Instant>>, // client -> accepted timestamps, oldest first
    limit: usize,
    window: Duration,
}

impl SlidingWindowLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            log: DashMap::new(),
            limit,
            window,
        }
    }

    pub fn check_and_record_at(&self, client_id: &str, now: Instant) -> bool {
        // new key: drop clients whose whole log has aged out first
        if !self.log.contains_key(client_id) {
            self.evict_idle(now);
        }

        // entry guard holds the shard lock, so one writer per client at a time
        let mut entry = self.log.entry(client_id.to_string()).or_default();

        // drop everything outside the window
        while let Some(&oldest) = entry.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                entry.pop_front();
            } else {
                break;
            }
        }

        if entry.len() >= self.limit {
            return false;
        }

        entry.push_back(now);
        true
    }

    // Must not run while an entry guard is held
    fn evict_idle(&self, now: Instant) {
        self.log.retain(|_, stamps| {
            stamps
                .back()
                .is_some_and(|&newest| now.saturating_duration_since(newest) < self.window)
        });
    }

    #[cfg(test)]
    fn recorded(&self, client_id: &str) -> usize {
        self.log.get(client_id).map(|e| e.len()).unwrap_or(0)
    }
}

impl RequestLimiter for SlidingWindowLimiter {
    fn check_and_record(&self, client_id: &str) -> bool {
        self.check_and_record_at(client_id, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const WINDOW: Duration = Duration::from_secs(300);

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = SlidingWindowLimiter::new(10, WINDOW);
        let now = Instant::now();

        for i in 0..10 {
            assert!(limiter.check_and_record_at("10.0.0.1", now + Duration::from_secs(i)));
        }
        assert!(!limiter.check_and_record_at("10.0.0.1", now + Duration::from_secs(11)));
        assert_eq!(limiter.recorded("10.0.0.1"), 10);
    }

    #[test]
    fn rejected_attempts_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new(2, WINDOW);
        let start = Instant::now();

        assert!(limiter.check_and_record_at("c", start));
        assert!(limiter.check_and_record_at("c", start + Duration::from_secs(10)));
        for s in 20..30 {
            assert!(!limiter.check_and_record_at("c", start + Duration::from_secs(s)));
        }
        assert_eq!(limiter.recorded("c"), 2);

        // first slot frees up exactly one window after the first accept
        assert!(limiter.check_and_record_at("c", start + WINDOW));
        assert!(!limiter.check_and_record_at("c", start + WINDOW + Duration::from_secs(1)));
    }

    #[test]
    fn recovers_after_window() {
        let limiter = SlidingWindowLimiter::new(10, WINDOW);
        let start = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_and_record_at("ip", start));
        }
        assert!(!limiter.check_and_record_at("ip", start + Duration::from_secs(299)));
        assert!(limiter.check_and_record_at("ip", start + Duration::from_secs(301)));
        assert_eq!(limiter.recorded("ip"), 1);
    }

    #[test]
    fn clients_are_independent() {
        let limiter = SlidingWindowLimiter::new(1, WINDOW);
        let now = Instant::now();

        assert!(limiter.check_and_record_at("a", now));
        assert!(!limiter.check_and_record_at("a", now));
        assert!(limiter.check_and_record_at("b", now));
    }

    #[test]
    fn idle_clients_are_evicted_when_a_new_one_arrives() {
        let limiter = SlidingWindowLimiter::new(10, WINDOW);
        let start = Instant::now();

        for i in 0..100 {
            assert!(limiter.check_and_record_at(&format!("spoofed-{}", i), start));
        }
        assert!(limiter.check_and_record_at("recent", start + Duration::from_secs(200)));
        assert_eq!(limiter.log.len(), 101);

        assert!(limiter.check_and_record_at("late", start + WINDOW));
        assert_eq!(limiter.log.len(), 2);
        assert_eq!(limiter.recorded("recent"), 1);
        assert_eq!(limiter.recorded("spoofed-0"), 0);
    }

    #[test]
    fn eviction_keeps_clients_with_live_timestamps() {
        let limiter = SlidingWindowLimiter::new(2, WINDOW);
        let start = Instant::now();

        assert!(limiter.check_and_record_at("busy", start));
        assert!(limiter.check_and_record_at("busy", start + Duration::from_secs(100)));
        assert!(limiter.check_and_record_at("other", start + WINDOW));

        // one of busy's two slots is still taken
        assert!(limiter.check_and_record_at("busy", start + WINDOW));
        assert!(!limiter.check_and_record_at("busy", start + WINDOW));
    }

    #[test]
    fn concurrent_requests_never_exceed_limit() {
        let limiter = Arc::new(SlidingWindowLimiter::new(10, WINDOW));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..10).filter(|_| limiter.check_and_record("shared")).count()
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 10);
        assert_eq!(limiter.recorded("shared"), 10);
    }
}
