//! Blocking waits between service calls.
//!
//! Backoff and rate-limit delays go through [`Pacer`] so tests can record the
//! requested durations instead of sleeping.

use std::time::Duration;

pub trait Pacer {
    /// Block the current thread for `duration`.
    fn pause(&self, duration: Duration);
}

/// Sleeps on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every requested pause and returns immediately.
    #[derive(Default)]
    pub struct RecordingPacer {
        pub pauses: Mutex<Vec<Duration>>,
    }

    impl RecordingPacer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_pauses(&self) -> Vec<Duration> {
            self.pauses.lock().unwrap().clone()
        }

        /// Recorded pauses in whole seconds.
        pub fn seconds(&self) -> Vec<u64> {
            self.get_pauses().iter().map(Duration::as_secs).collect()
        }
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, duration: Duration) {
            self.pauses.lock().unwrap().push(duration);
        }
    }

    #[test]
    fn thread_pacer_zero_returns_immediately() {
        let start = std::time::Instant::now();
        ThreadPacer.pause(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn recording_pacer_keeps_order() {
        let pacer = RecordingPacer::new();
        pacer.pause(Duration::from_secs(2));
        pacer.pause(Duration::from_secs(4));
        assert_eq!(pacer.seconds(), vec![2, 4]);
    }
}
