use crate::error::{EngineError, Result};
use crate::models::SessionSignal;
use crate::utils::safe_ratio;
use std::collections::VecDeque;
use tracing::warn;

/// Maximum signals retained per session
const WINDOW_CAPACITY: usize = 50;

/// Bounded, chronologically-ordered buffer of recent interaction signals
/// for one active session. Oldest signals are evicted FIFO once the
/// window is full.
#[derive(Debug, Default)]
pub struct SignalWindow {
    signals: VecDeque<SessionSignal>,
}

impl SignalWindow {
    pub fn new() -> Self {
        Self {
            signals: VecDeque::with_capacity(WINDOW_CAPACITY),
        }
    }

    /// Validate and insert a signal, evicting the oldest entry when the
    /// window is at capacity.
    ///
    /// Rejected signals (non-positive total duration, or a timestamp older
    /// than the newest signal already held) leave the window untouched.
    /// Skip-rate and completion statistics are order-insensitive, but FIFO
    /// eviction is not, so out-of-order delivery must be resolved upstream.
    pub fn push(&mut self, signal: SessionSignal) -> Result<()> {
        if signal.total_duration <= 0.0 || !signal.total_duration.is_finite() {
            warn!(
                video_id = %signal.video_id,
                total_duration = signal.total_duration,
                "Rejecting signal with non-positive total duration"
            );
            return Err(EngineError::InvalidSignal(format!(
                "total_duration must be > 0 (got {})",
                signal.total_duration
            )));
        }

        if let Some(last) = self.signals.back() {
            if signal.timestamp < last.timestamp {
                warn!(
                    video_id = %signal.video_id,
                    timestamp = %signal.timestamp,
                    newest = %last.timestamp,
                    "Rejecting out-of-order signal"
                );
                return Err(EngineError::InvalidSignal(format!(
                    "timestamp {} precedes newest window entry {}",
                    signal.timestamp, last.timestamp
                )));
            }
        }

        if self.signals.len() >= WINDOW_CAPACITY {
            self.signals.pop_front();
        }
        self.signals.push_back(signal);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Mean watch/total completion ratio over the window.
    /// Individual non-finite ratios contribute 0 instead of poisoning the mean.
    pub fn avg_completion_ratio(&self) -> f64 {
        if self.signals.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .signals
            .iter()
            .map(|s| safe_ratio(s.watch_duration, s.total_duration))
            .sum();
        sum / self.signals.len() as f64
    }

    /// Fraction of window signals flagged as skipped.
    pub fn skip_rate(&self) -> f64 {
        if self.signals.is_empty() {
            return 0.0;
        }
        let skips = self.signals.iter().filter(|s| s.skipped).count();
        skips as f64 / self.signals.len() as f64
    }

    pub fn any_replayed(&self) -> bool {
        self.signals.iter().any(|s| s.replayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn signal_at(offset_secs: i64) -> SessionSignal {
        SessionSignal {
            video_id: format!("v{}", offset_secs),
            watch_duration: 8.0,
            total_duration: 16.0,
            liked: false,
            commented: false,
            shared: false,
            saved: false,
            skipped: false,
            replayed: false,
            timestamp: Utc::now() + Duration::seconds(offset_secs),
            scroll_velocity: 0.0,
        }
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut window = SignalWindow::new();
        for i in 0..60 {
            window.push(signal_at(i)).unwrap();
        }
        assert_eq!(window.len(), WINDOW_CAPACITY);
    }

    #[test]
    fn test_rejects_zero_duration() {
        let mut window = SignalWindow::new();
        let mut bad = signal_at(0);
        bad.total_duration = 0.0;
        assert!(window.push(bad).is_err());
        assert!(window.is_empty());
    }

    #[test]
    fn test_rejects_out_of_order_timestamp() {
        let mut window = SignalWindow::new();
        window.push(signal_at(10)).unwrap();
        assert!(window.push(signal_at(5)).is_err());
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_completion_and_skip_stats() {
        let mut window = SignalWindow::new();
        let mut s1 = signal_at(0);
        s1.watch_duration = 16.0; // full watch
        let mut s2 = signal_at(1);
        s2.watch_duration = 0.0;
        s2.skipped = true;
        window.push(s1).unwrap();
        window.push(s2).unwrap();

        assert!((window.avg_completion_ratio() - 0.5).abs() < 1e-12);
        assert!((window.skip_rate() - 0.5).abs() < 1e-12);
        assert!(!window.any_replayed());
    }
}
