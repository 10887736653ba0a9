use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;

/// Receives upload progress as a percentage between 0 and 100.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Converts byte counts into percentages for a [ProgressCallback].
///
/// Reported values never decrease and the same percentage is never reported
/// twice in a row. Nothing is reported when the total size is zero.
pub struct ProgressTracker {
    total: u64,
    sent: u64,
    last_percent: Option<u8>,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    pub fn new(total: u64, callback: Option<ProgressCallback>) -> ProgressTracker {
        ProgressTracker {
            total,
            sent: 0,
            last_percent: None,
            callback,
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn advance(&mut self, bytes: u64) {
        self.report(self.sent.saturating_add(bytes));
    }

    /// Records that `sent` bytes in total have been handed to the connection.
    pub fn report(&mut self, sent: u64) {
        self.sent = sent.clamp(self.sent, self.total.max(self.sent));

        let Some(callback) = self.callback.as_ref() else {
            return;
        };
        if self.total == 0 {
            return;
        }

        let percent = (self.sent.min(self.total) as u128 * 100 / self.total as u128) as u8;
        if self.last_percent.map_or(true, |last| percent > last) {
            self.last_percent = Some(percent);
            callback(percent);
        }
    }
}

/// Splits `bytes` into a request body that reports to `tracker` as each
/// chunk is pulled by the connection.
pub(crate) fn tracked_body(
    bytes: Bytes,
    chunk_size: usize,
    mut tracker: ProgressTracker,
) -> reqwest::Body {
    let chunk_size = chunk_size.max(1);
    let chunks = (0..bytes.len())
        .step_by(chunk_size)
        .map(|start| bytes.slice(start..(start + chunk_size).min(bytes.len())))
        .collect::<Vec<_>>();

    let stream = futures::stream::iter(chunks).map(move |chunk| {
        tracker.advance(chunk.len() as u64);
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
        (callback, seen)
    }

    #[test]
    fn reports_percentages() {
        let (callback, seen) = recorder();
        let mut tracker = ProgressTracker::new(1000, Some(callback));
        tracker.report(250);
        tracker.report(500);
        tracker.report(1000);
        assert_eq!(*seen.lock().unwrap(), vec![25, 50, 100]);
    }

    #[test]
    fn never_decreases_or_repeats() {
        let (callback, seen) = recorder();
        let mut tracker = ProgressTracker::new(1000, Some(callback));
        tracker.report(0);
        tracker.report(500);
        tracker.report(300);
        tracker.report(501);
        tracker.advance(499);
        tracker.advance(10);
        assert_eq!(*seen.lock().unwrap(), vec![0, 50, 100]);
        assert_eq!(tracker.sent(), 1000);
    }

    #[test]
    fn unknown_total_reports_nothing() {
        let (callback, seen) = recorder();
        let mut tracker = ProgressTracker::new(0, Some(callback));
        tracker.advance(10);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn no_callback_still_counts() {
        let mut tracker = ProgressTracker::new(10, None);
        tracker.advance(4);
        assert_eq!(tracker.sent(), 4);
    }
}
