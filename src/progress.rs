//! Progress reporting for uploads.

/// Progress of one transfer, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes handed to the transport so far.
    pub done: u64,
    /// Total bytes to transfer.
    pub total: u64,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(done: u64, total: u64) -> Self {
        Self { done, total }
    }

    /// Progress as an integer percentage: `round(done / total * 100)`,
    /// clamped to `[0, 100]`.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.done as f64 / self.total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Check if the transfer is complete.
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// Callback invoked after every progress update.
pub type ProgressCallback = Box<dyn FnMut(TransferProgress) + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(TransferProgress::new(1, 3).percent(), 33);
        assert_eq!(TransferProgress::new(2, 3).percent(), 67);
        assert_eq!(TransferProgress::new(1, 200).percent(), 1);
        assert_eq!(TransferProgress::new(0, 100).percent(), 0);
        assert_eq!(TransferProgress::new(100, 100).percent(), 100);
    }

    #[test]
    fn test_percent_clamped() {
        // A transport may report slightly more than the announced total
        // (multipart framing); the percentage never exceeds 100.
        assert_eq!(TransferProgress::new(150, 100).percent(), 100);
    }

    #[test]
    fn test_zero_total() {
        let progress = TransferProgress::new(0, 0);
        assert_eq!(progress.percent(), 0);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_is_complete() {
        assert!(!TransferProgress::new(50, 100).is_complete());
        assert!(TransferProgress::new(100, 100).is_complete());
    }
}
