//! Photo Gallery - File Naming
//!
//! Photo files are named `<unix-millis>.<ext>`. Two captures in the same
//! millisecond, or a clock that steps backwards, would reuse a name, so the
//! namer never issues a stamp at or below the last one it has seen.

use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{GalleryError, GalleryResult};

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Issues strictly increasing, timestamp-derived file names
pub struct FileNamer {
    extension: String,
    clock: Clock,
    /// Highest stamp issued or observed
    last: Mutex<i64>,
}

impl FileNamer {
    pub fn new(extension: &str) -> Self {
        Self::with_clock(extension, || Utc::now().timestamp_millis())
    }

    pub fn with_clock<F>(extension: &str, clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        Self {
            extension: extension.to_string(),
            clock: Box::new(clock),
            last: Mutex::new(i64::MIN),
        }
    }

    /// Next unused file name. Fails once an observed name sits at `i64::MAX`.
    pub fn next_name(&self) -> GalleryResult<String> {
        let now = (self.clock)();
        let mut last = self.last.lock();
        let stamp = if now > *last {
            now
        } else {
            last.checked_add(1)
                .ok_or(GalleryError::NamesExhausted(*last))?
        };
        *last = stamp;
        Ok(format!("{}.{}", stamp, self.extension))
    }

    /// Record an existing file name so it is never issued again.
    /// Names that are not `<number>.<ext>` are ignored.
    pub fn observe(&self, filepath: &str) {
        let stem = filepath.split('.').next().unwrap_or(filepath);
        if let Ok(stamp) = stem.parse::<i64>() {
            let mut last = self.last.lock();
            if stamp > *last {
                *last = stamp;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_uses_clock_when_it_advances() {
        let now = Arc::new(AtomicI64::new(1_700_000_000_000));
        let clock = Arc::clone(&now);
        let namer = FileNamer::with_clock("jpeg", move || clock.load(Ordering::SeqCst));

        assert_eq!(namer.next_name().unwrap(), "1700000000000.jpeg");
        now.store(1_700_000_000_500, Ordering::SeqCst);
        assert_eq!(namer.next_name().unwrap(), "1700000000500.jpeg");
    }

    #[test]
    fn test_same_millisecond_does_not_collide() {
        let namer = FileNamer::with_clock("jpeg", || 42);
        assert_eq!(namer.next_name().unwrap(), "42.jpeg");
        assert_eq!(namer.next_name().unwrap(), "43.jpeg");
        assert_eq!(namer.next_name().unwrap(), "44.jpeg");
    }

    #[test]
    fn test_observed_names_are_skipped() {
        let namer = FileNamer::with_clock("jpeg", || 100);
        namer.observe("250.jpeg");
        namer.observe("legacy-photo.jpeg");
        namer.observe("90.jpeg");
        assert_eq!(namer.next_name().unwrap(), "251.jpeg");
    }

    #[test]
    fn test_exhausted_stamps_are_an_error() {
        let namer = FileNamer::with_clock("jpeg", || 100);
        namer.observe("9223372036854775806.jpeg");
        assert_eq!(namer.next_name().unwrap(), "9223372036854775807.jpeg");

        let err = namer.next_name().unwrap_err();
        assert!(matches!(err, GalleryError::NamesExhausted(i64::MAX)));
        // Still exhausted, nothing wrapped around
        assert!(namer.next_name().is_err());
    }

    #[test]
    fn test_real_clock_is_monotonic() {
        let namer = FileNamer::new("png");
        let a = namer.next_name().unwrap();
        let b = namer.next_name().unwrap();
        assert!(a.ends_with(".png"));

        let stamp = |n: &str| n.trim_end_matches(".png").parse::<i64>().unwrap();
        assert!(stamp(&b) > stamp(&a));
    }
}
