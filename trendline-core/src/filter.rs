//! Moving-average window filter
//!
//! Keeps the most recent samples newest-first and averages the first
//! `N` of them, where `N` can be changed at runtime from the serial line.

use crate::{AverageSample, Sample};

/// Largest supported averaging window
pub const MAX_WINDOW: usize = 10;

/// Number of samples averaged, always in `1..=MAX_WINDOW`
///
/// Zero is not representable, so averaging never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowSize(u8);

impl WindowSize {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(MAX_WINDOW as u8);

    /// Create a window size, rejecting 0 and values above [`MAX_WINDOW`]
    pub const fn new(n: u8) -> Option<Self> {
        if n == 0 || n as usize > MAX_WINDOW {
            None
        } else {
            Some(Self(n))
        }
    }

    /// Decode a serial console command byte
    ///
    /// `'1'..='9'` select that window; `'0'` selects [`WindowSize::MAX`].
    /// Anything else is not a command.
    pub const fn from_digit(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Self::MAX),
            b'1'..=b'9' => Some(Self(byte - b'0')),
            _ => None,
        }
    }

    /// Window size as a number
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Window size as a slice length
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::MIN
    }
}

/// Averaged output of one filter cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilteredSample {
    /// Truncated mean of the newest `window` samples
    pub average: AverageSample,
    /// Window the average was computed over
    pub window: WindowSize,
}

/// Sliding-window mean over recent samples
///
/// The history buffer always has room for [`MAX_WINDOW`] samples; only
/// the first `window` are live. Shrinking the window leaves older entries
/// in place, and growing it exposes them again until the new samples shift
/// through.
#[derive(Debug, Clone)]
pub struct WindowFilter {
    history: [Sample; MAX_WINDOW],
    window: WindowSize,
}

impl WindowFilter {
    /// Create a filter with an all-zero history
    pub const fn new(window: WindowSize) -> Self {
        Self {
            history: [0; MAX_WINDOW],
            window,
        }
    }

    /// Current window
    pub fn window(&self) -> WindowSize {
        self.window
    }

    /// Change the window used from the next [`WindowFilter::push`] on
    pub fn set_window(&mut self, window: WindowSize) {
        self.window = window;
    }

    /// Full history buffer, newest first, including entries past the window
    pub fn history(&self) -> &[Sample; MAX_WINDOW] {
        &self.history
    }

    /// Insert a sample and return the new average
    ///
    /// The window is read once: the shift and the mean both use the value
    /// in effect when the call starts.
    pub fn push(&mut self, sample: Sample) -> FilteredSample {
        let window = self.window;
        let n = window.as_usize();

        self.history.copy_within(0..n - 1, 1);
        self.history[0] = sample;

        let sum: i32 = self.history[..n].iter().map(|&s| s as i32).sum();
        let mean = sum / n as i32;

        FilteredSample {
            average: AverageSample::try_from(mean).unwrap_or(0),
            window,
        }
    }
}

impl Default for WindowFilter {
    fn default() -> Self {
        Self::new(WindowSize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(n: u8) -> WindowSize {
        WindowSize::new(n).unwrap()
    }

    #[test]
    fn test_window_size_range() {
        assert_eq!(WindowSize::new(0), None);
        assert_eq!(WindowSize::new(1), Some(WindowSize::MIN));
        assert_eq!(WindowSize::new(10), Some(WindowSize::MAX));
        assert_eq!(WindowSize::new(11), None);
    }

    #[test]
    fn test_digit_decoding() {
        assert_eq!(WindowSize::from_digit(b'0').map(WindowSize::get), Some(10));
        for digit in b'1'..=b'9' {
            assert_eq!(
                WindowSize::from_digit(digit).map(WindowSize::get),
                Some(digit - b'0')
            );
        }
        assert_eq!(WindowSize::from_digit(b'a'), None);
        assert_eq!(WindowSize::from_digit(b'\n'), None);
        assert_eq!(WindowSize::from_digit(b'/'), None);
        assert_eq!(WindowSize::from_digit(b':'), None);
    }

    #[test]
    fn test_average_of_three() {
        let mut filter = WindowFilter::new(window(3));
        filter.push(10);
        filter.push(20);
        let out = filter.push(30);
        assert_eq!(out.average, 20);
        assert_eq!(out.window, window(3));
    }

    #[test]
    fn test_window_one_passes_through() {
        let mut filter = WindowFilter::default();
        assert_eq!(filter.push(42).average, 42);
        assert_eq!(filter.push(17).average, 17);
    }

    #[test]
    fn test_average_truncates() {
        let mut filter = WindowFilter::new(window(2));
        filter.push(10);
        assert_eq!(filter.push(11).average, 10); // 21 / 2
    }

    #[test]
    fn test_warm_up_counts_zero_history() {
        let mut filter = WindowFilter::new(window(4));
        assert_eq!(filter.push(40).average, 10); // (40 + 0 + 0 + 0) / 4
    }

    #[test]
    fn test_zero_digit_averages_ten() {
        let mut filter = WindowFilter::default();
        filter.set_window(WindowSize::from_digit(b'0').unwrap());

        let mut last = 0;
        for sample in 1..=12 {
            last = filter.push(sample * 10).average;
        }
        // Mean of 30, 40, ..., 120
        assert_eq!(last, 75);
    }

    #[test]
    fn test_shrink_keeps_stale_tail() {
        let mut filter = WindowFilter::new(window(4));
        for sample in [1, 2, 3, 4] {
            filter.push(sample);
        }
        assert_eq!(filter.history()[..4], [4, 3, 2, 1]);

        filter.set_window(window(2));
        filter.push(5);
        // Only the live window shifted; the old tail is untouched
        assert_eq!(filter.history()[..4], [5, 4, 2, 1]);

        filter.set_window(window(4));
        let out = filter.push(6);
        assert_eq!(filter.history()[..4], [6, 5, 4, 2]);
        assert_eq!(out.average, (6 + 5 + 4 + 2) / 4);
    }

    #[test]
    fn test_negative_mean_clamps_to_zero() {
        let mut filter = WindowFilter::new(window(1));
        assert_eq!(filter.push(-5).average, 0);
    }

    proptest! {
        #[test]
        fn test_mean_of_last_n(
            n in 1u8..=10,
            samples in proptest::collection::vec(16i16..=127, 10..40),
        ) {
            let mut filter = WindowFilter::new(window(n));
            let mut out = None;
            for &s in &samples {
                out = Some(filter.push(s));
            }

            let tail = &samples[samples.len() - n as usize..];
            let expected = tail.iter().map(|&s| s as i32).sum::<i32>() / n as i32;
            prop_assert_eq!(out.unwrap().average as i32, expected);
        }

        #[test]
        fn test_any_command_byte_is_nonzero(byte in any::<u8>()) {
            if let Some(window) = WindowSize::from_digit(byte) {
                prop_assert!(window.get() >= 1);
                prop_assert!(window.as_usize() <= MAX_WINDOW);
            }
        }

        #[test]
        fn test_reconfigured_filter_never_faults(
            commands in proptest::collection::vec(any::<u8>(), 1..50),
        ) {
            let mut filter = WindowFilter::default();
            for (i, byte) in commands.into_iter().enumerate() {
                if let Some(window) = WindowSize::from_digit(byte) {
                    filter.set_window(window);
                }
                let out = filter.push(i as Sample);
                prop_assert!(out.window.as_usize() >= 1);
            }
        }
    }
}
