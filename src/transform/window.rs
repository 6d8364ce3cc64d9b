//! Sliding-window decomposition of a series for offline batch preparation.

use crate::core::Window;

/// Lazy iterator over contiguous sub-slices of a series, stepping by one.
///
/// Produces `len - size` windows: the final full-length window is not
/// emitted, so every window has at least one following observation that can
/// serve as its training target. A `size` of zero produces nothing.
///
/// The iterator only borrows the series; cloning it (or calling
/// [`sliding_windows`] again) gives an independent traversal.
#[derive(Debug)]
pub struct SlidingWindows<'a, T> {
    series: &'a [T],
    size: usize,
    pos: usize,
}

impl<T> Clone for SlidingWindows<'_, T> {
    fn clone(&self) -> Self {
        Self {
            series: self.series,
            size: self.size,
            pos: self.pos,
        }
    }
}

/// Create a [`SlidingWindows`] view over `series`.
///
/// # Example
///
/// ```
/// use demandcast::transform::sliding_windows;
///
/// let series = [10.0, 20.0, 30.0, 40.0];
/// let windows: Vec<&[f64]> = sliding_windows(&series, 3).collect();
/// assert_eq!(windows, vec![&[10.0, 20.0, 30.0][..]]);
/// ```
pub fn sliding_windows<T>(series: &[T], size: usize) -> SlidingWindows<'_, T> {
    SlidingWindows {
        series,
        size,
        pos: 0,
    }
}

impl<'a, T> SlidingWindows<'a, T> {
    /// Total number of windows, independent of how far iteration has gone.
    pub fn total(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.series.len().saturating_sub(self.size)
        }
    }

    /// Window size.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<'a, T> Iterator for SlidingWindows<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.total() {
            return None;
        }
        let window = &self.series[self.pos..self.pos + self.size];
        self.pos += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SlidingWindows<'_, T> {}

/// Collect all sliding windows into owned vectors.
pub fn make_windows<T: Clone>(series: &[T], size: usize) -> Vec<Vec<T>> {
    sliding_windows(series, size).map(|w| w.to_vec()).collect()
}

/// Sliding windows of a univariate series as model-ready [`Window`]s.
///
/// Non-finite values surface as errors on the windows that contain them.
pub fn univariate_windows(
    series: &[f64],
    size: usize,
) -> impl Iterator<Item = crate::Result<Window>> + Clone + '_ {
    sliding_windows(series, size).map(move |w| Window::from_series(w, size))
}

/// Sliding windows over multi-feature rows as model-ready [`Window`]s.
///
/// Ragged rows surface as errors on the windows that contain them.
pub fn feature_windows(
    rows: &[Vec<f64>],
    size: usize,
) -> impl Iterator<Item = crate::Result<Window>> + Clone + '_ {
    sliding_windows(rows, size).map(move |w| Window::from_rows(w.to_vec(), size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_len_minus_size_windows() {
        let series = [10.0, 20.0, 30.0, 40.0];
        let windows = make_windows(&series, 3);
        assert_eq!(windows, vec![vec![10.0, 20.0, 30.0]]);

        let series: Vec<i32> = (0..10).collect();
        assert_eq!(sliding_windows(&series, 4).count(), 6);
        assert_eq!(sliding_windows(&series, 4).len(), 6);
    }

    #[test]
    fn windows_advance_by_one() {
        let series: Vec<i32> = (0..6).collect();
        let windows = make_windows(&series, 2);
        assert_eq!(
            windows,
            vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![3, 4]]
        );
    }

    #[test]
    fn short_or_equal_series_is_empty() {
        let series = [1.0, 2.0];
        assert_eq!(sliding_windows(&series, 3).count(), 0);
        assert_eq!(sliding_windows(&series, 2).count(), 0);
        assert_eq!(sliding_windows::<f64>(&[], 1).count(), 0);
    }

    #[test]
    fn zero_size_is_empty() {
        let series = [1.0, 2.0, 3.0];
        assert_eq!(sliding_windows(&series, 0).count(), 0);
    }

    #[test]
    fn traversal_is_restartable() {
        let series = [1, 2, 3, 4, 5];
        let mut first = sliding_windows(&series, 2);
        first.next();
        let second = first.clone();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);

        let fresh = sliding_windows(&series, 2);
        let a: Vec<_> = fresh.clone().collect();
        let b: Vec<_> = fresh.collect();
        assert_eq!(a, b);
    }

    #[test]
    fn univariate_windows_are_model_ready() {
        let series = [10.0, 20.0, 30.0, 40.0, 50.0];
        let windows = univariate_windows(&series, 3)
            .collect::<crate::Result<Vec<Window>>>()
            .unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].primary(), vec![20.0, 30.0, 40.0]);
        assert_eq!(windows[1].shape(), (3, 1));
    }

    #[test]
    fn univariate_windows_report_non_finite_values() {
        let series = [10.0, f64::NAN, 30.0, 40.0, 50.0, 60.0];
        let results: Vec<_> = univariate_windows(&series, 3).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn feature_windows_report_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0], vec![5.0, 6.0], vec![7.0, 8.0]];
        let results: Vec<_> = feature_windows(&rows, 2).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_err());

        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let ok = feature_windows(&rows, 2)
            .collect::<crate::Result<Vec<Window>>>()
            .unwrap();
        assert_eq!(ok.len(), 1);
    }
}
