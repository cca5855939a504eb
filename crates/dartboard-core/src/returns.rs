//! Period return of a single price series.

use crate::series::PriceSeries;

/// Percentage change from period open to period close.
pub type PercentGain = f64;

/// Percent gain from the first bar's open to the last bar's close.
///
/// Returns `None` when the gain is undefined: the series is empty, or the
/// first open is zero (degenerate data for delisted symbols). An undefined
/// gain is different from a 0% gain and must not be averaged in.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dartboard_core::{PriceBar, PriceSeries, percent_gain};
///
/// let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
/// let series = PriceSeries::new(
///     "A",
///     vec![PriceBar::new(day(3), 10.0, 10.5), PriceBar::new(day(4), 10.6, 11.0)],
/// )
/// .unwrap();
///
/// assert!((percent_gain(&series).unwrap() - 10.0).abs() < 1e-9);
/// ```
pub fn percent_gain(series: &PriceSeries) -> Option<PercentGain> {
    let first_open = series.first()?.open;
    let last_close = series.last()?.close;

    if first_open == 0.0 {
        return None;
    }

    let gain = (last_close - first_open) / first_open * 100.0;
    gain.is_finite().then_some(gain)
}
