//! Portfolio-level aggregation of per-ticker gains.

use crate::returns::PercentGain;
use crate::universe::Ticker;
use std::collections::BTreeMap;

/// Equal-weighted mean of the gains of every ticker that had data.
///
/// An empty mapping aggregates to `0.0`: a portfolio with no usable data
/// collapses to a neutral baseline. Callers that need to tell "no data" apart
/// from a flat return must check `gains.is_empty()` themselves.
pub fn aggregate(gains: &BTreeMap<Ticker, PercentGain>) -> f64 {
    mean(gains.values().copied()).unwrap_or(0.0)
}

/// Arithmetic mean of a sequence, `None` when empty.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
