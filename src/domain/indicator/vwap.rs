//! VWAP (Volume Weighted Average Price).
//!
//! VWAP[i] = sum(TP[j] * V[j]) / sum(V[j]) for j in 0..=i, TP = (H + L + C) / 3.
//! Cumulative from the first bar, no rolling window. Bars with a missing or
//! non-finite price or volume add nothing to either sum; the value is undefined until
//! some volume has accumulated.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_vwap(bars: &[OhlcvBar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    for bar in bars {
        let contribution = bar
            .typical_price()
            .zip(bar.volume)
            .filter(|(tp, volume)| tp.is_finite() && volume.is_finite());
        if let Some((tp, volume)) = contribution {
            cum_pv += tp * volume;
            cum_volume += volume;
        }

        let vwap = (cum_volume > 0.0).then(|| cum_pv / cum_volume);
        values.push(IndicatorPoint::simple(bar.date, vwap));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Vwap,
        values,
    }
}
