use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Seasonal cycle length of the additive decomposition, in days.
pub const SEASONAL_PERIOD: usize = 30;

// ---------------------------------------------------------------------------
// Daily resample + additive decomposition
// ---------------------------------------------------------------------------

/// Additive decomposition of a daily series: `observed = trend + seasonal +
/// residual`. Trend and residual are undefined inside half a cycle of each
/// edge, where the centered moving average has no full window.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub dates: Vec<NaiveDate>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

/// Resample timestamped observations onto a contiguous daily calendar and
/// decompose. The first observation of each day wins; days without an
/// observation are forward-filled. Needs two full seasonal cycles of days,
/// else [`Error::InsufficientColumns`].
pub fn decompose(samples: &[(NaiveDateTime, f64)]) -> Result<Decomposition> {
    let (dates, observed) = resample_daily(samples)?;
    if observed.len() < 2 * SEASONAL_PERIOD {
        return Err(Error::InsufficientColumns(format!(
            "time series decomposition needs at least {} daily observations (two full cycles), found {}",
            2 * SEASONAL_PERIOD,
            observed.len()
        )));
    }

    let trend = centered_moving_average(&observed, SEASONAL_PERIOD);
    let seasonal = seasonal_component(&observed, &trend, SEASONAL_PERIOD);

    let residual = observed
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((obs, t), s)| t.map(|t| obs - t - s))
        .collect();

    Ok(Decomposition {
        dates,
        observed,
        trend,
        seasonal,
        residual,
    })
}

/// Sort by timestamp, collapse to one value per calendar day (first
/// observation wins), then fill calendar gaps with the previous day's value.
fn resample_daily(samples: &[(NaiveDateTime, f64)]) -> Result<(Vec<NaiveDate>, Vec<f64>)> {
    if samples.is_empty() {
        return Err(Error::InsufficientColumns(
            "time series decomposition needs a non-empty series".into(),
        ));
    }
    let mut sorted: Vec<(NaiveDateTime, f64)> = samples.to_vec();
    sorted.sort_by_key(|(t, _)| *t);

    let mut daily: Vec<(NaiveDate, f64)> = Vec::new();
    for (t, v) in &sorted {
        let day = t.date();
        if daily.last().map(|(d, _)| *d) != Some(day) {
            daily.push((day, *v));
        }
    }

    let first = daily[0].0;
    let last = daily[daily.len() - 1].0;
    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut cursor = first;
    let mut idx = 0;
    let mut current = daily[0].1;
    while cursor <= last {
        if idx < daily.len() && daily[idx].0 == cursor {
            current = daily[idx].1;
            idx += 1;
        }
        dates.push(cursor);
        values.push(current);
        cursor += Duration::days(1);
    }
    Ok((dates, values))
}

/// Centered moving average with an even period: a window of `period + 1`
/// points with half weight on both ends.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let half = period / 2;
    let n = values.len();
    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let mut sum = 0.5 * (values[i - half] + values[i + half]);
            for k in (i - half + 1)..(i + half) {
                sum += values[k];
            }
            Some(sum / period as f64)
        })
        .collect()
}

/// Average the detrended values by position in the cycle, then center the
/// cycle so the seasonal component sums to zero.
fn seasonal_component(observed: &[f64], trend: &[Option<f64>], period: usize) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, (obs, t)) in observed.iter().zip(trend.iter()).enumerate() {
        if let Some(t) = t {
            sums[i % period] += obs - t;
            counts[i % period] += 1;
        }
    }
    let mut means: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let grand = means.iter().sum::<f64>() / period as f64;
    for m in &mut means {
        *m -= grand;
    }

    (0..observed.len()).map(|i| means[i % period]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: i64) -> NaiveDateTime {
        (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n))
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn resample_fills_calendar_gaps_forward() {
        let samples = vec![(day(0), 1.0), (day(3), 4.0), (day(1), 2.0)];
        let (dates, values) = resample_daily(&samples).unwrap();
        assert_eq!(dates.len(), 4);
        assert_eq!(values, vec![1.0, 2.0, 2.0, 4.0]);
    }

    #[test]
    fn short_series_is_rejected() {
        let samples: Vec<_> = (0..20).map(|i| (day(i), i as f64)).collect();
        assert!(decompose(&samples).is_err());
    }

    #[test]
    fn constant_series_decomposes_to_flat_components() {
        let samples: Vec<_> = (0..90).map(|i| (day(i), 5.0)).collect();
        let d = decompose(&samples).unwrap();
        assert_eq!(d.observed.len(), 90);
        for s in &d.seasonal {
            assert!(s.abs() < 1e-9);
        }
        for t in d.trend.iter().flatten() {
            assert!((t - 5.0).abs() < 1e-9);
        }
        for r in d.residual.iter().flatten() {
            assert!(r.abs() < 1e-9);
        }
    }

    #[test]
    fn linear_trend_is_recovered_in_the_interior() {
        let samples: Vec<_> = (0..120).map(|i| (day(i), i as f64)).collect();
        let d = decompose(&samples).unwrap();
        // the centered moving average of a linear series is the series
        for (i, t) in d.trend.iter().enumerate() {
            if let Some(t) = t {
                assert!((t - i as f64).abs() < 1e-9);
            }
        }
        // edges have no trend
        assert!(d.trend[0].is_none());
        assert!(d.trend[d.trend.len() - 1].is_none());
    }

    #[test]
    fn seasonal_cycle_is_detected() {
        // period-30 square-ish wave on top of a constant level
        let samples: Vec<_> = (0..120)
            .map(|i| {
                let bump = if (i as usize) % SEASONAL_PERIOD < 15 { 10.0 } else { -10.0 };
                (day(i), 100.0 + bump)
            })
            .collect();
        let d = decompose(&samples).unwrap();
        let max_seasonal = d.seasonal.iter().cloned().fold(f64::MIN, f64::max);
        assert!(max_seasonal > 5.0);
        // seasonal component is centered
        let sum: f64 = d.seasonal[..SEASONAL_PERIOD].iter().sum();
        assert!(sum.abs() < 1e-9);
    }
}
