//! Candlestick chart data
//!
//! The chart only displays what it's given. Until the live market-data feed
//! is wired in, [`placeholder_series`] produces a random walk to look at.

use crate::types::CandlePoint;
use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

/// Candle spacing of the placeholder series (15 minutes)
pub const PLACEHOLDER_INTERVAL_SECS: i64 = 15 * 60;
pub const PLACEHOLDER_POINTS: usize = 100;
const PLACEHOLDER_BASE: f64 = 1.0;
const PLACEHOLDER_BAND: f64 = 0.1;
const PLACEHOLDER_WICK: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("candle at {time} has high/low that don't bracket open/close")]
    MalformedCandle { time: i64 },
    #[error("candle times must be strictly increasing ({previous} then {time})")]
    OutOfOrder { previous: i64, time: i64 },
}

/// Stateless candlestick display
#[derive(Debug, Clone, Default)]
pub struct ChartView {
    series: Vec<CandlePoint>,
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed series; rejects series that break the OHLC or
    /// ordering invariants and keeps the previous one in that case
    pub fn set_data(&mut self, series: Vec<CandlePoint>) -> Result<(), ChartError> {
        validate_series(&series)?;
        self.series = series;
        Ok(())
    }

    pub fn series(&self) -> &[CandlePoint] {
        &self.series
    }

    pub fn last(&self) -> Option<&CandlePoint> {
        self.series.last()
    }

    /// Highest high and lowest low over the series
    pub fn range(&self) -> Option<(f64, f64)> {
        let first = self.series.first()?;
        Some(self.series.iter().fold((first.low, first.high), |(lo, hi), c| {
            (lo.min(c.low), hi.max(c.high))
        }))
    }

    /// Closes mapped onto eight block glyphs, one per candle
    pub fn sparkline(&self) -> String {
        sparkline(&self.series.iter().map(|c| c.close).collect::<Vec<_>>())
    }
}

pub fn validate_series(series: &[CandlePoint]) -> Result<(), ChartError> {
    for (i, candle) in series.iter().enumerate() {
        if !candle.brackets_body() {
            return Err(ChartError::MalformedCandle { time: candle.time });
        }
        if i > 0 && candle.time <= series[i - 1].time {
            return Err(ChartError::OutOfOrder {
                previous: series[i - 1].time,
                time: candle.time,
            });
        }
    }
    Ok(())
}

/// 100 candles at 15-minute spacing ending at `now`
pub fn placeholder_series(now: DateTime<Utc>, rng: &mut impl Rng) -> Vec<CandlePoint> {
    let end = now.timestamp();
    (0..PLACEHOLDER_POINTS as i64)
        .map(|i| {
            let open = PLACEHOLDER_BASE + rng.gen::<f64>() * PLACEHOLDER_BAND;
            let close = PLACEHOLDER_BASE + rng.gen::<f64>() * PLACEHOLDER_BAND;
            CandlePoint {
                time: end - (PLACEHOLDER_POINTS as i64 - i) * PLACEHOLDER_INTERVAL_SECS,
                open,
                high: open.max(close) + PLACEHOLDER_WICK,
                low: open.min(close) - PLACEHOLDER_WICK,
                close,
            }
        })
        .collect()
}

pub fn sparkline(values: &[f64]) -> String {
    const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let span = max - min;

    values
        .iter()
        .map(|v| {
            if span <= 0.0 || !span.is_finite() {
                GLYPHS[0]
            } else {
                let idx = ((v - min) / span * (GLYPHS.len() - 1) as f64).round() as usize;
                GLYPHS[idx.min(GLYPHS.len() - 1)]
            }
        })
        .collect()
}
