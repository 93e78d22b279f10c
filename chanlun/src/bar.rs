use chrono::{DateTime, Utc};

use crate::constant::Direction;

#[derive(Debug, Clone)]
pub struct RawBar {
    pub symbol: String,
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawBar {
    pub fn total_range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_flat(&self) -> bool {
        self.high == self.low
    }
}

#[derive(Debug, Clone)]
pub struct MergedBar {
    pub symbol: String,
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// 吸收的原始bar在输入序列内的下标范围（闭区间）。
    pub raw_start: usize,
    pub raw_end: usize,
    pub direction: Direction,
}

impl MergedBar {
    pub fn from_raw(bar: &RawBar, index: usize) -> Self {
        Self {
            symbol: bar.symbol.clone(),
            datetime: bar.datetime,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            raw_start: index,
            raw_end: index,
            direction: Direction::None,
        }
    }

    pub fn is_inclusive(&self, other: &Self) -> bool {
        (self.high >= other.high && self.low <= other.low)
            || (self.high <= other.high && self.low >= other.low)
    }

    pub fn raw_count(&self) -> usize {
        self.raw_end - self.raw_start + 1
    }
}
