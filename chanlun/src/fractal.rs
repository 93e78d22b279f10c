//! 分型识别。
//!
//! 在无包含关系的合并序列上扫描三bar窗口，先产出候选分型，
//! 再用一次前向状态机（seeking / pending / confirmed）消解冲突：
//! 同类候选保留更极端者，异类候选间隔不足时丢弃较晚者。

use chrono::{DateTime, Utc};

use crate::bar::MergedBar;
use crate::constant::FractalType;

#[derive(Debug, Clone)]
pub struct Fractal {
    pub fractal_type: FractalType,
    pub datetime: DateTime<Utc>,
    pub high: f64,
    pub low: f64,
    /// 中心bar在合并序列内的下标，恒为内部位置（非首尾）。
    pub center_index: usize,
}

impl Fractal {
    /// 顶分型的关键价取高点，底分型取低点。
    pub fn price(&self) -> f64 {
        match self.fractal_type {
            FractalType::Top => self.high,
            _ => self.low,
        }
    }

    /// 三bar窗口判定：中间bar在自身一侧严格占优，另一侧不弱于两邻。
    pub fn verify(left: &MergedBar, middle: &MergedBar, right: &MergedBar) -> FractalType {
        let is_top = middle.high > left.high
            && middle.high > right.high
            && middle.low >= left.low
            && middle.low >= right.low;
        if is_top {
            return FractalType::Top;
        }

        let is_bottom = middle.low < left.low
            && middle.low < right.low
            && middle.high <= left.high
            && middle.high <= right.high;
        if is_bottom {
            return FractalType::Bottom;
        }
        FractalType::None
    }

    /// 同类分型竞争：顶看更高的高点，底看更低的低点。
    pub fn dominates(&self, other: &Fractal) -> bool {
        match self.fractal_type {
            FractalType::Top => self.high > other.high,
            FractalType::Bottom => self.low < other.low,
            FractalType::None => false,
        }
    }

    fn from_center(bars: &[MergedBar], center: usize, fractal_type: FractalType) -> Self {
        let middle = &bars[center];
        Self {
            fractal_type,
            datetime: middle.datetime,
            high: middle.high,
            low: middle.low,
            center_index: center,
        }
    }
}

/// 扫描合并序列并返回确认后的分型列表。
///
/// 结果严格交替（顶/底相间），相邻分型中心之间至少隔 `min_gap` 根
/// 合并bar。末根bar没有右侧bar可验证，天然不可能成为中心。
pub fn detect_fractals(bars: &[MergedBar], min_gap: usize) -> Vec<Fractal> {
    let mut confirmed: Vec<Fractal> = Vec::new();
    if bars.len() < 3 {
        return confirmed;
    }

    let mut pending: Option<Fractal> = None;

    for center in 1..(bars.len() - 1) {
        let fractal_type = Fractal::verify(&bars[center - 1], &bars[center], &bars[center + 1]);
        if fractal_type == FractalType::None {
            continue;
        }
        let candidate = Fractal::from_center(bars, center, fractal_type);

        match pending.take() {
            None => pending = Some(candidate),
            Some(held) => {
                if held.fractal_type == candidate.fractal_type {
                    // 同类竞争，保留更极端者（平手保留较早者）
                    if candidate.dominates(&held) {
                        pending = Some(candidate);
                    } else {
                        pending = Some(held);
                    }
                } else if candidate.center_index - held.center_index - 1 >= min_gap {
                    confirmed.push(held);
                    pending = Some(candidate);
                } else {
                    // 间隔不足，丢弃较晚者以保持交替
                    pending = Some(held);
                }
            }
        }
    }

    if let Some(held) = pending {
        confirmed.push(held);
    }

    confirmed
}
