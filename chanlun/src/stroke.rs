//! 笔构建。
//!
//! 把严格交替的分型序列连接成方向交替的笔：底→顶为向上笔，
//! 顶→底为向下笔。两个端点分型的中心之间必须隔开足够数量的
//! 合并bar（默认4根，即经典的"至少5根"规则），不达标的端点
//! 被跳过，继续寻找下一个异类分型。

use chrono::{DateTime, Utc};

use crate::constant::{Direction, FractalType};
use crate::fractal::Fractal;

#[derive(Debug, Clone)]
pub struct Stroke {
    pub direction: Direction,
    pub start: Fractal,
    pub end: Fractal,
}

impl Stroke {
    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.start.datetime
    }

    pub fn end_datetime(&self) -> DateTime<Utc> {
        self.end.datetime
    }

    pub fn start_price(&self) -> f64 {
        self.start.price()
    }

    pub fn end_price(&self) -> f64 {
        self.end.price()
    }

    pub fn high(&self) -> f64 {
        self.start.high.max(self.end.high)
    }

    pub fn low(&self) -> f64 {
        self.start.low.min(self.end.low)
    }

    /// 笔的力度：端点价差的绝对值。
    pub fn power(&self) -> f64 {
        (self.end_price() - self.start_price()).abs()
    }

    /// 两端点中心之间严格夹着的合并bar数量。
    pub fn span(&self) -> usize {
        self.end.center_index - self.start.center_index - 1
    }

    /// 归一化力度：价差除以跨越的合并bar数。
    pub fn normalized_power(&self) -> f64 {
        let bars = self.end.center_index - self.start.center_index;
        if bars == 0 {
            return 0.0;
        }
        self.power() / bars as f64
    }
}

/// 在交替分型序列上构笔。
///
/// 端点链式相接（后一笔的起点即前一笔的终点），方向交替由此成为
/// 结构性质。首笔尚未开出时，允许把起点替换为更极端的同类分型。
pub fn build_strokes(fractals: &[Fractal], min_span: usize) -> Vec<Stroke> {
    let mut strokes: Vec<Stroke> = Vec::new();
    if fractals.len() < 2 {
        return strokes;
    }

    let mut start = fractals[0].clone();

    for candidate in &fractals[1..] {
        if candidate.fractal_type == start.fractal_type {
            // 只有在某个异类端点被跳过后才会走到这里
            if strokes.is_empty() && candidate.dominates(&start) {
                start = candidate.clone();
            }
            continue;
        }

        if candidate.center_index - start.center_index - 1 < min_span {
            continue;
        }

        let direction = if start.fractal_type == FractalType::Bottom {
            Direction::Up
        } else {
            Direction::Down
        };
        strokes.push(Stroke {
            direction,
            start: start.clone(),
            end: candidate.clone(),
        });
        start = candidate.clone();
    }

    strokes
}
