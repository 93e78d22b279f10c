//! 缠论分析聚合器。
//!
//! 一次性串联 校验 → 包含合并 → 分型识别 → 构笔，保留全部四层
//! 结果并提供结构化导出。导出字段命名与下游消费方约定保持一致
//! （bar 用 dt/open/close/high/low/vol，分型 type 取 "top"/"bottom"，
//! 笔 direction 取 "up"/"down"），时间统一渲染为 RFC 3339。

use polars::df;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::debug;

use crate::bar::{MergedBar, RawBar};
use crate::config::ChanConfig;
use crate::constant::AnalysisError;
use crate::fractal::{Fractal, detect_fractals};
use crate::merge::merge_bars;
use crate::stroke::{Stroke, build_strokes};
use crate::validate::validate_bars;

pub struct ChanAnalyzer {
    config: ChanConfig,
    bars_raw: Vec<RawBar>,
    bars_merged: Vec<MergedBar>,
    fractals: Vec<Fractal>,
    strokes: Vec<Stroke>,
    merged_cache: DataFrame,
    fractal_cache: DataFrame,
    stroke_cache: DataFrame,
}

impl ChanAnalyzer {
    pub fn analyze(bars: Vec<RawBar>) -> Result<Self, AnalysisError> {
        Self::analyze_with_config(bars, ChanConfig::default())
    }

    pub fn analyze_with_config(
        bars: Vec<RawBar>,
        config: ChanConfig,
    ) -> Result<Self, AnalysisError> {
        validate_bars(&bars)?;

        let bars_merged = merge_bars(&bars);
        let fractals = detect_fractals(&bars_merged, config.min_fractal_gap);
        let strokes = build_strokes(&fractals, config.min_stroke_span);

        debug!(
            raw = bars.len(),
            merged = bars_merged.len(),
            fractals = fractals.len(),
            strokes = strokes.len(),
            "chanlun analysis complete"
        );

        let mut analyzer = Self {
            config,
            bars_raw: bars,
            bars_merged,
            fractals,
            strokes,
            merged_cache: DataFrame::default(),
            fractal_cache: DataFrame::default(),
            stroke_cache: DataFrame::default(),
        };
        analyzer.rebuild_caches();
        Ok(analyzer)
    }

    pub fn config(&self) -> ChanConfig {
        self.config
    }

    pub fn bars_raw(&self) -> &[RawBar] {
        &self.bars_raw
    }

    pub fn bars_merged(&self) -> &[MergedBar] {
        &self.bars_merged
    }

    pub fn fractals(&self) -> &[Fractal] {
        &self.fractals
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn total_bars_raw(&self) -> usize {
        self.bars_raw.len()
    }

    pub fn total_bars_merged(&self) -> usize {
        self.bars_merged.len()
    }

    pub fn total_fractals(&self) -> usize {
        self.fractals.len()
    }

    pub fn total_strokes(&self) -> usize {
        self.strokes.len()
    }

    pub fn export(&self) -> ChanExport {
        ChanExport {
            bars_raw: self
                .bars_raw
                .iter()
                .map(|bar| BarRecord {
                    dt: bar.datetime.to_rfc3339(),
                    open: bar.open,
                    close: bar.close,
                    high: bar.high,
                    low: bar.low,
                    vol: bar.volume,
                })
                .collect(),
            bars_merged: self
                .bars_merged
                .iter()
                .map(|bar| MergedBarRecord {
                    dt: bar.datetime.to_rfc3339(),
                    open: bar.open,
                    close: bar.close,
                    high: bar.high,
                    low: bar.low,
                    vol: bar.volume,
                    raw_start: bar.raw_start,
                    raw_end: bar.raw_end,
                })
                .collect(),
            fractals: self
                .fractals
                .iter()
                .map(|fractal| FractalRecord {
                    fractal_type: fractal.fractal_type.as_str().to_string(),
                    dt: fractal.datetime.to_rfc3339(),
                    high: fractal.high,
                    low: fractal.low,
                    price: fractal.price(),
                })
                .collect(),
            strokes: self
                .strokes
                .iter()
                .map(|stroke| StrokeRecord {
                    direction: stroke.direction.as_str().to_string(),
                    start_dt: stroke.start_datetime().to_rfc3339(),
                    end_dt: stroke.end_datetime().to_rfc3339(),
                    start_price: stroke.start_price(),
                    end_price: stroke.end_price(),
                    high: stroke.high(),
                    low: stroke.low(),
                    power: stroke.power(),
                })
                .collect(),
            summary: AnalysisSummary {
                total_bars_raw: self.total_bars_raw(),
                total_bars_merged: self.total_bars_merged(),
                total_fractals: self.total_fractals(),
                total_strokes: self.total_strokes(),
            },
        }
    }

    pub fn merged_dataframe(&self) -> DataFrame {
        self.merged_cache.clone()
    }

    pub fn fractal_dataframe(&self) -> DataFrame {
        self.fractal_cache.clone()
    }

    pub fn stroke_dataframe(&self) -> DataFrame {
        self.stroke_cache.clone()
    }

    fn rebuild_caches(&mut self) {
        let dt: Vec<i64> = self
            .bars_merged
            .iter()
            .map(|x| x.datetime.timestamp_millis())
            .collect();
        let open: Vec<f64> = self.bars_merged.iter().map(|x| x.open).collect();
        let high: Vec<f64> = self.bars_merged.iter().map(|x| x.high).collect();
        let low: Vec<f64> = self.bars_merged.iter().map(|x| x.low).collect();
        let close: Vec<f64> = self.bars_merged.iter().map(|x| x.close).collect();
        let vol: Vec<f64> = self.bars_merged.iter().map(|x| x.volume).collect();
        let raw_start: Vec<u64> = self.bars_merged.iter().map(|x| x.raw_start as u64).collect();
        let raw_end: Vec<u64> = self.bars_merged.iter().map(|x| x.raw_end as u64).collect();

        self.merged_cache = df!(
            "dt" => dt,
            "open" => open,
            "high" => high,
            "low" => low,
            "close" => close,
            "vol" => vol,
            "raw_start" => raw_start,
            "raw_end" => raw_end
        )
        .expect("failed to rebuild merged bar dataframe cache");

        let dt: Vec<i64> = self
            .fractals
            .iter()
            .map(|x| x.datetime.timestamp_millis())
            .collect();
        let fractal_type: Vec<i8> = self
            .fractals
            .iter()
            .map(|x| match x.fractal_type {
                crate::constant::FractalType::Top => 1,
                crate::constant::FractalType::Bottom => -1,
                crate::constant::FractalType::None => 0,
            })
            .collect();
        let high: Vec<f64> = self.fractals.iter().map(|x| x.high).collect();
        let low: Vec<f64> = self.fractals.iter().map(|x| x.low).collect();
        let price: Vec<f64> = self.fractals.iter().map(|x| x.price()).collect();
        let center: Vec<u64> = self.fractals.iter().map(|x| x.center_index as u64).collect();

        self.fractal_cache = df!(
            "dt" => dt,
            "type" => fractal_type,
            "high" => high,
            "low" => low,
            "price" => price,
            "center" => center
        )
        .expect("failed to rebuild fractal dataframe cache");

        let direction: Vec<i8> = self
            .strokes
            .iter()
            .map(|x| match x.direction {
                crate::constant::Direction::Up => 1,
                crate::constant::Direction::Down => -1,
                crate::constant::Direction::None => 0,
            })
            .collect();
        let start_dt: Vec<i64> = self
            .strokes
            .iter()
            .map(|x| x.start_datetime().timestamp_millis())
            .collect();
        let end_dt: Vec<i64> = self
            .strokes
            .iter()
            .map(|x| x.end_datetime().timestamp_millis())
            .collect();
        let start_price: Vec<f64> = self.strokes.iter().map(|x| x.start_price()).collect();
        let end_price: Vec<f64> = self.strokes.iter().map(|x| x.end_price()).collect();
        let power: Vec<f64> = self.strokes.iter().map(|x| x.power()).collect();

        self.stroke_cache = df!(
            "direction" => direction,
            "start_dt" => start_dt,
            "end_dt" => end_dt,
            "start_price" => start_price,
            "end_price" => end_price,
            "power" => power
        )
        .expect("failed to rebuild stroke dataframe cache");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BarRecord {
    pub dt: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub vol: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergedBarRecord {
    pub dt: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub vol: f64,
    pub raw_start: usize,
    pub raw_end: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FractalRecord {
    #[serde(rename = "type")]
    pub fractal_type: String,
    pub dt: String,
    pub high: f64,
    pub low: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrokeRecord {
    pub direction: String,
    pub start_dt: String,
    pub end_dt: String,
    pub start_price: f64,
    pub end_price: f64,
    pub high: f64,
    pub low: f64,
    pub power: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub total_bars_raw: usize,
    pub total_bars_merged: usize,
    pub total_fractals: usize,
    pub total_strokes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChanExport {
    pub bars_raw: Vec<BarRecord>,
    pub bars_merged: Vec<MergedBarRecord>,
    pub fractals: Vec<FractalRecord>,
    pub strokes: Vec<StrokeRecord>,
    pub summary: AnalysisSummary,
}
