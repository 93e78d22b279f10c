//! CSV bar 数据加载。
//!
//! 核心分析本身不做任何 I/O；这里是喂数据的边界辅助，供应用与
//! 测试把磁盘上的K线文件转成 `RawBar` 序列。

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::bar::RawBar;
use crate::constant::AnalysisError;

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "dt", alias = "date")]
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default, alias = "vol")]
    volume: f64,
}

pub fn load_raw_bars(
    file_path: impl AsRef<Path>,
    symbol: impl Into<String>,
) -> Result<Vec<RawBar>, AnalysisError> {
    let symbol = symbol.into();

    let mut reader = csv::Reader::from_path(file_path)?;
    let mut out = Vec::new();

    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        let datetime = parse_datetime(&row.datetime)?;
        out.push(RawBar {
            symbol: symbol.clone(),
            datetime,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    Ok(out)
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>, AnalysisError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y%m%d%H%M%S%.f",
    ];

    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    // 日线数据常见的纯日期格式
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let dt = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
    }

    Err(AnalysisError::InvalidDatetime(value.to_string()))
}
