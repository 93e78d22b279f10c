//! 分析策略常量配置。
//!
//! 分型最小间隔与笔最小跨度是缠论里的约定参数，这里不硬编码，
//! 以默认值 + 补丁文件（json/yaml）的方式暴露。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constant::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanConfig {
    /// 相邻确认分型中心之间至少间隔的合并bar数。
    pub min_fractal_gap: usize,
    /// 一笔两端分型中心之间至少间隔的合并bar数。
    pub min_stroke_span: usize,
}

impl Default for ChanConfig {
    fn default() -> Self {
        Self {
            min_fractal_gap: 1,
            min_stroke_span: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChanConfigPatch {
    pub min_fractal_gap: Option<usize>,
    pub min_stroke_span: Option<usize>,
}

impl ChanConfig {
    pub fn apply(mut self, patch: &ChanConfigPatch) -> Self {
        if let Some(v) = patch.min_fractal_gap {
            self.min_fractal_gap = v;
        }
        if let Some(v) = patch.min_stroke_span {
            self.min_stroke_span = v;
        }
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let patch: ChanConfigPatch = match path.extension().and_then(|x| x.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            other => {
                return Err(AnalysisError::UnsupportedConfigFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };

        Ok(Self::default().apply(&patch))
    }
}
