//! 输入校验。
//!
//! 在任何处理开始前整体检查原始K线序列；校验失败即整体失败，
//! 不产生部分结果。

use crate::bar::RawBar;
use crate::constant::AnalysisError;

pub fn validate_bars(bars: &[RawBar]) -> Result<(), AnalysisError> {
    if bars.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    for (index, bar) in bars.iter().enumerate() {
        // 写成否定式以同时拒绝 NaN
        if !(bar.low <= bar.high) {
            return Err(AnalysisError::MalformedBar {
                index,
                reason: format!("low {} above high {}", bar.low, bar.high),
            });
        }
        if !(bar.low <= bar.open && bar.open <= bar.high) {
            return Err(AnalysisError::MalformedBar {
                index,
                reason: format!("open {} outside [{}, {}]", bar.open, bar.low, bar.high),
            });
        }
        if !(bar.low <= bar.close && bar.close <= bar.high) {
            return Err(AnalysisError::MalformedBar {
                index,
                reason: format!("close {} outside [{}, {}]", bar.close, bar.low, bar.high),
            });
        }
        if index > 0 && bar.datetime < bars[index - 1].datetime {
            return Err(AnalysisError::NonChronological { index });
        }
    }

    Ok(())
}
