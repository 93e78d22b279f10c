//! K线包含关系处理。
//!
//! 负责：
//! - 按当前趋势方向合并存在包含关系的相邻bar；
//! - 合并后向前回溯，消除新产生的包含关系；
//! - 保证合并结果满足 low <= open/close <= high。

use crate::bar::{MergedBar, RawBar};
use crate::constant::Direction;
use crate::utils::clamp_price;

/// 对整段已校验的原始序列做包含关系消除。
///
/// 趋势方向作为折叠状态显式传递：每次落笔一根无包含关系的新bar时，
/// 由两根bar高点的相对位置刷新；首次合并时若尚无趋势，同样由相对
/// 高点推断。输出序列中任意相邻两根bar互不包含，对已消除包含的
/// 序列重复执行是恒等变换。
pub fn merge_bars(bars: &[RawBar]) -> Vec<MergedBar> {
    let mut rows: Vec<MergedBar> = Vec::new();
    let mut trend = Direction::None;

    for (index, bar) in bars.iter().enumerate() {
        push_merged(&mut rows, &mut trend, MergedBar::from_raw(bar, index));
    }

    rows
}

fn push_merged(rows: &mut Vec<MergedBar>, trend: &mut Direction, incoming: MergedBar) {
    let mut current = incoming;

    loop {
        let Some(last) = rows.last().cloned() else {
            break;
        };

        if !last.is_inclusive(&current) {
            *trend = if current.high > last.high {
                Direction::Up
            } else {
                Direction::Down
            };
            current.direction = *trend;
            break;
        }

        let direction = match *trend {
            Direction::None => {
                // 初始两根bar即包含：从相对高点推断趋势
                let inferred = if current.high >= last.high {
                    Direction::Up
                } else {
                    Direction::Down
                };
                *trend = inferred;
                inferred
            }
            d => d,
        };

        rows.pop();
        current = merge_pair(&last, &current, direction);
        // 合并结果可能与更前一根bar重新构成包含，继续回溯
    }

    rows.push(current);
}

fn merge_pair(last: &MergedBar, incoming: &MergedBar, direction: Direction) -> MergedBar {
    let (high, low) = match direction {
        Direction::Down => (last.high.min(incoming.high), last.low.min(incoming.low)),
        _ => (last.high.max(incoming.high), last.low.max(incoming.low)),
    };

    MergedBar {
        symbol: incoming.symbol.clone(),
        datetime: incoming.datetime,
        // 原始open/close可能落在新极值区间之外，必须收敛回区间内
        open: clamp_price(last.open, low, high),
        close: clamp_price(incoming.close, low, high),
        high,
        low,
        volume: last.volume + incoming.volume,
        raw_start: last.raw_start,
        raw_end: incoming.raw_end,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::approx_eq_f64;
    use chrono::{Duration, TimeZone, Utc};

    fn mk_bar(minute: i64, open: f64, high: f64, low: f64, close: f64) -> RawBar {
        RawBar {
            symbol: "T".to_string(),
            datetime: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(minute),
            open,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn downtrend_merge_takes_min_high_and_min_low() {
        // 先用两根高点递减的bar确立下降趋势，再送入被前一根包含的bar
        let bars = vec![
            mk_bar(0, 19.0, 20.0, 18.0, 18.5),
            mk_bar(15, 10.0, 12.0, 9.0, 11.0),
            mk_bar(30, 13.0, 13.0, 8.0, 8.5),
        ];
        let merged = merge_bars(&bars);

        assert_eq!(merged.len(), 2);
        let m = &merged[1];
        assert_eq!(m.high, 12.0);
        assert_eq!(m.low, 8.0);
        // open=10、close=8.5 本就在 [8,12] 内，收敛是恒等操作
        assert_eq!(m.open, 10.0);
        assert_eq!(m.close, 8.5);
        assert_eq!(m.raw_start, 1);
        assert_eq!(m.raw_end, 2);
        assert_eq!(m.direction, Direction::Down);
    }

    #[test]
    fn open_outside_merged_range_is_clamped() {
        // 下降趋势下 high 取较低者：前一根的 open=15 落在新区间 [9,12] 之外
        let bars = vec![
            mk_bar(0, 19.0, 20.0, 18.0, 18.5),
            mk_bar(15, 15.0, 15.0, 9.0, 10.0),
            mk_bar(30, 12.0, 12.0, 9.5, 10.0),
        ];
        let merged = merge_bars(&bars);

        assert_eq!(merged.len(), 2);
        let m = &merged[1];
        assert_eq!(m.high, 12.0);
        assert_eq!(m.low, 9.0);
        assert_eq!(m.open, 12.0, "open必须收敛进合并区间");
        assert_eq!(m.close, 10.0);
    }

    #[test]
    fn uptrend_merge_takes_max_high_and_max_low() {
        let bars = vec![
            mk_bar(0, 9.0, 10.0, 8.0, 9.5),
            mk_bar(15, 14.0, 16.0, 13.0, 15.0),
            mk_bar(30, 14.5, 15.0, 14.0, 14.2),
        ];
        let merged = merge_bars(&bars);

        assert_eq!(merged.len(), 2);
        let m = &merged[1];
        assert_eq!(m.high, 16.0);
        assert_eq!(m.low, 14.0);
        assert_eq!(m.direction, Direction::Up);
        assert!(m.low <= m.open && m.open <= m.high);
        assert!(m.low <= m.close && m.close <= m.high);
    }

    #[test]
    fn merge_cascades_backwards() {
        // 第三根bar吞掉第二根后，合并结果又与第一根构成包含，需要继续回溯
        let bars = vec![
            mk_bar(0, 5.0, 10.0, 1.0, 6.0),
            mk_bar(15, 8.0, 9.0, 2.0, 3.0),
            mk_bar(30, 4.0, 12.0, 0.5, 11.0),
        ];
        let merged = merge_bars(&bars);

        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!(m.raw_start, 0);
        assert_eq!(m.raw_end, 2);
        assert!(approx_eq_f64(m.volume, 3.0));
    }

    #[test]
    fn first_bar_keeps_undetermined_direction() {
        let bars = vec![mk_bar(0, 10.0, 12.0, 9.0, 11.0)];
        let merged = merge_bars(&bars);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].direction, Direction::None);
    }

    #[test]
    fn volume_accumulates_across_merge() {
        let mut bars = vec![
            mk_bar(0, 10.0, 12.0, 9.0, 11.0),
            mk_bar(15, 10.5, 11.5, 9.5, 10.0),
        ];
        bars[0].volume = 100.0;
        bars[1].volume = 50.0;
        let merged = merge_bars(&bars);
        assert_eq!(merged.len(), 1);
        assert!(approx_eq_f64(merged[0].volume, 150.0));
    }
}
