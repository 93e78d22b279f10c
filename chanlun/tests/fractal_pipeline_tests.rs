use chrono::{Duration, TimeZone, Utc};

use chanlun::{FractalType, RawBar, detect_fractals, merge_bars};

#[test]
fn fractal_kinds_strictly_alternate() {
    let merged = merge_bars(&sample_bars(160));
    let fractals = detect_fractals(&merged, 1);

    assert!(!fractals.is_empty(), "need fractals for alternation check");
    for pair in fractals.windows(2) {
        assert_eq!(
            pair[0].fractal_type,
            pair[1].fractal_type.opposite(),
            "相邻分型必须交替"
        );
    }
}

#[test]
fn fractal_centers_are_strictly_interior_and_gapped() {
    let merged = merge_bars(&sample_bars(160));
    let fractals = detect_fractals(&merged, 1);

    for fractal in &fractals {
        assert!(fractal.center_index > 0);
        assert!(fractal.center_index < merged.len() - 1, "末根bar不能作为分型中心");
    }
    for pair in fractals.windows(2) {
        assert!(
            pair[1].center_index - pair[0].center_index - 1 >= 1,
            "相邻分型中心之间至少隔一根合并bar"
        );
    }
}

#[test]
fn fractal_prices_match_central_bar_extremes() {
    let merged = merge_bars(&sample_bars(160));
    for fractal in detect_fractals(&merged, 1) {
        let center = &merged[fractal.center_index];
        assert_eq!(fractal.high, center.high);
        assert_eq!(fractal.low, center.low);
        match fractal.fractal_type {
            FractalType::Top => assert_eq!(fractal.price(), center.high),
            FractalType::Bottom => assert_eq!(fractal.price(), center.low),
            FractalType::None => panic!("confirmed fractal must be top or bottom"),
        }
    }
}

#[test]
fn zigzag_produces_known_fractals() {
    let merged = merge_bars(&zigzag_bars());
    assert_eq!(merged.len(), 30, "zigzag序列没有包含关系，合并应为恒等");

    let fractals = detect_fractals(&merged, 1);
    assert_eq!(fractals.len(), 5);

    let centers: Vec<usize> = fractals.iter().map(|f| f.center_index).collect();
    assert_eq!(centers, vec![5, 10, 15, 20, 25]);
    assert_eq!(fractals[0].fractal_type, FractalType::Top);
    assert_eq!(fractals[0].price(), 16.0);
    assert_eq!(fractals[1].fractal_type, FractalType::Bottom);
    assert_eq!(fractals[1].price(), 10.0);
}

fn sample_bars(count: usize) -> Vec<RawBar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let phase = (i % 20) as f64;
            let base = 100.0 + if phase < 10.0 { phase } else { 20.0 - phase };
            let width = 1.0 + ((i % 7) as f64) * 0.8;
            let low = base - width / 2.0;
            let high = base + width / 2.0;
            RawBar {
                symbol: "I8888.XDCE".to_string(),
                datetime: start + Duration::minutes(15 * i as i64),
                open: low + width * 0.25,
                high,
                low,
                close: low + width * 0.75,
                volume: 1.0,
            }
        })
        .collect()
}

/// 30根手工构造的之字形序列：峰在5/15/25，谷在10/20。
fn zigzag_bars() -> Vec<RawBar> {
    let bases = [
        10.0, 11.0, 12.0, 13.0, 14.0, 15.0, //
        14.0, 13.0, 12.0, 11.0, 10.0, //
        11.0, 12.0, 13.0, 14.0, 15.0, //
        14.0, 13.0, 12.0, 11.0, 10.0, //
        11.0, 12.0, 13.0, 14.0, 15.0, //
        14.0, 13.0, 12.0, 11.0,
    ];
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
    bases
        .iter()
        .enumerate()
        .map(|(i, base)| RawBar {
            symbol: "I8888.XDCE".to_string(),
            datetime: start + Duration::minutes(15 * i as i64),
            open: base + 0.25,
            high: base + 1.0,
            low: *base,
            close: base + 0.75,
            volume: 1.0,
        })
        .collect()
}
