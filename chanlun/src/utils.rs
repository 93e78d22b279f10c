pub fn approx_eq_f64(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON
}

pub fn clamp_price(value: f64, low: f64, high: f64) -> f64 {
    value.min(high).max(low)
}
