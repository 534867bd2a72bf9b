//! Axis bounds and tick spacing.

/// Multipliers an axis maximum is rounded up to, per power of ten.
const NICE_MAX: [f64; 7] = [1.2, 1.5, 2.0, 3.0, 5.0, 7.5, 10.0];

/// Mantissas accepted for a tick step when the first guess does not divide
/// the axis evenly.
const NICE_STEP: [f64; 7] = [1.0, 1.5, 2.0, 2.5, 3.0, 5.0, 7.5];

/// Visible tick counts an axis may show, including zero.
const TICKS: std::ops::RangeInclusive<usize> = 4..=6;

const EPSILON: f64 = 1e-9;

/// Round `value` up to a friendly axis maximum. Non-positive or non-finite
/// input yields 10.
pub fn nice_max(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 10.0;
    }
    let magnitude = magnitude(value);
    let n = value / magnitude;
    let factor = NICE_MAX
        .iter()
        .copied()
        .find(|&f| n <= f + EPSILON)
        .unwrap_or(10.0);
    factor * magnitude
}

/// Tick step for an axis running from zero to `max`.
///
/// Aims for five intervals rounded to 1/2/5/10. When that step leaves a
/// remainder or a tick count outside 4..=6, the axis is split into 5, 4 or
/// 3 equal intervals instead, preferring a friendly mantissa.
pub fn nice_step(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }

    let rough = max / 5.0;
    let magnitude = magnitude(rough);
    let n = rough / magnitude;
    let factor = match n {
        n if n <= 1.0 + EPSILON => 1.0,
        n if n <= 2.0 + EPSILON => 2.0,
        n if n <= 5.0 + EPSILON => 5.0,
        _ => 10.0,
    };
    let step = factor * magnitude;
    if divides(max, step) {
        return step;
    }

    [5.0, 4.0, 3.0]
        .into_iter()
        .map(|intervals| max / intervals)
        .find(|&step| is_nice_step(step))
        .unwrap_or(max / 5.0)
}

/// Tick values from zero to `max` inclusive.
pub fn ticks(max: f64, step: f64) -> Vec<f64> {
    if !(max > 0.0 && step > 0.0) {
        return vec![0.0];
    }
    let count = (max / step + EPSILON).floor() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

/// Tick label with just enough decimals for `step`.
pub fn fmt_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        if step.fract().abs() < EPSILON { 0 } else { 1 }
    } else {
        (-step.log10().floor()) as usize + 1
    };
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        let text = text.trim_end_matches('0').trim_end_matches('.');
        if text == "-0" { "0".to_string() } else { text.to_string() }
    } else {
        text
    }
}

fn magnitude(value: f64) -> f64 {
    10f64.powi(value.log10().floor() as i32)
}

fn divides(max: f64, step: f64) -> bool {
    let ratio = max / step;
    let rounded = ratio.round();
    (ratio - rounded).abs() < 1e-6 && TICKS.contains(&(rounded as usize + 1))
}

fn is_nice_step(step: f64) -> bool {
    let n = step / magnitude(step);
    NICE_STEP.iter().any(|&m| (n - m).abs() < 1e-6)
}
