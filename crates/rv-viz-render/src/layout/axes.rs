/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis widened outwards to "nice number" limits.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (lo, hi) = widen_degenerate(data_min, data_max);
        let step = nice_step((hi - lo) / (target_ticks.max(2) - 1) as f64);
        let nice_min = (lo / step).floor() * step;
        let nice_max = (hi / step).ceil() * step;
        Self::with_step(nice_min, nice_max, step)
    }

    /// Linear axis with exactly `[min, max]`; ticks at nice multiples inside.
    pub fn bounded(min: f64, max: f64, target_ticks: usize) -> Self {
        let (lo, hi) = widen_degenerate(min, max);
        let step = nice_step((hi - lo) / (target_ticks.max(2) - 1) as f64);
        Self::with_step(lo, hi, step)
    }

    fn with_step(min: f64, max: f64, step: f64) -> Self {
        let eps = step * 1e-6;
        let first = (min / step - 1e-6).ceil() as i64;
        let last = (max / step + 1e-6).floor() as i64;

        let tick_positions: Vec<f64> = (first..=last).map(|k| k as f64 * step).collect();
        let tick_labels = tick_positions.iter().map(|&v| format_tick(v, step)).collect();

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        let minor_ticks = ((min / minor_step - 1e-6).ceil() as i64..=(max / minor_step + 1e-6).floor() as i64)
            .filter(|k| k % 5 != 0)
            .map(|k| k as f64 * minor_step)
            .filter(|v| *v >= min - eps && *v <= max + eps)
            .collect();

        Self { min, max, log: false, label: String::new(), tick_positions, tick_labels, minor_ticks }
    }

    /// Logarithmic axis spanning whole decades around `[data_min, data_max]`.
    ///
    /// Both bounds must be positive; callers clamp non-positive data first.
    pub fn auto_log(data_min: f64, data_max: f64) -> Self {
        let log_min = data_min.max(1e-300).log10().floor() as i32;
        let log_max = (data_max.max(1e-300).log10().ceil() as i32).max(log_min + 1);
        Self::log_decades(log_min, log_max)
    }

    /// Logarithmic axis with explicit limits.
    pub fn bounded_log(min: f64, max: f64) -> Self {
        let mut axis = Self::auto_log(min, max);
        axis.min = min;
        axis.max = max;
        axis
    }

    fn log_decades(log_min: i32, log_max: i32) -> Self {
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();

        for exp in log_min..=log_max {
            ticks.push(10.0_f64.powi(exp));
            labels.push(format!("10^{{{exp}}}"));
            if exp < log_max {
                minor.extend((2..=9).map(|m| m as f64 * 10.0_f64.powi(exp)));
            }
        }

        Self {
            min: 10.0_f64.powi(log_min),
            max: 10.0_f64.powi(log_max),
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Drop tick labels, keeping tick marks (for a shared x axis).
    pub fn without_tick_labels(mut self) -> Self {
        self.tick_labels.clear();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let log_val = value.max(1e-300).ln();
            let log_min = self.min.max(1e-300).ln();
            let log_max = self.max.max(1e-300).ln();
            (log_val - log_min) / (log_max - log_min)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }

    /// Whether `value` lies within the axis limits.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < 1e-15 {
        let pad = if min == 0.0 { 1.0 } else { 0.5 * min.abs() };
        (min - pad, max + pad)
    } else {
        (min, max)
    }
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let value = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.decimals$}")
    }
}
