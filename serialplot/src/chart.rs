/// Seconds of history kept in view.
pub const WINDOW_SECS: f64 = 30.0;
/// Empty space to the right of the newest sample.
pub const LOOKAHEAD_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub elapsed: f64,
    pub value: f64,
}

/// Samples of the current session, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
}

impl SampleBuffer {
    pub fn push(&mut self, elapsed: f64, value: f64) {
        self.samples.push(Sample { elapsed, value });
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.elapsed, s.value]).collect()
    }
}

/// Axis ranges and points handed to the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub points: Vec<[f64; 2]>,
}

impl ChartView {
    pub fn from_buffer(buffer: &SampleBuffer) -> Option<Self> {
        let latest = buffer.latest()?;
        Some(Self {
            x_range: x_window(latest.elapsed),
            y_range: y_range(buffer.values())?,
            points: buffer.points(),
        })
    }
}

/// Trailing window ending one lookahead unit after `latest`.
pub fn x_window(latest: f64) -> (f64, f64) {
    ((latest - WINDOW_SECS).max(0.0), latest + LOOKAHEAD_SECS)
}

/// Padded value range, or `None` for no values.
pub fn y_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    })?;
    let pad = if min == max { 1.0 } else { 0.05 * (max - min) };
    Some((min - pad, max + pad))
}
