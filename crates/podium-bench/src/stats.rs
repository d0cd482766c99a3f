use std::time::Duration;


/// Latency aggregate over a batch of individually timed operations, reported
/// in microseconds.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LatencySummary {
    pub(crate) average_us: f64,
    pub(crate) stdev_us:   f64,
    pub(crate) p95_us:     f64,
    pub(crate) p99_us:     f64,
    pub(crate) p999_us:    f64,
}

impl LatencySummary {
    pub(crate) fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut times_us: Vec<f64> =
            samples.iter().map(|sample| sample.as_secs_f64() * 1e6).collect();
        let count = times_us.len() as f64;

        let average = times_us.iter().sum::<f64>() / count;
        let variance = times_us
            .iter()
            .map(|&time| (time - average) * (time - average))
            .sum::<f64>()
            / count;

        times_us.sort_by(f64::total_cmp);

        Self {
            average_us: average,
            stdev_us:   variance.sqrt(),
            p95_us:     percentile(&times_us, 0.95),
            p99_us:     percentile(&times_us, 0.99),
            p999_us:    percentile(&times_us, 0.999),
        }
    }
}

/// The sample at the `quantile` position of an ascending-sorted slice.
fn percentile(sorted_us: &[f64], quantile: f64) -> f64 {
    let index = ((quantile * sorted_us.len() as f64) as usize).min(sorted_us.len() - 1);
    sorted_us[index]
}

pub(crate) fn print_summary(name: &str, operation: &str, count: usize, summary: &LatencySummary) {
    println!("{name} {operation} {count} operations:");
    println!("  average : {:.4} us", summary.average_us);
    println!("  stdev   : {:.4} us", summary.stdev_us);
    println!("  95%     : {:.4} us", summary.p95_us);
    println!("  99%     : {:.4} us", summary.p99_us);
    println!("  99.9%   : {:.4} us", summary.p999_us);
    println!("{}", "-".repeat(30));
}
