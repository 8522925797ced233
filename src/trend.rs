// Synthetic week-long AQI series for the trend chart. Cosmetic only,
// there is no real historical feed behind it.
use rand::Rng;

pub const DAYS: usize = 7;

pub fn synthesize(current: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..DAYS)
        .map(|_| current + rng.gen_range(-10.0..=10.0))
        .collect()
}
