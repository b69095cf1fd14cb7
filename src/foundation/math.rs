/// Frame-rate aware exponential approach: moves `current` toward `target` by
/// `min(delta * rate, 1)` of the remaining distance.
pub fn approach(current: f64, target: f64, rate: f64, delta: f64) -> f64 {
    let k = (delta * rate).clamp(0.0, 1.0);
    current + (target - current) * k
}
