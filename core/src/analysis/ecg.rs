use ndarray::ArrayView1;

use crate::analysis::codec::Signal;

/// Counts adjacent sample pairs of strictly opposite sign.
///
/// A zero sample never forms a crossing with either neighbour. Integer
/// samples are compared by sign so the test stays exact over the whole
/// range; float samples use the native product against `0.0`.
pub fn zero_crossing_count(signal: &Signal) -> usize {
    if signal.len() < 2 {
        return 0;
    }

    match signal {
        Signal::Integer(samples) => {
            count_pairs(samples.view(), |a, b| a.signum() * b.signum() < 0)
        }
        Signal::Float(samples) => count_pairs(samples.view(), |a, b| a * b < 0.0),
    }
}

fn count_pairs<T: Copy>(samples: ArrayView1<T>, crosses: impl Fn(T, T) -> bool) -> usize {
    samples
        .windows(2)
        .into_iter()
        .filter(|pair| crosses(pair[0], pair[1]))
        .count()
}
