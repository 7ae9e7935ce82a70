use crate::error::RotaError;

/// Maps a seed to an index in `[0, bound)`.
///
/// Pure function of its inputs: the same `(seed, bound)` always yields the
/// same index, which is what makes whole-cycle replays reproducible.
pub fn seeded_random(seed: i64, bound: usize) -> Result<usize, RotaError> {
    if bound == 0 {
        return Err(RotaError::Domain { bound });
    }
    let x = (seed as f64).sin() * 10000.0;
    let fraction = x - x.floor();
    let index = (fraction * bound as f64).floor() as usize;
    Ok(index.min(bound - 1))
}

/// Seeded Fisher-Yates shuffle, walking from the last index down to 1.
pub fn shuffle<T>(items: &mut [T], seed: i64) -> Result<(), RotaError> {
    for i in (1..items.len()).rev() {
        let j = seeded_random(seed.wrapping_add(i as i64), i + 1)?;
        items.swap(i, j);
    }
    Ok(())
}
