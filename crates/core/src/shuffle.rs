//! Uniform random permutation of option lists.

use rand::Rng;

/// Returns a shuffled copy of `items` using the thread-local RNG.
///
/// The input slice is left untouched.
#[must_use]
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Returns a shuffled copy of `items` drawing indices from `rng`.
///
/// Fisher–Yates, walking from the last index down to 1 and swapping each
/// position with a uniformly chosen index in `[0, i]`.
#[must_use]
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}
