use ndarray::{Array, Axis, RemoveAxis};
use rand::seq::SliceRandom;
use rand::Rng;

/// A uniformly random permutation of `[0, len)`.
pub fn permutation<R: Rng>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

/// Reorders a paired (data, labels) array set by one shared permutation of
/// their leading axis, keeping position `i`'s data matched with position
/// `i`'s label. Only the order changes.
pub fn shuffle_pair<A, B, D, E, R>(
    data: &Array<A, D>,
    labels: &Array<B, E>,
    rng: &mut R,
) -> (Array<A, D>, Array<B, E>)
where
    A: Clone,
    B: Clone,
    D: RemoveAxis,
    E: RemoveAxis,
    R: Rng,
{
    assert_eq!(
        data.len_of(Axis(0)),
        labels.len_of(Axis(0)),
        "data and labels must pair 1:1"
    );

    let perm = permutation(data.len_of(Axis(0)), rng);
    (data.select(Axis(0), &perm), labels.select(Axis(0), &perm))
}
