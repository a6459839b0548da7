/// How the train/test partitions are carved out of the classified samples.
///
/// The test set takes `positives / test_divisor` samples, half of them from
/// each class. With `balance_negatives` the training negatives are capped at
/// the positive count, so the training set stays roughly class-balanced no
/// matter how large the negative pool is; without it every remaining
/// negative is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPolicy {
    pub test_divisor: usize,
    pub balance_negatives: bool,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            test_divisor: 5,
            balance_negatives: true,
        }
    }
}

/// One side of a split, still grouped by class. Labels are derived from the
/// group lengths (positives first) when the partition is assembled.
#[derive(Debug, Clone)]
pub struct SplitPartition<T> {
    pub positives: Vec<T>,
    pub negatives: Vec<T>,
}

impl<T> SplitPartition<T> {
    pub fn len(&self) -> usize {
        self.positives.len() + self.negatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct SplitResult<T> {
    pub train: SplitPartition<T>,
    pub test: SplitPartition<T>,
}

/// Stratified train/test split over classified samples in their source
/// iteration order.
///
/// The test set takes the first `test_half` samples of each class; training
/// gets the remaining positives and the negatives from `test_half` up to the
/// policy's cap. Train and test never overlap, and every positive lands in
/// exactly one of the two. Bounds clamp, so a short negative pool or empty
/// positives degrade to smaller (down to empty) partitions instead of
/// failing.
pub fn stratified_split<T: Clone>(
    positives: &[T],
    negatives: &[T],
    policy: &SplitPolicy,
) -> SplitResult<T> {
    let test_size = if policy.test_divisor == 0 {
        0
    } else {
        positives.len() / policy.test_divisor
    };
    let test_half = test_size / 2;

    let train_negative_end = if policy.balance_negatives {
        positives.len()
    } else {
        negatives.len()
    };

    SplitResult {
        test: SplitPartition {
            positives: clamped(positives, 0, test_half),
            negatives: clamped(negatives, 0, test_half),
        },
        train: SplitPartition {
            positives: clamped(positives, test_half, positives.len()),
            negatives: clamped(negatives, test_half, train_negative_end),
        },
    }
}

// Slice with both bounds clamped to the input length, empty when start >= end.
fn clamped<T: Clone>(items: &[T], start: usize, end: usize) -> Vec<T> {
    let end = end.min(items.len());
    let start = start.min(end);
    items[start..end].to_vec()
}
