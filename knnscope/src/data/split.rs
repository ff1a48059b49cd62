// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use log::debug;
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::LabelEncoding;
use crate::errors::SplitError;

/// Train/test partitions of a feature matrix and its class codes.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitions {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<usize>,
    pub y_test: Array1<usize>,
}

/// Seeded train/test split that keeps every class's share in both partitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StratifiedSplit {
    train_size: f64,
    seed: u64,
}

impl Default for StratifiedSplit {
    fn default() -> Self {
        StratifiedSplit { train_size: 0.2, seed: 17 }
    }
}

impl StratifiedSplit {
    pub fn new(train_size: f64, seed: u64) -> Self {
        StratifiedSplit { train_size, seed }
    }

    pub fn with_train_size(mut self, train_size: f64) -> Self {
        self.train_size = train_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn train_size(&self) -> f64 {
        self.train_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns `(train_indices, test_indices)` into `labels`.
    ///
    /// # Errors
    /// - `SplitError::InvalidTrainSize` when `train_size` is not in `(0, 1)`.
    /// - `SplitError::InsufficientClassMembers` when a class has fewer than two rows.
    /// - `SplitError::PartitionTooSmall` when either partition would hold fewer
    ///   rows than there are classes.
    pub fn indices(&self, labels: &LabelEncoding) -> Result<(Vec<usize>, Vec<usize>), SplitError> {
        if !(self.train_size > 0.0 && self.train_size < 1.0) {
            return Err(SplitError::InvalidTrainSize(self.train_size));
        }

        let counts = labels.class_counts();
        for (code, &count) in counts.iter().enumerate() {
            if count < 2 {
                return Err(SplitError::InsufficientClassMembers {
                    label: labels.class_name(code).unwrap_or_default().to_string(),
                    count,
                });
            }
        }

        let n_samples = labels.codes().len();
        let n_classes = counts.len();
        let n_train = (self.train_size * n_samples as f64).floor() as usize;
        let n_test = n_samples - n_train;
        if n_train < n_classes {
            return Err(SplitError::PartitionTooSmall {
                partition: "train",
                size: n_train,
                classes: n_classes,
            });
        }
        if n_test < n_classes {
            return Err(SplitError::PartitionTooSmall {
                partition: "test",
                size: n_test,
                classes: n_classes,
            });
        }

        let per_class_train = apportion(&counts, n_train);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);
        for (code, &take) in per_class_train.iter().enumerate() {
            let mut members: Vec<usize> = labels
                .codes()
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c == code)
                .map(|(i, _)| i)
                .collect();
            members.shuffle(&mut rng);
            train.extend_from_slice(&members[..take]);
            test.extend_from_slice(&members[take..]);
        }
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        debug!(
            "Stratified split (seed {}): train_size={}, test_size={}",
            self.seed,
            train.len(),
            test.len()
        );
        Ok((train, test))
    }

    /// Splits `x` row-wise together with the class codes of `labels`.
    pub fn split(&self, x: &Array2<f64>, labels: &LabelEncoding) -> Result<Partitions, SplitError> {
        let (train, test) = self.indices(labels)?;
        Ok(Partitions {
            x_train: x.select(Axis(0), &train),
            x_test: x.select(Axis(0), &test),
            y_train: labels.codes().select(Axis(0), &train),
            y_test: labels.codes().select(Axis(0), &test),
        })
    }
}

/// Largest-remainder allocation of `n_draws` over classes of the given sizes.
/// Ties on the remainder go to the lower class code.
fn apportion(counts: &[usize], n_draws: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    let exact: Vec<f64> =
        counts.iter().map(|&c| c as f64 * n_draws as f64 / total as f64).collect();
    let mut alloc: Vec<usize> = exact.iter().map(|v| v.floor() as usize).collect();

    let mut remaining = n_draws.saturating_sub(alloc.iter().sum());
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &code in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        if alloc[code] < counts[code] {
            alloc[code] += 1;
            remaining -= 1;
        }
    }
    alloc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn labels(counts: &[usize]) -> LabelEncoding {
        let raw: Vec<String> = counts
            .iter()
            .enumerate()
            .flat_map(|(code, &n)| std::iter::repeat(format!("class_{}", code)).take(n))
            .collect();
        LabelEncoding::fit(&raw)
    }

    #[test]
    fn test_split_sizes_and_stratification() {
        let labels = labels(&[50, 50, 50]);
        let (train, test) = StratifiedSplit::default().indices(&labels).unwrap();

        assert_eq!(train.len(), 30);
        assert_eq!(test.len(), 120);
        for code in 0..3 {
            let in_train = train.iter().filter(|&&i| labels.codes()[i] == code).count();
            assert_eq!(in_train, 10);
        }
    }

    #[test]
    fn test_split_is_a_partition() {
        let labels = labels(&[7, 13, 5]);
        let (train, test) = StratifiedSplit::new(0.4, 3).indices(&labels).unwrap();

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());
        assert_eq!(train.len(), 10);
    }

    #[test]
    fn test_split_is_reproducible() {
        let labels = labels(&[20, 20]);
        let split = StratifiedSplit::new(0.5, 42);
        assert_eq!(split.indices(&labels).unwrap(), split.indices(&labels).unwrap());

        let other = StratifiedSplit::new(0.5, 43).indices(&labels).unwrap();
        assert_ne!(split.indices(&labels).unwrap(), other);
    }

    #[test]
    fn test_split_rows_follow_indices() {
        let labels = labels(&[3, 3]);
        let x = Array2::from_shape_fn((6, 2), |(i, j)| (i * 10 + j) as f64);
        let split = StratifiedSplit::new(0.5, 1);
        let (train, _) = split.indices(&labels).unwrap();
        let parts = split.split(&x, &labels).unwrap();

        assert_eq!(parts.x_train.nrows(), 3);
        assert_eq!(parts.x_test.nrows(), 3);
        for (row, &idx) in train.iter().enumerate() {
            assert_eq!(parts.x_train[[row, 0]], (idx * 10) as f64);
            assert_eq!(parts.y_train[row], labels.codes()[idx]);
        }
    }

    #[test]
    fn test_singleton_class_rejected() {
        let labels = labels(&[10, 1]);
        let result = StratifiedSplit::new(0.5, 0).indices(&labels);
        assert!(matches!(
            result,
            Err(SplitError::InsufficientClassMembers { label, count: 1 }) if label == "class_1"
        ));
    }

    #[test]
    fn test_train_partition_smaller_than_class_count() {
        let labels = labels(&[2, 2, 2]);
        let result = StratifiedSplit::new(0.2, 0).indices(&labels);
        assert!(matches!(
            result,
            Err(SplitError::PartitionTooSmall { partition: "train", size: 1, classes: 3 })
        ));
    }

    #[test]
    fn test_invalid_train_size() {
        let labels = labels(&[5, 5]);
        assert!(matches!(
            StratifiedSplit::new(1.0, 0).indices(&labels),
            Err(SplitError::InvalidTrainSize(_))
        ));
        assert!(matches!(
            StratifiedSplit::new(0.0, 0).indices(&labels),
            Err(SplitError::InvalidTrainSize(_))
        ));
    }

    #[test]
    fn test_apportion_largest_remainder() {
        assert_eq!(apportion(&[50, 50, 50], 30), vec![10, 10, 10]);
        assert_eq!(apportion(&[7, 13, 5], 10), vec![3, 5, 2]);
        assert_eq!(apportion(&[1, 1, 1], 2), vec![1, 1, 0]);
    }
}
