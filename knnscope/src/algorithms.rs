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

use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};

use crate::errors::{ModelError, ScalerError};
use crate::scalers::{Scaler, StandardScaler};

pub struct KNNBuilder {
    k: usize,
    normalize: bool,
    x_scaler: StandardScaler,
}

impl KNNBuilder {
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn scaler(mut self, scaler: StandardScaler) -> Self {
        self.x_scaler = scaler;
        self
    }

    pub fn build(self) -> KNN {
        KNN {
            x_train: None,
            y_train: None,
            n_classes: 0,
            k: self.k,
            normalize: self.normalize,
            x_scaler: self.x_scaler,
        }
    }
}

/// k-nearest-neighbors classifier over integer class codes.
///
/// Neighbours are ranked by Euclidean distance, equal distances by training
/// row order, and each of the `k` nearest casts one vote. A tied vote goes to
/// the lowest class code.
#[derive(Debug, Clone)]
pub struct KNN {
    x_train: Option<Array2<f64>>,
    y_train: Option<Array1<usize>>,
    n_classes: usize,
    k: usize,
    normalize: bool,
    x_scaler: StandardScaler,
}

impl KNN {
    pub fn new() -> KNNBuilder {
        KNNBuilder { k: 3, normalize: true, x_scaler: StandardScaler::new() }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelError> {
        if x.ncols() == 0 {
            return Err(ModelError::Scaler(ScalerError::NoFeatures));
        }
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::Scaler(ScalerError::EmptyInput));
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }
        if self.k == 0 || self.k > x.nrows() {
            return Err(ModelError::InvalidK { k: self.k, n_samples: x.nrows() });
        }

        let x_scaled = if self.normalize { self.x_scaler.fit_transform(x)? } else { x.clone() };

        self.n_classes = y.iter().max().map_or(0, |&max| max + 1);
        self.x_train = Some(x_scaled);
        self.y_train = Some(y.clone());
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelError> {
        let x_train = self.x_train.as_ref().ok_or(ModelError::NotFitted)?;
        let y_train = self.y_train.as_ref().ok_or(ModelError::NotFitted)?;

        if x.is_empty() {
            return Err(ModelError::Scaler(ScalerError::EmptyInput));
        }
        if x.ncols() != x_train.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: x_train.ncols(),
                actual: x.ncols(),
            });
        }

        let x_scaled = if self.normalize { self.x_scaler.transform(x)? } else { x.clone() };

        let mut predictions = Array1::zeros(x_scaled.nrows());
        for (i, row) in x_scaled.axis_iter(Axis(0)).enumerate() {
            predictions[i] = self.vote(x_train, y_train, row);
        }
        Ok(predictions)
    }

    /// Mean accuracy of `predict(x)` against `y`.
    pub fn score(&self, x: &Array2<f64>, y: &Array1<usize>) -> Result<f64, ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }
        let predictions = self.predict(x)?;
        Ok(self.calculate_accuracy(&predictions, y))
    }

    pub fn calculate_accuracy(&self, predictions: &Array1<usize>, y_test: &Array1<usize>) -> f64 {
        let correct = predictions
            .iter()
            .zip(y_test.iter())
            .filter(|(pred, true_label)| pred == true_label)
            .count();
        correct as f64 / predictions.len() as f64
    }

    fn vote(&self, x_train: &Array2<f64>, y_train: &Array1<usize>, row: ArrayView1<f64>) -> usize {
        let mut distances: Vec<(usize, f64)> = x_train
            .axis_iter(Axis(0))
            .map(|v| {
                let d = Zip::from(v).and(row).fold(0.0, |acc, &v_i, &row_i| {
                    let diff = v_i - row_i;
                    acc + diff * diff
                });
                // NaN distances rank last
                if d.is_nan() { f64::INFINITY } else { d }
            })
            .enumerate()
            .collect();
        // Squared distances preserve the ordering; the stable sort keeps row order on ties.
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut class_counts = vec![0usize; self.n_classes];
        for &(idx, _) in distances.iter().take(self.k) {
            class_counts[y_train[idx]] += 1;
        }

        class_counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))
            .map_or(0, |(class, _)| class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    #[test]
    fn knn_fit_predict() {
        let mut knn = KNN::new().k(3).normalize(false).build();
        let x = array![[1.0, 1.0], [2.0, 2.0], [1.0, 2.0], [8.0, 8.0], [9.0, 8.0], [8.0, 9.0]];
        let y = array![0, 0, 0, 1, 1, 1];
        knn.fit(&x, &y).unwrap();

        let predictions = knn.predict(&array![[2.5, 2.5], [7.5, 8.5]]).unwrap();
        assert_eq!(predictions, array![0, 1]);
    }

    #[test]
    fn knn_one_neighbor_memorizes_training_set() {
        let mut knn = KNN::new().k(1).build();
        let x = array![[0.0, 1.0], [1.0, 0.5], [2.0, 3.0], [5.0, 1.0], [3.5, 2.0]];
        let y = array![0, 1, 0, 2, 1];
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn knn_tie_goes_to_lowest_class() {
        let mut knn = KNN::new().k(2).normalize(false).build();
        let x = array![[0.0], [2.0]];
        let y = array![1, 0];
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.predict(&array![[1.0]]).unwrap(), array![0]);
    }

    #[test]
    fn knn_normalize_uses_training_scale() {
        // Unscaled, the wide second feature decides; scaled, both count equally.
        let x = array![[0.0, 0.0], [10.0, 100.0]];
        let y = array![0, 1];
        let query = array![[9.0, 45.0]];

        let mut raw = KNN::new().k(1).normalize(false).build();
        raw.fit(&x, &y).unwrap();
        let mut scaled = KNN::new().k(1).normalize(true).build();
        scaled.fit(&x, &y).unwrap();

        assert_eq!(raw.predict(&query).unwrap(), array![0]);
        assert_eq!(scaled.predict(&query).unwrap(), array![1]);
    }

    #[test]
    fn knn_nan_rows_are_farthest() {
        let mut knn = KNN::new().k(1).normalize(false).build();
        let x = array![[f64::NAN], [0.0], [10.0]];
        let y = array![0, 1, 2];
        knn.fit(&x, &y).unwrap();
        assert_eq!(knn.predict(&array![[1.0], [9.0]]).unwrap(), array![1, 2]);

        let mut knn = KNN::new().k(2).normalize(false).build();
        knn.fit(&x, &y).unwrap();
        // Both finite rows outrank the NaN row; the 1-1 vote goes to the lower code.
        assert_eq!(knn.predict(&array![[1.0]]).unwrap(), array![1]);
    }

    #[test]
    fn knn_invalid_k() {
        let mut knn = KNN::new().k(5).build();
        let x = array![[1.0, 2.0], [2.0, 3.0]];
        let y = array![1, 0];
        let result = knn.fit(&x, &y);
        assert!(matches!(result, Err(ModelError::InvalidK { k: 5, n_samples: 2 })));

        let mut knn = KNN::new().k(0).build();
        assert!(matches!(knn.fit(&x, &y), Err(ModelError::InvalidK { k: 0, .. })));
    }

    #[test]
    fn knn_empty_input() {
        let mut knn = KNN::new().build();
        let x: Array2<f64> = Array2::zeros((0, 2));
        let y: Array1<usize> = Array1::zeros(0);
        let result = knn.fit(&x, &y);
        assert!(matches!(result, Err(ModelError::Scaler(ScalerError::EmptyInput))));
    }

    #[test]
    fn knn_no_features() {
        let mut knn = KNN::new().build();
        let x: Array2<f64> = Array2::zeros((2, 0));
        let y = array![1, 0];
        let result = knn.fit(&x, &y);
        assert!(matches!(result, Err(ModelError::Scaler(ScalerError::NoFeatures))));
    }

    #[test]
    fn knn_dimension_mismatch() {
        let mut knn = KNN::new().build();
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1, 0, 1];
        let result = knn.fit(&x, &y);
        assert!(matches!(result, Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn knn_not_fitted() {
        let knn = KNN::new().build();
        let x = array![[1.0, 2.0]];
        let result = knn.predict(&x);
        assert!(matches!(result, Err(ModelError::NotFitted)));
    }

    #[test]
    fn knn_predict_dimension_mismatch() {
        let mut knn = KNN::new().k(1).build();
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1, 0];
        knn.fit(&x, &y).unwrap();
        let x_test = array![[1.0, 2.0, 3.0]];
        let result = knn.predict(&x_test);
        assert!(matches!(result, Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })));
    }
}
