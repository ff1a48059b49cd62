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

//! Evaluation routines built on the k-NN classifier.
//!
//! Each routine is a single-shot computation over a [`Table`]: it validates the
//! requested columns, splits and scales locally, and returns a result table.

use std::str::FromStr;

use log::{debug, info, warn};
use ndarray::Array2;

use crate::algorithms::KNN;
use crate::data::split::Partitions;
use crate::data::{LabelEncoding, StratifiedSplit, Table};
use crate::errors::{EvalError, MetricError, ModelError};
use crate::metrics::{Average, accuracy, precision_recall_fscore};
use crate::progress::ProgressObserver;
use crate::scalers::{Scaler, StandardScaler};

/// Parameters shared by the evaluation routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalConfig {
    k: usize,
    average: Average,
    split: StratifiedSplit,
    standardize: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            k: 6,
            average: Average::Weighted,
            split: StratifiedSplit::default(),
            standardize: true,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for [`composite_score`]: 80% of the rows train, the rest test.
    pub fn composite() -> Self {
        Self::default().with_train_size(0.8)
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_average(mut self, average: Average) -> Self {
        self.average = average;
        self
    }

    pub fn with_train_size(mut self, train_size: f64) -> Self {
        self.split = self.split.with_train_size(train_size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split = self.split.with_seed(seed);
        self
    }

    /// Whether [`sweep_k`] fits on standardized partitions (`true`) or on the
    /// raw ones (`false`, the legacy behaviour).
    pub fn with_standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn average(&self) -> Average {
        self.average
    }

    pub fn split(&self) -> StratifiedSplit {
        self.split
    }

    pub fn standardize(&self) -> bool {
        self.standardize
    }
}

/// Classification quality of a single feature on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScore {
    pub feature: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Train and test accuracy for one neighbour count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KScore {
    pub k: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

fn prepare<S: AsRef<str>>(
    table: &Table,
    features: &[S],
    label: &str,
) -> Result<(Array2<f64>, LabelEncoding), EvalError> {
    table.require_columns(&[label])?;
    table.require_columns(features)?;
    let x = table.features(features)?;
    let labels = table.labels(label)?;
    Ok((x, labels))
}

fn scale_partitions(parts: &Partitions) -> Result<(Array2<f64>, Array2<f64>), EvalError> {
    let mut scaler = StandardScaler::new();
    let x_train = scaler.fit_transform(&parts.x_train)?;
    let x_test = scaler.transform(&parts.x_test)?;
    Ok((x_train, x_test))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores every feature on its own and ranks them by accuracy.
///
/// For each feature the table is split with `config.split`, the feature is
/// standardized with statistics from the training partition, and a k-NN
/// classifier with `config.k` neighbours is evaluated on the test partition.
/// Accuracy is rounded to two decimals; the result is sorted by it in
/// descending order, features with equal accuracy keeping their input order.
///
/// `observer` receives `i / n` before feature `i` is processed and `1.0` once
/// all are done.
///
/// # Errors
/// - Schema errors when `label` or one of `features` is missing.
/// - `MetricError::IncompatibleAverage` when `config.average` does not fit the
///   number of classes; this is checked before any feature is processed.
/// - Split errors when a class is too small to stratify.
/// - `ModelError::InvalidK` when `config.k` exceeds the training partition.
pub fn score_features<S: AsRef<str>>(
    table: &Table,
    features: &[S],
    label: &str,
    config: &EvalConfig,
    observer: &mut dyn ProgressObserver,
) -> Result<Vec<FeatureScore>, EvalError> {
    table.require_columns(&[label])?;
    table.require_columns(features)?;
    let labels = table.labels(label)?;
    config.average.check(labels.n_classes())?;

    info!(
        "Scoring {} feature(s) against '{}' with k={}, average={}",
        features.len(),
        label,
        config.k,
        config.average
    );

    let n = features.len();
    let mut scores = Vec::with_capacity(n);
    for (index, feature) in features.iter().enumerate() {
        let fraction = index as f64 / n as f64;
        observer.on_progress(fraction, &format!("Computing data... {:.1}%", fraction * 100.0));

        let feature = feature.as_ref();
        let x = table.features(&[feature])?;
        let parts = config.split.split(&x, &labels)?;
        let (x_train, x_test) = scale_partitions(&parts)?;

        let mut knn = KNN::new().k(config.k).normalize(false).build();
        knn.fit(&x_train, &parts.y_train)?;
        let y_pred = knn.predict(&x_test)?;

        let acc = round2(accuracy(&parts.y_test, &y_pred)?);
        let prf =
            precision_recall_fscore(&parts.y_test, &y_pred, labels.n_classes(), config.average)?;
        debug!(
            "{}: accuracy={:.2} precision={:.4} recall={:.4} f1={:.4}",
            feature, acc, prf.precision, prf.recall, prf.f1
        );

        scores.push(FeatureScore {
            feature: feature.to_string(),
            accuracy: acc,
            precision: prf.precision,
            recall: prf.recall,
            f1: prf.f1,
        });
    }

    scores.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    observer.on_progress(1.0, "Computing data... 100.0%");
    if let Some(best) = scores.first() {
        info!("Best single feature: {} (accuracy {:.2})", best.feature, best.accuracy);
    }
    Ok(scores)
}

/// Train and test accuracy for every `k` in `1..=k_max` on one split.
///
/// All `features` are used jointly. With `config.standardize` the classifier
/// is fitted on partitions scaled with training statistics; without it the
/// raw partitions are used.
///
/// # Errors
/// - `EvalError::InvalidKMax` when `k_max` is zero.
/// - Schema and split errors as for [`score_features`].
/// - `ModelError::InvalidK` when `k_max` exceeds the training partition.
pub fn sweep_k<S: AsRef<str>>(
    table: &Table,
    features: &[S],
    label: &str,
    k_max: usize,
    config: &EvalConfig,
) -> Result<Vec<KScore>, EvalError> {
    if k_max == 0 {
        return Err(EvalError::InvalidKMax);
    }
    let (x, labels) = prepare(table, features, label)?;
    let parts = config.split.split(&x, &labels)?;

    let (x_train, x_test) = if config.standardize {
        scale_partitions(&parts)?
    } else {
        warn!("Sweeping k on unscaled features");
        (parts.x_train.clone(), parts.x_test.clone())
    };

    info!("Sweeping k=1..={} over {} feature(s) against '{}'", k_max, features.len(), label);
    let mut results = Vec::with_capacity(k_max);
    for k in 1..=k_max {
        let mut knn = KNN::new().k(k).normalize(false).build();
        knn.fit(&x_train, &parts.y_train)?;
        let train_accuracy = knn.score(&x_train, &parts.y_train)?;
        let test_accuracy = knn.score(&x_test, &parts.y_test)?;
        debug!("k={}: train={:.4} test={:.4}", k, train_accuracy, test_accuracy);
        results.push(KScore { k, train_accuracy, test_accuracy });
    }
    info!("Sweep finished for {} value(s) of k", results.len());
    Ok(results)
}

/// Fits on the whole table and predicts a class name for every query row.
///
/// The scaler is fitted on all rows of the chosen features and applied to the
/// queries; no split is made.
///
/// # Errors
/// - Schema errors when a column is missing.
/// - `EvalError::QueryDimension` when a query does not have one value per feature.
/// - `ModelError::InvalidK` when `k` is zero or exceeds the number of rows.
pub fn predict<S: AsRef<str>>(
    table: &Table,
    features: &[S],
    label: &str,
    k: usize,
    queries: &[Vec<f64>],
) -> Result<Vec<String>, EvalError> {
    let (x, labels) = prepare(table, features, label)?;

    for (index, query) in queries.iter().enumerate() {
        if query.len() != features.len() {
            return Err(EvalError::QueryDimension {
                index,
                expected: features.len(),
                actual: query.len(),
            });
        }
    }
    if queries.is_empty() {
        return Ok(Vec::new());
    }

    let mut knn = KNN::new().k(k).normalize(true).build();
    knn.fit(&x, labels.codes())?;

    let x_query = Array2::from_shape_fn((queries.len(), features.len()), |(i, j)| queries[i][j]);
    let codes = knn.predict(&x_query)?;

    info!("Predicted {} row(s) with k={}", codes.len(), k);
    codes
        .iter()
        .map(|&code| {
            labels
                .class_name(code)
                .map(str::to_string)
                .ok_or_else(|| {
                    let n_classes = labels.n_classes();
                    EvalError::from(ModelError::UnknownClass { code, n_classes })
                })
        })
        .collect()
}

/// Which metric dominates [`composite_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMetric {
    Precision,
    Recall,
    Balanced,
}

impl KeyMetric {
    /// `(precision, recall)` weights; accuracy always weighs 0.2.
    fn weights(&self) -> (f64, f64) {
        match self {
            KeyMetric::Precision => (0.5, 0.3),
            KeyMetric::Recall => (0.3, 0.5),
            KeyMetric::Balanced => (0.4, 0.4),
        }
    }
}

impl FromStr for KeyMetric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prec" => Ok(KeyMetric::Precision),
            "recall" => Ok(KeyMetric::Recall),
            "none" => Ok(KeyMetric::Balanced),
            other => Err(MetricError::UnknownKeyMetric(other.to_string())),
        }
    }
}

/// Weighted blend of accuracy, precision and recall for a feature set.
///
/// Uses one split of all `features` jointly, standardized with training
/// statistics, and `config.k` neighbours. The score is
/// `0.2 * accuracy + w_p * precision + w_r * recall`, with `(w_p, w_r)` picked
/// by `key`. [`EvalConfig::composite`] gives the usual 80/20 train/test split;
/// the plain defaults train on 20% of the rows like the other routines.
pub fn composite_score<S: AsRef<str>>(
    table: &Table,
    features: &[S],
    label: &str,
    config: &EvalConfig,
    key: KeyMetric,
) -> Result<f64, EvalError> {
    let (x, labels) = prepare(table, features, label)?;
    config.average.check(labels.n_classes())?;
    let parts = config.split.split(&x, &labels)?;
    let (x_train, x_test) = scale_partitions(&parts)?;

    let mut knn = KNN::new().k(config.k).normalize(false).build();
    knn.fit(&x_train, &parts.y_train)?;
    let y_pred = knn.predict(&x_test)?;

    let acc = accuracy(&parts.y_test, &y_pred)?;
    let prf = precision_recall_fscore(&parts.y_test, &y_pred, labels.n_classes(), config.average)?;
    let (w_precision, w_recall) = key.weights();
    Ok(0.2 * acc + w_precision * prf.precision + w_recall * prf.recall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::errors::{DataError, ErrorCategory, SplitError};
    use crate::progress::NoProgress;
    use ndarray::Array1;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn init_logger() {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    }

    #[cfg(feature = "iris")]
    fn iris() -> Table {
        crate::data::load_iris().unwrap()
    }

    /// Three well separated classes of 20 distinct points each.
    fn blobs() -> Table {
        let mut a = Vec::new();
        let mut b = Vec::new();
        let mut c = Vec::new();
        let mut label = Vec::new();
        for class in 0..3 {
            for i in 0..20 {
                let offset = class as f64 * 10.0;
                a.push(offset + (i % 5) as f64 * 0.37 + i as f64 * 0.011);
                b.push(offset * 2.0 + (i / 5) as f64 * 0.53 + i as f64 * 0.007);
                c.push(((i * 7 + class * 3) % 11) as f64);
                label.push(format!("c{}", class));
            }
        }
        Table::from_columns(vec![
            ("a", Column::Numeric(Array1::from_vec(a))),
            ("b", Column::Numeric(Array1::from_vec(b))),
            ("noise", Column::Numeric(Array1::from_vec(c))),
            ("label", Column::Categorical(label)),
        ])
        .unwrap()
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_score_features_on_iris() {
        init_logger();
        let table = iris();
        let features = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
        let mut updates: Vec<f64> = Vec::new();
        let mut observer = |fraction: f64, _label: &str| updates.push(fraction);

        let scores =
            score_features(&table, &features, "species", &EvalConfig::default(), &mut observer)
                .unwrap();

        assert_eq!(scores.len(), 4);
        for pair in scores.windows(2) {
            assert!(pair[0].accuracy >= pair[1].accuracy);
        }
        for score in &scores {
            assert!((0.0..=1.0).contains(&score.accuracy));
            assert!((0.0..=1.0).contains(&score.precision));
            assert!((0.0..=1.0).contains(&score.recall));
            assert!((0.0..=1.0).contains(&score.f1));
        }
        assert!(scores[0].feature.starts_with("petal"), "best feature: {}", scores[0].feature);
        assert_eq!(updates, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_score_features_is_reproducible() {
        let table = iris();
        let features = ["petal_length", "sepal_length"];
        let config = EvalConfig::default().with_average(Average::Macro);
        let run = || score_features(&table, &features, "species", &config, &mut NoProgress);
        let first = run().unwrap();
        let second = run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_score_features_rejects_binary_average_for_three_classes() {
        let table = iris();
        let config = EvalConfig::default().with_average(Average::Binary);
        let mut calls = 0;
        let result = score_features(
            &table,
            &["petal_length"],
            "species",
            &config,
            &mut |_: f64, _: &str| calls += 1,
        );
        assert!(matches!(
            result,
            Err(EvalError::Metric(MetricError::IncompatibleAverage { n_classes: 3, .. }))
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_score_features_with_empty_feature_list() {
        let table = blobs();
        let features: [&str; 0] = [];
        let scores = score_features(
            &table,
            &features,
            "label",
            &EvalConfig::default(),
            &mut NoProgress,
        )
        .unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_score_features_ranks_informative_features_first() {
        let table = blobs();
        let config = EvalConfig::default().with_k(3).with_train_size(0.5);
        let scores = score_features(
            &table,
            &["noise", "a", "b"],
            "label",
            &config,
            &mut NoProgress,
        )
        .unwrap();
        assert_eq!(scores[0].feature, "a");
        assert_eq!(scores[1].feature, "b");
        assert_eq!(scores[2].feature, "noise");
        assert_eq!(scores[0].accuracy, 1.0);
    }

    #[test]
    fn test_sweep_k_returns_every_k_in_order() {
        init_logger();
        let table = blobs();
        let results =
            sweep_k(&table, &["a", "b"], "label", 10, &EvalConfig::default().with_train_size(0.5))
                .unwrap();

        assert_eq!(results.len(), 10);
        for (i, row) in results.iter().enumerate() {
            assert_eq!(row.k, i + 1);
            assert!((0.0..=1.0).contains(&row.train_accuracy));
            assert!((0.0..=1.0).contains(&row.test_accuracy));
        }
        assert_eq!(results[0].train_accuracy, 1.0);
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_sweep_k_on_iris_two_features() {
        let table = iris();
        let results = sweep_k(
            &table,
            &["sepal_length", "petal_length"],
            "species",
            10,
            &EvalConfig::default(),
        )
        .unwrap();
        assert_eq!(results.iter().map(|r| r.k).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
    }

    /// `blobs` plus a `wide` column of uniform noise in `[0, 100000)`.
    fn blobs_with_wide_noise() -> Table {
        let table = blobs();
        let mut rng = StdRng::seed_from_u64(7);
        let wide: Array1<f64> =
            (0..table.n_rows()).map(|_| rng.gen_range(0.0..100_000.0)).collect();
        let mut columns: Vec<(String, Column)> = table
            .column_names()
            .iter()
            .map(|name| (name.clone(), table.column(name).unwrap().clone()))
            .collect();
        columns.push(("wide".to_string(), Column::Numeric(wide)));
        Table::from_columns(columns).unwrap()
    }

    #[test]
    fn test_sweep_k_legacy_mode_fits_raw_features() {
        let table = blobs_with_wide_noise();
        let scaled = EvalConfig::default().with_train_size(0.5);
        let legacy = scaled.with_standardize(false);
        let with_scaling = sweep_k(&table, &["a", "wide"], "label", 5, &scaled).unwrap();
        let without = sweep_k(&table, &["a", "wide"], "label", 5, &legacy).unwrap();

        assert_eq!(with_scaling.len(), without.len());
        assert_eq!(without[0].train_accuracy, 1.0);

        // Unscaled, the noise column dominates every distance.
        let mean_test = |rows: &[KScore]| {
            rows.iter().map(|r| r.test_accuracy).sum::<f64>() / rows.len() as f64
        };
        let scaled_test = mean_test(&with_scaling);
        let legacy_test = mean_test(&without);
        assert_ne!(
            with_scaling.iter().map(|r| r.test_accuracy).collect::<Vec<_>>(),
            without.iter().map(|r| r.test_accuracy).collect::<Vec<_>>()
        );
        assert!(
            legacy_test + 0.2 < scaled_test,
            "legacy {} vs scaled {}",
            legacy_test,
            scaled_test
        );
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_sweep_k_is_reproducible() {
        let table = iris();
        let config = EvalConfig::default();
        let first = sweep_k(&table, &["petal_width"], "species", 8, &config).unwrap();
        let second = sweep_k(&table, &["petal_width"], "species", 8, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sweep_k_errors() {
        let table = blobs();
        let config = EvalConfig::default();
        assert!(matches!(
            sweep_k(&table, &["a"], "label", 0, &config),
            Err(EvalError::InvalidKMax)
        ));
        // 20% of 60 rows leaves 12 training rows.
        let err = sweep_k(&table, &["a"], "label", 13, &config).unwrap_err();
        assert!(matches!(err, EvalError::Model(ModelError::InvalidK { k: 13, n_samples: 12 })));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_predict_returns_known_labels() {
        let table = iris();
        let queries = vec![vec![1.4, 0.2], vec![4.5, 1.5], vec![6.0, 2.3]];
        let predictions =
            predict(&table, &["petal_length", "petal_width"], "species", 5, &queries).unwrap();
        assert_eq!(predictions, vec!["setosa", "versicolor", "virginica"]);
    }

    #[test]
    fn test_predict_single_feature() {
        let table = blobs();
        let predictions = predict(&table, &["a"], "label", 3, &[vec![0.5], vec![21.0]]).unwrap();
        assert_eq!(predictions, vec!["c0", "c2"]);
    }

    #[test]
    fn test_predict_query_dimension_mismatch() {
        let table = blobs();
        let result = predict(&table, &["a", "b"], "label", 3, &[vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(EvalError::QueryDimension { index: 1, expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_missing_columns_are_schema_errors_everywhere() {
        let table = blobs();
        let config = EvalConfig::default();

        let scored =
            score_features(&table, &["a", "zzz"], "label", &config, &mut NoProgress).unwrap_err();
        let swept = sweep_k(&table, &["a"], "species", 3, &config).unwrap_err();
        let predicted = predict(&table, &["zzz"], "label", 3, &[vec![1.0]]).unwrap_err();
        let composite =
            composite_score(&table, &["a"], "nope", &config, KeyMetric::Balanced).unwrap_err();

        for err in [&scored, &swept, &predicted, &composite] {
            assert_eq!(err.category(), ErrorCategory::Schema, "{}", err);
        }
        assert!(matches!(scored, EvalError::Data(DataError::ColumnNotFound(ref n)) if n == "zzz"));
        assert!(
            matches!(swept, EvalError::Data(DataError::ColumnNotFound(ref n)) if n == "species")
        );
    }

    #[test]
    fn test_small_class_is_a_data_sufficiency_error() {
        let table = Table::from_columns(vec![
            ("x", Column::Numeric(Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 9.0]))),
            (
                "y",
                Column::Categorical(
                    ["a", "a", "a", "b", "b", "c"].iter().map(|s| s.to_string()).collect(),
                ),
            ),
        ])
        .unwrap();
        let err = sweep_k(&table, &["x"], "y", 1, &EvalConfig::default()).unwrap_err();
        assert!(matches!(err, EvalError::Split(SplitError::InsufficientClassMembers { .. })));
        assert_eq!(err.category(), ErrorCategory::DataSufficiency);
    }

    #[test]
    fn test_key_metric_weights() {
        assert_eq!(KeyMetric::Precision.weights(), (0.5, 0.3));
        assert_eq!(KeyMetric::Recall.weights(), (0.3, 0.5));
        assert_eq!(KeyMetric::Balanced.weights(), (0.4, 0.4));
    }

    #[test]
    #[cfg(feature = "iris")]
    fn test_composite_score_blends_metrics() {
        let table = iris();
        let features = ["sepal_width"];
        let config = EvalConfig::composite();

        // Same pipeline, assembled by hand.
        let x = table.features(&features).unwrap();
        let labels = table.labels("species").unwrap();
        let parts = config.split().split(&x, &labels).unwrap();
        let mut scaler = StandardScaler::new();
        let x_train = scaler.fit_transform(&parts.x_train).unwrap();
        let x_test = scaler.transform(&parts.x_test).unwrap();
        let mut knn = KNN::new().k(config.k()).normalize(false).build();
        knn.fit(&x_train, &parts.y_train).unwrap();
        let y_pred = knn.predict(&x_test).unwrap();
        let acc = accuracy(&parts.y_test, &y_pred).unwrap();
        let prf = precision_recall_fscore(&parts.y_test, &y_pred, 3, Average::Weighted).unwrap();
        assert!((prf.precision - prf.recall).abs() > 1e-6);

        let expected = [
            (KeyMetric::Precision, 0.2 * acc + 0.5 * prf.precision + 0.3 * prf.recall),
            (KeyMetric::Recall, 0.2 * acc + 0.3 * prf.precision + 0.5 * prf.recall),
            (KeyMetric::Balanced, 0.2 * acc + 0.4 * prf.precision + 0.4 * prf.recall),
        ];
        for (key, want) in expected {
            let score = composite_score(&table, &features, "species", &config, key).unwrap();
            assert!((score - want).abs() < 1e-12, "{:?}: {} != {}", key, score, want);
        }
    }

    #[test]
    fn test_composite_config_trains_on_most_rows() {
        let table = blobs();
        let config = EvalConfig::composite();
        assert_eq!(config.split().train_size(), 0.8);
        assert_eq!(config.average(), Average::Weighted);

        // 80% of 60 rows: k may use all 48 training rows but not more.
        let score =
            composite_score(&table, &["a"], "label", &config.with_k(48), KeyMetric::Balanced);
        assert!(score.is_ok());
        let err = composite_score(&table, &["a"], "label", &config.with_k(49), KeyMetric::Balanced)
            .unwrap_err();
        assert!(matches!(err, EvalError::Model(ModelError::InvalidK { k: 49, n_samples: 48 })));
    }

    #[test]
    fn test_key_metric_parsing() {
        assert_eq!("prec".parse::<KeyMetric>().unwrap(), KeyMetric::Precision);
        assert_eq!("none".parse::<KeyMetric>().unwrap(), KeyMetric::Balanced);
        assert!(matches!("str".parse::<KeyMetric>(), Err(MetricError::UnknownKeyMetric(_))));
    }
}
