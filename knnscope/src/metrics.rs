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

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};

use crate::errors::MetricError;

/// How per-class precision, recall and F1 are combined into one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Average {
    /// Report only the positive class (code 1). Valid for at most two classes.
    Binary,
    /// Pool true/false positives and false negatives over all classes.
    Micro,
    /// Unweighted mean over classes.
    Macro,
    /// Mean over classes weighted by their true support.
    Weighted,
}

impl Average {
    pub fn as_str(&self) -> &'static str {
        match self {
            Average::Binary => "binary",
            Average::Micro => "micro",
            Average::Macro => "macro",
            Average::Weighted => "weighted",
        }
    }

    /// Checks that this mode can be used with `n_classes` distinct labels.
    pub fn check(&self, n_classes: usize) -> Result<(), MetricError> {
        if *self == Average::Binary && n_classes > 2 {
            return Err(MetricError::IncompatibleAverage { average: self.as_str(), n_classes });
        }
        Ok(())
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Average {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(Average::Binary),
            "micro" => Ok(Average::Micro),
            "macro" => Ok(Average::Macro),
            "weighted" => Ok(Average::Weighted),
            other => Err(MetricError::UnknownAverage(other.to_string())),
        }
    }
}

/// Averaged precision, recall and F1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionRecallF1 {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Counts of `(true class, predicted class)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    matrix: Array2<usize>,
}

impl ConfusionMatrix {
    pub fn new(
        y_true: &Array1<usize>,
        y_pred: &Array1<usize>,
        n_classes: usize,
    ) -> Result<Self, MetricError> {
        check_lengths(y_true, y_pred)?;
        let size = y_true.iter().chain(y_pred.iter()).map(|&c| c + 1).max().unwrap_or(0);
        let size = size.max(n_classes);
        let mut matrix = Array2::zeros((size, size));
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            matrix[[t, p]] += 1;
        }
        Ok(ConfusionMatrix { matrix })
    }

    pub fn n_classes(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn get(&self, true_class: usize, predicted: usize) -> usize {
        self.matrix[[true_class, predicted]]
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.matrix[[class, class]]
    }

    /// Rows whose true class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.matrix.row(class).sum()
    }

    /// Rows predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        self.matrix.column(class).sum()
    }

    /// Whether `class` occurs among the true or the predicted labels.
    pub fn is_present(&self, class: usize) -> bool {
        self.support(class) > 0 || self.predicted(class) > 0
    }

    pub fn precision(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.predicted(class))
    }

    pub fn recall(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.support(class))
    }

    pub fn f1(&self, class: usize) -> f64 {
        harmonic_mean(self.precision(class), self.recall(class))
    }
}

fn check_lengths(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<(), MetricError> {
    if y_true.is_empty() || y_pred.is_empty() {
        return Err(MetricError::EmptyInput);
    }
    if y_true.len() != y_pred.len() {
        return Err(MetricError::LengthMismatch { expected: y_true.len(), actual: y_pred.len() });
    }
    Ok(())
}

// Ill-defined ratios (nothing predicted, nothing to recall) count as zero.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 { 0.0 } else { numerator as f64 / denominator as f64 }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 { 0.0 } else { 2.0 * precision * recall / (precision + recall) }
}

pub fn accuracy(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<f64, MetricError> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred.iter()).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Precision, recall and F1 of `y_pred` against `y_true` under `average`.
///
/// `n_classes` is the number of classes known to the label encoding; it is
/// only used to validate `average`. Macro and weighted averages run over the
/// classes that occur in either label vector.
pub fn precision_recall_fscore(
    y_true: &Array1<usize>,
    y_pred: &Array1<usize>,
    n_classes: usize,
    average: Average,
) -> Result<PrecisionRecallF1, MetricError> {
    average.check(n_classes)?;
    let cm = ConfusionMatrix::new(y_true, y_pred, n_classes)?;
    let present: Vec<usize> = (0..cm.n_classes()).filter(|&c| cm.is_present(c)).collect();

    let scores = match average {
        Average::Binary => {
            let positive = 1;
            if positive < cm.n_classes() {
                PrecisionRecallF1 {
                    precision: cm.precision(positive),
                    recall: cm.recall(positive),
                    f1: cm.f1(positive),
                }
            } else {
                PrecisionRecallF1 { precision: 0.0, recall: 0.0, f1: 0.0 }
            }
        }
        Average::Micro => {
            let tp: usize = present.iter().map(|&c| cm.true_positives(c)).sum();
            let predicted: usize = present.iter().map(|&c| cm.predicted(c)).sum();
            let support: usize = present.iter().map(|&c| cm.support(c)).sum();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            PrecisionRecallF1 { precision, recall, f1: harmonic_mean(precision, recall) }
        }
        Average::Macro => {
            let n = present.len() as f64;
            PrecisionRecallF1 {
                precision: present.iter().map(|&c| cm.precision(c)).sum::<f64>() / n,
                recall: present.iter().map(|&c| cm.recall(c)).sum::<f64>() / n,
                f1: present.iter().map(|&c| cm.f1(c)).sum::<f64>() / n,
            }
        }
        Average::Weighted => {
            let total: usize = present.iter().map(|&c| cm.support(c)).sum();
            let weighted = |metric: &dyn Fn(usize) -> f64| {
                if total == 0 {
                    return 0.0;
                }
                present.iter().map(|&c| metric(c) * cm.support(c) as f64).sum::<f64>()
                    / total as f64
            };
            PrecisionRecallF1 {
                precision: weighted(&|c| cm.precision(c)),
                recall: weighted(&|c| cm.recall(c)),
                f1: weighted(&|c| cm.f1(c)),
            }
        }
    };
    Ok(scores)
}
