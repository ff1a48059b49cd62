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

//! Exploratory k-nearest-neighbors evaluation for labelled tabular data.
//!
//! Three routines sit on top of a small k-NN stack:
//! - [`score_features`] ranks each feature by how well it classifies on its own,
//! - [`sweep_k`] reports train/test accuracy for `k = 1..=k_max`,
//! - [`predict`] labels new rows with a classifier fitted on the whole table.

pub mod algorithms;
pub mod data;
pub mod errors;
pub mod evaluation;
pub mod metrics;
pub mod progress;
pub mod scalers;
#[cfg(feature = "tui")]
pub mod tui;

pub use ndarray;

pub use data::{Column, LabelEncoding, StratifiedSplit, Table};
pub use errors::{ErrorCategory, EvalError};
pub use evaluation::{
    EvalConfig, FeatureScore, KScore, KeyMetric, composite_score, predict, score_features, sweep_k,
};
pub use metrics::Average;
pub use progress::{LogProgress, NoProgress, ProgressObserver};
