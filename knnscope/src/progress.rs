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

use log::info;

/// Receives progress updates from long-running routines.
///
/// Updates are delivered synchronously on the calling thread, with `fraction`
/// in `[0, 1]` and a short human-readable `label` for the current phase.
pub trait ProgressObserver {
    fn on_progress(&mut self, fraction: f64, label: &str);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _fraction: f64, _label: &str) {}
}

/// Forwards updates to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, fraction: f64, label: &str) {
        info!("[{:>5.1}%] {}", fraction * 100.0, label);
    }
}

impl<F> ProgressObserver for F
where
    F: FnMut(f64, &str),
{
    fn on_progress(&mut self, fraction: f64, label: &str) {
        self(fraction, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(observer: &mut dyn ProgressObserver) {
        observer.on_progress(0.0, "start");
        observer.on_progress(1.0, "done");
    }

    #[test]
    fn test_closure_observer_records_updates() {
        let mut seen: Vec<(f64, String)> = Vec::new();
        let mut observer = |fraction: f64, label: &str| seen.push((fraction, label.to_string()));
        drive(&mut observer);
        assert_eq!(seen, vec![(0.0, "start".to_string()), (1.0, "done".to_string())]);
    }

    #[test]
    fn test_builtin_observers_accept_updates() {
        let _ = env_logger::builder().is_test(true).try_init();
        drive(&mut NoProgress);
        drive(&mut LogProgress);
    }
}
