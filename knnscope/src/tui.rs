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

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::warn;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, List, ListItem, Paragraph, Row,
        Table as TableWidget,
    },
};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::data::Table;
use crate::errors::DashboardError;
use crate::evaluation::{EvalConfig, FeatureScore, KScore, predict, score_features, sweep_k};
use crate::progress::ProgressObserver;

pub struct Controls;

impl Controls {
    fn render(f: &mut Frame, area: Rect) {
        let items = vec![ListItem::new("q: Quit")];
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Controls"))
            .style(Style::default().fg(Color::White));
        f.render_widget(list, area);
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Phase {
    Idle,
    Scoring,
    Sweeping,
    Predicting,
    Done,
}

/// What the dashboard runs, in order: feature scoring, the k sweep, then prediction.
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub label: String,
    pub features: Vec<String>,
    pub config: EvalConfig,
    pub sweep_features: Vec<String>,
    pub k_max: usize,
    pub predict_features: Vec<String>,
    pub predict_k: usize,
    pub queries: Vec<Vec<f64>>,
}

/// Snapshot of everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct Dashboard {
    phase: Phase,
    fraction: f64,
    label: String,
    feature_scores: Vec<FeatureScore>,
    k_scores: Vec<KScore>,
    predictions: Vec<(Vec<f64>, String)>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard {
            phase: Phase::Idle,
            fraction: 0.0,
            label: String::new(),
            feature_scores: Vec::new(),
            k_scores: Vec::new(),
            predictions: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn feature_scores(&self) -> &[FeatureScore] {
        &self.feature_scores
    }

    pub fn k_scores(&self) -> &[KScore] {
        &self.k_scores
    }

    pub fn predictions(&self) -> &[(Vec<f64>, String)] {
        &self.predictions
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_progress(&mut self, fraction: f64, label: &str) {
        self.fraction = fraction.clamp(0.0, 1.0);
        self.label = label.to_string();
    }

    pub fn set_feature_scores(&mut self, scores: Vec<FeatureScore>) {
        self.feature_scores = scores;
    }

    pub fn set_k_scores(&mut self, scores: Vec<KScore>) {
        self.k_scores = scores;
    }

    pub fn set_predictions(&mut self, queries: &[Vec<f64>], labels: Vec<String>) {
        self.predictions = queries.iter().cloned().zip(labels).collect();
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(f.area());

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Controls
                Constraint::Length(3), // Progress
                Constraint::Min(6),    // Feature scores
                Constraint::Length(8), // Predictions
            ])
            .split(chunks[0]);

        Controls::render(f, left_chunks[0]);
        self.render_progress(f, left_chunks[1]);
        self.render_scores(f, left_chunks[2]);
        self.render_predictions(f, left_chunks[3]);
        self.render_sweep(f, chunks[1]);
    }

    fn render_progress(&self, f: &mut Frame, area: Rect) {
        let title = match self.phase {
            Phase::Idle => "Idle",
            Phase::Scoring => "Scoring features",
            Phase::Sweeping => "Sweeping k",
            Phase::Predicting => "Predicting",
            Phase::Done => "Done",
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(Color::Green))
            .label(self.label.clone())
            .ratio(self.fraction);
        f.render_widget(gauge, area);
    }

    fn render_scores(&self, f: &mut Frame, area: Rect) {
        let header = Row::new(vec!["Feature", "Accuracy", "Precision", "Recall", "F1"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .feature_scores
            .iter()
            .map(|s| {
                Row::new(vec![
                    s.feature.clone(),
                    format!("{:.2}", s.accuracy),
                    format!("{:.4}", s.precision),
                    format!("{:.4}", s.recall),
                    format!("{:.4}", s.f1),
                ])
            })
            .collect();
        let widths = [
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
        ];
        let table = TableWidget::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Feature scores"))
            .style(Style::default().fg(Color::White));
        f.render_widget(table, area);
    }

    fn render_predictions(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .predictions
            .iter()
            .map(|(query, label)| {
                let values: Vec<String> = query.iter().map(|v| format!("{:.2}", v)).collect();
                ListItem::new(format!("[{}] -> {}", values.join(", "), label))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Predictions"))
            .style(Style::default().fg(Color::White));
        f.render_widget(list, area);
    }

    fn render_sweep(&self, f: &mut Frame, area: Rect) {
        if self.k_scores.is_empty() {
            let placeholder = Paragraph::new(Line::from("No sweep yet"))
                .block(Block::default().borders(Borders::ALL).title("Accuracy by k"));
            f.render_widget(placeholder, area);
            return;
        }

        let train: Vec<(f64, f64)> =
            self.k_scores.iter().map(|s| (s.k as f64, s.train_accuracy)).collect();
        let test: Vec<(f64, f64)> =
            self.k_scores.iter().map(|s| (s.k as f64, s.test_accuracy)).collect();
        let k_max = self.k_scores.iter().map(|s| s.k).max().unwrap_or(1) as f64;

        let datasets = vec![
            Dataset::default()
                .name("Train")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&train),
            Dataset::default()
                .name("Test")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&test),
        ];

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title("Accuracy by k"))
            .x_axis(
                Axis::default()
                    .title("k")
                    .style(Style::default().fg(Color::White))
                    .bounds([1.0, k_max.max(2.0)])
                    .labels(vec!["1".to_string(), format!("{}", k_max)]),
            )
            .y_axis(
                Axis::default()
                    .title("Accuracy")
                    .style(Style::default().fg(Color::White))
                    .bounds([0.0, 1.0])
                    .labels(vec!["0.0", "0.5", "1.0"]),
            );
        f.render_widget(chart, area);
    }
}

/// Progress observer that redraws the dashboard on every update.
pub struct DashboardProgress<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    dashboard: &'a mut Dashboard,
}

impl<'a, B: Backend> DashboardProgress<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, dashboard: &'a mut Dashboard) -> Self {
        DashboardProgress { terminal, dashboard }
    }
}

impl<B: Backend> ProgressObserver for DashboardProgress<'_, B> {
    fn on_progress(&mut self, fraction: f64, label: &str) {
        self.dashboard.set_progress(fraction, label);
        let dashboard = &*self.dashboard;
        if let Err(err) = self.terminal.draw(|f| dashboard.render(f)) {
            warn!("Failed to redraw dashboard: {}", err);
        }
    }
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, dashboard: &Dashboard) -> io::Result<()> {
    terminal.draw(|f| dashboard.render(f))?;
    Ok(())
}

/// Runs the three routines against `table`, drawing after every step.
///
/// Works with any backend, so it can be driven headless.
pub fn run_request<B: Backend>(
    terminal: &mut Terminal<B>,
    table: &Table,
    request: &DashboardRequest,
) -> Result<Dashboard, DashboardError> {
    let mut dashboard = Dashboard::new();

    dashboard.set_phase(Phase::Scoring);
    let scores = {
        let mut observer = DashboardProgress::new(terminal, &mut dashboard);
        score_features(table, &request.features, &request.label, &request.config, &mut observer)?
    };
    dashboard.set_feature_scores(scores);

    dashboard.set_phase(Phase::Sweeping);
    dashboard.set_progress(0.0, "Sweeping k...");
    draw(terminal, &dashboard)?;
    let k_scores =
        sweep_k(table, &request.sweep_features, &request.label, request.k_max, &request.config)?;
    dashboard.set_k_scores(k_scores);

    dashboard.set_phase(Phase::Predicting);
    dashboard.set_progress(0.0, "Predicting...");
    draw(terminal, &dashboard)?;
    let labels = predict(
        table,
        &request.predict_features,
        &request.label,
        request.predict_k,
        &request.queries,
    )?;
    dashboard.set_predictions(&request.queries, labels);

    dashboard.set_phase(Phase::Done);
    dashboard.set_progress(1.0, "Done");
    draw(terminal, &dashboard)?;
    Ok(dashboard)
}

fn wait_for_quit(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    dashboard: &Dashboard,
) -> io::Result<()> {
    loop {
        draw(terminal, dashboard)?;
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}

/// Runs `body`, then `restore`, whatever `body` returned.
///
/// An error from `body` wins over one from `restore`.
fn run_restoring<T, E, B, R>(body: B, restore: R) -> Result<T, E>
where
    E: From<io::Error>,
    B: FnOnce() -> Result<T, E>,
    R: FnOnce() -> io::Result<()>,
{
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

/// Runs `request` in a full-screen terminal dashboard and waits for `q`.
///
/// The terminal is restored before any error is returned.
pub fn run_dashboard(
    table: &Table,
    request: &DashboardRequest,
) -> Result<Dashboard, DashboardError> {
    enable_raw_mode()?;
    run_restoring(
        || -> Result<Dashboard, DashboardError> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            let dashboard = run_request(&mut terminal, table, request)?;
            wait_for_quit(&mut terminal, &dashboard)?;
            Ok(dashboard)
        },
        || {
            disable_raw_mode()?;
            let mut stdout = io::stdout();
            execute!(stdout, LeaveAlternateScreen, Show)
        },
    )
}
