//! Terminal dashboard for a persisted prediction.
//!
//! Reads the two artifacts of one event and renders the ranked table, the
//! predicted podium, the model error, a bar chart of predicted times, the
//! sector comparison, qualifying-vs-predicted deltas and the position delta
//! between qualifying rank and predicted rank. Nothing here writes files.

use crate::artifacts::{read_mae, read_predictions};
use crate::export::ExportError;
use crate::report::PredictionRow;
use std::fmt;
use std::path::{Path, PathBuf};

const BAR_WIDTH: usize = 40;
const PODIUM_LABELS: [&str; 3] = ["1st", "2nd", "3rd"];

/// Message shown when an event has no predictions artifact.
pub fn no_predictions_message(event: &str) -> String {
    format!("No predictions found for {event}. Please run the model pipeline first.")
}

/// Average ranks (1-based), ties sharing the mean of their positions.
///
/// `[63.0, 65.0, 65.0, 70.0]` ranks as `[1.0, 2.5, 2.5, 4.0]`.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Qualifying rank against predicted rank for one driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDelta {
    /// Driver name
    pub driver: String,
    /// Rank by qualifying time
    pub qualifying_rank: i64,
    /// Rank by predicted race time
    pub predicted_rank: i64,
    /// `qualifying_rank - predicted_rank`; positive means places gained
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq)]
struct TimeDelta<'a> {
    driver: &'a str,
    qualifying_time: f64,
    predicted_race_time: f64,
    delta: f64,
}

/// A persisted prediction ready for display.
#[derive(Debug, Clone)]
pub struct Dashboard {
    event: String,
    rows: Vec<PredictionRow>,
    mae: Option<f64>,
    track_image: Option<PathBuf>,
}

impl Dashboard {
    /// Load an event's artifacts.
    ///
    /// Returns `Ok(None)` when the predictions file does not exist. A missing
    /// MAE file or track image only hides that section.
    ///
    /// # Errors
    /// Returns an error if an artifact exists but cannot be parsed.
    pub fn load(
        event: &str,
        predictions: &Path,
        mae: &Path,
        track_image: Option<&Path>,
    ) -> Result<Option<Self>, ExportError> {
        let Some(rows) = read_predictions(predictions)? else {
            return Ok(None);
        };
        let mae = read_mae(mae)?;
        let track_image = track_image.filter(|p| p.exists()).map(Path::to_path_buf);
        Ok(Some(Self::from_rows(event, rows, mae, track_image)))
    }

    /// Build from rows already in memory.
    ///
    /// Predicted times are rounded to three decimals and the rows ranked by
    /// them, ties keeping file order.
    pub fn from_rows(
        event: &str,
        mut rows: Vec<PredictionRow>,
        mae: Option<f64>,
        track_image: Option<PathBuf>,
    ) -> Self {
        for row in &mut rows {
            row.predicted_race_time = (row.predicted_race_time * 1000.0).round() / 1000.0;
        }
        rows.sort_by(|a, b| a.predicted_race_time.total_cmp(&b.predicted_race_time));
        Self {
            event: event.to_string(),
            rows,
            mae,
            track_image,
        }
    }

    /// Event name.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Ranked rows.
    pub fn rows(&self) -> &[PredictionRow] {
        &self.rows
    }

    /// Held-out error, when the MAE artifact exists.
    pub const fn mae(&self) -> Option<f64> {
        self.mae
    }

    /// Track image path, when the image exists.
    pub fn track_image(&self) -> Option<&Path> {
        self.track_image.as_deref()
    }

    /// Predicted top three (fewer for a smaller field).
    pub fn podium(&self) -> &[PredictionRow] {
        &self.rows[..self.rows.len().min(3)]
    }

    fn time_deltas(&self) -> Vec<TimeDelta<'_>> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.qualifying_time.map(|q| TimeDelta {
                    driver: &row.driver,
                    qualifying_time: q,
                    predicted_race_time: row.predicted_race_time,
                    delta: (row.predicted_race_time - q).abs(),
                })
            })
            .collect()
    }

    /// Position change from qualifying to predicted race order.
    ///
    /// Drivers without a qualifying time are left out. Ranks are average
    /// ranks truncated to whole numbers; rows come back in predicted-rank
    /// order.
    pub fn rank_deltas(&self) -> Vec<RankDelta> {
        let timed: Vec<&PredictionRow> = self
            .rows
            .iter()
            .filter(|row| row.qualifying_time.is_some())
            .collect();
        let qualifying: Vec<f64> = timed.iter().filter_map(|r| r.qualifying_time).collect();
        let predicted: Vec<f64> = timed.iter().map(|r| r.predicted_race_time).collect();

        let q_ranks = average_ranks(&qualifying);
        let p_ranks = average_ranks(&predicted);

        let mut deltas: Vec<RankDelta> = timed
            .iter()
            .zip(q_ranks.iter().zip(&p_ranks))
            .map(|(row, (q, p))| {
                let qualifying_rank = q.trunc() as i64;
                let predicted_rank = p.trunc() as i64;
                RankDelta {
                    driver: row.driver.clone(),
                    qualifying_rank,
                    predicted_rank,
                    delta: qualifying_rank - predicted_rank,
                }
            })
            .collect();
        deltas.sort_by_key(|d| d.predicted_rank);
        deltas
    }

    fn bar_chart(&self) -> String {
        let mut output = String::new();
        let min = self
            .rows
            .iter()
            .map(|r| r.predicted_race_time)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .rows
            .iter()
            .map(|r| r.predicted_race_time)
            .fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        for row in &self.rows {
            let len = if span > f64::EPSILON {
                1 + (((row.predicted_race_time - min) / span) * (BAR_WIDTH - 1) as f64).round()
                    as usize
            } else {
                BAR_WIDTH
            };
            output.push_str(&format!(
                "  {:<24} {:<width$} {:.2}s\n",
                row.driver,
                "█".repeat(len),
                row.predicted_race_time,
                width = BAR_WIDTH
            ));
        }
        output
    }

    /// Render the dashboard as plain text.
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRace Time Prediction: {}\n", self.event));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        if let Some(image) = &self.track_image {
            output.push_str(&format!("Track layout: {}\n", image.display()));
        }

        section(&mut output, "Predicted Results");
        output.push_str(&format!(
            "  {:>8}  {:<28} {:>22}\n",
            "Position", "Driver", "PredictedRaceTime (s)"
        ));
        for (i, row) in self.rows.iter().enumerate() {
            output.push_str(&format!(
                "  {:>8}  {:<28} {:>22.3}\n",
                i + 1,
                row.driver,
                row.predicted_race_time
            ));
        }

        section(&mut output, "Predicted Podium");
        for (label, row) in PODIUM_LABELS.iter().zip(self.podium()) {
            output.push_str(&format!("  {label}  {}\n", row.driver));
        }

        if let Some(mae) = self.mae {
            output.push_str(&format!(
                "\nMean Absolute Error (MAE): {mae:.2} seconds\n"
            ));
        }

        section(&mut output, "Predicted Race Times");
        output.push_str(&self.bar_chart());

        section(&mut output, "Average Sector Times");
        output.push_str(&format!(
            "  {:<24} {:>10} {:>10} {:>10}\n",
            "Driver", "Sector 1", "Sector 2", "Sector 3"
        ));
        for row in &self.rows {
            output.push_str(&format!(
                "  {:<24} {:>10} {:>10} {:>10}\n",
                row.driver,
                seconds(row.sector1),
                seconds(row.sector2),
                seconds(row.sector3)
            ));
        }

        section(&mut output, "Qualifying vs Predicted Race Time");
        output.push_str(&format!(
            "  {:<24} {:>12} {:>12} {:>10}\n",
            "Driver", "Qualifying", "Predicted", "Delta"
        ));
        for delta in self.time_deltas() {
            output.push_str(&format!(
                "  {:<24} {:>12.3} {:>12.3} {:>10.3}\n",
                delta.driver, delta.qualifying_time, delta.predicted_race_time, delta.delta
            ));
        }

        section(&mut output, "Position Delta (Qualifying vs Predicted Rank)");
        output.push_str(&format!(
            "  {:<24} {:>15} {:>14} {:>10}\n",
            "Driver", "QualifyingRank", "PredictedRank", "Δ Position"
        ));
        for delta in self.rank_deltas() {
            output.push_str(&format!(
                "  {:<24} {:>15} {:>14} {:>+10}\n",
                delta.driver, delta.qualifying_rank, delta.predicted_rank, delta.delta
            ));
        }

        output
    }

    /// Render the dashboard as markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Race Time Prediction: {}\n\n", self.event));
        if let Some(image) = &self.track_image {
            output.push_str(&format!(
                "![{} track layout]({})\n\n",
                self.event,
                image.display()
            ));
        }

        output.push_str("## Predicted Results\n\n");
        output.push_str("| Position | Driver | PredictedRaceTime (s) |\n");
        output.push_str("|---:|---|---:|\n");
        for (i, row) in self.rows.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {:.3} |\n",
                i + 1,
                row.driver,
                row.predicted_race_time
            ));
        }

        output.push_str("\n## Predicted Podium\n\n");
        for (label, row) in PODIUM_LABELS.iter().zip(self.podium()) {
            output.push_str(&format!("- **{label}**: {}\n", row.driver));
        }

        if let Some(mae) = self.mae {
            output.push_str(&format!(
                "\n**Mean Absolute Error (MAE):** {mae:.2} seconds\n"
            ));
        }

        output.push_str("\n## Average Sector Times\n\n");
        output.push_str("| Driver | Sector 1 | Sector 2 | Sector 3 |\n");
        output.push_str("|---|---:|---:|---:|\n");
        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.driver,
                seconds(row.sector1),
                seconds(row.sector2),
                seconds(row.sector3)
            ));
        }

        output.push_str("\n## Qualifying vs Predicted Race Time\n\n");
        output.push_str("| Driver | Qualifying (s) | Predicted (s) | Delta (s) |\n");
        output.push_str("|---|---:|---:|---:|\n");
        for delta in self.time_deltas() {
            output.push_str(&format!(
                "| {} | {:.3} | {:.3} | {:.3} |\n",
                delta.driver, delta.qualifying_time, delta.predicted_race_time, delta.delta
            ));
        }

        output.push_str("\n## Position Delta (Qualifying vs Predicted Rank)\n\n");
        output.push_str("| Driver | QualifyingRank | PredictedRank | Δ Position |\n");
        output.push_str("|---|---:|---:|---:|\n");
        for delta in self.rank_deltas() {
            output.push_str(&format!(
                "| {} | {} | {} | {:+} |\n",
                delta.driver, delta.qualifying_rank, delta.predicted_rank, delta.delta
            ));
        }

        output
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n{title}:\n"));
    output.push_str(&"-".repeat(80));
    output.push('\n');
}

fn seconds(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}
