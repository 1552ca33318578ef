//! Console summary of a forecast run

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    improvement_pct, CandidateScore, Evaluation, HyperparameterSet, RankedFeature, Scoring,
};

/// Everything printed after the search finishes.
#[derive(Debug, Clone)]
pub struct ForecastSummary {
    pub best_params: HyperparameterSet,
    pub best_score: f64,
    pub scoring: Scoring,
    pub baseline: Evaluation,
    pub tuned: Evaluation,
    /// `None` when the test fraction left no held-out rows.
    pub test: Option<Evaluation>,
    pub importances: Vec<RankedFeature>,
}

impl ForecastSummary {
    pub fn improvement_pct(&self) -> Option<f64> {
        improvement_pct(&self.baseline, &self.tuned)
    }

    pub fn display(&self) {
        section("🏆", "BEST HYPERPARAMETERS");
        print_indented(&params_table(&self.best_params));
        println!(
            "      Mean CV {}: {}",
            self.scoring,
            style(format!("{:.4}", self.best_score)).yellow().bold()
        );

        section("📈", "MODEL PERFORMANCE (TRAINING DATA)");
        print_indented(&comparison_table(&self.baseline, &self.tuned));

        section("🧪", "HELD-OUT TEST DATA");
        match &self.test {
            Some(test) => println!(
                "      Accuracy: {} on {} rows",
                style(format!("{:.2}%", test.accuracy)).green().bold(),
                test.n_samples
            ),
            None => println!("      {}", style("No held-out rows (test fraction is 0)").dim()),
        }

        section("🔎", "FEATURE IMPORTANCES");
        print_indented(&importance_table(&self.importances));
    }
}

fn section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

/// Key/value table of a hyperparameter configuration.
pub fn params_table(params: &HyperparameterSet) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Hyperparameter", "Value"]));
    for (name, value) in params.as_pairs() {
        table.add_row(vec![Cell::new(name), Cell::new(value).fg(Color::Cyan)]);
    }
    table
}

/// Baseline vs tuned error and accuracy, with the relative improvement.
pub fn comparison_table(baseline: &Evaluation, tuned: &Evaluation) -> Table {
    let improvement = improvement_pct(baseline, tuned);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Model", "Average Error", "Accuracy"]));
    table.add_row(vec![
        Cell::new("Baseline"),
        Cell::new(format!("{:.4}", baseline.mean_absolute_error))
            .set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.2}%", baseline.accuracy)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Tuned").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.4}", tuned.mean_absolute_error))
            .set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.2}%", tuned.accuracy))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    let (text, color) = match improvement {
        Some(pct) if pct > 0.0 => (format!("{:+.2}%", pct), Color::Green),
        Some(pct) if pct < 0.0 => (format!("{:+.2}%", pct), Color::Red),
        Some(pct) => (format!("{:+.2}%", pct), Color::White),
        None => ("n/a".to_string(), Color::DarkGrey),
    };
    table.add_row(vec![
        Cell::new("Improvement"),
        Cell::new(""),
        Cell::new(text).fg(color).set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Ranked importances, most important first.
pub fn importance_table(importances: &[RankedFeature]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Rank", "Feature", "Importance"]));
    for feature in importances {
        table.add_row(vec![
            Cell::new(feature.rank),
            Cell::new(&feature.name),
            Cell::new(format!("{:.4}", feature.importance)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// The `top` candidates by mean CV score.
pub fn leaderboard_table(candidates: &[CandidateScore], top: usize) -> Table {
    let mut sorted: Vec<&CandidateScore> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        b.mean_score
            .total_cmp(&a.mean_score)
            .then(a.candidate.cmp(&b.candidate))
    });

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["#", "Mean", "Std", "Configuration"]));
    for entry in sorted.into_iter().take(top) {
        table.add_row(vec![
            Cell::new(entry.candidate),
            Cell::new(format!("{:.4}", entry.mean_score)),
            Cell::new(format!("{:.4}", entry.std_score)).fg(Color::DarkGrey),
            Cell::new(entry.params.to_string()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::MaxFeatures;

    fn eval(mae: f64, accuracy: f64) -> Evaluation {
        Evaluation {
            mean_absolute_error: mae,
            mean_absolute_percentage_error: 100.0 - accuracy,
            accuracy,
            n_samples: 10,
        }
    }

    fn params() -> HyperparameterSet {
        HyperparameterSet {
            n_estimators: 400,
            max_features: MaxFeatures::Sqrt,
            max_depth: None,
            min_samples_split: 5,
            min_samples_leaf: 2,
            bootstrap: false,
        }
    }

    #[test]
    fn test_comparison_table_shows_improvement() {
        let rendered = comparison_table(&eval(12.0, 80.0), &eval(8.0, 88.0)).to_string();
        assert!(rendered.contains("80.00%"));
        assert!(rendered.contains("88.00%"));
        assert!(rendered.contains("+10.00%"));
    }

    #[test]
    fn test_comparison_table_zero_baseline() {
        let rendered = comparison_table(&eval(50.0, 0.0), &eval(8.0, 88.0)).to_string();
        assert!(rendered.contains("n/a"));
        assert!(!rendered.contains("inf"));
    }

    #[test]
    fn test_params_table_lists_every_option() {
        let rendered = params_table(&params()).to_string();
        for name in [
            "n_estimators",
            "max_features",
            "max_depth",
            "min_samples_split",
            "min_samples_leaf",
            "bootstrap",
        ] {
            assert!(rendered.contains(name), "missing {}", name);
        }
        assert!(rendered.contains("None"));
    }

    #[test]
    fn test_leaderboard_orders_by_mean_score() {
        let candidates = vec![
            CandidateScore {
                candidate: 0,
                params: params(),
                fold_scores: vec![0.1, 0.3],
                mean_score: 0.2,
                std_score: 0.1,
            },
            CandidateScore {
                candidate: 1,
                params: params(),
                fold_scores: vec![0.9, 0.7],
                mean_score: 0.8,
                std_score: 0.1,
            },
        ];
        let rendered = leaderboard_table(&candidates, 1).to_string();
        assert!(rendered.contains("0.8000"));
        assert!(!rendered.contains("0.2000"));
    }
}
