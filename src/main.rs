//! Wellcast: early-production forecasting CLI
//!
//! Loads a well dataset, tunes a random-forest regressor with randomized
//! cross-validated search and reports accuracy and feature importances.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wellcast::cli::{confirm_search, select_target, Cli};
use wellcast::forest::RandomForestConfig;
use wellcast::pipeline::{
    evaluate, get_column_names, load_dataset_with_progress, rank_feature_importances,
    randomized_search, split_features_target, train_test_split, HyperparameterGrid,
    SearchConfig,
};
use wellcast::report::{
    export_run_report, leaderboard_table, DatasetSummary, EvaluationSummary, ForecastSummary,
    ReportParams, RunMetadata, RunReport, SearchSummary,
};
use wellcast::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
    RunSettings,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input = cli.input.as_path();

    let target = match (&cli.target, cli.no_confirm) {
        (Some(target), _) => target.clone(),
        (None, true) => anyhow::bail!(
            "Target column is required when using --no-confirm. Use -t/--target to specify."
        ),
        (None, false) => {
            let columns = get_column_names(input)
                .with_context(|| format!("Failed to read columns of {}", input.display()))?;
            select_target(&columns)?
        }
    };

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&RunSettings {
        input,
        target: &target,
        test_fraction: cli.test_fraction,
        seed: cli.seed,
        n_iter: cli.n_iter,
        cv: cli.cv,
        workers: cli.workers,
    });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.workers)
        .build()
        .context("Failed to configure worker pool")?;

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(input, cli.infer_schema_length)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Features and target
    print_step_header(2, "Split Features and Target");
    let step_start = Instant::now();
    let feature_set = split_features_target(&df, &target, &cli.drop_columns)?;
    drop(df);
    print_count("numeric column(s)", feature_set.numeric_columns(), None);
    print_count(
        "categorical column(s)",
        feature_set.categorical_columns(),
        Some("(one-hot encoded)"),
    );
    print_count("feature(s) in total", feature_set.features.n_features(), None);
    print_step_time(step_start.elapsed());

    // Step 3: Train/test partition
    print_step_header(3, "Train/Test Partition");
    let step_start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let split = train_test_split(
        &feature_set.features,
        &feature_set.target,
        cli.test_fraction,
        &mut rng,
    )?;
    print_count("training row(s)", split.x_train.n_rows(), None);
    print_count(
        "held-out row(s)",
        split.x_test.n_rows(),
        Some(&format!("({:.2}%)", cli.test_fraction * 100.0)),
    );
    print_step_time(step_start.elapsed());

    // Step 4: Baseline
    print_step_header(4, "Baseline Forest");
    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Fitting baseline forest with {} trees...",
        cli.baseline_trees
    ));
    let baseline_forest = pool.install(|| {
        RandomForestConfig::new(cli.baseline_trees)?
            .with_seed(cli.seed)
            .fit(split.x_train.rows(), &split.y_train, split.x_train.names())
    })?;
    finish_with_success(&spinner, "Baseline fitted");
    let baseline = evaluate(&baseline_forest, &split.x_train, &split.y_train)
        .context("Failed to evaluate baseline forest")?;
    print_info(&format!(
        "Baseline accuracy on training data: {:.2}%",
        baseline.accuracy
    ));
    print_step_time(step_start.elapsed());

    // Step 5: Randomized search
    print_step_header(5, "Randomized Hyperparameter Search");
    let grid = HyperparameterGrid::default();
    let grid_combinations = grid.n_combinations()?;
    let n_candidates = cli.n_iter.min(grid_combinations);
    print_count(
        "candidate(s) sampled",
        n_candidates,
        Some(&format!("(of {} combinations)", grid_combinations)),
    );
    if !cli.no_confirm && !confirm_search(n_candidates, cli.cv)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    let step_start = Instant::now();
    let search_config = SearchConfig {
        n_iter: cli.n_iter,
        cv: cli.cv,
        scoring: cli.scoring,
        workers: cli.workers,
        shuffle_folds: cli.shuffle_folds,
    };
    let search = randomized_search(
        &grid,
        &search_config,
        &split.x_train,
        &split.y_train,
        &mut rng,
    )?;
    print_success(&format!(
        "Best candidate #{} with mean CV {} {:.4}",
        search.best_candidate, cli.scoring, search.best_score
    ));
    for line in leaderboard_table(&search.candidates, 5).to_string().lines() {
        println!("    {}", line);
    }
    print_step_time(step_start.elapsed());

    // Step 6: Evaluation
    print_step_header(6, "Evaluation");
    let step_start = Instant::now();
    let tuned = evaluate(&search.best_forest, &split.x_train, &split.y_train)
        .context("Failed to evaluate tuned forest on training data")?;
    let test = if split.x_test.is_empty() {
        print_warning("Test fraction is 0, skipping held-out evaluation");
        None
    } else {
        Some(
            evaluate(&search.best_forest, &split.x_test, &split.y_test)
                .context("Failed to evaluate tuned forest on test data")?,
        )
    };
    let importances = rank_feature_importances(&search.best_forest, &split.x_train)?;
    print_success("Evaluation complete");
    print_step_time(step_start.elapsed());

    let summary = ForecastSummary {
        best_params: search.best_params,
        best_score: search.best_score,
        scoring: cli.scoring,
        baseline,
        tuned,
        test,
        importances,
    };
    summary.display();

    if let Some(report_path) = &cli.report {
        let report = RunReport {
            metadata: RunMetadata::now(&ReportParams {
                input_file: &input.display().to_string(),
                target_column: &target,
                seed: cli.seed,
                test_fraction: cli.test_fraction,
                n_iter: cli.n_iter,
                cv_folds: cli.cv,
                workers: cli.workers,
                scoring: cli.scoring,
                baseline_trees: cli.baseline_trees,
            }),
            dataset: DatasetSummary {
                rows,
                features: feature_set.features.n_features(),
                numeric_columns: feature_set.numeric_columns(),
                categorical_columns: feature_set.categorical_columns(),
                train_rows: split.x_train.n_rows(),
                test_rows: split.x_test.n_rows(),
            },
            search: SearchSummary {
                grid_combinations,
                fits: search.n_fits,
                best_candidate: search.best_candidate,
                best_score: search.best_score,
                best_params: search.best_params,
                candidates: search.candidates,
            },
            evaluation: EvaluationSummary {
                baseline_train: summary.baseline,
                tuned_train: summary.tuned,
                improvement_pct: summary.improvement_pct(),
                tuned_test: summary.test,
            },
            feature_importances: summary.importances,
        };
        export_run_report(&report, report_path)?;
        println!();
        print_success(&format!("Run report written to {}", report_path.display()));
    }

    print_completion();

    Ok(())
}
