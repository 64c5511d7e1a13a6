use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ragdash::compare::{compare_model, list_models, load_delta_table, ModelComparison};
use ragdash::ingest::ResultTable;
use ragdash::views::{axis_range, bullet, dumbbell, heatmap, parallel_coordinates, radar, Heatmap};
use ragdash::{Config, Metric, RagdashError};
use std::path::PathBuf;

/// Compare base and RAG evaluation results across models.
#[derive(Parser, Debug)]
#[command(name = "ragdash")]
#[command(about = "Base vs RAG evaluation metric reports")]
struct Args {
    /// Config file (default: $RAGDASH_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List models with a base result table
    Models,
    /// Base vs RAG metrics, deltas and chart series for one model
    Compare {
        /// Model identity, e.g. falcon
        model: String,
    },
    /// Delta table across every paired model
    Heatmap,
    /// Parallel-coordinates series for a sample-level table (default: fine-tuned file)
    Parallel {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", &config.ragdash.log_level)
    ).init();

    match &args.command {
        Command::Models => run_models(&config, args.json),
        Command::Compare { model } => run_compare(&config, model, args.json),
        Command::Heatmap => run_heatmap(&config, args.json),
        Command::Parallel { file } => run_parallel(&config, file.as_ref(), args.json),
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

fn run_models(config: &Config, json: bool) -> Result<()> {
    let models = list_models(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }
    if models.is_empty() {
        println!("No evaluation result tables in {}", config.base_dir().display());
    }
    for model in models {
        println!("{}", model);
    }
    Ok(())
}

fn run_compare(config: &Config, model: &str, json: bool) -> Result<()> {
    let comparison = match compare_model(config, model) {
        Ok(c) => c,
        Err(RagdashError::ModelNotFound(m)) => anyhow::bail!("Could not find base file for `{}`.", m),
        Err(RagdashError::NoCounterpart(m)) => anyhow::bail!("RAG version not found for `{}`.", m),
        Err(e) => return Err(e.into()),
    };

    if json {
        print_compare_json(&comparison, config.dumbbell_exclusions(&comparison.model))?;
    } else {
        print_compare_table(&comparison);
    }
    Ok(())
}

fn print_compare_json(comparison: &ModelComparison, exclude: &[Metric]) -> Result<()> {
    let base = comparison.normalized_base();
    let variant = comparison.normalized_variant();
    let chart = dumbbell(&base, &variant, exclude);

    let report = serde_json::json!({
        "model": comparison.model,
        "base": comparison.base,
        "variant": comparison.variant,
        "delta": comparison.delta(),
        "normalized": { "base": base, "variant": variant },
        "quantized": comparison.quantized,
        "dumbbell": {
            "quality": chart.quality,
            "quality_range": axis_range(&chart.quality),
            "performance": chart.performance,
            "performance_range": axis_range(&chart.performance),
        },
        "radar": radar(&base, &variant),
        "bullet": bullet(&base, &variant),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_compare_table(comparison: &ModelComparison) {
    let delta = comparison.delta();
    let normalized_base = comparison.normalized_base();
    let normalized_variant = comparison.normalized_variant();

    println!("\n=== {}: Base vs RAG ===\n", comparison.model);
    println!("Base: {}", comparison.base_source.display());
    println!("RAG:  {}\n", comparison.variant_source.display());
    println!("{:-<92}", "");
    println!(
        "{:<20} {:>12} {:>12} {:>12} {:>16} {:>16}",
        "Metric", "Base", "RAG", "Delta", "Base (norm)", "RAG (norm)"
    );
    println!("{:-<92}", "");
    for (metric, base) in comparison.base.iter() {
        println!(
            "{:<20} {:>12} {:>12} {:>12} {:>16} {:>16}",
            metric.name(),
            fmt_value(base),
            fmt_value(comparison.variant.get(metric)),
            fmt_value(delta.get(metric)),
            fmt_value(normalized_base.get(metric)),
            fmt_value(normalized_variant.get(metric)),
        );
    }
    println!("{:-<92}", "");

    if !comparison.quantized.is_empty() {
        println!("\nQuantized builds:\n");
        print!("{:<20}", "Metric");
        for q in &comparison.quantized {
            print!(" {:>12}", q.label);
        }
        println!();
        for metric in Metric::EXTENDED {
            print!("{:<20}", metric.name());
            for q in &comparison.quantized {
                print!(" {:>12}", fmt_value(q.metrics.get(metric)));
            }
            println!();
        }
    }
    println!();
}

fn run_heatmap(config: &Config, json: bool) -> Result<()> {
    let report = load_delta_table(config)?;
    for skipped in &report.skipped {
        log::warn!("{} left out: {}", skipped.model, skipped.reason);
    }

    let grid = heatmap(&report.table);
    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print_heatmap(&grid);
    }
    Ok(())
}

fn print_heatmap(grid: &Heatmap) {
    if grid.models.is_empty() {
        println!("No paired base/RAG tables found.");
        return;
    }

    println!("\n=== Delta (RAG - Base) ===\n");
    print!("{:<20}", "Model");
    for metric in &grid.metrics {
        print!(" {:>18}", metric.name());
    }
    println!();
    for (model, row) in grid.models.iter().zip(&grid.cells) {
        print!("{:<20}", model);
        for value in row {
            print!(" {:>18}", fmt_value(*value));
        }
        println!();
    }
    println!("\nColor bound: ±{:.4}\n", grid.bound);
}

fn run_parallel(config: &Config, file: Option<&PathBuf>, json: bool) -> Result<()> {
    let path = match file {
        Some(p) => p.clone(),
        None => config
            .finetuned
            .as_ref()
            .map(|f| f.path.clone())
            .context("No --file given and no [finetuned] path configured")?,
    };
    let table = ResultTable::from_path(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let chart = parallel_coordinates(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    println!(
        "\n{} of {} rows complete ({})\n",
        chart.rows.len(),
        table.len(),
        path.display()
    );
    for metric in &chart.metrics {
        print!(" {:>18}", metric.name());
    }
    println!();
    for row in &chart.rows {
        for value in row {
            print!(" {:>18.4}", value);
        }
        println!();
    }
    Ok(())
}
