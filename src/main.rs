use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use purgecv::config::PrepConfig;
use purgecv::FoldBounds;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "purgecv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Purged k-fold layouts for time-series tables", long_about = None)]
struct Cli {
    /// TOML configuration file (PURGECV__* environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the train/test layout of every fold for a table of N rows
    Plan {
        /// Number of rows in the table
        n_rows: usize,

        /// Override the configured number of folds
        #[arg(long)]
        n_splits: Option<usize>,

        /// Override the configured sample overlap
        #[arg(long, allow_negative_numbers = true)]
        n_overlaps: Option<i64>,

        /// Override the configured embargo share
        #[arg(long, allow_negative_numbers = true)]
        pct_embargo: Option<f64>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and print it as TOML
    Check,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = PrepConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Plan {
            n_rows,
            n_splits,
            n_overlaps,
            pct_embargo,
            json,
        } => {
            if let Some(n) = n_splits {
                config.cv.n_splits = n;
            }
            if let Some(n) = n_overlaps {
                config.cv.n_overlaps = n;
            }
            if let Some(p) = pct_embargo {
                config.cv.pct_embargo = p;
            }

            let kfold = config.cv.build()?;
            let folds = kfold
                .split_positions(n_rows)?
                .collect::<purgecv::Result<Vec<FoldBounds>>>()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&folds)?);
            } else {
                println!(
                    "{} rows, {} folds, overlap {}, embargo {} rows",
                    n_rows,
                    kfold.n_splits(),
                    kfold.n_overlaps(),
                    kfold.n_embargo(n_rows)
                );
                println!("{:>4}  {:>14}  {:>14}  {:>14}  {:>6}", "fold", "train head", "test", "train tail", "purged");
                for bounds in &folds {
                    println!(
                        "{:>4}  {:>14}  {:>14}  {:>14}  {:>6}",
                        bounds.fold_num,
                        format!("{:?}", bounds.train_head),
                        format!("{:?}", bounds.test),
                        format!("{:?}", bounds.train_tail),
                        bounds.purged_len(n_rows)
                    );
                }
            }
        }
        Commands::Check => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_overrides_reach_validation() {
        let cli = Cli::try_parse_from(["purgecv", "plan", "10", "--n-overlaps", "-1"]).unwrap();
        let n_overlaps = match cli.command {
            Commands::Plan { n_overlaps, .. } => n_overlaps,
            Commands::Check => panic!("expected plan"),
        };
        assert_eq!(n_overlaps, Some(-1));

        let mut config = PrepConfig::default();
        config.cv.n_overlaps = -1;
        assert!(matches!(
            config.cv.build(),
            Err(purgecv::PurgecvError::Configuration(_))
        ));
    }
}
