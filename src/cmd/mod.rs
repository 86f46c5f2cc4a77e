mod init;
mod seed;
pub(crate) mod stats;
mod verify;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loja-seed")]
#[command(version)]
#[command(
    about = "Create and seed the database of a construction-materials store",
    long_about = None
)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Runs `seed` with default settings when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options of the seed command
#[derive(Args, Default)]
pub struct SeedArgs {
    /// DuckDB database file [default: loja_material_construcao.db]
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Preset counts: full or restock [default: full]
    #[arg(long)]
    pub profile: Option<String>,

    /// Customers to insert (overrides the profile)
    #[arg(long)]
    pub customers: Option<usize>,

    /// Products to insert (overrides the profile)
    #[arg(long)]
    pub products: Option<usize>,

    /// Cashiers to insert (overrides the profile)
    #[arg(long)]
    pub cashiers: Option<usize>,

    /// Payment methods to insert (overrides the profile)
    #[arg(long)]
    pub payment_methods: Option<usize>,

    /// Delivery statuses to insert (overrides the profile)
    #[arg(long)]
    pub delivery_statuses: Option<usize>,

    /// Sales to insert (overrides the profile)
    #[arg(long)]
    pub sales: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Locale for fake data: pt_BR or en [default: pt_BR]
    #[arg(short, long)]
    pub locale: Option<String>,

    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Generate and insert everything, then roll back
    #[arg(long)]
    pub dry_run: bool,

    /// Show progress while seeding
    #[arg(short, long)]
    pub progress: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema if needed and insert a batch of generated rows
    Seed(SeedArgs),

    /// Create the schema without inserting any rows
    Init {
        /// DuckDB database file
        #[arg(short, long, default_value = crate::store::DEFAULT_DATABASE)]
        database: PathBuf,
    },

    /// Show row counts per table
    Stats {
        /// DuckDB database file
        #[arg(short, long, default_value = crate::store::DEFAULT_DATABASE)]
        database: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check seeded sales for consistency; exits non-zero on violations
    Verify {
        /// DuckDB database file
        #[arg(short, long, default_value = crate::store::DEFAULT_DATABASE)]
        database: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON Schema of a command's --json output
    Schema {
        /// Command name (seed, stats, verify); all when omitted
        command: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or_else(|| Commands::Seed(SeedArgs::default())) {
        Commands::Seed(args) => seed::run(args),
        Commands::Init { database } => init::run(database),
        Commands::Stats { database, json } => stats::run(database, json),
        Commands::Verify { database, json } => verify::run(database, json),
        Commands::Schema { command } => run_schema(command),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "loja-seed", &mut io::stdout());
            Ok(())
        }
    }
}

fn run_schema(command: Option<String>) -> anyhow::Result<()> {
    let output = match command {
        Some(name) => {
            let schema = crate::json_schema::get_schema(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "No schema for '{}'. Available: {}",
                    name,
                    crate::json_schema::schema_names().join(", ")
                )
            })?;
            serde_json::to_string_pretty(&schema)?
        }
        None => serde_json::to_string_pretty(&crate::json_schema::all_schemas())?,
    };
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["loja-seed"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_seed_flags_parse() {
        let cli = Cli::try_parse_from([
            "loja-seed",
            "-v",
            "seed",
            "--profile",
            "restock",
            "--sales",
            "10",
            "--seed",
            "42",
            "--dry-run",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Seed(args)) => {
                assert_eq!(args.profile.as_deref(), Some("restock"));
                assert_eq!(args.sales, Some(10));
                assert_eq!(args.seed, Some(42));
                assert!(args.dry_run);
                assert!(args.database.is_none());
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
