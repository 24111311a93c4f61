//! MDL expression IR driver
//!
//! Command-line tool for inspecting serialized expression graphs: writes a
//! sample graph, dumps graph files and compares two of them.

mod container;
mod demo;

use clap::{Parser, Subcommand};
use log::info;
use mdl_common::basic::BasicValueFactory;
use mdl_common::TagNames;
use mdl_expr::{ExpressionFactory, ExpressionRef, FactoryConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mdlx")]
#[command(about = "MDL expression graph tool")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample material graph
    Demo {
        /// Output graph file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of layer calls stacked on top of the base BSDF
        #[arg(long, default_value_t = 2)]
        chain: usize,

        /// Also write the tag name table as JSON
        #[arg(long)]
        names: Option<PathBuf>,
    },

    /// Print a graph file
    Dump {
        /// Input graph file
        input: PathBuf,

        /// JSON table mapping tags to names
        #[arg(long)]
        names: Option<PathBuf>,

        /// Maximum number of nested direct calls to expand (0 = all)
        #[arg(long)]
        depth: Option<usize>,

        /// Factory configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Order two graph files
    Compare {
        lhs: PathBuf,
        rhs: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Demo { output, chain, names } => run_demo(&output, chain, names.as_deref()),
        Commands::Dump {
            input,
            names,
            depth,
            config,
        } => run_dump(&input, names.as_deref(), depth, config.as_deref()),
        Commands::Compare { lhs, rhs } => run_compare(&lhs, &rhs),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn make_factory(config: Option<&Path>) -> Result<ExpressionFactory, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => FactoryConfig::load(path)?,
        None => FactoryConfig::default(),
    };
    Ok(ExpressionFactory::with_config(Arc::new(BasicValueFactory::new()), config))
}

fn read_graph(factory: &ExpressionFactory, path: &Path) -> Result<ExpressionRef, Box<dyn std::error::Error>> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    let expr = container::decode(factory, &bytes).map_err(|e| format!("'{}': {}", path.display(), e))?;
    Ok(expr)
}

fn run_demo(output: &Path, chain: usize, names_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let factory = make_factory(None)?;
    let (material, names) = demo::build_material(&factory, chain)?;

    let bytes = container::encode(&factory, &material);
    fs::write(output, &bytes)?;
    info!("wrote {} bytes to {}", bytes.len(), output.display());

    if let Some(path) = names_path {
        fs::write(path, serde_json::to_string_pretty(&names)?)?;
        info!("wrote {} tag names to {}", names.len(), path.display());
    }

    Ok(())
}

fn run_dump(
    input: &Path,
    names_path: Option<&Path>,
    depth: Option<usize>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let factory = make_factory(config)?;
    let expr = read_graph(&factory, input)?;

    let names: Option<TagNames> = match names_path {
        Some(path) => Some(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => None,
    };
    let transaction = names.as_ref().map(|n| n as &dyn mdl_common::Transaction);

    let depth = depth.unwrap_or(factory.config().default_dump_depth);
    let name = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "expression".to_string());

    println!("{}", factory.dump(transaction, &expr, &name, depth));
    Ok(())
}

fn run_compare(lhs: &Path, rhs: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let factory = make_factory(None)?;
    let a = read_graph(&factory, lhs)?;
    let b = read_graph(&factory, rhs)?;

    let word = match factory.compare(&a, &b) {
        std::cmp::Ordering::Less => "less",
        std::cmp::Ordering::Equal => "equal",
        std::cmp::Ordering::Greater => "greater",
    };
    println!("{}", word);
    Ok(())
}
