use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod decode;
mod flat;
mod materials;
mod reference;
mod tree;
mod where_used;

#[derive(Parser)]
#[command(name = "sku")]
#[command(about = "Decode SKUs and explore their bills of materials", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Reference data file to use instead of the built-in Solerno catalog
    #[arg(long, global = true, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the expanded BOM tree of a SKU
    #[command(alias = "t")]
    Tree(tree::TreeArgs),

    /// List every BOM line of a SKU with its path
    Flat(flat::FlatArgs),

    /// Total raw materials needed to build a SKU
    #[command(alias = "m")]
    Materials(materials::MaterialsArgs),

    /// Show the color, pattern and direct components of a SKU
    Decode(decode::DecodeArgs),

    /// List the parents that consume a component
    #[command(name = "where-used", alias = "wu")]
    WhereUsed(where_used::WhereUsedArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG still wins.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let reference = reference::Reference::load(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Tree(args) => tree::execute(args, &reference),
        Commands::Flat(args) => flat::execute(args, &reference),
        Commands::Materials(args) => materials::execute(args, &reference),
        Commands::Decode(args) => decode::execute(args, &reference),
        Commands::WhereUsed(args) => where_used::execute(args, &reference),
    }
}
