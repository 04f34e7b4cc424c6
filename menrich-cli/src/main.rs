mod associate;
mod enrichment;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "menrich";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Motif enrichment analysis: which motifs are over-represented in genomic region sets, and near which genes.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages"),
        )
        .subcommand(enrichment::cli::create_enrichment_cli())
        .subcommand(associate::cli::create_associate_cli())
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);

    match matches.subcommand() {
        //
        // ENRICHMENT
        //
        Some((enrichment::cli::ENRICHMENT_CMD, matches)) => {
            enrichment::handlers::run_enrichment(matches)?;
        }

        //
        // GENE ASSOCIATION
        //
        Some((associate::cli::ASSOCIATE_CMD, matches)) => {
            associate::handlers::run_associate(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
