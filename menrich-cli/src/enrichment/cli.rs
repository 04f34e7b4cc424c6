use clap::{Arg, Command, arg, value_parser};

pub const ENRICHMENT_CMD: &str = "enrichment";

pub fn create_enrichment_cli() -> Command {
    Command::new(ENRICHMENT_CMD)
        .author("Databio")
        .about("Test motifs for enrichment in region sets against a background and, with a gene set, against non-evidence regions")
        .arg_required_else_help(true)
        .arg(
            Arg::new("regions")
                .num_args(1..)
                .help("Region BED files to analyze (each tested without a gene set)")
                .conflicts_with("input-matrix"),
        )
        .arg(arg!(--"input-matrix" <FILE> "Experimental matrix grouping region sets with gene sets"))
        .arg(
            arg!(--"match-location" <DIR> "Directory holding <name>_mpbs.bed[.gz] for every region set")
                .required(true),
        )
        .arg(arg!(--background <FILE> "Background regions BED file").required(true))
        .arg(arg!(--"background-mpbs" <FILE> "Binding sites on the background (default: looked up in --match-location)"))
        .arg(arg!(--annotation <FILE> "Gene annotation, BED6 or GTF").required(true))
        .arg(arg!(--"selected-motifs" <FILE> "Only test the motifs listed in this file, one per line"))
        .arg(
            arg!(-o --"output-location" <DIR> "Output directory")
                .default_value("enrichment"),
        )
        .arg(arg!(-c --config <FILE> "TOML file with analysis settings"))
        .arg(
            arg!(--"promoter-length" <N> "Bases upstream of a TSS forming its promoter window")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--"max-association-length" <N> "Maximum distance from a region to a promoter window")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--alpha <ALPHA> "False discovery rate for significant motifs")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--"print-thresh" <P> "Corrected p-value cutoff for writing binding sites")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(-p --processes <N> "Number of worker threads for motif batches")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--"correction-method" <METHOD> "Multiple testing correction")
                .value_parser(["independent", "dependent"]),
        )
}
