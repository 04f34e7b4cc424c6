use clap::{Command, arg, value_parser};

pub const ASSOCIATE_CMD: &str = "associate";

pub fn create_associate_cli() -> Command {
    Command::new(ASSOCIATE_CMD)
        .author("Databio")
        .about("Annotate regions with the genes whose promoters lie nearby")
        .arg_required_else_help(true)
        .arg(arg!(<regions> "Region BED file"))
        .arg(arg!(--annotation <FILE> "Gene annotation, BED6 or GTF").required(true))
        .arg(arg!(--genes <FILE> "Gene set of interest, one symbol per line"))
        .arg(
            arg!(--"promoter-length" <N> "Bases upstream of a TSS forming its promoter window")
                .value_parser(value_parser!(u32))
                .default_value("1000"),
        )
        .arg(
            arg!(--"max-association-length" <N> "Maximum distance from a region to a promoter window")
                .value_parser(value_parser!(u32))
                .default_value("50000"),
        )
        .arg(arg!(-o --output <FILE> "Output BED file, gzipped when it ends in .gz (default: stdout)"))
}
