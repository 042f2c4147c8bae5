use clap::Parser;

/// This is a reporting program for the indicators of the yellow fever contingency plan.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the workbook, its layout and the outputs.
    /// Relative paths inside the configuration are resolved against the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The Excel workbook with the indicators. Setting this option overrides the
    /// source file that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default Ficha_indicadores) The name of the worksheet holding the indicators.
    #[clap(long, value_parser)]
    pub worksheet: Option<String>,

    /// (file path) If specified, the detailed table (one line per indicator and period) is
    /// exported to this CSV file.
    #[clap(short, long, value_parser)]
    pub export: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the report will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, the
    /// program checks that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (optional) Only report the indicators of this strategic line (full label, as printed in the summary).
    #[clap(long, value_parser)]
    pub category: Option<String>,

    /// (optional) Only report the indicators of this kind.
    #[clap(long, value_parser)]
    pub kind: Option<String>,

    /// (file path) The branding image. A text label is used when it cannot be read.
    #[clap(long, value_parser)]
    pub logo: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
