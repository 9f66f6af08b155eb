use std::fs::File;

use alignment_report::{
    io::{
        job::{read_report_request, write_alignment_names, AlignmentNames},
        landxml::read_landxml_alignments,
        model::{read_alignments_json, write_alignments_json},
    },
    reporting::{build_report, write_report, HeaderLanguage, ReportFormat, ReportOptions},
    station::{format_station, parse_station},
    AlignmentSet, Error, Result,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

#[derive(Parser)]
#[command(name = "alignment_report_cli", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the alignment names found in a model.
    ListAlignments {
        input: String,
        /// Write the names as an `AlignmentName.json` job file instead of printing them.
        #[arg(long)]
        output: Option<String>,
    },
    /// Derive the main points of one alignment and write them as a table.
    Report(ReportArgs),
    /// Format a raw station as major+minor, or parse it back with --parse.
    Station {
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long, default_value_t = 1000.0)]
        increment: f64,
        #[arg(long)]
        parse: bool,
    },
    /// Convert a LandXML file to a JSON alignment model.
    Convert { input: String, output: String },
}

#[derive(Args)]
struct ReportArgs {
    input: String,
    /// Alignment name.
    #[arg(long, conflicts_with = "request", required_unless_present = "request")]
    name: Option<String>,
    /// `AlignmentNameForReport.json` job file naming the alignment.
    #[arg(long)]
    request: Option<String>,
    #[arg(long, default_value = "Report.xlsx")]
    output: String,
    /// Output format; inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Overrides the alignment's station-index increment.
    #[arg(long)]
    station_increment: Option<f64>,
    #[arg(long, value_enum, default_value_t = HeaderArg::Ja)]
    header: HeaderArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ReportFormat::Xlsx,
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HeaderArg {
    Ja,
    En,
}

impl From<HeaderArg> for HeaderLanguage {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::Ja => HeaderLanguage::Japanese,
            HeaderArg::En => HeaderLanguage::English,
        }
    }
}

fn init_logging() {
    if let Ok(path) = std::env::var("ALIGNMENT_REPORT_LOG") {
        match File::create(&path) {
            Ok(file) => {
                env_logger::Builder::from_default_env()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path, e);
                env_logger::Builder::from_default_env().init();
            }
        }
    } else {
        env_logger::Builder::from_default_env().init();
    }
}

/// `.xml` inputs are LandXML, everything else a JSON model.
fn read_model(path: &str) -> Result<AlignmentSet> {
    if path.to_ascii_lowercase().ends_with(".xml") {
        read_landxml_alignments(path)
    } else {
        read_alignments_json(path)
    }
}

fn report(args: ReportArgs) -> Result<()> {
    let set = read_model(&args.input)?;
    let name = match (args.name, args.request) {
        (Some(name), _) => name,
        (None, Some(request)) => read_report_request(&request)?.name,
        (None, None) => {
            return Err(Error::InvalidConfiguration(
                "either --name or --request is required".to_string(),
            ))
        }
    };
    let options = ReportOptions {
        header: args.header.into(),
        station_increment: args.station_increment,
    };
    let points = build_report(&set, &name, &options)?;
    let format = match args.format {
        Some(f) => f.into(),
        None => ReportFormat::from_path(&args.output)?,
    };
    write_report(&args.output, format, &options.header.labels(), &points)?;
    info!("{} main points of {} written to {}", points.len(), name, args.output);
    println!("Wrote {}", args.output);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ListAlignments { input, output } => {
            let set = read_model(&input)?;
            match output {
                Some(path) => {
                    write_alignment_names(&path, &AlignmentNames { name: set.names() })?;
                    println!("Wrote {}", path);
                }
                None => {
                    for name in set.names() {
                        println!("{}", name);
                    }
                }
            }
        }
        Commands::Report(args) => report(args)?,
        Commands::Station {
            value,
            increment,
            parse,
        } => {
            if parse {
                println!("{}", parse_station(&value, increment)?);
            } else {
                let station: f64 = value
                    .trim()
                    .parse()
                    .map_err(|e| Error::Parse(format!("station {value:?}: {e}")))?;
                println!("{}", format_station(station, increment)?);
            }
        }
        Commands::Convert { input, output } => {
            let set = read_landxml_alignments(&input)?;
            write_alignments_json(&output, &set)?;
            println!("Wrote {}", output);
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
