// adspend CLI - headless spend ingestion and workbook export

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use adspend_ingest::aggregate::build_tracker;
use adspend_ingest::budget::parse_budget;
use adspend_ingest::config::PipelineConfig;
use adspend_ingest::model::SpendRow;
use adspend_ingest::schema::BudgetLayout;
use adspend_io::store::{DirStore, SpendStore};
use adspend_io::xlsx::{self, SheetData, SheetSelector};
use adspend_io::ParseReport;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "adspend")]
#[command(about = "Media-spend ingestion and tracker workbook export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an unbilled workbook or CSV into the campaign tree (JSON)
    #[command(after_help = "\
Examples:
  adspend tracker unbilled.xlsx
  adspend tracker unbilled.csv --pretty
  adspend tracker unbilled.xlsx --config adspend.toml")]
    Tracker {
        /// Input workbook (.xlsx) or delimited text (.csv)
        file: PathBuf,

        /// Policy config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse a formatted annual budget sheet into budget campaigns (JSON)
    #[command(after_help = "\
Examples:
  adspend budget FormattedAnnualBudget.xlsx --sheet \"F&B\"
  adspend budget FormattedAnnualBudget.xlsx --pretty")]
    Budget {
        /// Input workbook (.xlsx)
        file: PathBuf,

        /// Sheet to read (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Policy config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Render an unbilled workbook into the formatted tracker workbook
    #[command(after_help = "\
Examples:
  adspend export unbilled.xlsx -o FormattedAnnualBudget.xlsx
  adspend export unbilled.xlsx --publish ./blobs")]
    Export {
        /// Input workbook (.xlsx) or delimited text (.csv)
        file: PathBuf,

        /// Output path
        #[arg(short, long, default_value = "FormattedAnnualBudget.xlsx")]
        out: PathBuf,

        /// Also publish the workbook into a blob directory
        #[arg(long)]
        publish: Option<PathBuf>,

        /// Policy config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Tracker { file, config, pretty } => {
            let config = load_config(config.as_deref())?;
            let (rows, report) = load_spend_rows(&file)?;
            print_report(&report);
            let campaigns = build_tracker(&rows, &config.tracker);
            print_json(&campaigns, pretty)
        }
        Commands::Budget { file, sheet, config, pretty } => {
            let config = load_config(config.as_deref())?;
            let bytes = read_file(&file)?;
            let selector = match sheet {
                Some(name) => SheetSelector::Name(name),
                None => SheetSelector::Index(0),
            };
            let table = xlsx::read_range(&bytes, &selector).map_err(|e| e.to_string())?;
            let campaigns = parse_budget(&table, &BudgetLayout::default(), &config.budget)
                .map_err(|e| e.to_string())?;
            print_json(&campaigns, pretty)
        }
        Commands::Export { file, out, publish, config } => {
            let config = load_config(config.as_deref())?;
            let (rows, report) = load_spend_rows(&file)?;
            print_report(&report);

            // One output sheet per division, in first-seen order.
            let mut divisions: Vec<String> = Vec::new();
            for row in &rows {
                if !divisions.contains(&row.division) {
                    divisions.push(row.division.clone());
                }
            }
            let sheets: Vec<SheetData> = divisions
                .iter()
                .map(|division| {
                    let division_rows: Vec<SpendRow> = rows
                        .iter()
                        .filter(|r| &r.division == division)
                        .cloned()
                        .collect();
                    SheetData {
                        sheet_name: division.clone(),
                        campaigns: build_tracker(&division_rows, &config.tracker),
                    }
                })
                .collect();

            let bytes = xlsx::write_tracker_workbook(&sheets)?;
            std::fs::write(&out, &bytes).map_err(|e| format!("{}: {e}", out.display()))?;
            eprintln!("wrote {} ({} bytes)", out.display(), bytes.len());

            if let Some(dir) = publish {
                let blob_name = out
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("FormattedAnnualBudget.xlsx");
                let location = DirStore::new(dir)
                    .put(blob_name, &bytes)
                    .map_err(|e| e.to_string())?;
                eprintln!("published to {location}");
            }
            Ok(())
        }
    }
}

fn load_spend_rows(file: &Path) -> Result<(Vec<SpendRow>, ParseReport), String> {
    let bytes = read_file(file)?;
    let is_csv = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let result = if is_csv {
        let label = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();
        adspend_io::csv::read_spend_rows(&bytes, &label)
    } else {
        xlsx::read_spend_rows(&bytes)
    };
    result.map_err(|e| e.to_string())
}

fn read_file(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, String> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p).map_err(|e| format!("{}: {e}", p.display()))?;
            PipelineConfig::from_toml(&text).map_err(|e| e.to_string())
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn print_report(report: &ParseReport) {
    eprintln!("{}", report.summary());
    if let Some(warnings) = report.warning_summary() {
        eprintln!("warnings: {warnings}");
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
