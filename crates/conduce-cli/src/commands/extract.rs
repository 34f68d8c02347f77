//! Extract command - pull product records from a single invoice PDF.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use conduce_core::extract::{InvoicePipeline, MergePolicy};
use conduce_core::models::config::ConduceConfig;
use conduce_core::models::ExtractionResult;
use conduce_core::pdf::{PdfSource, TextExtractor};
use conduce_core::serials::{ImeiAssociator, QuantityMode};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input invoice PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// How line items found by both layout grammars are merged
    #[arg(long, value_enum, default_value = "union")]
    merge_policy: MergePolicyArg,

    /// JSON file mapping model names to pasted serial/IMEI lists
    #[arg(long)]
    serials: Option<PathBuf>,

    /// Where record quantities come from when serials are attached
    #[arg(long, value_enum)]
    serial_quantity: Option<SerialQuantityArg>,

    /// Append a total units line to text output
    #[arg(long)]
    show_total: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text delivery note
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MergePolicyArg {
    /// Keep every match from both layout grammars
    Union,
    /// Drop exact duplicate (quantity, description) pairs
    DedupeExact,
}

impl From<MergePolicyArg> for MergePolicy {
    fn from(arg: MergePolicyArg) -> Self {
        match arg {
            MergePolicyArg::Union => MergePolicy::Union,
            MergePolicyArg::DedupeExact => MergePolicy::DedupeExact,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SerialQuantityArg {
    /// Keep the quantity parsed from the invoice
    Entered,
    /// Derive the quantity from the number of serials supplied
    FromCount,
}

impl From<SerialQuantityArg> for QuantityMode {
    fn from(arg: SerialQuantityArg) -> Self {
        match arg {
            SerialQuantityArg::Entered => QuantityMode::Entered,
            SerialQuantityArg::FromCount => QuantityMode::FromSerialCount,
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args.input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Extracting from: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut result = extract_pdf(&args, &config, &pb)?;

    // Attach serials supplied alongside the invoice
    if let Some(serials_path) = &args.serials {
        let mode = args.serial_quantity
            .map(QuantityMode::from)
            .unwrap_or(config.serials.quantity_mode);

        let associator = load_serials(serials_path, mode)?;
        let unmatched = associator.attach(&mut result);
        for model in &unmatched {
            pb.println(format!(
                "{} Serials reference a model not on the invoice: {}",
                style("⚠").yellow(),
                model
            ));
        }
    }

    pb.finish_with_message("Done");

    if !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    // Format output
    let output = format_result(&result, args.format, args.show_total)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn extract_pdf(
    args: &ExtractArgs,
    config: &ConduceConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ExtractionResult> {
    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(&args.input)?;
    let mut extractor = TextExtractor::with_config(config.pdf.clone());
    extractor.load(&data)?;

    debug!("PDF has {} pages", extractor.page_count());

    pb.set_message("Extracting text...");
    pb.set_position(40);

    let text = extractor.extract_text()?;

    pb.set_message("Parsing product records...");
    pb.set_position(70);

    let pipeline = InvoicePipeline::from_config(config)?
        .with_merge_policy(args.merge_policy.into());
    let result = pipeline.parse(&text)?;

    pb.set_position(100);

    Ok(result)
}

/// Read a serials file: a flat JSON object mapping model name to the
/// pasted serial/IMEI text for that model.
fn load_serials(path: &Path, mode: QuantityMode) -> anyhow::Result<ImeiAssociator> {
    if !path.exists() {
        anyhow::bail!("Serials file not found: {}", path.display());
    }

    let raw = fs::read_to_string(path)?;
    let entries: BTreeMap<String, String> = serde_json::from_str(&raw)?;

    Ok(ImeiAssociator::from_pasted(mode, entries))
}

pub(crate) fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    show_total: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            Ok(serde_json::to_string(result)?)
        }
        OutputFormat::Csv => {
            format_csv(result)
        }
        OutputFormat::Text => {
            Ok(format_text(result, show_total))
        }
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "client",
        "invoice_number",
        "quantity",
        "model",
        "serials",
    ])?;

    // One row per aggregated record
    for item in &result.items {
        wtr.write_record([
            &result.client,
            &result.invoice_number,
            &item.quantity.to_string(),
            &item.model,
            &item.serials.join(" "),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Render a plain-text delivery note in the layout receipts use.
fn format_text(result: &ExtractionResult, show_total: bool) -> String {
    let mut output = String::new();

    output.push_str("CONDUCE DE ENTREGA\n");
    output.push_str(&format!("FECHA: {}\n", chrono::Local::now().format("%d/%m/%Y")));
    output.push_str(&format!("CLIENTE: {}\n", result.client));
    output.push_str(&format!("FACTURA N°: {}\n", result.invoice_number));
    output.push_str("\n");

    output.push_str("CANT  DESCRIPCIÓN DEL MODELO / EQUIPO\n");
    for item in &result.items {
        output.push_str(&format!("{:>4}  {}\n", item.quantity, item.model));
    }

    if show_total {
        output.push_str(&format!("\nTOTAL UNIDADES: {}\n", result.total_units()));
    }

    let with_serials: Vec<_> = result.items.iter().filter(|i| !i.serials.is_empty()).collect();
    if !with_serials.is_empty() {
        output.push_str("\nDETALLE DE IMEIS\n");
        for item in with_serials {
            output.push_str(&format!("{}: {}\n", item.model, item.serials.join(", ")));
        }
    }

    output
}
