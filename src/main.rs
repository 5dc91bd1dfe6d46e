use anyhow::{Context, Result};
use clap::Parser;
use dedupe_lib::io::{read_records, write_annotated, write_edges_json, write_record_key, CsvColumns};
use dedupe_lib::models::{BlockingField, RecordId};
use dedupe_lib::pipeline::run_dedup_pipeline;
use dedupe_lib::utils::dedup_config::DedupConfig;
use dedupe_lib::utils::env::load_env;
use dedupe_lib::utils::get_memory_usage;
use dedupe_lib::utils::progress_bars::progress_config::{stage_bar, ProgressConfig};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Collapse duplicate site listings into golden records", long_about = None)]
struct DedupArgs {
    /// Input CSV with one site listing per row
    #[arg(long)]
    input: PathBuf,

    /// Output CSV mapping src_id to gld_id
    #[arg(long)]
    output: PathBuf,

    /// Write the dedup edge list as JSON
    #[arg(long)]
    edges: Option<PathBuf>,

    /// Write input rows with normalized fields and golden id
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long)]
    weight_site_name: Option<f64>,

    #[arg(long)]
    weight_address: Option<f64>,

    #[arg(long)]
    weight_phone: Option<f64>,

    /// Blocking field (zip_code, phone, site_name); repeat for several
    #[arg(long = "blocking-field")]
    blocking_fields: Vec<BlockingField>,

    #[arg(long)]
    max_concurrent_blocks: Option<usize>,

    #[arg(long, default_value = "Id")]
    id_column: String,

    #[arg(long, default_value = "Site name")]
    site_name_column: String,

    #[arg(long, default_value = "Address")]
    address_column: String,

    #[arg(long, default_value = "Zip")]
    zip_column: String,

    #[arg(long, default_value = "Phone")]
    phone_column: String,
}

impl DedupArgs {
    fn columns(&self) -> CsvColumns {
        CsvColumns {
            id: self.id_column.clone(),
            site_name: self.site_name_column.clone(),
            address: self.address_column.clone(),
            zip: self.zip_column.clone(),
            phone: self.phone_column.clone(),
        }
    }

    /// Defaults, then config file, then `DEDUP_*` environment, then flags.
    fn resolve_config(&self) -> Result<DedupConfig> {
        let mut config = match &self.config {
            Some(path) => DedupConfig::from_file(path)?,
            None => DedupConfig::default(),
        }
        .with_env_overrides();

        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(w) = self.weight_site_name {
            config.weights.site_name = w;
        }
        if let Some(w) = self.weight_address {
            config.weights.address = w;
        }
        if let Some(w) = self.weight_phone {
            config.weights.phone = w;
        }
        if !self.blocking_fields.is_empty() {
            config.blocking_fields = self.blocking_fields.clone();
        }
        if let Some(n) = self.max_concurrent_blocks {
            config.max_concurrent_blocks = n;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = DedupArgs::parse();
    info!("Starting site listing deduplication");

    let config = args.resolve_config()?;
    config.validate().context("Invalid dedup configuration")?;
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );
    let multi_progress = progress_config.create_multi_progress();
    let main_pb = stage_bar(multi_progress.as_ref(), 3, "Reading input...");

    let start = Instant::now();
    let records = read_records(&args.input, &args.columns())
        .with_context(|| format!("Failed to load records from {}", args.input.display()))?;
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Deduplicating...");
    }

    let detailed_progress = if progress_config.should_show_detailed() {
        multi_progress.as_ref()
    } else {
        None
    };
    let output = run_dedup_pipeline(&records, &config, detailed_progress)
        .await
        .context("Deduplication pipeline failed")?;
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Writing results...");
    }

    write_record_key(&args.output, &output.golden_ids).context("Failed to write record key")?;
    if let Some(path) = &args.edges {
        let record_ids: Vec<RecordId> = records.iter().map(|r| r.id.clone()).collect();
        write_edges_json(path, &output.edges, &record_ids).context("Failed to write edge list")?;
    }
    if let Some(path) = &args.annotated {
        write_annotated(path, &records, &output.normalized, &output.golden_ids)
            .context("Failed to write annotated records")?;
    }

    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.finish_with_message(format!(
            "Done: {} records -> {} golden records",
            records.len(),
            output.golden_ids.group_count()
        ));
    }

    info!(
        "Deduplication complete in {:.2?}: {} records, {} golden records ({} clusters, {} singletons)",
        start.elapsed(),
        records.len(),
        output.golden_ids.group_count(),
        output.stats.total_clusters,
        output.stats.singletons
    );
    if progress_config.should_show_memory() {
        info!("Memory usage: {} MB", get_memory_usage().await);
    }
    Ok(())
}
