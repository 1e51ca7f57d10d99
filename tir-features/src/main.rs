use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use tir_features::batch::{run_batch, BatchItem, ItemFailure};
use tir_features::config::{FeatureConfig, Pos1Anchor, StartWindow};
use tir_features::features::{FeatureExtractor, SCHEMA};
use tir_features::fold::{FoldingOracle, Retrying, RnaFold};
use tir_features::io::fasta::{SequenceReader, SequenceRecord};
use tir_features::io::table;
use tir_features::model::{LinearModel, RegressionModel};
use tir_features::report::RunSummary;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "tir-features", author, version, about = "mRNA feature extraction for translation initiation rate models", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the feature table (CSV) from sequences
    Extract {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Extract features and score them with a linear model (JSON weights)
    Predict {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        engine: EngineArgs,
        /// Model weight file
        #[arg(short = 'm', long = "model")]
        model: PathBuf,
    },
    /// Print the ordered feature schema
    Schema,
    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// FASTA or newline-delimited sequence file ("-" for stdin)
    input: Option<String>,
    /// A single sequence given on the command line
    #[arg(short = 's', long = "sequence", conflicts_with = "input")]
    sequence: Option<String>,
    /// Zero-based start codon position (with --sequence)
    #[arg(long, requires = "sequence")]
    start: Option<usize>,
    /// Zero-based stop codon position (with --sequence)
    #[arg(long, requires = "sequence")]
    stop: Option<usize>,
    /// Output CSV path (stdout if omitted)
    #[arg(short, long)]
    out: Option<String>,
    /// Write failed items as TSV
    #[arg(long)]
    failures: Option<String>,
    /// Write a JSON run summary
    #[arg(long)]
    summary: Option<String>,
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// TOML configuration file; flags below override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
    /// Constant added to the Kozak consensus score
    #[arg(long = "kozak-baseline")]
    kozak_baseline: Option<u32>,
    #[arg(long = "pos1-anchor", value_enum)]
    pos1_anchor: Option<Pos1Anchor>,
    #[arg(long = "start-window", value_enum)]
    start_window: Option<StartWindow>,
    #[arg(long = "five-prime-len")]
    five_prime_len: Option<usize>,
    /// Accept DNA input and transcribe T to U
    #[arg(long = "dna")]
    dna: bool,
    /// RNAfold binary
    #[arg(long = "rnafold")]
    rnafold: Option<String>,
    #[arg(long = "fold-timeout-ms")]
    fold_timeout_ms: Option<u64>,
    #[arg(long = "max-retries")]
    max_retries: Option<u32>,
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    threads: usize,
}

impl EngineArgs {
    fn resolve(&self) -> Result<FeatureConfig> {
        let mut cfg = match &self.config {
            Some(p) => FeatureConfig::load(p)?,
            None => FeatureConfig::default(),
        };
        if let Some(v) = self.kozak_baseline {
            cfg.kozak.baseline = v;
        }
        if let Some(v) = self.pos1_anchor {
            cfg.kozak.pos1_anchor = v;
        }
        if let Some(v) = self.start_window {
            cfg.windows.start_window = v;
        }
        if let Some(v) = self.five_prime_len {
            cfg.windows.five_prime_len = v;
        }
        if self.dna {
            cfg.transcribe_dna = true;
        }
        if let Some(v) = &self.rnafold {
            cfg.oracle.binary = v.clone();
        }
        if let Some(v) = self.fold_timeout_ms {
            cfg.oracle.timeout_ms = v;
        }
        if let Some(v) = self.max_retries {
            cfg.oracle.max_retries = v;
        }
        if cfg.windows.five_prime_len == 0 {
            bail!("five_prime_len must be positive");
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Extract { input, engine } => run_extract(&input, &engine, None),
        Commands::Predict { input, engine, model } => run_extract(&input, &engine, Some(&model)),
        Commands::Schema => {
            for name in SCHEMA {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Config { engine } => {
            print!("{}", engine.resolve()?.to_toml_string()?);
            Ok(())
        }
    }
}

fn run_extract(input: &InputArgs, engine: &EngineArgs, model_path: Option<&PathBuf>) -> Result<()> {
    let cfg = engine.resolve()?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(engine.threads)
        .build_global()
        .context("cannot configure thread pool")?;

    // 模型在处理前加载一次，之后只读共享
    let model = model_path
        .map(|p| LinearModel::load(p).with_context(|| format!("cannot load model '{}'", p.display())))
        .transpose()?;

    let items = load_items(input)?;
    log::info!("loaded {} sequences", items.len());

    let rnafold = RnaFold::new(cfg.oracle.binary.clone(), Duration::from_millis(cfg.oracle.timeout_ms));
    if !rnafold.is_available() {
        log::warn!("'{}' is not runnable; folding energies will fail per item", rnafold.binary_path());
    }
    let oracle = Retrying::new(rnafold, cfg.oracle.max_retries, Duration::from_millis(cfg.oracle.backoff_ms));
    let extractor = FeatureExtractor::new(&cfg, &oracle);

    let report = run_batch(&extractor, items);

    let predictions = model.as_ref().map(|m| {
        let rows: Vec<_> = report.successes().map(|s| s.record.features.to_row()).collect();
        m.predict(&rows)
    });

    let out: Box<dyn Write> = if let Some(p) = &input.out {
        Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p))?,
        ))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };
    table::write_feature_csv(out, &report, predictions.as_deref())?;

    let failures: Vec<&ItemFailure> = report.failures().collect();
    if let Some(p) = &input.failures {
        let f = std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p))?;
        table::write_failures_tsv(std::io::BufWriter::new(f), &failures)?;
    }
    if let Some(p) = &input.summary {
        RunSummary::new(input.input.clone(), &cfg, oracle.name(), &report)
            .save_to_file(p)
            .with_context(|| format!("cannot write summary '{}'", p))?;
    }

    log::info!(
        "processed {} sequences: {} ok ({} degraded), {} failed",
        report.len(),
        report.n_ok(),
        report.n_degraded(),
        report.n_failed()
    );
    if !report.is_empty() && report.n_ok() == 0 {
        bail!("no feature vector could be computed ({} failures)", failures.len());
    }
    Ok(())
}

fn load_items(input: &InputArgs) -> Result<Vec<BatchItem>> {
    if let Some(seq) = &input.sequence {
        let mut rec = SequenceRecord::new("input", seq.trim().as_bytes().to_vec());
        rec.start = input.start;
        rec.stop = input.stop;
        return Ok(vec![rec.into()]);
    }

    let path = match input.input.as_deref() {
        Some(p) => p,
        None => bail!("no input: give a sequence file or --sequence"),
    };
    let reader: Box<dyn BufRead> = if path == "-" {
        Box::new(std::io::BufReader::new(std::io::stdin()))
    } else {
        let fh = std::fs::File::open(path).map_err(|e| anyhow::anyhow!("cannot open input '{}': {}", path, e))?;
        Box::new(std::io::BufReader::new(fh))
    };
    let records = SequenceReader::new(reader).read_all()?;
    if records.is_empty() {
        bail!("input '{}' contains no sequences", path);
    }
    Ok(records.into_iter().map(BatchItem::from).collect())
}
