use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use fastimagehash_core::{
    batch, discovery, logging, multi_hash_file, HashAlgorithm, MultiHashBundle, MultiHashConfig,
    WaveKernel,
};
use log::{info, LevelFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fastimagehash")]
#[command(about = "Compute perceptual hashes of image files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash image files and directories
    Hash {
        /// Image files or directories to hash
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        options: HashOptions,

        /// Maximum directory depth for scanning
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print bit-reversed hex
        #[arg(long)]
        reversed: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compare two images hash by hash
    Compare {
        first: PathBuf,
        second: PathBuf,

        #[command(flatten)]
        options: HashOptions,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "fastimagehash.json")]
        path: PathBuf,
    },
}

/// Hashing options; flags override the configuration file
#[derive(Args)]
struct HashOptions {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated algorithms (ahash, dhash, mhash, phash, whash)
    #[arg(short, long, value_delimiter = ',')]
    algorithms: Option<Vec<HashAlgorithm>>,

    /// Hash side N; hashes carry N² bits
    #[arg(short = 's', long)]
    hash_size: Option<u32>,

    /// pHash oversampling factor
    #[arg(long)]
    high_freq_factor: Option<u32>,

    /// whash sampling side (power of two)
    #[arg(long)]
    img_scale: Option<u32>,

    /// whash kernel (haar or db4)
    #[arg(long)]
    wave: Option<WaveKernel>,

    /// Keep the largest whash LL coefficient in the median
    #[arg(long)]
    keep_max_ll: bool,

    /// mhash block side in pixels
    #[arg(long)]
    block_size: Option<u32>,
}

impl HashOptions {
    fn resolve(&self) -> anyhow::Result<MultiHashConfig> {
        let mut config = match &self.config {
            Some(path) => MultiHashConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => MultiHashConfig::default(),
        };

        if let Some(algorithms) = &self.algorithms {
            config.algorithms = algorithms.clone();
        }
        if let Some(hash_size) = self.hash_size {
            config.hash_size = hash_size;
        }
        if let Some(factor) = self.high_freq_factor {
            config.high_freq_factor = factor;
        }
        if let Some(scale) = self.img_scale {
            config.img_scale = Some(scale);
        }
        if let Some(wave) = self.wave {
            config.wave = wave;
        }
        if self.keep_max_ll {
            config.remove_max_ll = false;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct HashRecord {
    path: PathBuf,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    hashes: BTreeMap<HashAlgorithm, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Comparison {
    algorithm: HashAlgorithm,
    distance: u32,
    similarity: f64,
}

fn hex_map(bundle: &MultiHashBundle, reversed: bool) -> BTreeMap<HashAlgorithm, String> {
    bundle
        .iter()
        .map(|(algorithm, hash)| {
            let hex = if reversed {
                hash.to_hex_reversed()
            } else {
                hash.to_hex()
            };
            (*algorithm, hex)
        })
        .collect()
}

fn init_logging(log_dir: Option<&PathBuf>, verbose: u8) -> anyhow::Result<()> {
    if let Some(dir) = log_dir {
        logging::init_logger(dir).map_err(|e| anyhow::anyhow!("{}", e))?;
        return Ok(());
    }

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(logging::LOG_LEVEL_ENV, "warn"),
    );
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.log_dir.as_ref(), cli.verbose)?;

    match cli.command {
        Commands::Hash {
            paths,
            options,
            max_depth,
            reversed,
            json,
        } => {
            let config = options.resolve()?;
            let images = discovery::discover_images(&paths, max_depth)?;
            info!("Hashing {} images", images.len());

            let results = batch::hash_files(&images, &config)?;
            let records: Vec<HashRecord> = results
                .into_iter()
                .map(|r| match r.result {
                    Ok(bundle) => HashRecord {
                        path: r.path,
                        hashes: hex_map(&bundle, reversed),
                        error: None,
                    },
                    Err(e) => HashRecord {
                        path: r.path,
                        hashes: BTreeMap::new(),
                        error: Some(e.to_string()),
                    },
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    match &record.error {
                        Some(e) => println!("{}\terror\t{}", record.path.display(), e),
                        None => {
                            for (algorithm, hex) in &record.hashes {
                                println!("{}\t{}\t{}", record.path.display(), algorithm, hex);
                            }
                        }
                    }
                }
            }

            let failed = records.iter().filter(|r| r.error.is_some()).count();
            if failed > 0 {
                bail!("{} of {} files failed", failed, records.len());
            }
            Ok(())
        }

        Commands::Compare {
            first,
            second,
            options,
            json,
        } => {
            let config = options.resolve()?;
            let a = multi_hash_file(&first, &config)
                .with_context(|| format!("hashing {}", first.display()))?;
            let b = multi_hash_file(&second, &config)
                .with_context(|| format!("hashing {}", second.display()))?;

            let mut comparisons = Vec::new();
            for (algorithm, hash) in &a {
                if let Some(other) = b.get(*algorithm) {
                    comparisons.push(Comparison {
                        algorithm: *algorithm,
                        distance: hash.distance(other)?,
                        similarity: hash.similarity(other)?,
                    });
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&comparisons)?);
            } else {
                for c in &comparisons {
                    println!("{}\t{}\t{:.1}%", c.algorithm, c.distance, c.similarity);
                }
            }
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = MultiHashConfig::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
