//! paillier-tally: key generation and encrypted salary-tally simulation
//!
//! `keygen` writes a key pair to disk; `simulate` runs reporters against an
//! aggregator and checks the decrypted totals against the plaintext ones.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use eyre::{bail, eyre, Context, Result};
use num_bigint::BigUint;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use paillier_tally::math::EntropySource;
use paillier_tally::paillier::{encrypt, generate_with_attempts, KeyPair};
use paillier_tally::params::TallyParams;
use paillier_tally::tally::{Aggregator, Category, Reporter};

/// Salary bands as (min, max) inclusive, one per reporter in rotation
const SALARY_BANDS: [(u64, u64); 3] = [(95_000, 150_000), (65_000, 95_000), (25_000, 65_000)];

/// Employees per category per reporter, inclusive
const HEADCOUNT_RANGE: (usize, usize) = (10, 50);

#[derive(Parser)]
#[command(name = "paillier-tally")]
#[command(about = "Paillier encrypted-sum tally")]
#[command(version)]
struct Args {
    /// Log debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key pair and write it to a directory
    Keygen {
        /// Modulus size in bits (even, >= 8)
        #[arg(long, default_value = "2048")]
        bits: usize,

        /// Output directory for key files
        #[arg(long, default_value = "paillier_keys")]
        out: PathBuf,

        /// Random seed for deterministic key generation (optional)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate reporters submitting encrypted salaries and tally them
    Simulate {
        /// JSON file with TallyParams (optional)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Modulus size in bits, overrides the config file
        #[arg(long)]
        bits: Option<usize>,

        /// Number of reporting companies
        #[arg(long, default_value = "3")]
        reporters: usize,

        /// Random seed for keys and simulated salaries (optional)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the tally report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Keygen { bits, out, seed } => run_keygen(bits, &out, seed),
        Command::Simulate {
            config,
            bits,
            reporters,
            seed,
            json,
        } => {
            let mut params = match config {
                Some(path) => load_params(&path)?,
                None => TallyParams::demo_32(),
            };
            if let Some(bits) = bits {
                params.security_bits = bits;
            }
            run_simulate(&params, reporters, seed, json)
        }
    }
}

fn load_params(path: &Path) -> Result<TallyParams> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    let params: TallyParams = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    info!("Loaded parameters from {}", path.display());
    Ok(params)
}

fn run_keygen(bits: usize, out: &Path, seed: Option<u64>) -> Result<()> {
    let params = TallyParams::with_bits(bits);
    params
        .validate()
        .map_err(|e| eyre!("Invalid parameters: {}", e))?;

    info!("Generating {}-bit key pair...", bits);
    let start = Instant::now();
    let mut rng = EntropySource::from_optional_seed(seed);
    let keys = generate_with_attempts(bits, params.max_keygen_attempts, &mut rng)
        .wrap_err("Failed to generate key pair")?;
    info!("Key generation time: {:.2?}", start.elapsed());

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    let pk_path = out.join("public_key.bin");
    write_record(&pk_path, |w| keys.public.write_to(w))?;
    info!("Public key saved to {}", pk_path.display());

    info!("Saving secret key (keep this secure!)...");
    let sk_path = out.join("secret_key.bin");
    write_record(&sk_path, |w| keys.secret.write_to(w))?;

    save_metadata(out, &params, &keys)?;

    println!();
    println!("=== Key Generation Complete ===");
    println!("Output directory: {}", out.display());
    println!("Modulus bits: {}", keys.public.bits());
    Ok(())
}

fn write_record<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> paillier_tally::Result<()>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("Failed to encode {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn save_metadata(out: &Path, params: &TallyParams, keys: &KeyPair) -> Result<()> {
    #[derive(Serialize)]
    struct Metadata {
        version: String,
        security_bits: usize,
        modulus_bits: u64,
        modulus: String,
        codec_version: u8,
    }

    let metadata = Metadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        security_bits: params.security_bits,
        modulus_bits: keys.public.bits(),
        modulus: keys.public.n().to_string(),
        codec_version: paillier_tally::paillier::CODEC_VERSION,
    };

    let meta_path = out.join("metadata.json");
    let meta_file = File::create(&meta_path)?;
    serde_json::to_writer_pretty(meta_file, &metadata)?;

    info!("Metadata saved to {}", meta_path.display());
    Ok(())
}

/// One reporter's plaintext salaries per category
struct CompanyPayroll {
    salaries: Vec<(Category, Vec<u64>)>,
}

impl CompanyPayroll {
    fn random<R: Rng>(band: (u64, u64), rng: &mut R) -> Self {
        let salaries = Category::ALL
            .into_iter()
            .map(|category| {
                let headcount = rng.gen_range(HEADCOUNT_RANGE.0..=HEADCOUNT_RANGE.1);
                let values = (0..headcount)
                    .map(|_| rng.gen_range(band.0..=band.1))
                    .collect();
                (category, values)
            })
            .collect();
        Self { salaries }
    }
}

fn run_simulate(
    params: &TallyParams,
    reporters: usize,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    params
        .validate()
        .map_err(|e| eyre!("Invalid parameters: {}", e))?;
    if reporters == 0 {
        bail!("At least one reporter is required");
    }

    info!("Paillier tally simulation");
    info!("Modulus bits: {}", params.security_bits);
    info!("Reporters: {}", reporters);

    let mut rng = EntropySource::from_optional_seed(seed);

    let setup_start = Instant::now();
    let aggregator = Aggregator::new(params, &mut rng).wrap_err("Failed to start aggregator")?;
    info!("Setup time: {:.2?}", setup_start.elapsed());

    let payrolls: Vec<CompanyPayroll> = (0..reporters)
        .map(|i| CompanyPayroll::random(SALARY_BANDS[i % SALARY_BANDS.len()], &mut rng))
        .collect();

    let mut expected_sums = Category::ALL.map(|_| BigUint::from(0u32));
    let mut expected_counts = [0u64; Category::ALL.len()];
    for payroll in &payrolls {
        for (category, values) in &payroll.salaries {
            let slot = Category::ALL
                .iter()
                .position(|c| c == category)
                .ok_or_else(|| eyre!("Unknown category {}", category))?;
            expected_sums[slot] += values.iter().map(|&v| BigUint::from(v)).sum::<BigUint>();
            expected_counts[slot] += values.len() as u64;
        }
    }

    let largest = expected_sums.iter().map(|s| s.bits()).max().unwrap_or(0);
    if largest > params.safe_sum_bits() as u64 {
        warn!(
            "Plaintext sums need {} bits but the modulus only guarantees {}; totals may wrap",
            largest,
            params.safe_sum_bits()
        );
    }

    let report_start = Instant::now();
    for (i, payroll) in payrolls.iter().enumerate() {
        let reporter = Reporter::for_aggregator(&aggregator);
        for (category, values) in &payroll.salaries {
            reporter
                .report(&aggregator, *category, values.iter().copied(), &mut rng)
                .with_context(|| format!("Reporter {} failed to submit", i))?;
        }
    }
    info!("Reporting time: {:.2?}", report_start.elapsed());

    let probe = encrypt(aggregator.public_key(), &BigUint::from(0u32), &mut rng)?;
    let ciphertext_size = bincode::serialized_size(&probe)?;

    let tally_start = Instant::now();
    let report = aggregator.tally_report().wrap_err("Failed to tally")?;
    info!("Tally time: {:.2?}", tally_start.elapsed());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("=== Tally Complete ===");
        println!("Ciphertext size: {} bytes", ciphertext_size);
    }

    for (slot, category) in Category::ALL.into_iter().enumerate() {
        let tallied = report
            .get(category)
            .ok_or_else(|| eyre!("Missing total for category {}", category))?;
        if tallied.sum != expected_sums[slot] || tallied.count != expected_counts[slot] {
            bail!(
                "Category {} mismatch: tallied {} over {}, expected {} over {}",
                category,
                tallied.sum,
                tallied.count,
                expected_sums[slot],
                expected_counts[slot]
            );
        }
        if !json {
            let mean = tallied.mean().unwrap_or(0.0);
            println!(
                "Category {}: {} salaries, total {}, mean {:.2}",
                category, tallied.count, tallied.sum, mean
            );
        }
    }

    info!("Decrypted totals match plaintext totals");
    Ok(())
}
