//! Vouch protocol command-line node.
//!
//! Generates identities, signs and verifies claims, and runs trust
//! analysis over a JSON attestation file loaded into the in-memory store.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use vouch_crypto::{decrypt_seed, encrypt_seed, sign_claim, verify_claim, Keypair};
use vouch_model::{Attestation, AttestorType, Claim, Identity, PublicKey};
use vouch_trust::{
    analyze_agent, detect_all_rings, network_health, MemoryStore, TrustConfig,
};

/// Vouch Protocol Node
///
/// Signed skill attestations and trust-graph analysis.
#[derive(Parser, Debug)]
#[command(name = "vouch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VOUCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (plain, json)
    #[arg(long, env = "VOUCH_LOG_FORMAT", default_value = "plain")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new identity keypair
    Keygen {
        /// Human-readable name for the identity
        #[arg(long)]
        name: String,
        /// Identity type
        #[arg(long, value_enum, default_value_t = KindArg::Agent)]
        kind: KindArg,
        /// Encrypt the seed at rest with this passphrase
        #[arg(long)]
        passphrase: Option<String>,
        /// Where to write the identity file
        #[arg(long, default_value = "identity.json")]
        out: PathBuf,
    },
    /// Sign a claim file with a stored identity
    Sign {
        /// Claim JSON file
        #[arg(long)]
        claim: PathBuf,
        /// Identity file produced by keygen
        #[arg(long)]
        identity: PathBuf,
        /// Passphrase, if the identity's seed is encrypted
        #[arg(long)]
        passphrase: Option<String>,
        /// Output path; defaults to overwriting the claim file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Verify a signed claim file
    Verify {
        /// Claim JSON file
        #[arg(long)]
        claim: PathBuf,
    },
    /// Full trust analysis for one agent
    Analyze {
        /// Attestation store JSON file
        #[arg(long)]
        store: PathBuf,
        /// Public key of the agent to analyze
        #[arg(long)]
        pubkey: String,
    },
    /// Detect all attestation rings
    Rings {
        /// Attestation store JSON file
        #[arg(long)]
        store: PathBuf,
    },
    /// Network-wide ring statistics
    Health {
        /// Attestation store JSON file
        #[arg(long)]
        store: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Agent,
    Human,
}

impl From<KindArg> for AttestorType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Agent => AttestorType::Agent,
            KindArg::Human => AttestorType::Human,
        }
    }
}

/// On-disk identity: public record plus the (optionally encrypted) seed.
#[derive(Serialize, Deserialize)]
struct IdentityFile {
    identity: Identity,
    /// Hex-encoded raw seed. Present only for unencrypted identities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<String>,
    /// Hex-encoded encrypted seed blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encrypted_seed: Option<String>,
}

/// On-disk attestation store: claims plus revoked ids.
#[derive(Default, Serialize, Deserialize)]
struct StoreFile {
    attestations: Vec<Attestation>,
    #[serde(default)]
    revoked: Vec<String>,
}

fn setup_logging(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    match log_format.to_lowercase().as_str() {
        "json" => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .json()
                .flatten_event(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
        _ => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
    }

    Ok(())
}

fn load_store(path: &Path) -> Result<MemoryStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file {}", path.display()))?;
    let file: StoreFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse store file {}", path.display()))?;

    let mut store = MemoryStore::new();
    for attestation in file.attestations {
        let id = attestation.id.clone();
        store
            .insert(attestation)
            .with_context(|| format!("Invalid attestation {id}"))?;
    }
    for id in &file.revoked {
        if !store.revoke(id) {
            warn!(attestation_id = %id, "revoked id not present in store file");
        }
    }
    info!(attestations = store.len(), "loaded attestation store");
    Ok(store)
}

fn load_claim(path: &Path) -> Result<Claim> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read claim file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse claim file {}", path.display()))
}

fn load_keypair(path: &Path, passphrase: Option<&str>) -> Result<Keypair> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read identity file {}", path.display()))?;
    let file: IdentityFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse identity file {}", path.display()))?;

    let keypair = match (&file.seed, &file.encrypted_seed) {
        (Some(seed_hex), _) => {
            let bytes = hex::decode(seed_hex).context("Identity seed is not valid hex")?;
            let seed: [u8; 32] = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("Identity seed must be 32 bytes"))?;
            Keypair::from_seed(&seed)
        }
        (None, Some(blob_hex)) => {
            let passphrase =
                passphrase.context("Identity seed is encrypted — pass --passphrase")?;
            let blob = hex::decode(blob_hex).context("Encrypted seed is not valid hex")?;
            decrypt_seed(&blob, passphrase)?
        }
        (None, None) => bail!("Identity file carries no seed"),
    };

    if keypair.public_key() != file.identity.pubkey {
        bail!("Identity file seed does not match its declared public key");
    }
    Ok(keypair)
}

fn run_keygen(
    name: &str,
    kind: KindArg,
    passphrase: Option<&str>,
    out: &Path,
) -> Result<()> {
    let keypair = Keypair::generate();
    let identity = Identity::new(keypair.public_key(), name, kind.into());

    let file = match passphrase {
        Some(passphrase) => IdentityFile {
            identity,
            seed: None,
            encrypted_seed: Some(hex::encode(encrypt_seed(&keypair, passphrase)?)),
        },
        None => {
            warn!(
                "writing identity without passphrase — seed stored unencrypted; \
                 acceptable for automated agents, not recommended for humans"
            );
            IdentityFile {
                identity,
                seed: Some(hex::encode(keypair.to_seed())),
                encrypted_seed: None,
            }
        }
    };

    std::fs::write(out, serde_json::to_string_pretty(&file)?)
        .with_context(|| format!("Failed to write identity file {}", out.display()))?;
    info!(path = %out.display(), "identity written");
    println!("{}", keypair.public_key());
    Ok(())
}

fn run_sign(
    claim_path: &Path,
    identity_path: &Path,
    passphrase: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let claim = load_claim(claim_path)?;
    let keypair = load_keypair(identity_path, passphrase)?;
    let signed = sign_claim(&claim, &keypair)?;

    let out = out.unwrap_or(claim_path);
    std::fs::write(out, serde_json::to_string_pretty(&signed)?)
        .with_context(|| format!("Failed to write signed claim {}", out.display()))?;
    info!(path = %out.display(), id = signed.id(), "claim signed");
    Ok(())
}

fn run_verify(claim_path: &Path) -> Result<()> {
    let claim = load_claim(claim_path)?;
    verify_claim(&claim)?;
    println!("OK {}", claim.id());
    Ok(())
}

fn run_analyze(store_path: &Path, pubkey: &str) -> Result<()> {
    let store = load_store(store_path)?;
    let pubkey = PublicKey::parse(pubkey)?;
    let config = TrustConfig::default();
    let analysis = analyze_agent(&store, &pubkey, None, &config)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

fn run_rings(store_path: &Path) -> Result<()> {
    let store = load_store(store_path)?;
    let config = TrustConfig::default();
    let rings = detect_all_rings(&store, &config)?;
    println!("{}", serde_json::to_string_pretty(&rings)?);
    Ok(())
}

fn run_health(store_path: &Path) -> Result<()> {
    let store = load_store(store_path)?;
    let config = TrustConfig::default();
    let health = network_health(&store, &config)?;
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level, &args.log_format)?;

    match &args.command {
        Command::Keygen {
            name,
            kind,
            passphrase,
            out,
        } => run_keygen(name, *kind, passphrase.as_deref(), out),
        Command::Sign {
            claim,
            identity,
            passphrase,
            out,
        } => run_sign(claim, identity, passphrase.as_deref(), out.as_deref()),
        Command::Verify { claim } => run_verify(claim),
        Command::Analyze { store, pubkey } => run_analyze(store, pubkey),
        Command::Rings { store } => run_rings(store),
        Command::Health { store } => run_health(store),
    }
}
