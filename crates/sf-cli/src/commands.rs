//! Subcommand implementations.
//!
//! Each command writes its user-facing output to the supplied writer; logs go
//! to stderr through `tracing`.

use anyhow::{bail, Context, Result};
use clap::Args;
use futures::StreamExt;
use serde::Deserialize;
use sf_crypto::{Ed25519KeyPair, SymmetricKey, SECRET_KEY_LEN};
use sf_envelope::{
    CounterNonceSource, EnvelopeBuildApi, EnvelopeConfig, EnvelopeDraft, EnvelopeReceiver,
    EnvelopeSender, EnvelopeVerifyApi, InMemoryKeyring, LoopbackNode, OsNonceSource, Publisher,
    SequenceCounter, Subscriber,
};
use sf_types::{AadExtra, RawEnvelope};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Arguments for `keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// File to write the hex-encoded 32-byte secret seed to
    #[arg(long)]
    pub out: PathBuf,
}

/// Arguments for `build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Secret key file written by `keygen`
    #[arg(long, env = "SF_KEY_FILE")]
    pub key: PathBuf,

    /// Topic to publish on
    #[arg(long)]
    pub topic: String,

    /// Message text
    #[arg(long)]
    pub message: String,

    /// Sequence number to assign
    #[arg(long, default_value_t = 1)]
    pub seq: u64,

    /// Symmetric key version; 0 sends the payload unencrypted
    #[arg(long, default_value_t = 0)]
    pub key_version: u32,

    /// Keyring JSON file (`{"1": "<hex key>"}`)
    #[arg(long, env = "SF_KEYRING")]
    pub keyring: Option<PathBuf>,

    /// Tenant id bound into the associated data
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// Content type bound into the associated data
    #[arg(long)]
    pub content_type: Option<String>,
}

/// Arguments for `verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// JSON file holding one envelope or an array of envelopes
    #[arg(long)]
    pub input: PathBuf,

    /// Keyring JSON file
    #[arg(long, env = "SF_KEYRING")]
    pub keyring: Option<PathBuf>,

    /// Replay window width
    #[arg(long, env = "SF_REPLAY_WINDOW", default_value_t = 64)]
    pub window: u32,
}

/// Arguments for `demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Topic to publish on
    #[arg(long, default_value = "demo.messages")]
    pub topic: String,

    /// Message text
    #[arg(long, default_value = "Hello from Rust!")]
    pub message: String,

    /// Number of messages
    #[arg(long, default_value_t = 3)]
    pub count: u32,

    /// Encrypt under a freshly generated key (version 1)
    #[arg(long)]
    pub encrypt: bool,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    pub metrics: bool,
}

/// Outcome counts of `verify`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifySummary {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnvelopeInput {
    Many(Vec<RawEnvelope>),
    One(RawEnvelope),
}

/// Read a secret seed file.
///
/// Exactly 32 bytes is a raw seed. Otherwise the trimmed contents must be
/// exactly 64 hex characters.
pub fn load_secret(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("reading key file {}", path.display()))?;
    if bytes.len() == SECRET_KEY_LEN {
        return Ok(bytes);
    }

    let text = std::str::from_utf8(&bytes)
        .ok()
        .map(str::trim)
        .filter(|text| text.len() == SECRET_KEY_LEN * 2);
    match text {
        Some(text) => hex::decode(text)
            .with_context(|| format!("key file {} is not valid hex", path.display())),
        None => bail!(
            "key file {} must hold {} raw bytes or {} hex characters",
            path.display(),
            SECRET_KEY_LEN,
            SECRET_KEY_LEN * 2
        ),
    }
}

/// Write a secret file readable only by its owner.
fn write_secret(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all(contents)
        .with_context(|| format!("writing {}", path.display()))
}

fn load_keyring(path: Option<&Path>) -> Result<InMemoryKeyring> {
    match path {
        None => Ok(InMemoryKeyring::new()),
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading keyring {}", path.display()))?;
            InMemoryKeyring::from_json(&json)
                .with_context(|| format!("parsing keyring {}", path.display()))
        }
    }
}

/// Generate a signing key and print its public key.
pub fn keygen(args: &KeygenArgs, out: &mut impl Write) -> Result<()> {
    let keypair = Ed25519KeyPair::generate().context("generating signing key")?;
    write_secret(
        &args.out,
        format!("{}\n", hex::encode(keypair.to_seed())).as_bytes(),
    )?;

    let public_key = hex::encode(keypair.public_key().as_bytes());
    info!(path = %args.out.display(), "Signing key written");
    writeln!(out, "{public_key}")?;
    Ok(())
}

/// Build one envelope and print it as JSON.
pub fn build(args: &BuildArgs, out: &mut impl Write) -> Result<()> {
    let secret = load_secret(&args.key)?;
    let keys = load_keyring(args.keyring.as_deref())?;
    let config = EnvelopeConfig::from_env().context("loading envelope configuration")?;

    let counter = SequenceCounter::starting_at(args.seq).context("invalid --seq")?;
    let sender = EnvelopeSender::from_secret_key(&secret, OsNonceSource, keys, &config)
        .context("loading signing key")?
        .with_counter(counter);

    let extra = AadExtra {
        tenant_id: args.tenant_id.clone(),
        content_type: args.content_type.clone(),
    };
    let draft = EnvelopeDraft::plaintext(&args.topic, args.message.as_bytes(), &extra)
        .with_key_version(args.key_version);

    let envelope = sender
        .build_envelope(&draft)
        .context("building envelope")?;
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}

/// Verify envelopes in file order against one replay store.
pub fn verify(args: &VerifyArgs, out: &mut impl Write) -> Result<VerifySummary> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let input: EnvelopeInput = serde_json::from_str(&json).context("parsing envelopes")?;
    let envelopes = match input {
        EnvelopeInput::Many(many) => many,
        EnvelopeInput::One(one) => vec![one],
    };

    let keys = load_keyring(args.keyring.as_deref())?;
    let config = EnvelopeConfig::from_env()
        .context("loading envelope configuration")?
        .with_replay_window_width(args.window);
    let receiver = EnvelopeReceiver::with_default_store(keys, config)?;

    let mut summary = VerifySummary::default();
    for (index, raw) in envelopes.into_iter().enumerate() {
        match receiver.verify_raw(raw) {
            Ok(accepted) => {
                summary.accepted += 1;
                writeln!(
                    out,
                    "{index}: ACCEPT seq={} topic={} msg_id={} payload={:?}",
                    accepted.sequence_number,
                    accepted.topic,
                    accepted.message_id,
                    String::from_utf8_lossy(&accepted.plaintext)
                )?;
            }
            Err(rejection) => {
                summary.rejected += 1;
                writeln!(
                    out,
                    "{index}: REJECT {} seq={} sender={}",
                    rejection.reason,
                    rejection.sequence_number,
                    rejection.sender_fingerprint()
                )?;
            }
        }
    }
    Ok(summary)
}

/// Publish and receive `count` messages over a loopback node.
pub async fn demo(args: &DemoArgs, out: &mut impl Write) -> Result<()> {
    let config = EnvelopeConfig::from_env().context("loading envelope configuration")?;
    let sender_keys = InMemoryKeyring::new();
    let receiver_keys = InMemoryKeyring::new();
    let key_version = if args.encrypt {
        let key = SymmetricKey::generate().context("generating symmetric key")?;
        sender_keys.insert(1, key.clone())?;
        receiver_keys.insert(1, key)?;
        1
    } else {
        0
    };

    let node = Arc::new(LoopbackNode::new());
    let keypair = Ed25519KeyPair::generate().context("generating signing key")?;
    let sender = EnvelopeSender::new(keypair, CounterNonceSource::new(), sender_keys, &config);
    let receiver = Arc::new(EnvelopeReceiver::with_default_store(receiver_keys, config)?);

    let subscriber = Subscriber::new(receiver, Arc::clone(&node));
    let mut deliveries = subscriber.subscribe(&args.topic).await?;
    let publisher = Publisher::new(sender, Arc::clone(&node));

    writeln!(out, "sender {}", publisher.sender().public_key())?;
    let extra = AadExtra::default();
    let draft = EnvelopeDraft::plaintext(&args.topic, args.message.as_bytes(), &extra)
        .with_key_version(key_version);

    for _ in 0..args.count {
        let message_id = publisher.publish(&draft).await?;
        let Some(outcome) = deliveries.next().await else {
            bail!("subscription closed before message {message_id} arrived");
        };
        match outcome {
            Ok(accepted) => writeln!(
                out,
                "received seq={} msg_id={} payload={:?}",
                accepted.sequence_number,
                accepted.message_id,
                String::from_utf8_lossy(&accepted.plaintext)
            )?,
            Err(rejection) => writeln!(out, "rejected: {rejection}")?,
        }
    }

    let stats = publisher.stats().await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;

    if args.metrics {
        write!(out, "{}", sf_telemetry::gather_metrics()?)?;
    }
    Ok(())
}
