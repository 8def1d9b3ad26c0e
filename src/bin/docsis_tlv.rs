//! CLI front end for `docsis_tlv`: parse, convert between formats, and validate DOCSIS /
//! PacketCable configuration files.
//!
//! Exit codes: `0` success, `1` generic failure (I/O, secret resolution, MIC generation),
//! `2` parse/codec failure, `3` validation failed, `4` validation failed specifically due to a
//! CM/CMTS MIC mismatch under `--strict --validate-mic`.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use docsis_tlv::{config_text, generate, mic, parse as parse_binary, structured, validate, Document};
use docsis_tlv::{DocsisVersion, PacketCableVersion};

#[derive(Parser)]
#[command(
    name = "docsis-tlv",
    version,
    about = "Parse, convert, and validate DOCSIS / PacketCable MTA configuration files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a configuration file and re-emit it in a (possibly different) format.
    Parse(IoArgs),
    /// Convert a configuration file between binary, JSON, YAML, and config text.
    Convert(IoArgs),
    /// Validate a configuration file against the schema registry, and optionally its MICs.
    Validate(ValidateArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Binary,
    Json,
    Yaml,
    ConfigText,
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input file path.
    #[arg(short, long)]
    input: PathBuf,
    /// Output file path; stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Input format.
    #[arg(short = 'f', long, value_enum)]
    from: Format,
    /// Output format.
    #[arg(short = 't', long, value_enum)]
    to: Format,
    /// DOCSIS version to interpret/emit the schema against, e.g. "3.1".
    #[arg(short = 'd', long, default_value = "3.1")]
    docsis_version: String,
    /// PacketCable version to interpret/emit MTA sub-TLVs against, e.g. "2.0".
    #[arg(short = 'p', long, default_value = "2.0")]
    packetcable_version: String,
    /// Recompute and append the CM and CMTS MICs (TLV 6/7) before writing output.
    #[arg(long)]
    add_mic: bool,
    /// Shared secret for --add-mic, as a literal string.
    #[arg(long)]
    secret: Option<String>,
    /// Shared secret for --add-mic, read from a file.
    #[arg(long)]
    secret_file: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ValidateArgs {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short = 'f', long, value_enum)]
    from: Format,
    #[arg(short = 'd', long, default_value = "3.1")]
    docsis_version: String,
    #[arg(short = 'p', long, default_value = "2.0")]
    packetcable_version: String,
    /// Escalate warnings to errors.
    #[arg(long)]
    strict: bool,
    /// Also check the CM and CMTS MICs against a shared secret.
    #[arg(long)]
    validate_mic: bool,
    #[arg(long)]
    secret: Option<String>,
    #[arg(long)]
    secret_file: Option<PathBuf>,
}

/// Distinguishes the exit code a failure should produce from the error message itself.
enum Failure {
    Io(anyhow::Error),
    Parse(anyhow::Error),
    Generic(anyhow::Error),
}

impl Failure {
    fn exit_code(&self) -> u8 {
        match self {
            Failure::Generic(_) => 1,
            Failure::Parse(_) => 2,
            Failure::Io(_) => 1,
        }
    }

    fn inner(&self) -> &anyhow::Error {
        match self {
            Failure::Io(e) | Failure::Parse(e) | Failure::Generic(e) => e,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(failure) => {
            eprintln!("error: {:#}", failure.inner());
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Failure> {
    match cli.command {
        Command::Parse(args) | Command::Convert(args) => run_convert(args),
        Command::Validate(args) => run_validate(args),
    }
}

fn parse_versions(docsis: &str, packetcable: &str) -> Result<(DocsisVersion, PacketCableVersion)> {
    let docsis_version = DocsisVersion::from_str(docsis)
        .map_err(|e| anyhow::anyhow!(e))
        .context("parsing --docsis-version")?;
    let packetcable_version = PacketCableVersion::from_str(packetcable)
        .map_err(|e| anyhow::anyhow!(e))
        .context("parsing --packetcable-version")?;
    Ok((docsis_version, packetcable_version))
}

fn resolve_secret(secret: Option<String>, secret_file: Option<PathBuf>) -> Result<Vec<u8>> {
    if let Some(s) = secret {
        return Ok(s.into_bytes());
    }
    if let Some(path) = secret_file {
        return fs::read(&path).with_context(|| format!("reading secret file {}", path.display()));
    }
    if let Ok(s) = std::env::var("DOCSIS_TLV_SECRET") {
        return Ok(s.into_bytes());
    }
    bail!("no shared secret provided: use --secret, --secret-file, or the DOCSIS_TLV_SECRET environment variable")
}

fn read_document(
    path: &PathBuf,
    format: Format,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> Result<Document, Failure> {
    let read = |p: &PathBuf| fs::read(p).with_context(|| format!("reading {}", p.display()));
    let read_to_string =
        |p: &PathBuf| fs::read_to_string(p).with_context(|| format!("reading {}", p.display()));

    match format {
        Format::Binary => {
            let bytes = read(path).map_err(Failure::Io)?;
            parse_binary(&bytes, docsis_version, packetcable_version)
                .map_err(|e| Failure::Parse(anyhow::anyhow!(e.to_string())))
        }
        Format::Json => {
            let text = read_to_string(path).map_err(Failure::Io)?;
            let doc = structured::from_json(&text).map_err(|e| Failure::Parse(anyhow::anyhow!(e.to_string())))?;
            structured::from_structured(&doc).map_err(|e| Failure::Parse(anyhow::anyhow!(e.to_string())))
        }
        Format::Yaml => {
            let text = read_to_string(path).map_err(Failure::Io)?;
            let doc = structured::from_yaml(&text).map_err(|e| Failure::Parse(anyhow::anyhow!(e.to_string())))?;
            structured::from_structured(&doc).map_err(|e| Failure::Parse(anyhow::anyhow!(e.to_string())))
        }
        Format::ConfigText => {
            let text = read_to_string(path).map_err(Failure::Io)?;
            config_text::parse(
                &text,
                docsis_version,
                packetcable_version,
                config_text::UnknownIdentifierPolicy::Permissive,
            )
            .map_err(|e| Failure::Parse(anyhow::anyhow!(e.to_string())))
        }
    }
}

fn write_document(
    doc: &Document,
    format: Format,
    output: &Option<PathBuf>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> Result<()> {
    let bytes: Vec<u8> = match format {
        Format::Binary => generate(doc).map_err(|e| anyhow::anyhow!(e.to_string()))?,
        Format::Json => {
            let structured = structured::to_structured(doc, docsis_version, Some(packetcable_version));
            structured::to_json(&structured)
                .map_err(|e| anyhow::anyhow!(e.to_string()))?
                .into_bytes()
        }
        Format::Yaml => {
            let structured = structured::to_structured(doc, docsis_version, Some(packetcable_version));
            structured::to_yaml(&structured)
                .map_err(|e| anyhow::anyhow!(e.to_string()))?
                .into_bytes()
        }
        Format::ConfigText => config_text::emit(doc, docsis_version, packetcable_version).into_bytes(),
    };
    match output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            std::io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}

fn run_convert(args: IoArgs) -> Result<ExitCode, Failure> {
    let (docsis_version, packetcable_version) =
        parse_versions(&args.docsis_version, &args.packetcable_version).map_err(Failure::Generic)?;
    let mut doc = read_document(&args.input, args.from, docsis_version, packetcable_version)?;

    if args.add_mic {
        let secret = resolve_secret(args.secret.clone(), args.secret_file.clone())
            .context("resolving --add-mic secret")
            .map_err(Failure::Generic)?;
        mic::generate_mics(&mut doc, &secret, &secret)
            .map_err(|e| Failure::Generic(anyhow::anyhow!(e.to_string())))?;
    }

    write_document(&doc, args.to, &args.output, docsis_version, packetcable_version).map_err(Failure::Io)?;
    Ok(ExitCode::SUCCESS)
}

/// Whether any MIC-related diagnostic in the set is severity `Error` (i.e. would fail even a
/// non-strict check), used to pick exit code 4 over the generic validation-failure code 3.
fn has_mic_error(diagnostics: &validate::Diagnostics) -> bool {
    diagnostics
        .errors()
        .any(|d| d.code == "cm-mic-invalid" || d.code == "cmts-mic-invalid")
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode, Failure> {
    let (docsis_version, packetcable_version) =
        parse_versions(&args.docsis_version, &args.packetcable_version).map_err(Failure::Generic)?;
    let doc = read_document(&args.input, args.from, docsis_version, packetcable_version)?;

    let mic_check = if args.validate_mic {
        let secret = resolve_secret(args.secret.clone(), args.secret_file.clone())
            .context("resolving --validate-mic secret")
            .map_err(Failure::Generic)?;
        if args.strict {
            validate::MicCheck::Strict {
                cm_secret: secret.clone(),
                cmts_secret: secret,
            }
        } else {
            validate::MicCheck::NonStrict {
                cm_secret: secret.clone(),
                cmts_secret: secret,
            }
        }
    } else {
        validate::MicCheck::Off
    };

    let options = validate::ValidateOptions {
        docsis_version,
        packetcable_version,
        strict: args.strict,
        mic_check,
        ..validate::ValidateOptions::default()
    };
    let diagnostics = validate::validate(&doc, &options);

    for diag in &diagnostics.items {
        println!("{:?} [{}] {} ({})", diag.severity, diag.code, diag.message, diag.path);
    }

    if diagnostics.is_valid(args.strict) {
        Ok(ExitCode::SUCCESS)
    } else if args.strict && has_mic_error(&diagnostics) {
        Ok(ExitCode::from(4))
    } else {
        Ok(ExitCode::from(3))
    }
}
