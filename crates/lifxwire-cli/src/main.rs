use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use lifxwire_core::{AnalysisConfig, ByteOrder, Packet, ProtocolError, Report};
use tracing::{debug, warn};

mod logging;

use logging::{LogFormat, LogLevel, init_logging};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("LIFXWIRE_BUILD_COMMIT_FULL"),
    "\nbuilt: ",
    env!("LIFXWIRE_BUILD_DATE"),
);

const SHORT_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LIFXWIRE_BUILD_COMMIT"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "lifxwire")]
#[command(version = SHORT_VERSION, long_version = LONG_VERSION)]
#[command(
    about = "Codec and offline capture analyzer for the LIFX LAN protocol.",
    long_about = None,
    after_help = "Examples:\n  lifxwire decode 24:00:00:34:02:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:02:00:00:00\n  lifxwire pcap analyse capture.pcapng -o report.json\n  lifxwire pcap analyze capture.pcap --stdout --any-port"
)]
struct Cli {
    /// Diagnostic verbosity (stderr)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Diagnostic format (stderr)
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one packet given as hex and print it as JSON.
    #[command(
        after_help = "Bytes may be separated by ':', '-' or spaces.\n\nExamples:\n  lifxwire decode 240000340200000000000000000000000000000000000000000000000000000002000000\n  lifxwire decode --pretty \"24 00 00 34 02 00 00 00 ...\""
    )]
    Decode(DecodeArgs),
    /// Operations on PCAP/PCAPNG inputs (offline-first).
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Analyse a capture file and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  lifxwire pcap analyse capture.pcapng -o report.json\n  lifxwire pcap analyze capture.pcap --stdout --pretty\n  lifxwire pcap analyse 'captures/*.pcapng' --any-port --stdout"
    )]
    Analyse(AnalyseArgs),
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum WireOrder {
    Little,
    Big,
}

impl From<WireOrder> for ByteOrder {
    fn from(order: WireOrder) -> Self {
        match order {
            WireOrder::Little => ByteOrder::Little,
            WireOrder::Big => ByteOrder::Big,
        }
    }
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Packet bytes as hex; several arguments are joined
    #[arg(required = true, num_args = 1..)]
    hex: Vec<String>,

    /// Byte order of multi-byte fields
    #[arg(long, value_enum, default_value = "little")]
    byte_order: WireOrder,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Path to a .pcap or .pcapng file
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if compliance violations are present
    #[arg(long)]
    strict: bool,

    /// List compliance violations after analysis
    #[arg(long)]
    list_violations: bool,

    /// UDP port carrying LIFX traffic
    #[arg(long, default_value_t = 56700, conflicts_with = "any_port")]
    port: u16,

    /// Decode every UDP datagram regardless of port
    #[arg(long)]
    any_port: bool,

    /// Byte order of multi-byte fields
    #[arg(long, value_enum, default_value = "little")]
    byte_order: WireOrder,
}

impl AnalyseArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            port: (!self.any_port).then_some(self.port),
            byte_order: self.byte_order.into(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
        Commands::Pcap { command } => match command {
            PcapCommands::Analyse(args) => cmd_pcap_analyse(args),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let bytes = parse_hex(&args.hex.join(" "))?;
    let order = ByteOrder::from(args.byte_order);
    let packet = Packet::from_bytes(&bytes, order).map_err(|err| decode_error(err, order))?;

    let declared = usize::from(packet.header.frame.size);
    if declared != bytes.len() {
        warn!(
            declared,
            actual = bytes.len(),
            "frame size differs from input length"
        );
    }
    debug!(
        message = packet.header.protocol_header.type_name(),
        size = bytes.len(),
        "packet decoded"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&packet)
    } else {
        serde_json::to_string(&packet)
    }
    .context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}

fn decode_error(err: ProtocolError, order: ByteOrder) -> CliError {
    let hint = match &err {
        ProtocolError::UnknownType { header, .. } => Some(format!(
            "header decoded (source {}, target {}); no payload is registered for this type",
            header.frame.source, header.frame_address.target
        )),
        ProtocolError::Io(_) => Some(format!(
            "input ends early; a packet is at least 36 bytes (byte order: {order})"
        )),
        _ => Some(format!("check the byte order (current: {order})")),
    };
    CliError::new(format!("decode failed: {err}"), hint)
}

fn parse_hex(input: &str) -> Result<Vec<u8>, CliError> {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| !matches!(c, ':' | '-') && !c.is_whitespace())
        .collect();
    let hint = || Some("expected hex digits, optionally separated by ':', '-' or spaces".to_string());
    if let Some(bad) = digits.iter().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CliError::new(format!("invalid hex digit '{bad}'"), hint()));
    }
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            format!("odd number of hex digits ({})", digits.len()),
            hint(),
        ));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text: String = pair.iter().collect();
            u8::from_str_radix(&text, 16)
                .map_err(|_| CliError::new(format!("invalid hex byte '{text}'"), hint()))
        })
        .collect()
}

fn cmd_pcap_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = match (&args.report, args.stdout) {
        (_, true) => None,
        (Some(path), false) => Some(path.clone()),
        (None, false) => {
            return Err(CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            ));
        }
    };
    if let Some(path) = report_path.as_ref() {
        ensure_distinct_output(path, &input_abs)?;
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", args.input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    let config = args.config();
    debug!(?config, input = %resolved_input.display(), "starting analysis");
    let rep = lifxwire_core::analyze_pcap_file(&resolved_input, &config)
        .context("PCAP/PCAPNG analysis failed")?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if args.list_violations && !args.quiet {
        print_violations(&rep);
    }
    if args.strict && has_violations(&rep) {
        return Err(CliError::new(
            "compliance violations detected",
            Some("use --list-violations to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Ok(report_dir) = fs::canonicalize(parent) else {
        // Directory is created later.
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let json = if pretty {
        serde_json::to_string_pretty(rep)
    } else {
        serde_json::to_string(rep)
    };
    Ok(json.context("JSON serialization failed")?)
}

fn has_violations(rep: &Report) -> bool {
    rep.compliance
        .iter()
        .any(|entry| !entry.violations.is_empty())
}

fn print_violations(rep: &Report) {
    eprintln!("Compliance violations:");
    for entry in &rep.compliance {
        for violation in &entry.violations {
            eprintln!(
                "  {} {} [{}] ({})",
                entry.protocol, violation.id, violation.severity, violation.count
            );
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, count, listed
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
