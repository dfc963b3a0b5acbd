use std::fs;
use std::io::IsTerminal;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dmxsync_core::{
    Applied, DEFAULT_PORT, DmxFrame, ReplayOptions, SharedUniverseTable, TableError,
    UniverseTable, multicast_group,
};
use glob::glob;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DMXSYNC_BUILD_COMMIT"),
    ")"
);
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("DMXSYNC_BUILD_COMMIT_FULL"),
    "\nbuilt: ",
    env!("DMXSYNC_BUILD_DATE")
);

/// Largest IPv4 UDP payload. Oversized value counts are capped by the
/// decoder, so the socket must never truncate a datagram.
const MAX_DATAGRAM_SIZE: usize = 65_507;
const RECV_TIMEOUT: Duration = Duration::from_millis(100);
/// Slots shown per universe in status lines.
const STATUS_PREVIEW_SLOTS: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "dmxsync")]
#[command(version = VERSION, long_version = LONG_VERSION)]
#[command(
    about = "E1.31 (sACN) receiver with synchronized universe commits.",
    long_about = None,
    after_help = "Examples:\n  dmxsync replay show.pcapng --first 1 --count 4 -o state.json\n  dmxsync replay show.pcapng --first 1 --count 4 --stdout --pretty\n  dmxsync listen --first 1 --count 4"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a PCAP/PCAPNG capture and report the resulting universe state.
    Replay(ReplayArgs),
    /// Receive live E1.31 traffic and log universe state periodically.
    Listen(ListenArgs),
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First managed universe
    #[arg(long)]
    first: u16,

    /// Number of consecutive universes to manage
    ///
    /// listen joins one multicast group per universe on a single socket.
    /// Linux caps that at net.ipv4.igmp_max_memberships (default 20).
    #[arg(long)]
    count: u16,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Path to a .pcap or .pcapng file
    input: PathBuf,

    #[command(flatten)]
    range: RangeArgs,

    /// Destination UDP port to replay
    #[arg(long, default_value_t = DEFAULT_PORT, conflicts_with = "any_port")]
    port: u16,

    /// Replay UDP datagrams regardless of destination port
    #[arg(long)]
    any_port: bool,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Channels kept per universe in the report
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u16).range(0..=512))]
    channels: u16,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct ListenArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Local address to bind
    #[arg(long, default_value_t = Ipv4Addr::UNSPECIFIED)]
    bind: Ipv4Addr,

    /// UDP port to bind
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Interface address used for multicast joins
    #[arg(long, default_value_t = Ipv4Addr::UNSPECIFIED)]
    interface: Ipv4Addr,

    /// Do not join the per-universe multicast groups (unicast only)
    #[arg(long)]
    no_multicast: bool,

    /// Status interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Stop after this many seconds (runs until interrupted by default)
    #[arg(long)]
    duration_secs: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Replay(args) => cmd_replay(args),
        Commands::Listen(args) => cmd_listen(args),
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

fn init_tracing(verbose: bool) {
    let default = if verbose { "dmxsync=debug" } else { "dmxsync=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
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

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        CliError::new(
            format!("invalid universe range: {err}"),
            Some("--first must be 1..=63999 and --count at least 1".to_string()),
        )
    }
}

fn build_table(range: &RangeArgs) -> Result<UniverseTable, CliError> {
    Ok(UniverseTable::new(range.first, range.count)?)
}

fn cmd_replay(args: ReplayArgs) -> Result<(), CliError> {
    let mut table = build_table(&args.range)?;
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&resolved_input, &path)?;
        Some(path)
    };

    let options = ReplayOptions {
        port: if args.any_port { None } else { Some(args.port) },
        channels: usize::from(args.channels),
    };
    let rep = dmxsync_core::replay_pcap_file(&resolved_input, &mut table, &options)
        .with_context(|| format!("Failed to replay capture: {}", resolved_input.display()))?;
    let json = serialize_report(&rep, args.pretty)?;

    let Some(report_path) = report_path else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if !args.quiet {
        eprintln!("OK: report written -> {}", report_path.display());
    }
    Ok(())
}

fn cmd_listen(args: ListenArgs) -> Result<(), CliError> {
    let table = build_table(&args.range)?;
    let shared = SharedUniverseTable::new(table);

    let bind_addr = SocketAddrV4::new(args.bind, args.port);
    let socket = UdpSocket::bind(bind_addr).map_err(|err| {
        CliError::new(
            format!("failed to bind {bind_addr}: {err}"),
            Some("check that the port is free or pick another with --port".to_string()),
        )
    })?;
    socket
        .set_read_timeout(Some(RECV_TIMEOUT))
        .context("Failed to set socket read timeout")?;

    if !args.no_multicast {
        join_groups(&socket, &args.range, args.interface)?;
    }
    let local = socket.local_addr().context("Failed to read bound address")?;
    info!(
        addr = %local,
        first = args.range.first,
        count = args.range.count,
        multicast = !args.no_multicast,
        "listening"
    );

    let running = Arc::new(AtomicBool::new(true));
    let reporter = spawn_reporter(
        shared.clone(),
        Arc::clone(&running),
        Duration::from_millis(args.interval_ms),
    );

    let deadline = args
        .duration_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let stats = receive_loop(&socket, &shared, deadline);

    running.store(false, Ordering::Relaxed);
    if reporter.join().is_err() {
        warn!("status reporter panicked");
    }
    info!(
        datagrams = stats.datagrams,
        applied = stats.applied,
        ignored = stats.ignored,
        rejected = stats.rejected,
        "listener stopped"
    );
    Ok(())
}

fn join_groups(socket: &UdpSocket, range: &RangeArgs, interface: Ipv4Addr) -> Result<(), CliError> {
    for universe in range.first..range.first.saturating_add(range.count) {
        let group = multicast_group(universe);
        socket.join_multicast_v4(&group, &interface).map_err(|err| {
            CliError::new(
                format!("failed to join multicast group {group} for universe {universe}: {err}"),
                Some(
                    "use --interface to pick a NIC or --no-multicast for unicast; Linux allows \
                     net.ipv4.igmp_max_memberships groups per socket (default 20)"
                        .to_string(),
                ),
            )
        })?;
        debug!(universe, %group, "joined multicast group");
    }
    Ok(())
}

#[derive(Debug, Default)]
struct ListenStats {
    datagrams: u64,
    applied: u64,
    ignored: u64,
    rejected: u64,
}

fn receive_loop(
    socket: &UdpSocket,
    shared: &SharedUniverseTable,
    deadline: Option<Instant>,
) -> ListenStats {
    let mut stats = ListenStats::default();
    let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];

    while deadline.is_none_or(|deadline| Instant::now() < deadline) {
        let (len, src) = match socket.recv_from(&mut buffer) {
            Ok(result) => result,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
            Err(e) => {
                warn!(error = %e, "UDP receive failed");
                continue;
            }
        };
        stats.datagrams += 1;

        match shared.decode_and_apply(&buffer[..len]) {
            Ok(Applied::Ignored(reason)) => {
                stats.ignored += 1;
                debug!(%src, reason = reason.kind(), "packet ignored");
            }
            Ok(_) => stats.applied += 1,
            Err(_) => stats.rejected += 1,
        }
    }
    stats
}

fn spawn_reporter(
    shared: SharedUniverseTable,
    running: Arc<AtomicBool>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(interval);
            for (universe, frame) in shared.active_frames() {
                info!(
                    universe,
                    start_code = frame.start_code,
                    slots = %slot_preview(&frame),
                    "status"
                );
            }
        }
    })
}

fn slot_preview(frame: &DmxFrame) -> String {
    frame.slots[..STATUS_PREVIEW_SLOTS]
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn serialize_report(rep: &dmxsync_core::ReplayReport, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn ensure_distinct_output(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory is created later and cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
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

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
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
        n => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if n > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!("multiple files match pattern '{pattern}' ({n} matches); matches: {listed}"),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
