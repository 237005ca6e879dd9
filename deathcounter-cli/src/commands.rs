use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use deathcounter_config::DeathCounterConfig;
use deathcounter_core::{CounterStore, PlayerId};
use deathcounter_engine::DeathCounterRuntime;
use deathcounter_telemetry::{EventLogger, MetricsRecorder};

use crate::console::{ConsoleHost, ConsoleSession, HELP};
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file; defaults to `config/deathcounter.yaml` when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `storage.data_file`
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Print Prometheus metrics to stdout before exiting
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive console: players join, die and run commands
    Console,
    /// Replay a YAML scenario of deaths and commands
    Replay(ReplayArgs),
    /// Print the persisted death counts
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[arg(short, long)]
    pub scenario: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Only this player
    #[arg(short, long)]
    pub player: Option<PlayerId>,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => DeathCounterConfig::load_from_path(path),
        None => DeathCounterConfig::load(),
    }
    .context("Failed to load configuration")?;
    if let Some(data_file) = cli.data_file {
        config.storage.data_file = data_file;
    }

    EventLogger::init(&config.telemetry.log_level);

    let metrics = metrics_for(&config, cli.print_metrics)?;

    match cli.command {
        Commands::Console => run_console(&config, metrics.clone())?,
        Commands::Replay(args) => run_replay(&config, &args, metrics.clone())?,
        Commands::Show(args) => run_show(&config, &args)?,
    }

    if cli.print_metrics {
        if let Some(metrics) = &metrics {
            print!("{}", metrics.gather_metrics()?);
        }
    }
    Ok(())
}

/// `None` when metrics are disabled. `--print-metrics` then is an error.
fn metrics_for(
    config: &DeathCounterConfig,
    print_metrics: bool,
) -> anyhow::Result<Option<MetricsRecorder>> {
    if !config.telemetry.metrics_enabled {
        if print_metrics {
            bail!("--print-metrics requires telemetry.metrics_enabled");
        }
        return Ok(None);
    }
    let metrics = MetricsRecorder::new().context("Failed to register metrics")?;
    Ok(Some(metrics))
}

fn run_console(config: &DeathCounterConfig, metrics: Option<MetricsRecorder>) -> anyhow::Result<()> {
    let runtime = DeathCounterRuntime::start(config, metrics)?;
    let mut host = ConsoleHost::new(io::stdout());
    writeln!(host.out(), "{}", HELP)?;

    let mut session = ConsoleSession::new(runtime, host);
    session.run(io::stdin().lock())?;
    session.into_host().into_inner().flush()?;
    Ok(())
}

fn run_replay(
    config: &DeathCounterConfig,
    args: &ReplayArgs,
    metrics: Option<MetricsRecorder>,
) -> anyhow::Result<()> {
    let scenario = Scenario::load_from_file(&args.scenario)?;
    let mut runtime = DeathCounterRuntime::start(config, metrics)?;
    let mut host = ConsoleHost::new(BufWriter::new(io::stdout()));

    scenario.seat_players(&mut host)?;
    let handled = scenario.replay(&mut runtime, &mut host)?;
    host.into_inner().flush()?;

    info!(
        handled,
        players = runtime.handlers().store().len(),
        "Scenario replayed"
    );
    Ok(())
}

fn run_show(config: &DeathCounterConfig, args: &ShowArgs) -> anyhow::Result<()> {
    let mut store = CounterStore::new();
    let path = &config.storage.data_file;
    if store.try_load(path)?.is_none() {
        println!("No death counts at {}", path.display());
        return Ok(());
    }
    write_counts(&store, args.player.as_ref(), &mut io::stdout().lock())?;
    Ok(())
}

/// One `<uuid>\t<count>` line per player, highest count first.
fn write_counts<W: Write>(
    store: &CounterStore,
    player: Option<&PlayerId>,
    out: &mut W,
) -> io::Result<()> {
    match player {
        Some(player) => match store.get(player) {
            Some(count) => writeln!(out, "{}\t{}", player, count),
            None => writeln!(out, "{} not found", player),
        },
        None => {
            let mut rows: Vec<_> = store.iter().collect();
            rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (player, count) in rows {
                writeln!(out, "{}\t{}", player, count)?;
            }
            Ok(())
        }
    }
}
