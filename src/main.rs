mod aggregate;
mod config;
mod discover;
mod error;
mod extract;
mod report;
mod schedule;
mod signals;

use clap::Parser;
use error::RunError;
use extract::ExtractionTask;
use std::path::PathBuf;

/// Sum Heroes of the Storm playtime per hero: scan a replay folder,
/// parse every replay with heroprotocol in bounded concurrent batches,
/// and write the per-hero totals as JSON.
#[derive(Parser, Debug)]
#[command(name = "hots-playtime", version, about)]
pub struct Cli {
    /// Player name to look up in each replay's roster
    #[arg(value_name = "PLAYER")]
    player: String,

    /// Replay root folder (default: the game's replay location for this platform)
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Output file (default: hots-playtime-<date>.json)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, default_value = "playtime.toml")]
    config: PathBuf,

    /// Override number of sequential batches (overrides config)
    #[arg(long)]
    batches: Option<usize>,

    /// Override the parser command, whitespace-separated (overrides config)
    #[arg(long)]
    parser: Option<String>,

    /// Discover replays and probe the parser, don't extract
    #[arg(long)]
    dry_run: bool,

    /// Extra logging (per-file failures, batch boundaries)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

/// Merge config and CLI overrides into the effective settings.
fn resolve_config(cli: &Cli) -> Result<config::PlaytimeConfig, RunError> {
    let mut config = config::load(&cli.config).map_err(|message| RunError::Usage { message })?;

    if let Some(batches) = cli.batches {
        config.scheduler.batch_count = batches;
    }
    if let Some(parser) = &cli.parser {
        let mut words = parser.split_whitespace().map(str::to_string);
        config.parser.command = words.next().ok_or_else(|| RunError::Usage {
            message: "--parser must name a command".to_string(),
        })?;
        config.parser.args = words.collect();
    }
    if config.scheduler.batch_count == 0 {
        return Err(RunError::Usage {
            message: "batch count must be greater than 0".to_string(),
        });
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), RunError> {
    let config = resolve_config(&cli)?;
    let shutdown = signals::install();

    if !extract::probe(&config.parser).await {
        return Err(RunError::ParserMissing {
            command: config.parser.command.clone(),
        });
    }

    let files = match &cli.root {
        Some(root) => discover::from_root(root),
        None => discover::platform_default(),
    }
    .map_err(|message| RunError::Usage { message })?;

    tracing::info!(count = files.len(), "globbed replay files");
    tracing::info!(player = %cli.player, "searching for replays of player");

    if cli.dry_run {
        println!("Found {} replay files; parser is invocable.", files.len());
        return Ok(());
    }

    let tasks: Vec<ExtractionTask> = files
        .into_iter()
        .map(|file_path| ExtractionTask {
            file_path,
            player_name: cli.player.clone(),
        })
        .collect();

    let records = schedule::run_all(
        &config.parser,
        tasks,
        config.scheduler.batch_count,
        &shutdown,
    )
    .await
    .map_err(|_| RunError::Interrupted)?;

    let summary = aggregate::summarize(&records);
    println!("{}", report::render(&summary));

    let out_path = cli.output.unwrap_or_else(report::default_output_path);
    tracing::info!(output = %out_path.display(), "writing result JSON");
    report::write_summary(&summary, &out_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn player_name_is_required() {
        let err = Cli::try_parse_from(["hots-playtime"]).unwrap_err();
        // clap reports missing required arguments with exit code 2,
        // matching the CLI contract.
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn positional_arguments_parse_in_order() {
        let cli = cli(&["hots-playtime", "Alice", "/replays", "out.json"]);
        assert_eq!(cli.player, "Alice");
        assert_eq!(cli.root.unwrap(), PathBuf::from("/replays"));
        assert_eq!(cli.output.unwrap(), PathBuf::from("out.json"));
    }

    #[test]
    fn batches_flag_overrides_config() {
        let cli = cli(&["hots-playtime", "Alice", "--batches", "5"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.scheduler.batch_count, 5);
    }

    #[test]
    fn parser_flag_splits_command_and_args() {
        let cli = cli(&["hots-playtime", "Alice", "--parser", "python3 -m heroprotocol"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.parser.command, "python3");
        assert_eq!(config.parser.args, vec!["-m", "heroprotocol"]);
    }

    #[test]
    fn zero_batches_is_rejected() {
        let cli = cli(&["hots-playtime", "Alice", "--batches", "0"]);
        let err = resolve_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn end_to_end_sums_playtime_and_writes_json() {
        let dir = tempfile::TempDir::new().unwrap();

        // Fake parser: header duration comes from the replay file body,
        // so each stub file yields a distinguishable record.
        let config_path = dir.path().join("playtime.toml");
        std::fs::write(
            &config_path,
            r#"
[parser]
command = "sh"
args = ["-c", '''
case "$1" in
  --header) printf '{"m_elapsedGameLoops": %s}' "$(cat "$2")" ;;
  --details) printf '{"m_playerList": [{"m_name": "P1", "m_hero": "Raynor"}]}' ;;
  *) exit 0 ;;
esac
''']

[scheduler]
batch_count = 2
"#,
        )
        .unwrap();

        let replays = dir.path().join("replays");
        std::fs::create_dir(&replays).unwrap();
        std::fs::write(replays.join("a.StormReplay"), "960").unwrap();
        std::fs::write(replays.join("b.StormReplay"), "640").unwrap();
        // Non-numeric body breaks the header payload: sentinel record.
        std::fs::write(replays.join("c.StormReplay"), "garbage").unwrap();

        let out_path = dir.path().join("out.json");
        let cli = cli(&[
            "hots-playtime",
            "P1",
            replays.to_str().unwrap(),
            out_path.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ]);

        run(cli).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(value["heroes"]["Raynor"], 200.0);
        assert_eq!(value["heroes"]["Unknown"], 0.0);
        assert_eq!(value["duration"], 200.0);
        assert_eq!(value["matches"], 3);
    }

    #[test]
    fn defaults_apply_without_config_file() {
        let cli = cli(&["hots-playtime", "Alice", "--config", "/nonexistent/playtime.toml"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.scheduler.batch_count, 50);
        assert_eq!(config.parser.command, "python3");
    }
}
