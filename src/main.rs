use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use nodecanvas::config::EditorConfig;
use nodecanvas::replay::ReplayScript;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay editor commands against a node graph and print it as JSON", long_about = None)]
struct Cli {
    /// Replay script with `templates`, `document` and `commands`
    #[arg(value_name = "SESSION_FILE")]
    session_file: Utf8PathBuf,

    /// Editor config JSON (defaults apply when omitted)
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<Utf8PathBuf>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Also print the rejected commands
    #[arg(long)]
    report: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let script = ReplayScript::load(&cli.session_file)?;
    let report = script.run(config);

    let json = match (cli.report, cli.compact) {
        (true, true) => serde_json::to_string(&report),
        (true, false) => serde_json::to_string_pretty(&report),
        (false, true) => serde_json::to_string(&report.document),
        (false, false) => serde_json::to_string_pretty(&report.document),
    }
    .context("Serialize result")?;
    println!("{}", json);
    Ok(())
}
