use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::Config;
use tasks::TaskList;
use tui::App;

mod config;
mod logging;
mod tasks;
mod tui;

/// Terminal to-do list.
#[derive(Parser)]
#[command(name = "todo-tui", version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/todo-tui/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Write logs here instead of the configured file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with this task in the list (repeatable)
    #[arg(short, long = "task", value_name = "TITLE")]
    tasks: Vec<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = match (&cli.config, config::default_config_path()) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => path,
        (None, None) => return Ok(Config::default()),
    };
    Config::load(&path).context("could not load configuration")
}

fn seed_tasks(titles: &[String]) -> Result<TaskList> {
    let mut tasks = TaskList::new();
    for title in titles {
        tasks
            .add(title)
            .with_context(|| format!("cannot start with task {title:?}"))?;
    }
    Ok(tasks)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_path = cli.log_file.clone().unwrap_or_else(|| config.log_path());
    let filter = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    logging::init(&log_path, filter)?;

    let tasks = seed_tasks(&cli.tasks)?;
    info!(seeded = tasks.len(), "starting");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let app_result = App::new(tasks, config.ui).run(&mut terminal);
    ratatui::restore();
    app_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_repeated_tasks() {
        let cli = Cli::parse_from(["todo-tui", "-t", "Buy milk", "--task", "Walk dog", "-v"]);
        assert_eq!(cli.tasks, ["Buy milk", "Walk dog"]);
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn seed_tasks_in_order() -> Result<()> {
        let tasks = seed_tasks(&["Buy milk".to_string(), " Walk dog ".to_string()])?;
        let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, ["Buy milk", "Walk dog"]);
        Ok(())
    }

    #[test]
    fn blank_seed_task_is_an_error() {
        assert!(seed_tasks(&["ok".to_string(), "  ".to_string()]).is_err());
    }

    #[test]
    fn explicit_config_path_is_used() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntitle = \"Chores\"\n")?;

        let cli = Cli::parse_from(["todo-tui", "--config", path.to_str().unwrap_or_default()]);
        let config = load_config(&cli)?;
        assert_eq!(config.ui.title, "Chores");
        Ok(())
    }
}
