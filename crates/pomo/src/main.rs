//! pomo - Pomodoro timer for the terminal
//!
//! Usage:
//!   pomo run                     Run the timer interactively
//!   pomo status                  Show settings and today's statistics
//!   pomo stats [--reset]         Show or reset statistics
//!   pomo config show             Show settings
//!   pomo config set [OPTIONS]    Change durations and toggles
//!   pomo config preset NAME      Apply a preset (pomodoro, deep, quick)

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pomo_core::{format, Paths};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use pomo::{
    Command, Event, FileStore, Mode, Preset, Runtime, SessionConfig, SessionState,
    StatisticsRecord, SystemClock, Timer,
};

type AppTimer = Timer<FileStore, SystemClock>;

/// Pomo - Pomodoro timer with daily statistics
#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "Pomodoro timer with persistent settings and daily statistics")]
#[command(version)]
#[command(after_help = r#"INTERACTIVE KEYS (pomo run, then press Enter):
    <empty> / p   Start or pause
    r             Reset the current interval
    s             Skip to the next interval
    a             Toggle auto-start
    m             Toggle sound
    d             Toggle dark mode
    q             Quit

PRESETS:
    pomodoro      25 min work, 5 min break, 15 min long break (default)
    deep          90 min work, 20 min break, 30 min long break
    quick         15 min work, 3 min break, 10 min long break

EXAMPLES:
    pomo run                       # Start the interactive timer
    pomo config set --work 50      # 50-minute work sessions
    pomo config set --auto-start true
    pomo config preset deep        # Switch to deep work durations
    pomo stats --reset --yes       # Zero all statistics

Set RUST_LOG=pomo=debug to see state transitions on stderr.
"#)]
struct Cli {
    /// Directory holding settings and statistics
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer interactively
    #[command(alias = "r")]
    Run,

    /// Show settings and today's statistics
    #[command(alias = "st")]
    Status,

    /// Show statistics
    #[command(alias = "statistics")]
    Stats {
        /// Zero all statistics, including the lifetime count
        #[arg(long)]
        reset: bool,

        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current settings
    Show,

    /// Change individual settings
    Set {
        /// Work duration in minutes
        #[arg(long, value_name = "MINS")]
        work: Option<u32>,

        /// Short break duration in minutes
        #[arg(long = "break", value_name = "MINS")]
        short_break: Option<u32>,

        /// Long break duration in minutes
        #[arg(long, value_name = "MINS")]
        long: Option<u32>,

        /// Work sessions before a long break
        #[arg(long, value_name = "N")]
        sessions: Option<u32>,

        /// Start the next interval automatically
        #[arg(long, value_name = "BOOL")]
        auto_start: Option<bool>,

        /// Ring the terminal bell when a work session ends
        #[arg(long, value_name = "BOOL")]
        sound: Option<bool>,

        /// Use the dark color palette
        #[arg(long, value_name = "BOOL")]
        dark: Option<bool>,
    },

    /// Apply a duration preset
    Preset {
        /// pomodoro, deep or quick
        name: String,
    },
}

// ANSI color codes
const RED: &str = "\x1b[0;31m";
const GREEN: &str = "\x1b[0;32m";
const BLUE: &str = "\x1b[0;34m";
const CYAN: &str = "\x1b[0;36m";
const BRIGHT_RED: &str = "\x1b[0;91m";
const BRIGHT_GREEN: &str = "\x1b[0;92m";
const BRIGHT_BLUE: &str = "\x1b[0;94m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";
const BELL: &str = "\x07";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn mode_color(mode: Mode, dark: bool) -> &'static str {
    match (mode, dark) {
        (Mode::Work, false) => RED,
        (Mode::ShortBreak, false) => GREEN,
        (Mode::LongBreak, false) => BLUE,
        (Mode::Work, true) => BRIGHT_RED,
        (Mode::ShortBreak, true) => BRIGHT_GREEN,
        (Mode::LongBreak, true) => BRIGHT_BLUE,
    }
}

fn main() -> Result<()> {
    // stdout carries the timer display, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(|| Paths::new().data);
    let store = FileStore::new(&data_dir)?;
    let timer = Timer::load(store, SystemClock);

    match cli.command {
        Some(Commands::Run) => cmd_run(timer),
        Some(Commands::Status) => cmd_status(&timer),
        Some(Commands::Stats { reset, yes }) => cmd_stats(timer, reset, yes),
        Some(Commands::Config { action }) => match action {
            None | Some(ConfigAction::Show) => cmd_config_show(timer.config()),
            Some(ConfigAction::Set {
                work,
                short_break,
                long,
                sessions,
                auto_start,
                sound,
                dark,
            }) => {
                let current = *timer.config();
                let config = SessionConfig {
                    work_seconds: work.map_or(current.work_seconds, minutes),
                    break_seconds: short_break.map_or(current.break_seconds, minutes),
                    long_break_seconds: long.map_or(current.long_break_seconds, minutes),
                    sessions_before_long: sessions.unwrap_or(current.sessions_before_long),
                    auto_start: auto_start.unwrap_or(current.auto_start),
                    sound_enabled: sound.unwrap_or(current.sound_enabled),
                    dark_mode: dark.unwrap_or(current.dark_mode),
                };
                cmd_config_set(timer, config)
            }
            Some(ConfigAction::Preset { name }) => cmd_config_preset(timer, &name),
        },
        None => cmd_status(&timer),
    }
}

fn minutes(mins: u32) -> u32 {
    mins.saturating_mul(60)
}

/// Run the interactive timer until the user quits
fn cmd_run(timer: AppTimer) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_interactive(timer))
}

async fn run_interactive(timer: AppTimer) -> Result<()> {
    let mut view = View::new(timer.config(), timer.state(), timer.stats());
    let (runtime, handle, mut events) = Runtime::new(timer);
    let task = tokio::spawn(runtime.run());

    println!("{}", color(&format!("{}{}", BOLD, RED), "POMO"));
    println!(
        "{} min work / {} min break / {} min long break, long break every {} sessions",
        view.config.work_seconds / 60,
        view.config.break_seconds / 60,
        view.config.long_break_seconds / 60,
        view.config.sessions_before_long
    );
    println!("Press Enter to start or pause, 'q' then Enter to quit, see --help for keys");
    println!();
    view.print_status_line();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(input) => {
                        if let Some(command) = view.command_for(input) {
                            handle.send(command)?;
                        }
                    }
                    None => println!("Unknown key '{}' (see pomo --help)", line.trim()),
                }
            }
            Some(event) = events.recv() => view.render(&event),
        }
    }

    handle.send(Command::Shutdown)?;
    let timer = task.await.context("Timer runtime panicked")?;

    println!();
    print_stats(timer.stats());
    Ok(())
}

/// A line of interactive input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Start,
    Pause,
    Reset,
    Skip,
    ToggleAutoStart,
    ToggleSound,
    ToggleDark,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_lowercase().as_str() {
        "" | "p" | "space" => Some(Input::Toggle),
        "start" => Some(Input::Start),
        "pause" => Some(Input::Pause),
        "r" | "reset" => Some(Input::Reset),
        "s" | "skip" => Some(Input::Skip),
        "a" => Some(Input::ToggleAutoStart),
        "m" => Some(Input::ToggleSound),
        "d" => Some(Input::ToggleDark),
        "q" | "quit" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

/// Terminal rendering of the timer, rebuilt from events
struct View {
    config: SessionConfig,
    mode: Mode,
    time_left: u32,
    running: bool,
}

impl View {
    fn new(config: &SessionConfig, state: &SessionState, stats: &StatisticsRecord) -> Self {
        let view = Self {
            config: *config,
            mode: state.mode,
            time_left: state.time_left,
            running: state.running,
        };
        println!(
            "Today: {} sessions, {} worked ({} lifetime)",
            stats.daily_session_count,
            format::hours_minutes(stats.total_work_seconds),
            stats.lifetime_session_count
        );
        view
    }

    /// Map input to a timer command; toggles are expressed as config changes
    fn command_for(&self, input: Input) -> Option<Command> {
        let command = match input {
            Input::Toggle => Command::Toggle,
            Input::Start => Command::Start,
            Input::Pause => Command::Pause,
            Input::Reset => Command::Reset,
            Input::Skip => Command::Skip,
            Input::ToggleAutoStart => Command::ApplyConfig(SessionConfig {
                auto_start: !self.config.auto_start,
                ..self.config
            }),
            Input::ToggleSound => Command::ApplyConfig(SessionConfig {
                sound_enabled: !self.config.sound_enabled,
                ..self.config
            }),
            Input::ToggleDark => Command::ApplyConfig(SessionConfig {
                dark_mode: !self.config.dark_mode,
                ..self.config
            }),
            Input::Quit => return None,
        };
        Some(command)
    }

    fn render(&mut self, event: &Event) {
        match event {
            Event::Tick { time_left } => {
                self.time_left = *time_left;
                self.print_status_line();
                return;
            }
            Event::ModeChanged { mode } => self.mode = *mode,
            Event::Started { mode } => {
                self.mode = *mode;
                self.running = true;
            }
            Event::Paused => self.running = false,
            Event::SessionCompleted { .. } if self.config.sound_enabled => {
                print!("{}", BELL);
            }
            Event::ConfigApplied { config } => self.config = *config,
            Event::StatsUpdated {
                daily,
                lifetime,
                total_work_seconds,
            } => {
                println!(
                    "\n  {} {} today, {} lifetime, {} worked",
                    color(CYAN, "Sessions:"),
                    daily,
                    lifetime,
                    format::hours_minutes(*total_work_seconds)
                );
            }
            Event::AutoStartScheduled { delay } => {
                println!("\n  Next interval starts in {}", format::duration(delay.as_secs()));
            }
            _ => {}
        }

        if let Some(message) = event.notification() {
            let tag = match event {
                Event::Rejected { .. } => color(RED, "[error]"),
                _ => color(GREEN, "[ok]"),
            };
            println!("\n{} {}", tag, message);
            self.print_status_line();
        }
    }

    fn print_status_line(&self) {
        let state = if self.running { "" } else { " (paused)" };
        let label = format!("{:<12}", self.mode.label());
        print!(
            "\r  {} {}{}   ",
            color(mode_color(self.mode, self.config.dark_mode), &label),
            color(BOLD, &format::clock(self.time_left)),
            state
        );
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!("Failed to flush stdout: {}", e);
        }
    }
}

/// Show settings and today's statistics
fn cmd_status(timer: &AppTimer) -> Result<()> {
    cmd_config_show(timer.config())?;
    println!();
    print_stats(timer.stats());
    Ok(())
}

/// Show or reset statistics
fn cmd_stats(mut timer: AppTimer, reset: bool, yes: bool) -> Result<()> {
    if !reset {
        print_stats(timer.stats());
        return Ok(());
    }

    if !yes && !confirm("Reset all statistics, including the lifetime count?")? {
        println!("{} Statistics kept", color(CYAN, "[info]"));
        return Ok(());
    }

    timer.reset_statistics();
    println!("{} Statistics reset", color(GREEN, "[ok]"));
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_stats(stats: &StatisticsRecord) {
    println!("{}Statistics{}", BOLD, NC);
    println!();
    println!("  {}  {}", color(CYAN, "Sessions today:"), stats.daily_session_count);
    println!(
        "  {}      {}",
        color(CYAN, "Work today:"),
        format::hours_minutes(stats.total_work_seconds)
    );
    println!("  {}  {}", color(CYAN, "Total sessions:"), stats.lifetime_session_count);
}

fn cmd_config_show(config: &SessionConfig) -> Result<()> {
    let on_off = |b: bool| if b { "on" } else { "off" };

    println!("{}Settings{}", BOLD, NC);
    println!();
    println!("  {}        {}", color(CYAN, "Work:"), format::duration(config.work_seconds.into()));
    println!("  {}       {}", color(CYAN, "Break:"), format::duration(config.break_seconds.into()));
    println!(
        "  {}  {}",
        color(CYAN, "Long break:"),
        format::duration(config.long_break_seconds.into())
    );
    println!(
        "  {}  every {} sessions",
        color(CYAN, "Long after:"),
        config.sessions_before_long
    );
    println!("  {}  {}", color(CYAN, "Auto-start:"), on_off(config.auto_start));
    println!("  {}       {}", color(CYAN, "Sound:"), on_off(config.sound_enabled));
    println!("  {}   {}", color(CYAN, "Dark mode:"), on_off(config.dark_mode));
    Ok(())
}

fn cmd_config_set(mut timer: AppTimer, config: SessionConfig) -> Result<()> {
    timer.apply_config(config)?;
    println!("{} Settings saved", color(GREEN, "[ok]"));
    println!();
    cmd_config_show(timer.config())
}

fn cmd_config_preset(timer: AppTimer, name: &str) -> Result<()> {
    let preset: Preset = name.parse()?;
    let config = timer.config().with_preset(preset);
    println!("{} Using {} preset", color(GREEN, "[ok]"), preset.as_str());
    cmd_config_set(timer, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_with_tty() {
        // Just verify the color function doesn't panic
        let result = color(RED, "test");
        assert!(result.contains("test"));
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(""), Some(Input::Toggle));
        assert_eq!(parse_input(" \n"), Some(Input::Toggle));
        assert_eq!(parse_input("R"), Some(Input::Reset));
        assert_eq!(parse_input("skip"), Some(Input::Skip));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("xyz"), None);
    }

    #[test]
    fn test_toggles_become_config_changes() {
        let config = SessionConfig::default();
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let view = View::new(&config, &SessionState::new(1500), &StatisticsRecord::new(today));

        match view.command_for(Input::ToggleSound) {
            Some(Command::ApplyConfig(new)) => {
                assert!(!new.sound_enabled);
                assert_eq!(new.work_seconds, config.work_seconds);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(view.command_for(Input::Toggle), Some(Command::Toggle));
        assert_eq!(view.command_for(Input::Quit), None);
    }

    #[test]
    fn test_minutes() {
        assert_eq!(minutes(25), 1500);
        assert_eq!(minutes(u32::MAX), u32::MAX);
    }
}
