mod display;
mod keymap;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use arcade_loop::replay::{parse_script, replay, ScriptedInput};
use arcade_loop::session::StepReport;
use arcade_loop::{GameConfig, GameKind, GameSession, GameState, LoopDriver};

use display::View;

/// Without release events, a key counts as released once it has been silent
/// this long.  Auto-repeat (≥ 15 Hz) keeps a held key inside the window.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Upper bound on how long the loop sleeps, so input stays responsive even
/// at the snake's 10 Hz tick.
const MAX_IDLE: Duration = Duration::from_millis(16);

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "arcade_loop", version, about = "Helicopter, snake and shooter on a fixed-step core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play in the terminal.
    Play {
        #[command(flatten)]
        session: SessionArgs,
        /// Write tracing output to this file (the terminal is busy drawing).
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Run headless with a scripted input sequence and print JSON reports.
    Simulate {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long, default_value_t = 600)]
        steps: u64,
        /// JSON array of `{ "tick": N, "action": "start", "pressed": true }`.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Print every Nth report (the last one is always printed).
        #[arg(long, default_value_t = 0)]
        every: u64,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// helicopter, snake or shooter
    #[arg(long, default_value = "helicopter")]
    game: GameKind,
    /// Seed for obstacle/enemy/food placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file overriding fields of the game's preset configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SessionArgs {
    fn build(&self) -> Result<GameSession> {
        let config = match &self.config {
            Some(path) => GameConfig::load(self.game, path)
                .with_context(|| format!("loading config overrides from {}", path.display()))?,
            None => GameConfig::preset(self.game),
        };
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(game = %self.game, seed, "building session");
        GameSession::initialize(self.game, config, seed).context("initializing game session")
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

// ── Headless simulation ───────────────────────────────────────────────────────

fn simulate(session_args: &SessionArgs, steps: u64, script: Option<&Path>, every: u64) -> Result<()> {
    let mut session = session_args.build()?;
    let inputs: Vec<ScriptedInput> = match script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading input script {}", path.display()))?;
            parse_script(&text).with_context(|| format!("parsing input script {}", path.display()))?
        }
        // Without a script, just press Start so something happens.
        None => vec![ScriptedInput::press(0, arcade_loop::Action::Start)],
    };

    let out = stdout();
    let mut out = out.lock();
    // The most recent report not yet printed; flushed at the end so the
    // final state always appears.
    let mut unprinted: Option<StepReport> = None;
    replay(&mut session, &inputs, steps, |report| -> Result<()> {
        if every > 0 && report.tick % every == 0 {
            write_report(&mut out, &report)?;
            unprinted = None;
        } else {
            unprinted = Some(report);
        }
        Ok(())
    })?;
    if let Some(report) = unprinted {
        write_report(&mut out, &report)?;
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &StepReport) -> Result<()> {
    serde_json::to_writer(&mut *out, report).context("serializing step report")?;
    writeln!(out)?;
    Ok(())
}

// ── Interactive loop ──────────────────────────────────────────────────────────

/// Input model: presses and repeats are forwarded to the session as they
/// arrive; each key also records when it was last seen.  Terminals with
/// keyboard enhancement send a real release; on the others, a key that has
/// been silent longer than `HOLD_WINDOW` is released on their behalf.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let kind = session.kind();
    let mut driver = LoopDriver::for_session(session)?;
    let mut last_seen: HashMap<KeyCode, Instant> = HashMap::new();
    let mut best = 0u32;
    let mut last_frame = Instant::now();

    loop {
        // ── Latch whatever the input thread delivered ─────────────────────────
        while let Ok(ev) = rx.try_recv() {
            // No release events arrive while another window has focus.
            if matches!(ev, Event::FocusLost) {
                last_seen.clear();
                session.release_inputs();
                continue;
            }
            let Event::Key(KeyEvent {
                code,
                kind: event_kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            if event_kind == KeyEventKind::Press && keymap::is_quit(code, modifiers) {
                return Ok(());
            }
            let code = keymap::normalize(code);
            let pressed = match event_kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    last_seen.insert(code, Instant::now());
                    true
                }
                KeyEventKind::Release => {
                    last_seen.remove(&code);
                    false
                }
            };
            for action in keymap::actions_for(kind, code) {
                session.on_logical_input(action, pressed);
            }
        }

        // ── Release keys that have gone quiet ─────────────────────────────────
        let now = Instant::now();
        let expired: Vec<KeyCode> = last_seen
            .iter()
            .filter(|(_, &seen)| now.duration_since(seen) > HOLD_WINDOW)
            .map(|(&code, _)| code)
            .collect();
        for code in expired {
            last_seen.remove(&code);
            for action in keymap::actions_for(kind, code) {
                session.on_logical_input(action, false);
            }
        }

        // ── Simulate whatever is due, then draw ───────────────────────────────
        let elapsed = now.duration_since(last_frame);
        last_frame = now;
        if driver.pump(session, elapsed)?.is_some() {
            if session.state() == GameState::GameOver {
                best = best.max(session.score());
            }
            let entities = session.renderable_entities();
            let view = View {
                kind,
                config: session.config(),
                state: session.state(),
                score: session.score(),
                best: best.max(session.score()),
                entities: &entities,
            };
            display::render(out, &view)?;
        }

        thread::sleep(driver.until_next_tick().min(MAX_IDLE));
    }
}

fn play(session_args: &SessionArgs) -> Result<()> {
    let mut session = session_args.build()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableFocusChange)?;

    // Ask for release events; terminals without the kitty protocol refuse and
    // HOLD_WINDOW takes over.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen off the game loop; events arrive over the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut session, &rx);

    // Restore the terminal even when the loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableFocusChange);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Play { session, log_file } => {
            if let Some(path) = log_file {
                init_tracing(Some(path.as_path()))?;
            }
            play(session)
        }
        Command::Simulate {
            session,
            steps,
            script,
            every,
        } => {
            init_tracing(None)?;
            simulate(session, *steps, script.as_deref(), *every)
        }
    }
}
