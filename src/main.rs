mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::components::geometry::wheel_slices;
use crate::components::svg::render_svg;
use crate::state::app_settings::AppSettings;
use crate::state::loader::ParticipantLoader;
use crate::state::messages::{NetworkResponse, UiEvent};
use crate::state::timer::SpinTimer;
use crate::state::wheel::Effect;
use anyhow::Context;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{debug, error};
use sheet_feed::client::SheetFeed;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// Frame rate while the wheel turns, ≈ 20 FPS.
const ANIMATION_TICK: Duration = Duration::from_millis(50);
/// How long the input thread blocks before checking whether the UI loop is gone.
const INPUT_POLL: Duration = Duration::from_millis(100);

enum Command {
    Tui,
    ExportSvg(PathBuf),
    PrintSlices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(command) = handle_cli_args() else {
        return Ok(());
    };

    match command {
        Command::Tui => run_tui().await,
        Command::ExportSvg(path) => export_svg(path).await,
        Command::PrintSlices => print_slices().await,
    }
}

/// `None` means the invocation was fully handled (help/version).
fn handle_cli_args() -> Option<Command> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Some(Command::Tui);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            None
        }
        "-V" | "--version" => {
            println!("luckydraw {}", env!("CARGO_PKG_VERSION"));
            None
        }
        "--svg" => match args.next() {
            Some(path) => Some(Command::ExportSvg(PathBuf::from(path))),
            None => {
                eprintln!("--svg needs an output path\n\n{}", usage_text());
                std::process::exit(2);
            }
        },
        "--slices" => Some(Command::PrintSlices),
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "luckydraw - lucky draw wheel for the terminal

Usage:
  luckydraw
  luckydraw --svg <path>     Fetch participants and write the wheel as SVG
  luckydraw --slices         Fetch participants and print slice geometry as JSON
  luckydraw --help
  luckydraw --version

Keys:
  space/enter  spin        esc  close winner card
  \"            logs        f    full screen        q  quit

Environment:
  LUCKYDRAW_SHEET_URL          Spreadsheet gviz export URL
  LUCKYDRAW_SPIN_MS            Spin duration in milliseconds (default 25000)
  LUCKYDRAW_SEED               Fixed RNG seed for reproducible draws
  LUCKYDRAW_FEED_TIMEOUT_SECS  Feed request timeout (default none)
  LUCKYDRAW_LOG                Log level: error, warn, info, debug, trace"
}

fn feed_for(settings: &AppSettings) -> SheetFeed {
    SheetFeed::new(settings.sheet_url.clone()).with_timeout(settings.feed_timeout)
}

async fn export_svg(path: PathBuf) -> anyhow::Result<()> {
    let settings = AppSettings::load();
    let participants = feed_for(&settings)
        .fetch_participants()
        .await
        .context("loading participants")?;
    std::fs::write(&path, render_svg(&participants, 0.0))
        .with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {} slices to {}", participants.len(), path.display());
    Ok(())
}

async fn print_slices() -> anyhow::Result<()> {
    let settings = AppSettings::load();
    let participants = feed_for(&settings)
        .fetch_participants()
        .await
        .context("loading participants")?;
    let json = serde_json::to_string_pretty(&wheel_slices(&participants))?;
    println!("{json}");
    Ok(())
}

async fn run_tui() -> anyhow::Result<()> {
    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let app = Arc::new(Mutex::new(App::new()));
    let feed = {
        let guard = app.lock().await;
        feed_for(&guard.settings)
    };

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(4);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    let loader = ParticipantLoader::new(feed, network_resp_tx);

    // Animation tick thread
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(ANIMATION_TICK);
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    let timer = SpinTimer::new(ui_event_tx.clone());

    // Trigger participant load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    let (timer, loader) =
        main_ui_loop(terminal, app, ui_event_rx, network_resp_rx, timer, loader).await;

    debug!("shutting down with {} pending spin timers", timer.pending());
    timer.shutdown();
    loader.shutdown();
    input_handler.abort();
    animation_task.abort();
    cleanup_terminal();

    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut timer: SpinTimer,
    mut loader: ParticipantLoader,
) -> (SpinTimer, ParticipantLoader) {
    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &mut loader, &mut timer).await;
                let mut app_guard = app.lock().await;
                if app_guard.state.should_quit {
                    break;
                }
                if should_redraw {
                    draw::draw(&mut terminal, &mut app_guard);
                }
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard);
            }

            else => break,
        }
    }

    (timer, loader)
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    loader: &mut ParticipantLoader,
    timer: &mut SpinTimer,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            loader.start();
            true
        }
        UiEvent::KeyPressed(key_event) => {
            let effects = keys::handle_key_bindings(key_event, app).await;
            run_effects(effects, app, timer).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            let now = Instant::now();
            guard.advance_animation(now);
            guard.is_animating(now)
        }
        UiEvent::SpinElapsed { spin_id } => {
            let effects = app.lock().await.on_spin_elapsed(spin_id);
            run_effects(effects, app, timer).await;
            true
        }
    }
}

/// Carry out the side effects requested by a wheel transition.
async fn run_effects(effects: Vec<Effect>, app: &Arc<Mutex<App>>, timer: &mut SpinTimer) {
    if effects.is_empty() {
        return;
    }
    let mut guard = app.lock().await;
    let now = Instant::now();
    for effect in effects {
        match effect {
            Effect::AnimateRotation { from, to, duration } => {
                guard.start_animation(from, to, duration, now);
            }
            Effect::ScheduleCompletion { spin_id, after } => timer.schedule(spin_id, after),
            Effect::LaunchConfetti => guard.launch_confetti(now),
        }
    }
}

async fn handle_network_response(response: NetworkResponse, app: &Arc<Mutex<App>>) {
    match response {
        NetworkResponse::ParticipantsLoaded { participants } => {
            app.lock().await.on_participants_loaded(participants);
        }
        NetworkResponse::Error { message } => {
            app.lock().await.on_load_failed(message);
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    while !ui_events.is_closed() {
        let event = match tokio::task::spawn_blocking(|| read_event(INPUT_POLL)).await {
            Ok(Ok(Some(event))) => event,
            Ok(Ok(None)) => continue,
            Ok(Err(e)) => {
                error!("input error: {e}");
                continue;
            }
            Err(_) => break,
        };

        let ui_event = match event {
            Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn read_event(timeout: Duration) -> io::Result<Option<Event>> {
    if crossterm_event::poll(timeout)? {
        crossterm_event::read().map(Some)
    } else {
        Ok(None)
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
