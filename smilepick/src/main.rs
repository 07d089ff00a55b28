use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use smilepick::{App, Verbosity, context_from_page, init_subscriber, parse_cli_args};
use smilepick_core::config::data_dir;
use smilepick_core::{Catalog, JsonFileStore, PickerConfig, PickerResult, SessionState};
use smilepick_tui::{HitMap, PointerTarget, RawEvent};
use tracing::info;

/// Event poll timeout; also the cadence for long-press and mount checks.
const TICK: Duration = Duration::from_millis(50);

fn main() -> PickerResult<()> {
    let cli = parse_cli_args(std::env::args().skip(1))?;

    if cli.version {
        println!("smilepick {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    init_subscriber(verbosity, cli.no_color);

    let config = match cli.config_path.as_deref() {
        Some(path) => PickerConfig::load_from_file(path)?,
        None => PickerConfig::default(),
    };

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    let store_path = data_dir(&home).join("store.json");
    info!(store = %store_path.display(), page = %cli.page, "starting");

    let store = JsonFileStore::open(&store_path);
    let session = SessionState::load(Box::new(store), Catalog::builtin(), config);
    let mut app = App::new(session, context_from_page(&cli.page));

    run(&mut app)
}

fn run(app: &mut App) -> PickerResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    // Restore the terminal even when the loop errored.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> PickerResult<()> {
    loop {
        let mut hits = HitMap::default();
        terminal.draw(|frame| hits = app.draw(frame))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }
                    app.handle_event(
                        RawEvent::Key {
                            code: key.code,
                            modifiers: key.modifiers,
                        },
                        Instant::now(),
                    );
                }
                Event::Mouse(mouse) => {
                    let target = hits
                        .hit(mouse.column, mouse.row)
                        .cloned()
                        .unwrap_or(PointerTarget::Outside);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => app.handle_event(
                            RawEvent::PointerDown {
                                target,
                                modifiers: mouse.modifiers,
                            },
                            Instant::now(),
                        ),
                        MouseEventKind::Up(MouseButton::Left) => app.handle_event(
                            RawEvent::PointerUp {
                                target,
                                modifiers: mouse.modifiers,
                            },
                            Instant::now(),
                        ),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        app.tick(Instant::now());
    }
}
