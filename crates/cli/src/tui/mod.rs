//! Interactive browser over the RST index.
//!
//! Key input is read on a plain thread, loads run on the blocking pool, and
//! both feed one channel consumed by the draw loop.

mod keymap;
mod render;

use keymap::Keymap;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyEvent};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use render::Theme;
use rstnav_core::browser::{Browser, Effect, LoadRequest, LoadResult};
use rstnav_core::config::Config;
use rstnav_core::query::QueryEngine;
use rstnav_core::storage::IndexStore;
use std::error::Error;
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

const INPUT_POLL: Duration = Duration::from_millis(100);

enum AppEvent {
    Input(KeyEvent),
    Loaded(LoadResult),
    Resize,
}

type Backend = CrosstermBackend<Stdout>;

pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let engine = Arc::new(QueryEngine::new(IndexStore::new(config.index_dir.clone())));
    info!("browsing index at {}", config.index_dir.display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    enable_raw_mode()?;
    chain_panic_hook(|| {
        let _ = restore_terminal();
    });
    let mut stdout = io::stdout();
    let mut terminal = match execute!(stdout, EnterAlternateScreen)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)))
    {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = restore_terminal();
            return Err(e.into());
        }
    };

    let result = runtime.block_on(event_loop(&mut terminal, engine));

    restore_terminal()?;
    terminal.show_cursor()?;

    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Runs `restore` before the previously installed panic hook, so a panic
/// message lands on a usable terminal.
fn chain_panic_hook(restore: impl Fn() + Send + Sync + 'static) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    engine: Arc<QueryEngine>,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_input_reader(tx.clone());

    let theme = Theme::default();
    let mut browser = Browser::new();
    let mut keymap = Keymap::default();
    let mut effect = browser.start();

    loop {
        match effect {
            Effect::Quit => break,
            Effect::Load(request) => spawn_load(request, &engine, &tx),
            Effect::None => {}
        }

        terminal.draw(|frame| render::draw(frame, &browser, &theme))?;

        effect = match next_event(&mut rx).await? {
            AppEvent::Input(key) => match keymap.action(browser.mode(), key) {
                Some(action) => browser.update(action),
                None => Effect::None,
            },
            AppEvent::Loaded(result) => browser.apply(result),
            AppEvent::Resize => Effect::None,
        };
    }

    debug!("browser closed");
    Ok(())
}

async fn next_event(rx: &mut UnboundedReceiver<AppEvent>) -> io::Result<AppEvent> {
    rx.recv()
        .await
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "event channel closed"))
}

fn spawn_load(request: LoadRequest, engine: &Arc<QueryEngine>, tx: &UnboundedSender<AppEvent>) {
    debug!(?request, "loading");
    let engine = Arc::clone(engine);
    let tx = tx.clone();
    tokio::task::spawn_blocking(move || {
        let result = request.execute(&engine);
        let _ = tx.send(AppEvent::Loaded(result));
    });
}

/// Polls the terminal until the receiving side goes away.
fn spawn_input_reader(tx: UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    debug!("input poll failed: {}", e);
                    break;
                }
            }
            let event = match event::read() {
                Ok(Event::Key(key)) => AppEvent::Input(key),
                Ok(Event::Resize(..)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    debug!("input read failed: {}", e);
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}
