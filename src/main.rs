//! A scroll-driven image gallery for the terminal.
//!
//! Content sections scroll past a fixed backdrop; the backdrop follows the
//! section currently in view.  Run with `--sections FILE` to show your own
//! catalog instead of the built-in one.

mod app;
mod config;
mod core;
mod error;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    image_runtime::{self, ImageLoader, ImageUpdate},
    state::{AppState, HoverTarget},
};
use crate::config::AppConfig;
use crate::core::{
    gallery::GalleryEvent,
    preload::LoadState,
    scroll::ViewportSignal,
    section::SectionCatalog,
};
use crate::ui::{
    backdrop::{brightness_for, contrast_for, Backdrop},
    chrome::{self, ProgressBar, ScrollTopButton, StatusBar},
    dots::NavDots,
    panels,
    spinner::LoadingScreen,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven image gallery for the terminal")]
struct Cli {
    /// Section catalog (TOML).  Defaults to the built-in gallery.
    #[arg(long)]
    sections: Option<PathBuf>,

    /// Hero image path or URL, overriding the catalog's.
    #[arg(long)]
    hero: Option<String>,

    /// Config file (defaults to `$XDG_CONFIG_HOME/scroll-gallery/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write log output to this file.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Write the effective config to the config path and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

// ───────────────────────────────────────── setup ────────────

/// Log to `log` when given; otherwise to stderr, only if `RUST_LOG` is set.
fn init_tracing(log: Option<&Path>) -> Result<()> {
    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scroll_gallery=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Catalog plus the directory its relative image paths resolve against.
fn load_catalog(cli: &Cli) -> Result<(SectionCatalog, PathBuf)> {
    let (catalog, base_dir) = match &cli.sections {
        Some(path) => {
            let catalog = SectionCatalog::from_file(path)
                .with_context(|| format!("loading sections from {}", path.display()))?;
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (catalog, base)
        }
        None => (
            SectionCatalog::builtin().context("loading built-in sections")?,
            PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        ),
    };

    let catalog = match &cli.hero {
        // --hero is relative to the working directory, not the catalog
        Some(hero) if !image_runtime::is_remote(hero) && Path::new(hero).is_relative() => {
            let cwd = std::env::current_dir().context("resolving --hero")?;
            catalog.with_hero_image(cwd.join(hero).display().to_string())
        }
        Some(hero) => catalog.with_hero_image(hero.as_str()),
        None => catalog,
    };
    Ok((catalog, base_dir))
}

/// Raw mode + alternate screen for as long as the guard lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
    }
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    if !state.is_ready() {
        frame.render_widget(
            LoadingScreen {
                tick: state.tick,
                settled: state.images_settled(),
            },
            area,
        );
        return;
    }

    let layout = state.layout();
    let page = layout.page_area;
    let progress = state.gallery.scroll_progress();

    // ── backdrop ───────────────────────────────────────────────
    let current = state
        .backdrop_image()
        .map(|(uri, load)| (uri.to_string(), load));
    let (image, loading) = match &current {
        Some((uri, LoadState::Loaded)) => match state.images.get(uri) {
            Some(src) => (
                Some(state.backdrop.fitted(uri, src, page.width, page.height)),
                false,
            ),
            None => (None, false),
        },
        Some((_, LoadState::Pending)) => (None, true),
        _ => (None, false),
    };
    frame.render_widget(
        Backdrop {
            image,
            brightness: brightness_for(progress),
            contrast: contrast_for(progress),
            loading,
            tick: state.tick,
        },
        page,
    );

    // ── page content ───────────────────────────────────────────
    let proj = state.projection();
    let active = state.gallery.active_section();
    let hover_start = state.hover == Some(HoverTarget::StartButton);
    state.hit_zones.start_button =
        panels::render_hero(proj, state.document.hero(), hover_start, frame.buffer_mut());

    let catalog = state.gallery.catalog();
    for (i, (section, block)) in catalog
        .sections()
        .iter()
        .zip(state.document.sections())
        .enumerate()
    {
        panels::render_section(proj, *block, section, i, active == Some(i), frame.buffer_mut());
    }

    // ── chrome ─────────────────────────────────────────────────
    let titles: Vec<&str> = catalog.sections().iter().map(|s| s.title.as_str()).collect();
    let hovered_dot = match state.hover {
        Some(HoverTarget::Dot(i)) => Some(i),
        _ => None,
    };
    frame.render_widget(
        NavDots {
            titles: &titles,
            active,
            hovered: hovered_dot,
        },
        page,
    );

    frame.render_widget(ProgressBar { progress }, layout.progress_area);

    if state.gallery.show_scroll_to_top() {
        if let Some(rect) = chrome::scroll_top_rect(page) {
            frame.render_widget(
                ScrollTopButton {
                    hovered: state.hover == Some(HoverTarget::ScrollTop),
                },
                rect,
            );
        }
    }

    let gallery = state.gallery.state();
    let on_hero = gallery.scroll.position < gallery.viewport_height / 2;
    let section = active
        .filter(|_| !on_hero)
        .and_then(|i| catalog.get(i).map(|s| (i, catalog.len(), s.title.as_str())));
    let hint = state.config.status_bar_hint();
    frame.render_widget(
        StatusBar {
            section,
            progress,
            direction: state.gallery.signal().direction(),
            hint: &hint,
        },
        layout.status_area,
    );
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let user_config = AppConfig::load_from(&config_path);
    if cli.write_config {
        user_config
            .save_to(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let (catalog, base_dir) = load_catalog(&cli)?;
    tracing::info!(
        sections = catalog.len(),
        hero = catalog.hero_image(),
        "catalog loaded"
    );
    let frame_interval = Duration::from_millis(user_config.frame_ms);
    let mut state = AppState::new(catalog, user_config);

    // ── terminal setup ────────────────────────────────────────
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let size = terminal.size()?;
    state.relayout(Rect::new(0, 0, size.width, size.height));

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (image_tx, mut image_rx) = mpsc::unbounded_channel::<ImageUpdate>();
    let loader = ImageLoader::new(base_dir, image_tx);
    let mut scroll_rx = state.gallery.signal().subscribe();
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        for uri in state.images.take_pending() {
            loader.spawn_load(uri);
        }

        terminal.draw(|frame| draw(frame, &mut state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => state.relayout(Rect::new(0, 0, w, h)),
                }
            }

            Ok(()) = scroll_rx.changed() => {
                let sample = *scroll_rx.borrow_and_update();
                state.gallery.apply(GalleryEvent::Scrolled(sample));
            }

            Some(update) = image_rx.recv() => {
                // Drain everything already queued before redrawing.
                state.images.complete(&update.uri, update.result);
                while let Ok(update) = image_rx.try_recv() {
                    state.images.complete(&update.uri, update.result);
                }
            }

            _ = frames.tick() => state.on_frame(Instant::now()),
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    drop(scroll_rx);
    drop(events);
    drop(guard);
    tracing::info!("bye");
    Ok(())
}
