mod app;
mod persist;
mod sim;
mod ui;

use anyhow::Result;
use app::{App, FocusTarget};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use persist::{load_game, save_game};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use sim::catalog::BuildingKind;
use sim::colony::{Colony, ColonyState, StorageCapPolicy};
use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::task;
use ui::format_duration;

#[tokio::main]
async fn main() -> Result<()> {
    let mut colony = match load_game()? {
        Some(state) => resume(state),
        None => {
            let mut colony = Colony::fresh();
            colony.add_message("Colony founded. The frontier awaits.");
            colony
        }
    };

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut colony).await;
    restore_terminal(&mut terminal)?;

    save_game(&colony.snapshot(epoch_ms()))?;
    result
}

/// Rebuilds the colony from a snapshot and replays the offline gap. The
/// saved production rates are read off before `from_state` recomputes them,
/// because the catch-up must accrue at the rates in force when the save was
/// written.
fn resume(state: ColonyState) -> Colony {
    let rates_at_save = state.production;
    let gap_secs = offline_gap_secs(state.last_save_ms);
    let mut colony = Colony::from_state(state);
    match colony.reconcile_offline(gap_secs, rates_at_save) {
        Some(report) => {
            colony.add_message(format!(
                "While you were away ({}): +{} metal, +{} crystal, +{} energy.",
                format_duration(report.elapsed_secs as u64),
                report.metal_gained,
                report.crystal_gained,
                report.energy_gained
            ));
            for done in &report.completed {
                colony.add_message(format!(
                    "{} finished while you were away (level {}).",
                    done.building.label(),
                    done.level
                ));
            }
        }
        None => colony.add_message("Welcome back, commander."),
    }
    colony
}

fn offline_gap_secs(last_save_ms: u64) -> f64 {
    if last_save_ms == 0 {
        return 0.0;
    }
    epoch_ms().saturating_sub(last_save_ms) as f64 / 1_000.0
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    colony: &mut Colony,
) -> Result<()> {
    let mut app = App::new();
    app.clamp_queue_selection(colony.state.queue.len());

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    task::spawn(async move {
        loop {
            match task::spawn_blocking(crossterm::event::read).await {
                Ok(Ok(event)) => {
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Err(_)) => break,
                Err(_) => break,
            }
        }
    });

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);
    let mut should_quit = false;

    loop {
        terminal.draw(|f| ui::render(f, &app, colony))?;
        if should_quit {
            break;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        tokio::select! {
            Some(event) = input_rx.recv() => {
                if handle_event(event, &mut app, colony) {
                    should_quit = true;
                }
            }
            _ = tokio::time::sleep(timeout) => {
                let delta = last_tick.elapsed();
                last_tick = Instant::now();
                let completed = colony.advance(delta.as_secs_f64());
                if !completed.is_empty() {
                    app.clamp_queue_selection(colony.state.queue.len());
                }
            }
        }
    }

    Ok(())
}

fn handle_event(event: Event, app: &mut App, colony: &mut Colony) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(key, app, colony),
        _ => false,
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App, colony: &mut Colony) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Tab | KeyCode::BackTab => {
            app.next_focus();
            false
        }
        KeyCode::Left => {
            app.set_focus(FocusTarget::Buildings);
            false
        }
        KeyCode::Right => {
            app.set_focus(FocusTarget::Queue);
            false
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            app.move_selection(-1, BuildingKind::ALL.len(), colony.state.queue.len());
            false
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            app.move_selection(1, BuildingKind::ALL.len(), colony.state.queue.len());
            false
        }
        KeyCode::Enter | KeyCode::Char('b') | KeyCode::Char('B') => {
            match app.focus() {
                FocusTarget::Buildings => {
                    let roster = BuildingKind::ALL;
                    let kind = roster[app.selected_building.min(roster.len() - 1)];
                    colony.start_upgrade(kind, epoch_ms());
                }
                FocusTarget::Queue => {
                    colony.add_message("Construction cannot be cancelled once started.");
                }
            }
            false
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            let policy = match colony.cap_policy() {
                StorageCapPolicy::Uncapped => StorageCapPolicy::CapToStorage,
                StorageCapPolicy::CapToStorage => StorageCapPolicy::Uncapped,
            };
            colony.set_cap_policy(policy);
            let label = match policy {
                StorageCapPolicy::Uncapped => "minerals accumulate freely",
                StorageCapPolicy::CapToStorage => "minerals capped at depot capacity",
            };
            colony.add_message(format!("Storage policy: {label}."));
            false
        }
        _ => false,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
