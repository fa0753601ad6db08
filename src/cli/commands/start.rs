//! Interactive stopwatch: the terminal stand-in for the timer screen.

use crate::cli::commands::history::render_week;
use crate::cli::commands::last::describe;
use crate::config::Config;
use crate::core::session::ShiftSession;
use crate::core::watch::Waiter;
use crate::errors::AppResult;
use crate::ui::messages::{info, status_line, warning};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Reset,
    History,
    Quit,
    Unknown,
}

pub fn parse_action(line: &str) -> Action {
    match line.trim().to_lowercase().as_str() {
        "" | "t" | "toggle" => Action::Toggle,
        "r" | "reset" => Action::Reset,
        "h" | "history" => Action::History,
        "q" | "quit" | "exit" => Action::Quit,
        _ => Action::Unknown,
    }
}

/// Notice published since the last call, if any.
fn fresh_notice(notices: &mut watch::Receiver<Option<String>>) -> Option<String> {
    if notices.has_changed().unwrap_or(false) {
        notices.borrow_and_update().clone()
    } else {
        None
    }
}

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut session = ShiftSession::from_config(cfg)?;

    info("Enter = start/stop · r = reset · h = this week · q = quit");

    // live display: repaint whenever the timer publishes, report notices as they arrive
    let stop = Arc::new(AtomicBool::new(false));
    let mut display = session.subscribe_display();
    let mut notices = session.subscribe_notice();
    let waiter = Waiter::new()?;
    let painter = {
        let stop = Arc::clone(&stop);
        thread::Builder::new()
            .name("start-painter".into())
            .spawn(move || {
                let mut current = display.borrow_and_update().clone();
                loop {
                    if let Some(msg) = fresh_notice(&mut notices) {
                        println!();
                        warning(msg);
                    }
                    status_line(format!(
                        "⏱  {}   {}   [{}]",
                        current.elapsed_text, current.interval_text, current.phase
                    ));
                    if stop.load(Ordering::Acquire) {
                        break;
                    }
                    match waiter.changed_within(&mut display, Duration::from_millis(200)) {
                        Ok(Some(next)) => current = next,
                        Ok(None) => {}
                        Err(_) => break,
                    }
                }
                println!();
                if let Some(msg) = fresh_notice(&mut notices) {
                    warning(msg);
                }
            })?
    };

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_action(&line) {
            Action::Toggle => session.toggle(),
            Action::Reset => session.reset(),
            Action::History => {
                if let Err(e) = session.flush() {
                    warning(format!("History may be out of date: {}", e));
                }
                println!();
                for l in render_week(
                    &session.weekly_summary(),
                    cfg.show_weekend,
                    &cfg.empty_day_placeholder,
                ) {
                    println!("  {}", l);
                }
            }
            Action::Quit => break,
            Action::Unknown => warning(format!("Unknown command '{}'", line.trim())),
        }
    }

    let closed = session.close();
    stop.store(true, Ordering::Release);
    let _ = painter.join();
    closed?;

    if let Some(last) = session.last_shift()? {
        info(format!("Last shift: {}", describe(&last)));
    }

    Ok(())
}
