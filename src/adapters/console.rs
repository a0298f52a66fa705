use crate::domain::model::Notice;
use crate::domain::ports::{LinkOpener, Notifier};
use std::sync::{Mutex, PoisonError};

/// Prints notices to the terminal and keeps them in order.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
    history: Mutex<Vec<Notice>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records without printing.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    pub fn history(&self) -> Vec<Notice> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        if !self.quiet {
            if notice.is_error() {
                eprintln!("{}", notice);
            } else {
                println!("{}", notice);
            }
        }
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

/// Hands deep links to the user by printing them; a terminal has no browser tab to open.
#[derive(Debug, Default)]
pub struct ConsoleLinks {
    quiet: bool,
    opened: Mutex<Vec<String>>,
}

impl ConsoleLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LinkOpener for ConsoleLinks {
    fn open(&self, url: &str) {
        tracing::debug!("Opening deep link: {}", url);
        if !self.quiet {
            println!("🔗 {}", url);
        }
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}
