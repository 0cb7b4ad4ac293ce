//! Terminal implementations of the navigation and notification seams.

use colored::Colorize;
use eduassist_core::notify::{NoticeLevel, Notifier};
use eduassist_core::routes::{LOGIN_PATH, Navigator};
use std::sync::atomic::{AtomicBool, Ordering};

/// There is no page to navigate to, so a redirect to the login screen
/// becomes a one-time hint to sign in again.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    announced: AtomicBool,
}

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str) {
        if path == LOGIN_PATH {
            if !self.announced.swap(true, Ordering::SeqCst) {
                eprintln!(
                    "{}",
                    "Your session has expired. Run `eduassist login` to sign in again.".yellow()
                );
            }
        } else {
            tracing::debug!("[Console] Ignoring navigation to {}", path);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => eprintln!("{}", message.red()),
            NoticeLevel::Success => println!("{}", message.green()),
            NoticeLevel::Info => println!("{}", message.bright_black()),
        }
    }
}

/// Pretty-prints a JSON payload.
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
