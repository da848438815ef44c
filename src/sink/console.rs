//! Terminal sink
//!
//! Renders the HTML-safe sink strings as colored terminal text. The analog
//! and pose panels refresh at poll rate, so they are muted unless requested.

use colored::*;
use std::collections::HashSet;

use super::{DisplaySink, Panel, ERROR_PREFIX};

/// Sink writing to stdout
pub struct ConsoleSink {
    muted: HashSet<Panel>,
}

impl ConsoleSink {
    /// Create a console sink; `show_streams` unmutes the polled panels
    pub fn new(show_streams: bool) -> Self {
        let muted = if show_streams {
            HashSet::new()
        } else {
            [Panel::InputAnalog, Panel::InputPose].into_iter().collect()
        };
        Self { muted }
    }

    pub fn is_muted(&self, panel: Panel) -> bool {
        self.muted.contains(&panel)
    }
}

impl DisplaySink for ConsoleSink {
    fn show_connected(&mut self, message: &str) {
        println!("{}", render(message).green().bold());
    }

    fn notify(&mut self, message: &str) {
        match message.strip_prefix(ERROR_PREFIX) {
            Some(rest) => println!("{} {}", "ERROR:".red().bold(), render(rest).red()),
            None => println!("{}", render(message)),
        }
    }

    fn show(&mut self, panel: Panel, content: &str) {
        if self.is_muted(panel) {
            return;
        }
        println!("{} {}", format!("[{}]", panel).cyan(), render(content));
    }
}

/// Strip markup and unescape entities for terminal output
fn render(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {},
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
