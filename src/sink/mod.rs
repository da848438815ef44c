//! Display sinks
//!
//! A sink is the presentation surface for bridge state. It receives
//! HTML-safe, timestamped, labeled strings and never talks back.

mod console;
mod memory;

pub use console::ConsoleSink;
pub use memory::MemorySink;

use chrono::{DateTime, Local};

/// Named display areas, one per message family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    DeviceIds,
    InputDigital,
    InputAnalog,
    InputPose,
    ApplicationInfo,
    PlayArea,
    Properties,
    RemoteSetting,
}

impl Panel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::DeviceIds => "deviceIds",
            Panel::InputDigital => "input",
            Panel::InputAnalog => "inputAnalog",
            Panel::InputPose => "inputPose",
            Panel::ApplicationInfo => "applicationInfo",
            Panel::PlayArea => "playArea",
            Panel::Properties => "properties",
            Panel::RemoteSetting => "remoteSettingOutput",
        }
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation surface for client output
pub trait DisplaySink: Send {
    /// Clear the notification log, then show `message`
    fn show_connected(&mut self, message: &str);

    /// Prepend a line to the notification log
    fn notify(&mut self, message: &str);

    /// Replace the content of one panel
    fn show(&mut self, panel: Panel, content: &str);
}

/// Marker prefix for error notifications
pub const ERROR_PREFIX: &str = "<span class=\"error\">ERROR:</span> ";

/// `H:M:S <strong>label</strong>:\n`
pub fn title(label: &str, at: DateTime<Local>) -> String {
    format!(
        "{} <strong>{}</strong>:\n",
        at.format("%-H:%-M:%-S"),
        escape_html(label)
    )
}

/// Title stamped with the current local time followed by the escaped body
pub fn labeled(label: &str, body: &str) -> String {
    format!("{}{}", title(label, Local::now()), escape_html(body))
}

/// Error notification line
pub fn error_line(description: &str) -> String {
    format!("{}{}", ERROR_PREFIX, escape_html(description))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_title_format_is_unpadded() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(title("DeviceIds", at), "9:5:7 <strong>DeviceIds</strong>:\n");
    }

    #[test]
    fn test_labeled_escapes_body() {
        let line = labeled("Response", "<script>\"x\" & 'y'</script>");
        assert!(line.contains("<strong>Response</strong>:\n"));
        assert!(line.ends_with("&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;"));
    }

    #[test]
    fn test_error_line() {
        assert_eq!(
            error_line("refused <tcp>"),
            "<span class=\"error\">ERROR:</span> refused &lt;tcp&gt;"
        );
    }
}
