//! Terminal rendering for display events.

use chat_session::{DisplayEvent, Hsl, Identity, PresentationAdapter, color_of};
use std::io::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Prints every session's messages to stdout, one line each, tagged with
/// the window they belong to.
pub struct TerminalPresenter {
    color: bool,
}

impl TerminalPresenter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, hsl: Hsl, bold: bool, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let (r, g, b) = hsl.to_rgb();
        let weight = if bold { BOLD } else { "" };
        format!("{}\x1b[38;2;{};{};{}m{}{}", weight, r, g, b, text, RESET)
    }

    pub fn render_display(&self, event: &DisplayEvent) -> String {
        let sender = self.paint(color_of(event.sender.as_str()), event.is_own, event.sender.as_str());
        format!("[{}] {}: {}", event.session, sender, event.text)
    }

    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }
}

impl PresentationAdapter for TerminalPresenter {
    fn on_display(&self, event: DisplayEvent) {
        self.write_line(&self.render_display(&event));
    }

    fn on_session_created(&self, identity: &Identity, color_of: fn(&str) -> Hsl) {
        let name = self.paint(color_of(identity.as_str()), true, identity.as_str());
        self.write_line(&format!("*** opened window for {}", name));
    }

    fn on_session_closed(&self, identity: &Identity) {
        self.write_line(&format!("*** window for {} closed", identity));
    }
}
