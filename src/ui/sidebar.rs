use super::theme::DisplayMode;
use crate::models::chat::Message;

pub const PREVIEW_CHARS: usize = 30;
pub const EMPTY_HISTORY: &str = "No history yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewItem {
    pub speaker: &'static str,
    pub preview: String,
}

/// Actions the history panel hands back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Clear,
    ToggleTheme,
}

pub fn history_preview(messages: &[Message]) -> Vec<PreviewItem> {
    messages
        .iter()
        .map(|msg| PreviewItem {
            speaker: msg.role.label(),
            preview: truncate(&msg.content, PREVIEW_CHARS),
        })
        .collect()
}

/// Cuts `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() { format!("{}...", head) } else { head }
}

pub fn render_sidebar(messages: &[Message], mode: DisplayMode) -> String {
    let mut out = String::from("Chat History\n");
    let items = history_preview(messages);
    if items.is_empty() {
        out.push_str(EMPTY_HISTORY);
        out.push('\n');
    }
    for item in &items {
        out.push_str(&format!("{}: {}\n", item.speaker, item.preview));
    }
    out.push_str(&format!("[/clear] Clear History  [/theme] {}", mode.toggle_label()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_kept_whole() {
        assert_eq!(truncate("Hallo", PREVIEW_CHARS), "Hallo");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(truncate(&exact, PREVIEW_CHARS), exact);
    }

    #[test]
    fn long_content_gets_ellipsis() {
        let long = "Ich möchte heute Abend ins Kino gehen";
        assert_eq!(truncate(long, PREVIEW_CHARS), "Ich möchte heute Abend ins Kin...");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let umlauts = "ä".repeat(31);
        assert_eq!(truncate(&umlauts, PREVIEW_CHARS), format!("{}...", "ä".repeat(30)));
    }

    #[test]
    fn preview_labels_each_speaker() {
        let items = history_preview(&[Message::user("Hallo", "t0"), Message::teacher("Hi", "t1")]);
        assert_eq!(
            items,
            vec![
                PreviewItem { speaker: "You", preview: "Hallo".into() },
                PreviewItem { speaker: "Teacher", preview: "Hi".into() }
            ]
        );
    }

    #[test]
    fn empty_history_shows_placeholder_and_actions() {
        let out = render_sidebar(&[], DisplayMode::Dark);
        assert!(out.contains(EMPTY_HISTORY));
        assert!(out.ends_with("Switch to Light Mode"));
    }
}
