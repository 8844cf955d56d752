use chrono::{ DateTime, Local, NaiveDateTime, TimeZone, Utc };
use colored::Colorize;

use super::theme::DisplayMode;
use crate::models::chat::{ Message, Speaker };

pub const PROCESSING_TEXT: &str = "Typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleStyle {
    User,
    Assistant,
}

/// Display-ready projection of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFragment {
    pub alignment: Alignment,
    pub style: BubbleStyle,
    pub content: String,
    pub time: Option<String>,
    pub processing: bool,
}

pub fn render_message(message: &Message) -> MessageFragment {
    render_message_in(message, &Local)
}

pub fn render_message_in<Tz: TimeZone>(message: &Message, tz: &Tz) -> MessageFragment
    where Tz::Offset: std::fmt::Display
{
    let (alignment, style) = match message.role {
        Speaker::User => (Alignment::Right, BubbleStyle::User),
        Speaker::Teacher => (Alignment::Left, BubbleStyle::Assistant),
    };
    MessageFragment {
        alignment,
        style,
        content: message.content.clone(),
        time: format_time(&message.timestamp, tz),
        processing: false,
    }
}

/// The synthetic "Typing..." bubble shown while a reply is pending.
pub fn processing_placeholder() -> MessageFragment {
    MessageFragment {
        alignment: Alignment::Left,
        style: BubbleStyle::Assistant,
        content: PROCESSING_TEXT.to_string(),
        time: None,
        processing: true,
    }
}

/// Formats a wire timestamp as `HH:MM` in `tz`. Accepts RFC 3339 and the
/// backend's naive `YYYY-MM-DD HH:MM:SS`, which is UTC.
pub fn format_time<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> Option<String>
    where Tz::Offset: std::fmt::Display
{
    let utc = parse_timestamp(timestamp)?;
    Some(utc.with_timezone(tz).format("%H:%M").to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Lays the fragment out as plain lines of at most `width` columns.
pub fn layout_lines(fragment: &MessageFragment, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = fragment.content.lines().map(str::to_string).collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    if !fragment.processing {
        if let Some(time) = &fragment.time {
            lines.push(time.clone());
        }
    }
    match fragment.alignment {
        Alignment::Left => lines,
        Alignment::Right =>
            lines
                .into_iter()
                .map(|line| {
                    let len = line.chars().count();
                    if len >= width {
                        line
                    } else {
                        format!("{}{}", " ".repeat(width - len), line)
                    }
                })
                .collect(),
    }
}

/// Terminal rendering with colours for the current display mode.
pub fn format_fragment(fragment: &MessageFragment, width: usize, mode: DisplayMode) -> String {
    let lines = layout_lines(fragment, width);
    let body_count = if fragment.time.is_some() && !fragment.processing {
        lines.len() - 1
    } else {
        lines.len()
    };
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i >= body_count {
                line.dimmed().to_string()
            } else if fragment.processing {
                line.italic().dimmed().to_string()
            } else {
                match (fragment.style, mode) {
                    (BubbleStyle::User, DisplayMode::Dark) => line.bright_cyan().bold().to_string(),
                    (BubbleStyle::User, DisplayMode::Light) => line.blue().bold().to_string(),
                    (BubbleStyle::Assistant, DisplayMode::Dark) => line.bright_white().to_string(),
                    (BubbleStyle::Assistant, DisplayMode::Light) => line.black().to_string(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
