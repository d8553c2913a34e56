use std::ffi::OsStr;
use std::fmt::{self, Write as _};
use std::io::{IsTerminal, Write};

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use crossterm::style::ContentStyle;
use riceshine_config::{Config, DEFAULT_DATE_FORMAT};
use riceshine_core::MetricsSnapshot;

use crate::style::parse_style;
use crate::text::StyledText;

const FALLBACK_WIDTH: u16 = 80;
const COLUMN_GAP: &str = "   ";

/// Writes the composed block to an injected writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    width: u16,
    color: bool,
}

impl Renderer {
    /// Sized to the current terminal; plain text when stdout is not a tty
    /// or `NO_COLOR` is set.
    pub fn for_terminal() -> Self {
        let width = crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(FALLBACK_WIDTH);
        Self {
            width,
            color: color_enabled(
                std::io::stdout().is_terminal(),
                std::env::var_os("NO_COLOR").as_deref(),
            ),
        }
    }

    pub fn new(width: u16, color: bool) -> Self {
        Self { width, color }
    }

    pub fn render<W, Tz>(
        &self,
        out: &mut W,
        config: &Config,
        art: &str,
        snapshot: &MetricsSnapshot,
        now: &DateTime<Tz>,
    ) -> Result<()>
    where
        W: Write,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let text = compose(config, art, snapshot, now);
        text.write_centered(out, self.width, self.color)?;
        Ok(())
    }
}

/// Any non-empty `NO_COLOR` value turns styling off.
fn color_enabled(is_terminal: bool, no_color: Option<&OsStr>) -> bool {
    is_terminal && no_color.map_or(true, OsStr::is_empty)
}

/// Builds the art, a blank line, the date and every enabled metric.
pub fn compose<Tz>(
    config: &Config,
    art: &str,
    snapshot: &MetricsSnapshot,
    now: &DateTime<Tz>,
) -> StyledText
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let colors = &config.colors;
    let display = &config.display;
    let title = parse_style(&colors.title);
    let value = parse_style(&colors.value);

    let mut text = StyledText::new();
    text.append(art.trim_end_matches(['\n', '\r']), parse_style(&colors.ascii_art));
    text.newline();
    text.newline();

    text.append("Date: ", title);
    text.append(&format_date(now, &display.date_format), value);

    if display.show_uptime {
        text.newline();
        text.append("Uptime: ", title);
        text.append(&snapshot.uptime.to_string(), value);
    }
    if display.show_load {
        text.newline();
        text.append("Load Avg: ", title);
        text.append(&snapshot.load.to_string(), value);
    }

    let mut resources = Vec::new();
    if display.show_memory {
        resources.push(("MEM: ", parse_style(&colors.memory), snapshot.memory.to_string()));
    }
    if display.show_disk {
        resources.push(("DISK: ", parse_style(&colors.disk), snapshot.disk.to_string()));
    }
    if display.show_temp {
        resources.push((
            "CPU Temp: ",
            parse_style(&colors.temp),
            snapshot.temperature.to_string(),
        ));
    }
    row(&mut text, &resources, value);

    let mut network = Vec::new();
    if display.show_ip {
        network.push(("Local IP: ", parse_style(&colors.ip), snapshot.local_ip.to_string()));
    }
    if display.show_tcp {
        network.push((
            "TCP-connection: ",
            parse_style(&colors.tcp),
            snapshot.tcp_connections.to_string(),
        ));
    }
    row(&mut text, &network, value);

    text
}

fn row(text: &mut StyledText, items: &[(&str, ContentStyle, String)], value: ContentStyle) {
    if items.is_empty() {
        return;
    }
    text.newline();
    for (i, (label, label_style, reading)) in items.iter().enumerate() {
        if i > 0 {
            text.append(COLUMN_GAP, value);
        }
        text.append(label, *label_style);
        text.append(reading, value);
    }
}

/// Formats `now` with a strftime pattern, falling back to the default
/// pattern when `pattern` is invalid.
pub fn format_date<Tz>(now: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    if write!(out, "{}", now.format(pattern)).is_err() {
        tracing::warn!(pattern, "Invalid date_format, using the default");
        return now.format(DEFAULT_DATE_FORMAT).to_string();
    }
    out
}
