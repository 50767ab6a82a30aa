use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use anyhow::{Context, Result};
use pipkit_core::{PackageName, PipError};
use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PackageListing {
    pub(crate) explicit: Vec<PackageName>,
    pub(crate) materialized: Vec<PackageName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SearchResults {
    pub(crate) term: String,
    pub(crate) matches: Vec<PackageName>,
}

pub(crate) fn resolve_output_style(plain_requested: bool, stdout_is_terminal: bool) -> OutputStyle {
    if plain_requested || !stdout_is_terminal {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

pub(crate) fn current_output_style(plain_requested: bool) -> OutputStyle {
    resolve_output_style(plain_requested, std::io::stdout().is_terminal())
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = match status {
                "ok" => "[OK]",
                "warn" => "[WARN]",
                "err" => "[ERR]",
                _ => "[INFO]",
            };
            format!("{badge} {message}")
        }
    }
}

/// Error line prefixed with the stable reason code.
pub(crate) fn render_error_line(style: OutputStyle, err: &PipError) -> String {
    render_status_line(style, "err", &format!("{}: {err}", err.code()))
}

pub(crate) fn format_listing_lines(
    listing: &PackageListing,
    style: OutputStyle,
    json: bool,
) -> Result<Vec<String>> {
    if json {
        let rendered =
            serde_json::to_string(listing).context("failed to serialize package listing")?;
        return Ok(vec![rendered]);
    }

    let mut lines = Vec::new();
    if let Some(header) = render_section_header(style, "installed") {
        lines.push(header);
    }
    if listing.materialized.is_empty() {
        lines.push(render_status_line(style, "info", "no packages installed"));
        return Ok(lines);
    }
    for name in &listing.materialized {
        if listing.explicit.contains(name) {
            lines.push(format!("{name} (explicit)"));
        } else {
            lines.push(name.to_string());
        }
    }
    Ok(lines)
}

pub(crate) fn format_search_lines(
    results: &SearchResults,
    style: OutputStyle,
    json: bool,
) -> Result<Vec<String>> {
    if json {
        let rendered =
            serde_json::to_string(results).context("failed to serialize search results")?;
        return Ok(vec![rendered]);
    }

    if results.matches.is_empty() {
        return Ok(vec![render_status_line(
            style,
            "warn",
            &format!("no package matches '{}'", results.term),
        )]);
    }
    Ok(results.matches.iter().map(ToString::to_string).collect())
}

fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(colorize(section_style(), &format!("== {title} =="))),
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
