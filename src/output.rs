//! Output formatting for search results

use crate::query::SearchMatch;
use crate::session::SearchOutcome;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Printed when a query has no hits
pub const NO_MATCHES: &str = "No matches found.";

/// Open stdout with or without color
pub fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print the rows for one query, or the no-match notice
pub fn print_outcome<W: WriteColor>(out: &mut W, outcome: &SearchOutcome<'_>) -> io::Result<()> {
    match outcome {
        SearchOutcome::Matches(matches) => print_matches(out, matches),
        SearchOutcome::NoMatches => writeln!(out, "{}", NO_MATCHES),
    }
}

/// Print `Page N, Line M: text` rows
pub fn print_matches<W: WriteColor>(out: &mut W, matches: &[SearchMatch<'_>]) -> io::Result<()> {
    for m in matches {
        print_match_line(out, m)?;
    }
    Ok(())
}

/// Print a match line with highlighted match
fn print_match_line<W: WriteColor>(out: &mut W, m: &SearchMatch<'_>) -> io::Result<()> {
    let record = m.record;
    write!(out, "Page ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{}", record.page)?;
    out.reset()?;
    write!(out, ", Line ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{}", record.line)?;
    out.reset()?;
    write!(out, ": ")?;

    let content = record.text.as_str();
    let safe_start = m.match_start.min(content.len());
    let safe_end = m.match_end.min(content.len());

    // Text before match
    if safe_start > 0 {
        write!(out, "{}", &content[..safe_start])?;
    }

    // The match itself (highlighted)
    if safe_end > safe_start {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", &content[safe_start..safe_end])?;
        out.reset()?;
    }

    // Text after match
    if safe_end < content.len() {
        write!(out, "{}", &content[safe_end..])?;
    }

    writeln!(out)
}

/// Print one JSON object per match (for --json)
pub fn print_json_lines<W: Write>(out: &mut W, matches: &[SearchMatch<'_>]) -> io::Result<()> {
    for m in matches {
        serde_json::to_writer(&mut *out, m)?;
        writeln!(out)?;
    }
    Ok(())
}
