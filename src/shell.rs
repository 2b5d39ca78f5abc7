//! Interactive prompt loop over an open session

use crate::output::print_outcome;
use crate::session::Session;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use termcolor::WriteColor;

pub const PATH_PROMPT: &str = "Enter PDF file path: ";
pub const QUERY_PROMPT: &str = "Enter search term: ";

/// Read one line, without its line terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// Ask once for the document path. Surrounding whitespace is dropped.
pub fn prompt_path<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<PathBuf>> {
    write!(out, "{}", PATH_PROMPT)?;
    out.flush()?;
    Ok(read_line(input)?
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .map(PathBuf::from))
}

/// Prompt for queries until end of input; returns how many were answered.
///
/// Each line is searched verbatim, so leading or trailing spaces are part
/// of the query.
pub fn run<R: BufRead, W: WriteColor>(session: &Session, input: &mut R, out: &mut W) -> io::Result<usize> {
    let mut answered = 0;
    loop {
        write!(out, "{}", QUERY_PROMPT)?;
        out.flush()?;
        let Some(query) = read_line(input)? else {
            writeln!(out)?;
            return Ok(answered);
        };
        print_outcome(out, &session.search(&query))?;
        answered += 1;
    }
}
