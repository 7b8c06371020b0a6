//! Line-oriented prompts on stdin/stdout
//!
//! Also provides the fallback selector used when the full-screen browser cannot
//! start: it walks the same [`Session`] with one question per entry.

use std::io::{self, BufRead, Write};

use crate::selection::{Event, Phase, SelectionOutcome, Session};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Read one trimmed line. `None` on end of input.
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut response = String::new();
        if self.input.read_line(&mut response)? == 0 {
            return Ok(None);
        }
        Ok(Some(response.trim().to_string()))
    }

    /// Ask a yes/no question. `q` or end of input cancels.
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<Option<bool>> {
        let hint = if default { "[Y/n/q]" } else { "[y/N/q]" };
        loop {
            write!(self.output, "{} {} ", question, hint)?;
            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                "q" | "quit" => return Ok(None),
                _ => writeln!(self.output, "Please answer y, n or q.")?,
            }
        }
    }

    /// Pick one of `options` by number or by name. Returns its index.
    pub fn ask(&mut self, question: &str, options: &[&str]) -> io::Result<Option<usize>> {
        writeln!(self.output, "{}", question)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "Choice [1-{}, q to cancel]: ", options.len())?;
            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            let by_number = answer
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=options.len()).contains(n))
                .map(|n| n - 1);
            let by_name = || options.iter().position(|o| o.eq_ignore_ascii_case(&answer));

            match by_number.or_else(by_name) {
                Some(index) => return Ok(Some(index)),
                None => writeln!(self.output, "Not a valid choice: {}", answer)?,
            }
        }
    }

    /// Free-form answer. Empty input keeps `default`.
    pub fn text(&mut self, question: &str, default: Option<&str>) -> io::Result<Option<String>> {
        match default {
            Some(d) => write!(self.output, "{} [{}]: ", question, d)?,
            None => write!(self.output, "{}: ", question)?,
        }
        let Some(answer) = self.read_answer()? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(default.map(str::to_string).or(Some(answer)));
        }
        Ok(Some(answer))
    }
}

/// Run `session` to completion with one yes/no question per sensitive file and
/// per top-level entry.
pub fn select<R: BufRead, W: Write>(
    mut session: Session,
    prompter: &mut Prompter<R, W>,
) -> io::Result<SelectionOutcome> {
    let review_rows = match session.phase() {
        Phase::Review(review) => Some(review.view().rows),
        Phase::Browse(_) => None,
    };

    if let Some(rows) = review_rows {
        prompter.say(&format!("Found {} files that look sensitive.", rows.len()))?;
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                session.handle(Event::Down);
            }
            let question = format!("Hide {} ({})?", row.label, row.reason);
            match prompter.confirm(&question, true)? {
                None => return Ok(SelectionOutcome::Cancelled),
                Some(hide) if hide != row.selected => {
                    session.handle(Event::Toggle);
                }
                Some(_) => {}
            }
        }
        session.handle(Event::Confirm);
    }

    let browse_rows = match session.phase() {
        Phase::Browse(browse) => browse.view().rows,
        Phase::Review(_) => Vec::new(),
    };

    for (i, row) in browse_rows.iter().enumerate() {
        if i > 0 {
            session.handle(Event::Down);
        }
        if row.hidden {
            continue;
        }
        let suffix = if row.is_directory { "/" } else { "" };
        let question = format!("Share {}{} with the agent?", row.name, suffix);
        match prompter.confirm(&question, true)? {
            None => return Ok(SelectionOutcome::Cancelled),
            Some(false) => {
                session.handle(Event::Toggle);
            }
            Some(true) => {}
        }
    }

    Ok(session
        .handle(Event::Confirm)
        .unwrap_or(SelectionOutcome::Cancelled))
}
