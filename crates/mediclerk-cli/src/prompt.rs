//! Line-oriented prompts for filling a form on a terminal.

use std::future::Future;
use std::io::{self, BufRead, Write};

use mediclerk_api::error::ApiError;
use mediclerk_core::models::payload::SubmissionPayload;
use mediclerk_core::models::record::ClerkingRecord;
use mediclerk_forms::engine::FormSession;
use mediclerk_forms::error::{FieldErrors, SubmitError, SubmitRejected};
use tracing::debug;

/// Entering this on its own clears a field.
pub const CLEAR_TOKEN: &str = "-";

pub struct Prompter<R, W> {
    input: R,
    output: W,
    exhausted: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            exhausted: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `question` and read one line. `None` once input is exhausted.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.exhausted = true;
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask until a non-blank answer is given.
    pub fn ask_required(&mut self, question: &str) -> eyre::Result<String> {
        loop {
            match self.ask(question)? {
                Some(answer) if !answer.trim().is_empty() => return Ok(answer.trim().to_string()),
                Some(_) => continue,
                None => return Err(eyre::eyre!("input ended before {question:?} was answered")),
            }
        }
    }

    /// `y`/`yes` confirms; anything else, including end of input, declines.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N] "))?;
        Ok(matches!(
            answer.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }

    /// Prompt for each of `keys` in turn. A blank answer keeps the current
    /// value and [`CLEAR_TOKEN`] empties it.
    pub fn fill_fields(&mut self, session: &mut FormSession, keys: &[String]) -> eyre::Result<()> {
        for key in keys {
            let Some(field) = session.fields().iter().find(|f| &f.key == key) else {
                continue;
            };
            let current = session.value(key).unwrap_or_default();
            let marker = if field.is_required() { "*" } else { "" };
            let question = if current.is_empty() {
                format!("{}{marker}: ", field.label)
            } else {
                format!("{}{marker} [{}]: ", field.label, current)
            };

            let Some(answer) = self.ask(&question)? else {
                break;
            };
            let answer = answer.trim();
            if answer == CLEAR_TOKEN {
                session.set_field_value(key, "")?;
            } else if !answer.is_empty() {
                session.set_field_value(key, answer)?;
            }
        }
        Ok(())
    }

    pub fn print_errors(&mut self, session: &FormSession, errors: &FieldErrors) -> io::Result<()> {
        writeln!(self.output, "Please fix the following:")?;
        for field in session.fields() {
            if let Some(message) = errors.get(&field.key) {
                writeln!(self.output, "  {}: {message}", field.label)?;
            }
        }
        Ok(())
    }

    /// Prompt for every field, then re-prompt only the failing ones until
    /// the form validates. Returns the payload with the session marked busy.
    pub fn complete_form(&mut self, session: &mut FormSession) -> eyre::Result<SubmissionPayload> {
        let all: Vec<String> = session.fields().iter().map(|f| f.key.clone()).collect();
        self.fill_fields(session, &all)?;

        loop {
            match session.begin_submit() {
                Ok(payload) => return Ok(payload),
                Err(SubmitRejected::Invalid(errors)) => {
                    self.print_errors(session, &errors)?;
                    if self.exhausted {
                        return Err(eyre::eyre!(
                            "input ended with {} field(s) still invalid",
                            errors.len()
                        ));
                    }
                    let failing: Vec<String> = session
                        .fields()
                        .iter()
                        .filter(|f| errors.contains_key(&f.key))
                        .map(|f| f.key.clone())
                        .collect();
                    self.fill_fields(session, &failing)?;
                }
                Err(other) => return Err(eyre::eyre!(other)),
            }
        }
    }

    /// Hand `payload` to `persist` and settle the session with the result.
    ///
    /// When the service is unreachable or answers with a server error the
    /// message is shown and the user may resubmit the same values. Declining
    /// (or closing input) returns that failure with every value still in
    /// `session`.
    pub async fn submit_with_retry<F, Fut>(
        &mut self,
        session: &mut FormSession,
        mut payload: SubmissionPayload,
        mut persist: F,
    ) -> Result<ClerkingRecord, SubmitError<ApiError>>
    where
        F: FnMut(SubmissionPayload) -> Fut,
        Fut: Future<Output = Result<ClerkingRecord, ApiError>>,
    {
        loop {
            let result = persist(payload).await;
            match session.finish_submit(result) {
                Err(SubmitError::Failed(e)) if e.is_retryable() => {
                    let shown = writeln!(self.output, "{}", e.user_message());
                    if shown.is_err() || !self.confirm("Retry?").unwrap_or(false) {
                        return Err(SubmitError::Failed(e));
                    }
                    debug!(error = %e, "resubmitting clerking note");
                    payload = session.begin_submit()?;
                }
                settled => return settled,
            }
        }
    }
}
