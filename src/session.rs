use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::record::PromptRecord;

const KEY_PROMPT: &str = "Enter your LLM API key: ";
const TEXT_PROMPT: &str = "Enter your prompt: ";
const SAVE_PROMPT: &str = "\nWould you like to save the JSON output to a file? (y/n): ";

/// What a finished session produced.
#[derive(Debug)]
pub struct SessionSummary {
    pub record: PromptRecord,
    pub saved_to: Option<PathBuf>,
}

/// The interactive front end: asks for a key and a prompt, has the prompt refined,
/// prints the resulting document and optionally saves it.
///
/// Input and output are generic so the whole exchange can be driven from memory.
pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Session { input, output }
    }

    /// Prints `label` and reads one line of input, without its line terminator.
    ///
    /// Running out of input is an error; an empty line is not.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from standard input")?;
        if read == 0 {
            bail!("Input ended while waiting for an answer to '{}'", label.trim());
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Asks a yes/no question; only an answer of `y` (in either case) counts as yes.
    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        Ok(self.ask(label)?.to_lowercase() == "y")
    }

    pub async fn run(&mut self, client: &ApiClient, output_path: &Path) -> Result<SessionSummary> {
        let api_key = self.ask(KEY_PROMPT)?;
        if api_key.is_empty() {
            warn!("no API key entered, the request will most likely be rejected");
        }
        let prompt = self.ask(TEXT_PROMPT)?;

        let outcome = client.refine(&prompt, &api_key).await;
        if !outcome.is_refined() {
            info!("using the original prompt as the processed prompt");
        }
        let record = PromptRecord::new(prompt.as_str(), outcome.into_text(&prompt));
        let document = record.render()?;

        writeln!(self.output, "\nJSON-formatted prompt:")?;
        writeln!(self.output, "{document}")?;

        let saved_to = if self.confirm(SAVE_PROMPT)? {
            save_document(output_path, &document)?;
            writeln!(
                self.output,
                "JSON output saved to '{}'",
                output_path.display()
            )?;
            Some(output_path.to_path_buf())
        } else {
            debug!("not saving the document");
            None
        };
        self.output.flush()?;

        Ok(SessionSummary { record, saved_to })
    }
}

/// Writes `contents` to `path` verbatim, replacing any existing file.
pub fn save_document(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "saved prompt document");
    Ok(())
}
