use std::io::{BufRead, Write};

use anyhow::Context;
use log::{debug, warn};
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{config::Config, context::EvaluationContext};

/// Where the loop gets its input from, one line at a time.
pub trait LineSource {
    /// The next line without its terminator, `None` once input is exhausted
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;

    fn add_history(&mut self, _line: &str) {}
}

/// Interactive line editing with history, backed by rustyline.
pub struct Editor {
    editor: DefaultEditor,
}

impl Editor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { editor: DefaultEditor::new()? })
    }

    pub fn load_history(&mut self, config: &Config) {
        if let Some(path) = &config.history_file {
            if let Err(err) = self.editor.load_history(path) {
                debug!("no history loaded from {:?}: {}", path, err);
            }
        }
    }

    pub fn save_history(&mut self, config: &Config) -> anyhow::Result<()> {
        if let Some(path) = &config.history_file {
            self.editor.save_history(path)
                .with_context(|| format!("saving history to {:?}", path))?;
        }
        Ok(())
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            warn!("could not record history: {}", err);
        }
    }
}

/// Plain buffered input, no prompt is shown
pub struct Lines<R> {
    reader: R,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for Lines<R> {
    // Bytes that are not UTF-8 become U+FFFD, the parser then rejects the
    // line like any other stray character.
    fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
        let mut buffer = Vec::new();
        if self.reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buffer);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
    }
}

/// The read-eval-print loop: one rendered line of output per line of input.
pub struct Repl<S, W> {
    context: EvaluationContext,
    source: S,
    output: W,
    config: Config,
}

impl<S: LineSource, W: Write> Repl<S, W> {
    pub fn new(source: S, output: W, config: Config) -> Self {
        Self { context: EvaluationContext::new(), source, output, config }
    }

    /// Handles one line of input, writing either the value it evaluates to
    /// or the parser error that rejected it.
    pub fn rep(&mut self, line: &str) -> anyhow::Result<()> {
        match self.context.evaluate_str(line) {
            Ok(value) => writeln!(self.output, "{}", value)?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        for line in &self.config.banner {
            writeln!(self.output, "{}", line)?;
        }

        while let Some(line) = self.source.read_line(&self.config.prompt)? {
            if line.trim().is_empty() {
                continue;
            }
            self.source.add_history(&line);
            self.rep(&line)?;
            self.output.flush()?;
        }

        debug!("input exhausted, leaving the loop");
        Ok(())
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
