use std::io::{BufRead, Write};

use crate::error::ContextError;
use crate::spooler::PrintService;

/// Asks the user whether a print job should really be printed.
pub trait Confirmation {
    /// Returns `true` if the job has to be printed, `false` if it has been cancelled.
    fn confirm(
        &mut self,
        job_name: &str,
        print_service: Option<&PrintService>,
        number_of_pages: usize,
    ) -> Result<bool, ContextError>;
}

/// A `Confirmation` prompting on a terminal, only an explicit yes confirms the job.
pub struct TerminalConfirmation<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirmation<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompts on the standard error and reads the answer from the standard input.
    pub fn stdio() -> Self {
        TerminalConfirmation::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalConfirmation { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmation for TerminalConfirmation<R, W> {
    fn confirm(
        &mut self,
        job_name: &str,
        print_service: Option<&PrintService>,
        number_of_pages: usize,
    ) -> Result<bool, ContextError> {
        let printer = match print_service {
            Some(print_service) => print_service.name.as_str(),
            None => "the default printer",
        };
        write!(
            self.output,
            "Print {:?} ({} pages) on {}? [y/N] ",
            job_name, number_of_pages, printer
        )
        .and_then(|()| self.output.flush())
        .map_err(|error| ContextError::with_error("Failed to show the print prompt", &error))?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .map_err(|error| ContextError::with_error("Failed to read the answer", &error))?;
        let answer = answer.trim().to_lowercase();

        Ok(answer == "y" || answer == "yes")
    }
}
