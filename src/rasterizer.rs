use std::process::Command;

use crate::command;
use crate::error::ContextError;

/// Renders every page of a PDF document into an image, producing a PDF document made of these images.
pub trait Rasterizer {
    fn rasterize(&self, pdf_bytes: Vec<u8>, dpi: u32) -> Result<Vec<u8>, ContextError>;
}

/// A `Rasterizer` running ghostscript with its `pdfimage24` device. The command which is run
/// is the following, with the document being fed through the standard input:
///
/// ```bash
/// $ gs -q -dSAFER -dBATCH -dNOPAUSE -sstdout=%stderr -sDEVICE=pdfimage24 -r300 -sOutputFile=- -
/// ```
#[derive(Debug, Clone)]
pub struct Ghostscript {
    program: String,
}

impl Ghostscript {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Ghostscript {
            program: program.into(),
        }
    }

    fn command(&self, dpi: u32) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-q")
            .arg("-dSAFER")
            .arg("-dBATCH")
            .arg("-dNOPAUSE")
            // Keeps the PostScript messages out of the rendered document
            .arg("-sstdout=%stderr")
            .arg("-sDEVICE=pdfimage24")
            .arg(format!("-r{}", dpi))
            .arg("-sOutputFile=-")
            .arg("-");
        command
    }
}

impl Rasterizer for Ghostscript {
    fn rasterize(&self, pdf_bytes: Vec<u8>, dpi: u32) -> Result<Vec<u8>, ContextError> {
        let output = command::run_with_input(self.command(dpi), pdf_bytes).map_err(|error| {
            ContextError::with_error(
                format!("Failed to render the document at {} dpi", dpi),
                &error,
            )
        })?;
        if output.stdout.is_empty() {
            return Err(ContextError::with_diagnostic(
                format!("{} rendered nothing", self.program),
                &output.stderr,
            ));
        }
        log::debug!(
            "Rendered the document at {} dpi into {} bytes",
            dpi,
            output.stdout.len()
        );

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let command = Ghostscript::new("gs").command(150);
        let arguments: Vec<_> = command
            .get_args()
            .map(|argument| argument.to_string_lossy().into_owned())
            .collect();
        assert_eq!(command.get_program(), "gs");
        assert_eq!(
            arguments,
            [
                "-q",
                "-dSAFER",
                "-dBATCH",
                "-dNOPAUSE",
                "-sstdout=%stderr",
                "-sDEVICE=pdfimage24",
                "-r150",
                "-sOutputFile=-",
                "-",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program() {
        let error = Ghostscript::new("false")
            .rasterize(b"%PDF-1.5".to_vec(), 72)
            .unwrap_err();
        assert_eq!(error.context, "Failed to render the document at 72 dpi");
    }
}
