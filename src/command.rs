use std::io::Write as _;
use std::process::{Command, Output, Stdio};

use crate::error::ContextError;

/// Runs the given command feeding `input` to its standard input, and collects its output.
///
/// The input is written from a separate thread so that a program producing output before
/// having consumed all of its input cannot block on a full pipe. A non-zero exit status is
/// reported as an error carrying the standard error of the program.
pub fn run_with_input(mut command: Command, input: Vec<u8>) -> Result<Output, ContextError> {
    let program = command.get_program().to_string_lossy().into_owned();
    log::debug!("Running {:?}", command);

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| {
            ContextError::with_error(format!("Unable to run the {} command", program), &error)
        })?;

    let mut stdin = child.stdin.take().ok_or(ContextError::with_context(format!(
        "Unable to open the standard input of the {} command",
        program
    )))?;
    let writer = std::thread::spawn(move || stdin.write_all(&input));

    let output = child.wait_with_output().map_err(|error| {
        ContextError::with_error(
            format!("Unable to wait for the {} command execution", program),
            &error,
        )
    })?;
    let written = writer.join().map_err(|_| {
        ContextError::with_context(format!(
            "The thread writing to the {} command panicked",
            program
        ))
    })?;

    if !output.status.success() {
        return Err(ContextError::with_diagnostic(
            format!("{} failed with {}", program, output.status),
            &output.stderr,
        ));
    }
    // Stopping to read early only matters when the program also failed
    if let Err(error) = written {
        log::debug!("The {} command did not read all of its input: {}", program, error);
    }

    Ok(output)
}

/// Runs the given command without input, and collects its output.
pub fn run(mut command: Command) -> Result<Output, ContextError> {
    let program = command.get_program().to_string_lossy().into_owned();
    log::debug!("Running {:?}", command);

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|error| {
            ContextError::with_error(format!("Unable to run the {} command", program), &error)
        })?;
    if !output.status.success() {
        return Err(ContextError::with_diagnostic(
            format!("{} failed with {}", program, output.status),
            &output.stderr,
        ));
    }

    Ok(output)
}
