use std::process::Command;

use crate::command;
use crate::configuration::SpoolerConfiguration;
use crate::document::PageSource;
use crate::error::ContextError;
use crate::pageable::{PdfPageable, SpoolData};

/// A printer destination registered with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintService {
    pub name: String,
}

impl PrintService {
    pub fn new<S: Into<String>>(name: S) -> Self {
        PrintService { name: name.into() }
    }
}

/// The platform print subsystem: it knows the available printers and accepts print jobs.
pub trait PrintSystem {
    /// Lists the available print services, in the order the platform reports them.
    fn lookup_print_services(&self) -> Result<Vec<PrintService>, ContextError>;

    /// Submits the data to the given print service, or to the default one when there is none.
    fn submit(
        &self,
        job_name: &str,
        print_service: Option<&PrintService>,
        spool_data: SpoolData,
    ) -> Result<(), ContextError>;
}

/// Selects the first print service whose name contains `printer_name`.
pub fn select_print_service<'a>(
    print_services: &'a [PrintService],
    printer_name: &str,
) -> Option<&'a PrintService> {
    print_services
        .iter()
        .find(|print_service| print_service.name.contains(printer_name))
}

/// A print job being configured, it is only sent once `print` is called.
pub struct PrintJob<'a, D> {
    name: String,
    print_service: Option<PrintService>,
    pageable: Option<PdfPageable<'a, D>>,
}

impl<'a, D: PageSource> PrintJob<'a, D> {
    pub fn new<S: Into<String>>(name: S) -> Self {
        PrintJob {
            name: name.into(),
            print_service: None,
            pageable: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selected print service, `None` standing for the platform default.
    pub fn print_service(&self) -> Option<&PrintService> {
        self.print_service.as_ref()
    }

    pub fn set_print_service(&mut self, print_service: PrintService) {
        self.print_service = Some(print_service);
    }

    pub fn set_pageable(&mut self, pageable: PdfPageable<'a, D>) {
        self.pageable = Some(pageable);
    }

    /// Renders the attached pageable and submits it to the print system.
    pub fn print<P: PrintSystem + ?Sized>(&self, print_system: &P) -> Result<(), ContextError> {
        let pageable = self.pageable.as_ref().ok_or(ContextError::with_context(format!(
            "No pages were attached to the print job {:?}",
            self.name
        )))?;
        let spool_data = pageable.spool_data()?;
        print_system.submit(&self.name, self.print_service.as_ref(), spool_data)
    }
}

/// A `PrintSystem` driving CUPS through its `lpstat` and `lp` command line clients.
#[derive(Debug, Clone)]
pub struct CupsPrintSystem {
    lp_program: String,
    lpstat_program: String,
}

impl CupsPrintSystem {
    pub fn new(configuration: &SpoolerConfiguration) -> Self {
        CupsPrintSystem {
            lp_program: configuration.lp_program.clone(),
            lpstat_program: configuration.lpstat_program.clone(),
        }
    }

    /// The command submitting a job, the document is read by `lp` from its standard input:
    ///
    /// ```bash
    /// $ lp -d <printer> -t <job name> -o <option> ...
    /// ```
    fn lp_command(
        &self,
        job_name: &str,
        print_service: Option<&PrintService>,
        options: &[String],
    ) -> Command {
        let mut command = Command::new(&self.lp_program);
        if let Some(print_service) = print_service {
            command.arg("-d").arg(&print_service.name);
        }
        command.arg("-t").arg(job_name);
        for option in options {
            command.arg("-o").arg(option);
        }
        command
    }
}

impl PrintSystem for CupsPrintSystem {
    fn lookup_print_services(&self) -> Result<Vec<PrintService>, ContextError> {
        let mut command = Command::new(&self.lpstat_program);
        command.arg("-e");
        let output = command::run(command).map_err(|error| {
            ContextError::with_error("Failed to list the print services", &error)
        })?;

        Ok(parse_destinations(&String::from_utf8_lossy(&output.stdout)))
    }

    fn submit(
        &self,
        job_name: &str,
        print_service: Option<&PrintService>,
        spool_data: SpoolData,
    ) -> Result<(), ContextError> {
        let command = self.lp_command(job_name, print_service, &spool_data.options);
        let output = command::run_with_input(command, spool_data.document_bytes).map_err(
            |error| ContextError::with_error(format!("Failed to print {:?}", job_name), &error),
        )?;
        log::info!(
            "Submitted {:?} to {}: {}",
            job_name,
            print_service.map_or("the default printer", |print_service| print_service.name.as_str()),
            String::from_utf8_lossy(&output.stdout).trim()
        );

        Ok(())
    }
}

/// Parses the output of `lpstat -e`, which lists one destination per line.
fn parse_destinations(lpstat_output: &str) -> Vec<PrintService> {
    lpstat_output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(PrintService::new)
        .collect()
}
