use std::path::Path;

use crate::arguments::PrintRequest;
use crate::dialog::Confirmation;
use crate::document::DocumentSource;
use crate::error::ContextError;
use crate::pageable::PdfPageable;
use crate::spooler::{select_print_service, PrintJob, PrintSystem};

/// How a dispatched print request ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The document was handed to the print system.
    Printed,
    /// The user declined to print.
    Cancelled,
}

/// Prints the requested document.
///
/// The document is opened first and stays open until this function returns, whatever the
/// outcome: it is dropped, and thus closed, exactly once on every path. When a printer name
/// is requested, the first print service whose name contains it is used, otherwise (or if
/// no print service matches) the job goes to the default one. Unless the request is silent
/// the user has to confirm the job before it is printed.
pub fn dispatch<S, P, C>(
    request: &PrintRequest,
    document_source: &S,
    print_system: &P,
    confirmation: &mut C,
) -> Result<DispatchOutcome, ContextError>
where
    S: DocumentSource + ?Sized,
    P: PrintSystem + ?Sized,
    C: Confirmation + ?Sized,
{
    let file_path = Path::new(&request.file_path);
    let document = document_source.open(file_path, &request.password)?;

    let mut print_job = PrintJob::new(job_name(file_path));

    if let Some(printer_name) = &request.printer_name {
        let print_services = print_system.lookup_print_services()?;
        match select_print_service(&print_services, printer_name) {
            Some(print_service) => {
                log::debug!("Selected the print service {:?}", print_service.name);
                print_job.set_print_service(print_service.clone());
            }
            None => log::warn!(
                "No printer matches {:?}, printing to the default printer instead",
                printer_name
            ),
        }
    }

    let pageable = PdfPageable::new(
        &document,
        request.orientation,
        request.show_border,
        request.dpi,
    );
    let number_of_pages = pageable.number_of_pages();
    print_job.set_pageable(pageable);

    if !request.silent
        && !confirmation.confirm(print_job.name(), print_job.print_service(), number_of_pages)?
    {
        log::info!("Printing of {:?} cancelled", print_job.name());
        return Ok(DispatchOutcome::Cancelled);
    }

    print_job.print(print_system)?;
    Ok(DispatchOutcome::Printed)
}

/// The name of the print job is the name of the file, without its directories.
fn job_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .unwrap_or(file_path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
