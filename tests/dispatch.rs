use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pdfspool::{
    arguments::{parse_arguments, PrintRequest},
    dialog::Confirmation,
    dispatch::{dispatch, DispatchOutcome},
    document::{DocumentSource, PageSource, RenderSettings},
    error::ContextError,
    pageable::SpoolData,
    spooler::{PrintService, PrintSystem},
};

/// A document counting how many times it has been closed.
struct FakeDocument {
    closed: Rc<Cell<usize>>,
    render_error: bool,
}

impl PageSource for FakeDocument {
    fn number_of_pages(&self) -> usize {
        2
    }

    fn render(&self, settings: &RenderSettings) -> Result<Vec<u8>, ContextError> {
        if self.render_error {
            return Err(ContextError::with_context("Failed to render the document"));
        }
        Ok(format!("border={} dpi={}", settings.show_border, settings.dpi).into_bytes())
    }
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

#[derive(Default)]
struct FakeSource {
    closed: Rc<Cell<usize>>,
    opened: RefCell<Vec<(PathBuf, String)>>,
    render_error: bool,
}

impl DocumentSource for FakeSource {
    type Document = FakeDocument;

    fn open(&self, path: &Path, password: &str) -> Result<FakeDocument, ContextError> {
        if password == "wrong" {
            return Err(ContextError::with_context("Failed to decrypt the document"));
        }
        self.opened
            .borrow_mut()
            .push((path.to_path_buf(), password.to_string()));
        Ok(FakeDocument {
            closed: self.closed.clone(),
            render_error: self.render_error,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Submission {
    job_name: String,
    print_service: Option<String>,
    spool_data: SpoolData,
}

#[derive(Default)]
struct FakePrintSystem {
    print_services: Vec<PrintService>,
    submissions: RefCell<Vec<Submission>>,
    lookups: Cell<usize>,
    spooler_error: bool,
}

impl FakePrintSystem {
    fn with_services(names: &[&str]) -> Self {
        FakePrintSystem {
            print_services: names.iter().map(|name| PrintService::new(*name)).collect(),
            ..Default::default()
        }
    }
}

impl PrintSystem for FakePrintSystem {
    fn lookup_print_services(&self) -> Result<Vec<PrintService>, ContextError> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.print_services.clone())
    }

    fn submit(
        &self,
        job_name: &str,
        print_service: Option<&PrintService>,
        spool_data: SpoolData,
    ) -> Result<(), ContextError> {
        if self.spooler_error {
            return Err(ContextError::with_context("lp failed with exit status: 1"));
        }
        self.submissions.borrow_mut().push(Submission {
            job_name: job_name.to_string(),
            print_service: print_service.map(|print_service| print_service.name.clone()),
            spool_data,
        });
        Ok(())
    }
}

/// A confirmation giving a fixed answer and remembering what it was asked.
struct FakeConfirmation {
    answer: bool,
    asked: Vec<(String, Option<String>, usize)>,
}

impl FakeConfirmation {
    fn answering(answer: bool) -> Self {
        FakeConfirmation {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Confirmation for FakeConfirmation {
    fn confirm(
        &mut self,
        job_name: &str,
        print_service: Option<&PrintService>,
        number_of_pages: usize,
    ) -> Result<bool, ContextError> {
        self.asked.push((
            job_name.to_string(),
            print_service.map(|print_service| print_service.name.clone()),
            number_of_pages,
        ));
        Ok(self.answer)
    }
}

fn request(arguments: &[&str]) -> PrintRequest {
    parse_arguments(arguments).unwrap()
}

#[test]
fn test_silent_print_skips_the_confirmation() {
    let source = FakeSource::default();
    let print_system = FakePrintSystem::default();
    let mut confirmation = FakeConfirmation::answering(false);

    let outcome = dispatch(
        &request(&["-silentPrint", "/tmp/documents/report.pdf"]),
        &source,
        &print_system,
        &mut confirmation,
    )
    .unwrap();

    assert_eq!(outcome, DispatchOutcome::Printed);
    assert!(confirmation.asked.is_empty());
    assert_eq!(
        *print_system.submissions.borrow(),
        [Submission {
            job_name: "report.pdf".into(),
            print_service: None,
            spool_data: SpoolData {
                document_bytes: b"border=false dpi=0".to_vec(),
                options: vec![],
            },
        }]
    );
    assert_eq!(print_system.lookups.get(), 0);
    assert_eq!(source.closed.get(), 1);
}

#[test]
fn test_confirmed_print() {
    let source = FakeSource::default();
    let print_system = FakePrintSystem::with_services(&["Office-LaserA-2F", "LaserB"]);
    let mut confirmation = FakeConfirmation::answering(true);

    let outcome = dispatch(
        &request(&[
            "-printerName",
            "LaserA",
            "-orientation",
            "portrait",
            "-border",
            "-dpi",
            "150",
            "-password",
            "secret",
            "report.pdf",
        ]),
        &source,
        &print_system,
        &mut confirmation,
    )
    .unwrap();

    assert_eq!(outcome, DispatchOutcome::Printed);
    assert_eq!(
        confirmation.asked,
        [("report.pdf".to_string(), Some("Office-LaserA-2F".to_string()), 2)]
    );
    assert_eq!(
        *source.opened.borrow(),
        [(PathBuf::from("report.pdf"), "secret".to_string())]
    );
    assert_eq!(
        *print_system.submissions.borrow(),
        [Submission {
            job_name: "report.pdf".into(),
            print_service: Some("Office-LaserA-2F".into()),
            spool_data: SpoolData {
                document_bytes: b"border=true dpi=150".to_vec(),
                options: vec!["orientation-requested=3".into()],
            },
        }]
    );
    assert_eq!(source.closed.get(), 1);
}

#[test]
fn test_unmatched_printer_name_uses_the_default() {
    let source = FakeSource::default();
    let print_system = FakePrintSystem::with_services(&["Office-LaserA-2F", "LaserB"]);
    let mut confirmation = FakeConfirmation::answering(true);

    let outcome = dispatch(
        &request(&["-printerName", "Missing", "-silentPrint", "report.pdf"]),
        &source,
        &print_system,
        &mut confirmation,
    )
    .unwrap();

    assert_eq!(outcome, DispatchOutcome::Printed);
    assert_eq!(print_system.lookups.get(), 1);
    assert_eq!(print_system.submissions.borrow()[0].print_service, None);
}

#[test]
fn test_cancelled_print() {
    let source = FakeSource::default();
    let print_system = FakePrintSystem::default();
    let mut confirmation = FakeConfirmation::answering(false);

    let outcome = dispatch(
        &request(&["report.pdf"]),
        &source,
        &print_system,
        &mut confirmation,
    )
    .unwrap();

    assert_eq!(outcome, DispatchOutcome::Cancelled);
    assert_eq!(confirmation.asked.len(), 1);
    assert!(print_system.submissions.borrow().is_empty());
    assert_eq!(source.closed.get(), 1);
}

#[test]
fn test_document_is_closed_once_when_printing_fails() {
    let source = FakeSource::default();
    let print_system = FakePrintSystem {
        spooler_error: true,
        ..Default::default()
    };

    let error = dispatch(
        &request(&["-silentPrint", "report.pdf"]),
        &source,
        &print_system,
        &mut FakeConfirmation::answering(true),
    )
    .unwrap_err();

    assert_eq!(error.context, "lp failed with exit status: 1");
    assert_eq!(source.closed.get(), 1);
}

#[test]
fn test_document_is_closed_once_when_rendering_fails() {
    let source = FakeSource {
        render_error: true,
        ..Default::default()
    };
    let print_system = FakePrintSystem::default();

    let error = dispatch(
        &request(&["-silentPrint", "report.pdf"]),
        &source,
        &print_system,
        &mut FakeConfirmation::answering(true),
    )
    .unwrap_err();

    assert_eq!(error.context, "Failed to render the document");
    assert!(print_system.submissions.borrow().is_empty());
    assert_eq!(source.closed.get(), 1);
}

#[test]
fn test_load_failure_prints_nothing() {
    let source = FakeSource::default();
    let print_system = FakePrintSystem::with_services(&["LaserB"]);
    let mut confirmation = FakeConfirmation::answering(true);

    let error = dispatch(
        &request(&["-password", "wrong", "-printerName", "Laser", "report.pdf"]),
        &source,
        &print_system,
        &mut confirmation,
    )
    .unwrap_err();

    assert_eq!(error.context, "Failed to decrypt the document");
    assert_eq!(print_system.lookups.get(), 0);
    assert!(confirmation.asked.is_empty());
    assert!(print_system.submissions.borrow().is_empty());
    assert_eq!(source.closed.get(), 0);
}
