//! pdfspool sends PDF documents to the system print spooler. It reads a flat list of command
//! line arguments into a `PrintRequest`, opens (and if needed decrypts) the document, and submits
//! it to the selected printer with the requested orientation, page border and resolution.
//!
//! The crate itself does not render nor spool anything: the documents are loaded through `lopdf`,
//! rasterized through ghostscript and printed through the CUPS command line clients. All of these
//! collaborators sit behind traits, so that the dispatching logic can be driven without them.

/// The module where the command line arguments are parsed into a `PrintRequest`.
///
/// The accepted arguments follow a fixed grammar: single-dash flags such as `-printerName`, some of
/// them taking the following argument as their value, and a single input file given by the last
/// argument which is not a flag. Parsing never terminates the process, it returns an `ArgumentError`
/// which tells whether the fixed `USAGE` text has to be shown.
pub mod arguments;

/// Runs external programs feeding them data through their standard input.
pub mod command;

/// The module containing the `SpoolerConfiguration`, a JSON file naming the external programs
/// to be used for printing. It is read from the path given by the `PDFSPOOL_CONFIGURATION`
/// environment variable, and defaults to the programs found in the `PATH`.
pub mod configuration;

/// The confirmation asked to the user before a print job is sent, unless printing silently.
pub mod dialog;

/// The module where the sequence of steps from a `PrintRequest` to a printed document is presented.
///
/// # Introduction
///
/// The entry point of this module is the `dispatch` function. It opens the document, creates a
/// print job named after the file, selects the print service, attaches the pages and either asks
/// for a confirmation or prints right away. Each collaborator is reached through a trait, so
/// that the same function is used by the binary and by the tests.
pub mod dispatch;

/// The module where documents are opened, decrypted and rendered into the data to be spooled.
///
/// Loading is done with `lopdf`, which also allows to draw a border around the pages by appending
/// a content stream to each one of them. An open document is represented by `PdfDocument`, which is
/// closed as soon as it is dropped.
pub mod document;

/// This module contains the `ContextError` type which is the error type used throughout this library.
///
/// Every failure coming from a collaborator (the PDF library, ghostscript, the spooler) is wrapped in
/// a `ContextError` explaining what was being done, together with the message of the original error.
pub mod error;

/// The adapter between an open document and a print job, carrying the orientation, the border and
/// the resolution of the intermediate raster.
pub mod pageable;

/// Rendering of the pages into images before printing, through ghostscript.
pub mod rasterizer;

/// The module where the printers are enumerated and the print jobs are submitted.
///
/// The `PrintSystem` trait is implemented by `CupsPrintSystem`, which relies on the `lpstat` and `lp`
/// programs of CUPS, so it is to be noted that it is not cross-platform compatible.
pub mod spooler;
