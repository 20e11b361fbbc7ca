use crate::arguments::Orientation;
use crate::document::{PageSource, RenderSettings};
use crate::error::ContextError;

/// The data handed to the spooler for a single print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolData {
    /// The document to be printed, as PDF data.
    pub document_bytes: Vec<u8>,
    /// Job options in the `key=value` form understood by the spooler.
    pub options: Vec<String>,
}

/// Adapts an open document to what a print job consumes, by applying the orientation,
/// the page border and the intermediate raster resolution.
pub struct PdfPageable<'a, D> {
    document: &'a D,
    orientation: Orientation,
    settings: RenderSettings,
}

impl<'a, D: PageSource> PdfPageable<'a, D> {
    pub fn new(document: &'a D, orientation: Orientation, show_border: bool, dpi: i32) -> Self {
        PdfPageable {
            document,
            orientation,
            settings: RenderSettings { show_border, dpi },
        }
    }

    pub fn number_of_pages(&self) -> usize {
        self.document.number_of_pages()
    }

    /// Renders the document and collects the job options matching the settings.
    pub fn spool_data(&self) -> Result<SpoolData, ContextError> {
        let document_bytes = self.document.render(&self.settings)?;
        Ok(SpoolData {
            document_bytes,
            options: orientation_options(self.orientation),
        })
    }
}

/// The job options requesting the given orientation, no option at all leaves the spooler
/// free to rotate every page so that it fits the paper.
fn orientation_options(orientation: Orientation) -> Vec<String> {
    match orientation {
        Orientation::Auto => Vec::new(),
        Orientation::Portrait => vec!["orientation-requested=3".into()],
        Orientation::Landscape => vec!["orientation-requested=4".into()],
    }
}
