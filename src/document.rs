use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId};
use std::path::{Path, PathBuf};

use crate::error::ContextError;
use crate::rasterizer::Rasterizer;

/// Opens the documents to be printed.
pub trait DocumentSource {
    type Document: PageSource;

    /// Opens the document at the given path, decrypting it with `password` if it is encrypted.
    /// The document is closed when the returned handle is dropped.
    fn open(&self, path: &Path, password: &str) -> Result<Self::Document, ContextError>;
}

/// How the pages of a document have to be rendered before being handed to the spooler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSettings {
    /// Whether to draw a border around every page.
    pub show_border: bool,
    /// The resolution of the intermediate raster, the pages are left as they are when it is not positive.
    pub dpi: i32,
}

/// An open document whose pages can be turned into data for the spooler.
pub trait PageSource {
    fn number_of_pages(&self) -> usize;

    /// Produces the PDF data to be spooled, with the given settings applied.
    fn render(&self, settings: &RenderSettings) -> Result<Vec<u8>, ContextError>;
}

/// A `DocumentSource` reading PDF files from the disk through `lopdf`.
pub struct PdfSource<R> {
    rasterizer: R,
}

impl<R: Rasterizer + Clone> PdfSource<R> {
    /// The rasterizer is used by the opened documents when they are rendered with a positive dpi.
    pub fn new(rasterizer: R) -> Self {
        PdfSource { rasterizer }
    }
}

impl<R: Rasterizer + Clone> DocumentSource for PdfSource<R> {
    type Document = PdfDocument<R>;

    fn open(&self, path: &Path, password: &str) -> Result<PdfDocument<R>, ContextError> {
        let mut inner_document = lopdf::Document::load(path).map_err(|error| {
            ContextError::with_error(format!("Failed to load the document {:?}", path), &error)
        })?;
        if inner_document.is_encrypted() {
            inner_document.decrypt(password).map_err(|error| {
                ContextError::with_error(
                    format!("Failed to decrypt the document {:?}", path),
                    &error,
                )
            })?;
            log::debug!("Decrypted the document {:?}", path);
        }
        log::debug!(
            "Opened the document {:?} with {} pages",
            path,
            inner_document.get_pages().len()
        );

        Ok(PdfDocument {
            inner_document,
            path: path.to_path_buf(),
            rasterizer: self.rasterizer.clone(),
        })
    }
}

/// An open PDF document, it is closed when dropped.
pub struct PdfDocument<R> {
    inner_document: lopdf::Document,
    path: PathBuf,
    rasterizer: R,
}

impl<R> PdfDocument<R> {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Rasterizer> PageSource for PdfDocument<R> {
    fn number_of_pages(&self) -> usize {
        self.inner_document.get_pages().len()
    }

    fn render(&self, settings: &RenderSettings) -> Result<Vec<u8>, ContextError> {
        // The loaded document stays untouched, so that it can be rendered again
        let mut document = self.inner_document.clone();
        if settings.show_border {
            draw_page_borders(&mut document)?;
        }

        let mut pdf_bytes = Vec::new();
        document.save_to(&mut pdf_bytes).map_err(|error| {
            ContextError::with_error(
                format!("Failed to serialize the document {:?}", self.path),
                &error,
            )
        })?;

        match u32::try_from(settings.dpi) {
            Ok(dpi) if dpi > 0 => self.rasterizer.rasterize(pdf_bytes, dpi),
            _ => Ok(pdf_bytes),
        }
    }
}

impl<R> Drop for PdfDocument<R> {
    fn drop(&mut self) {
        log::debug!("Closed the document {:?}", self.path);
    }
}

/// A rectangle in the default user space of a page, as `[lower x, lower y, upper x, upper y]`.
type PageBox = [f32; 4];

/// The width of the line drawn around the pages, in points.
const BORDER_LINE_WIDTH: f32 = 1.0;

/// Draws a black border along the visible area of every page of the document.
///
/// The existing contents of each page are wrapped into a saved graphics state, and
/// the border is drawn by an additional content stream appended to the page.
pub fn draw_page_borders(document: &mut lopdf::Document) -> Result<(), ContextError> {
    let save_state_stream = lopdf::Stream::new(
        lopdf::Dictionary::new(),
        encode_operations(vec![Operation::new("q", vec![])])?,
    );
    let save_state_stream_id = document.add_object(save_state_stream);

    for (page_number, page_id) in document.get_pages() {
        let page_box = visible_page_box(document, page_id).ok_or(ContextError::with_context(
            format!("Failed to find the media box of page {}", page_number),
        ))?;
        let existing_contents = page_contents(document, page_id)?;

        let border_stream = lopdf::Stream::new(
            lopdf::Dictionary::new(),
            encode_operations(border_operations(page_box, !existing_contents.is_empty()))?,
        );
        let border_stream_id = document.add_object(border_stream);

        let mut contents = Vec::with_capacity(existing_contents.len() + 2);
        if !existing_contents.is_empty() {
            contents.push(Object::Reference(save_state_stream_id));
            contents.extend(existing_contents);
        }
        contents.push(Object::Reference(border_stream_id));

        document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|error| {
                ContextError::with_error(
                    format!("Failed to access page {}", page_number),
                    &error,
                )
            })?
            .set("Contents", Object::Array(contents));
    }

    Ok(())
}

/// The operations stroking a rectangle along the given page box. When the page had contents
/// before, the graphics state they saved is restored first.
fn border_operations(page_box: PageBox, restore_state: bool) -> Vec<Operation> {
    let [lower_x, lower_y, upper_x, upper_y] = page_box;
    // The line is kept inside the page box, otherwise half of it would be clipped away
    let inset = BORDER_LINE_WIDTH / 2.0;

    let mut operations = Vec::new();
    if restore_state {
        operations.push(Operation::new("Q", vec![]));
    }
    operations.extend([
        Operation::new("q", vec![]),
        Operation::new("G", vec![Object::Integer(0)]),
        Operation::new("w", vec![Object::Real(BORDER_LINE_WIDTH as _)]),
        Operation::new(
            "re",
            vec![
                Object::Real((lower_x + inset) as _),
                Object::Real((lower_y + inset) as _),
                Object::Real((upper_x - lower_x - BORDER_LINE_WIDTH) as _),
                Object::Real((upper_y - lower_y - BORDER_LINE_WIDTH) as _),
            ],
        ),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ]);
    operations
}

/// Encodes the operations of a content stream shared with other streams of the page.
///
/// The streams of a page are concatenated when it is drawn, so the encoded operations
/// are delimited by line breaks on both sides.
fn encode_operations(operations: Vec<Operation>) -> Result<Vec<u8>, ContextError> {
    let encoded = Content { operations }
        .encode()
        .map_err(|error| ContextError::with_error("Failed to encode the page content", &error))?;

    let mut stream_content = Vec::with_capacity(encoded.len() + 2);
    stream_content.push(b'\n');
    stream_content.extend(encoded);
    stream_content.push(b'\n');
    Ok(stream_content)
}

/// Resolves an object which may be a reference to another one.
fn dereference<'a>(document: &'a lopdf::Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(object_id) => document.get_object(*object_id).ok(),
        object => Some(object),
    }
}

fn as_number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(integer) => Some(*integer as f32),
        Object::Real(real) => Some(*real as f32),
        _ => None,
    }
}

/// Finds the crop box of the page, falling back to its media box. Both may be inherited
/// from the ancestors of the page in the page tree.
fn visible_page_box(document: &lopdf::Document, page_id: ObjectId) -> Option<PageBox> {
    let mut node = document.get_object(page_id).ok()?.as_dict().ok()?;
    let mut crop_box = None;
    let mut media_box = None;
    // The depth is bounded so that a cyclic page tree cannot trap us
    for _ in 0..64 {
        if crop_box.is_none() {
            crop_box = node.get(b"CropBox").ok().and_then(|object| read_box(document, object));
        }
        if media_box.is_none() {
            media_box = node.get(b"MediaBox").ok().and_then(|object| read_box(document, object));
        }
        if media_box.is_some() {
            break;
        }
        match node
            .get(b"Parent")
            .ok()
            .and_then(|parent| dereference(document, parent))
            .and_then(|parent| parent.as_dict().ok())
        {
            Some(parent) => node = parent,
            None => break,
        }
    }

    crop_box.or(media_box)
}

fn read_box(document: &lopdf::Document, object: &Object) -> Option<PageBox> {
    let numbers = dereference(document, object)?
        .as_array()
        .ok()?
        .iter()
        .map(|number| dereference(document, number).and_then(as_number))
        .collect::<Option<Vec<_>>>()?;
    match numbers[..] {
        // The corners may be given in any order
        [x0, y0, x1, y1] => Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)]),
        _ => None,
    }
}

/// Collects the references to the content streams of the page.
fn page_contents(document: &lopdf::Document, page_id: ObjectId) -> Result<Vec<Object>, ContextError> {
    let page = document
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|error| ContextError::with_error("Failed to access the page", &error))?;

    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };
    match contents {
        Object::Array(streams) => Ok(streams.clone()),
        Object::Reference(object_id) => match document.get_object(*object_id) {
            Ok(Object::Array(streams)) => Ok(streams.clone()),
            _ => Ok(vec![contents.clone()]),
        },
        _ => Err(ContextError::with_context(format!(
            "Invalid contents of the page {:?}",
            page_id
        ))),
    }
}
