/// The fixed usage message printed whenever the command line cannot be understood.
pub const USAGE: &str = "Usage: pdfspool [options] <inputfile>

Options:
  -password  <password>                : Password to decrypt document
  -printerName <name>                  : Print to specific printer
  -orientation auto|portrait|landscape : Print using orientation
                                           (default: auto)
  -border                              : Print with border
  -dpi                                 : Render into intermediate image with
                                           specific dpi and then print
  -silentPrint                         : Print without printer dialog box
";

const PASSWORD: &str = "-password";
const SILENT: &str = "-silentPrint";
const PRINTER_NAME: &str = "-printerName";
const ORIENTATION: &str = "-orientation";
const BORDER: &str = "-border";
const DPI: &str = "-dpi";

/// How the pages are laid onto the paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Every page is rotated by the spooler so that it fits the paper best.
    #[default]
    Auto,
    Portrait,
    Landscape,
}

/// The only values accepted by `-orientation`, matched case-sensitively.
pub const ORIENTATIONS: &[(&str, Orientation)] = &[
    ("auto", Orientation::Auto),
    ("landscape", Orientation::Landscape),
    ("portrait", Orientation::Portrait),
];

impl Orientation {
    /// Looks the given name up in the orientation table.
    pub fn from_name(name: &str) -> Option<Orientation> {
        ORIENTATIONS
            .iter()
            .find(|(orientation_name, _)| *orientation_name == name)
            .map(|(_, orientation)| *orientation)
    }
}

/// Everything needed to print a document, as requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRequest {
    /// The password used for decrypting the document, empty when none was given.
    pub password: String,
    /// The path of the document to be printed.
    pub file_path: String,
    /// Whether to skip the confirmation prompt.
    pub silent: bool,
    /// A fragment of the name of the printer to print to.
    pub printer_name: Option<String>,
    pub orientation: Orientation,
    /// Whether to draw a border around every page.
    pub show_border: bool,
    /// The resolution of the intermediate raster, nothing is rasterized when it is not positive.
    pub dpi: i32,
}

/// The reasons for which the command line arguments can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// A flag expecting a value was the last argument.
    MissingValue { flag: &'static str },
    /// The value of `-orientation` is not in the orientation table.
    UnknownOrientation { value: String },
    /// The value of `-dpi` is not an integer.
    InvalidDpi {
        value: String,
        error: std::num::ParseIntError,
    },
    /// No argument was left to be used as the input file.
    MissingInputFile,
}

impl ArgumentError {
    /// Whether this error should be reported by printing the usage message.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, ArgumentError::InvalidDpi { .. })
    }
}

impl std::fmt::Display for ArgumentError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentError::MissingValue { flag } => {
                write!(formatter, "Missing the value of the option {}", flag)
            }
            ArgumentError::UnknownOrientation { value } => {
                write!(formatter, "Unknown orientation {:?}", value)
            }
            ArgumentError::InvalidDpi { value, error } => {
                write!(formatter, "Invalid dpi {:?}: {}", value, error)
            }
            ArgumentError::MissingInputFile => write!(formatter, "Missing the input file"),
        }
    }
}

impl std::error::Error for ArgumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgumentError::InvalidDpi { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Parses the command line arguments (without the program name) into a `PrintRequest`.
///
/// The arguments are scanned once from left to right. Flags expecting a value take the
/// following argument verbatim, whatever it looks like. Every argument which is not a
/// recognized flag is taken as the input file, so that the last one wins.
pub fn parse_arguments<I, S>(arguments: I) -> Result<PrintRequest, ArgumentError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut password = String::new();
    let mut file_path = None;
    let mut silent = false;
    let mut printer_name = None;
    let mut orientation = Orientation::Auto;
    let mut show_border = false;
    let mut dpi = 0;

    let mut arguments = arguments.into_iter();
    while let Some(argument) = arguments.next() {
        match argument.as_ref() {
            PASSWORD => password = next_value(&mut arguments, PASSWORD)?,
            PRINTER_NAME => printer_name = Some(next_value(&mut arguments, PRINTER_NAME)?),
            SILENT => silent = true,
            ORIENTATION => {
                let value = next_value(&mut arguments, ORIENTATION)?;
                orientation = Orientation::from_name(&value)
                    .ok_or(ArgumentError::UnknownOrientation { value })?;
            }
            BORDER => show_border = true,
            DPI => {
                let value = next_value(&mut arguments, DPI)?;
                dpi = value
                    .parse()
                    .map_err(|error| ArgumentError::InvalidDpi { value, error })?;
            }
            other => file_path = Some(other.to_string()),
        }
    }

    Ok(PrintRequest {
        password,
        file_path: file_path.ok_or(ArgumentError::MissingInputFile)?,
        silent,
        printer_name,
        orientation,
        show_border,
        dpi,
    })
}

fn next_value<I, S>(arguments: &mut I, flag: &'static str) -> Result<String, ArgumentError>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    arguments
        .next()
        .map(|value| value.as_ref().to_string())
        .ok_or(ArgumentError::MissingValue { flag })
}
