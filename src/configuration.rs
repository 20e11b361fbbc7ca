use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContextError;

/// The environment variable which may point to a JSON spooler configuration.
pub const CONFIGURATION_VARIABLE: &str = "PDFSPOOL_CONFIGURATION";

/// The external programs through which the documents reach the printers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SpoolerConfiguration {
    /// The CUPS client submitting the print jobs.
    pub lp_program: String,
    /// The CUPS client listing the available destinations.
    pub lpstat_program: String,
    /// The ghostscript executable used for rendering the pages into images.
    pub ghostscript_program: String,
}

impl Default for SpoolerConfiguration {
    fn default() -> Self {
        SpoolerConfiguration {
            lp_program: "lp".into(),
            lpstat_program: "lpstat".into(),
            ghostscript_program: "gs".into(),
        }
    }
}

impl SpoolerConfiguration {
    pub fn from_path(configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to read the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;
        let configuration: SpoolerConfiguration =
            serde_json::from_str(&configuration_file_contents).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to parse the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;

        Ok(configuration)
    }

    /// Loads the configuration named by `PDFSPOOL_CONFIGURATION`, or the default one if it is not set.
    pub fn from_environment() -> Result<Self, ContextError> {
        match std::env::var_os(CONFIGURATION_VARIABLE) {
            Some(configuration_file_path) => {
                log::debug!(
                    "Loading the spooler configuration from {:?}",
                    configuration_file_path
                );
                Self::from_path(Path::new(&configuration_file_path))
            }
            None => Ok(Self::default()),
        }
    }
}
