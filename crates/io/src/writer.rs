//! Output of merged estimators

// crate modules
use crate::error::Result;

// mctools modules
use mctools_estimator::Estimator;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// external crates
use log::debug;

/// Anything that can save an [Estimator] to disk
///
/// Writers choose their own file extension, and return the path actually
/// written.
pub trait Writer {
    /// Write `estimator` to a file named after `stem`
    fn write(&self, estimator: &Estimator, stem: &Path) -> Result<PathBuf>;
}

/// Writes the whole estimator as JSON
///
/// NaN values are not valid JSON and are written as `null`.
///
/// ```rust
/// # use mctools_estimator::{Estimator, Page};
/// # use mctools_io::{JsonWriter, Writer};
/// let dir = tempfile::tempdir().unwrap();
/// let mut estimator = Estimator::new();
/// estimator.add_page(Page::from_data(vec![1.0]));
///
/// let path = JsonWriter::new().write(&estimator, &dir.path().join("dose")).unwrap();
/// assert_eq!(path.extension().unwrap(), "json");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonWriter {
    /// Indent the output for reading by eye
    pub pretty: bool,
}

impl JsonWriter {
    /// Compact output
    pub fn new() -> Self {
        Default::default()
    }

    /// Indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Writer for JsonWriter {
    fn write(&self, estimator: &Estimator, stem: &Path) -> Result<PathBuf> {
        let mut name = stem.as_os_str().to_owned();
        name.push(".json");
        let path = PathBuf::from(name);

        let mut writer = init_writer(&path)?;
        match self.pretty {
            true => serde_json::to_writer_pretty(&mut writer, estimator)?,
            false => serde_json::to_writer(&mut writer, estimator)?,
        }
        writer.flush()?;

        debug!("Written {}", path.display());
        Ok(path)
    }
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
