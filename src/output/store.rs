//! In-memory result buffer and JSON persistence

use crate::output::{OutputResult, Page};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ordered, append-only buffer of visited pages
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    pages: Vec<Page>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page record
    pub fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Returns the number of stored pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns the stored pages in visit order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Serializes the pages as a pretty-printed JSON array
    ///
    /// Two-space indentation; non-ASCII characters are written as-is.
    pub fn to_json_string(&self) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(&self.pages)?)
    }

    /// Writes the pages to `path` as a UTF-8 JSON array
    ///
    /// The in-memory pages are left untouched whether or not the write succeeds.
    pub fn write_to(&self, path: &Path) -> OutputResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.pages)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a results file written by [`ResultStore::write_to`]
    pub fn load_from(path: &Path) -> OutputResult<Self> {
        let file = File::open(path)?;
        let pages: Vec<Page> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { pages })
    }
}

impl From<Vec<Page>> for ResultStore {
    fn from(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}
