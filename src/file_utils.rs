use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use walkdir::WalkDir;

use crate::batch::SourceDocument;
use crate::document::{Document, SampleRecord};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @creates: Parent directory of a file path if needed
    fn ensure_parent<P: AsRef<Path>>(path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }
        Ok(())
    }

    /// Find page files under `<root>/<section>` for every section, sorted by path.
    ///
    /// With no sections, `root` itself is scanned.
    pub fn find_source_pages<P: AsRef<Path>>(root: P, sections: &[String]) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let dirs: Vec<PathBuf> = if sections.is_empty() {
            vec![root.to_path_buf()]
        } else {
            sections.iter().map(|section| root.join(section)).collect()
        };
        let mut result = Vec::new();

        for dir in dirs {
            if !dir.is_dir() {
                warn!("Source directory does not exist: {:?}", dir);
                continue;
            }

            for entry in WalkDir::new(&dir).follow_links(true) {
                // Dangling links and link loops are common under man paths
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                        continue;
                    }
                };
                if entry.file_type().is_file() {
                    result.push(entry.path().to_path_buf());
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Document name: the file name up to its first `.`
    pub fn page_name<P: AsRef<Path>>(path: P) -> String {
        let file_name = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        file_name.split('.').next().unwrap_or_default().to_string()
    }

    /// Read a page source, decompressing `.gz` files with the system `gzip`
    pub async fn read_source<P: AsRef<Path>>(path: P, timeout_secs: u64) -> Result<String> {
        let path = path.as_ref();
        let is_gzip = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("gz"));

        let bytes = if is_gzip {
            let gzip_future = Command::new("gzip")
                .arg("-dc")
                .arg(path)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output();

            let output = tokio::select! {
                result = gzip_future => {
                    result.map_err(|e| anyhow!("Failed to execute gzip for {:?}: {}", path, e))?
                },
                _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                    return Err(anyhow!("gzip timed out after {} seconds for {:?}", timeout_secs, path));
                }
            };

            if !output.status.success() {
                return Err(anyhow!(
                    "gzip failed for {:?}: {}",
                    path,
                    String::from_utf8_lossy(&output.stderr).trim()
                ));
            }
            output.stdout
        } else {
            fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?
        };

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read every page under the given paths; unreadable pages are logged and skipped
    pub async fn read_sources(paths: &[PathBuf], timeout_secs: u64) -> Vec<SourceDocument> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_source(path, timeout_secs).await {
                Ok(markup) => sources.push(SourceDocument::new(Self::page_name(path), markup)),
                Err(e) => warn!("Error processing {:?}: {}", path, e),
            }
        }
        debug!("Read {} of {} source pages", sources.len(), paths.len());
        sources
    }

    /// Read a document collection written by `write_documents`
    pub fn read_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open documents file: {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse documents file: {:?}", path))
    }

    /// Write a document collection as a pretty-printed JSON array
    pub fn write_documents<P: AsRef<Path>>(path: P, documents: &[Document]) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let file = File::create(path)
            .with_context(|| format!("Failed to create documents file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, documents)
            .with_context(|| format!("Failed to write documents file: {:?}", path))?;
        writer.flush()?;
        Ok(())
    }

    /// Read a newline-delimited sample file
    pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<SampleRecord>> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open samples file: {:?}", path))?;

        let mut samples = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let sample = serde_json::from_str(&line)
                .with_context(|| format!("Invalid sample on line {} of {:?}", idx + 1, path))?;
            samples.push(sample);
        }
        Ok(samples)
    }
}

/// Streams sample records to a newline-delimited JSON file
pub struct SampleWriter {
    writer: BufWriter<File>,
    written: usize,
}

impl SampleWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        FileManager::ensure_parent(path)?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create samples file: {:?}", path))?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write(&mut self, sample: &SampleRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, sample)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered records; returns the number written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
