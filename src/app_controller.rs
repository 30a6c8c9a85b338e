use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::batch::{BatchProcessor, BatchSummary, SourceDocument};
use crate::errors::AppError;
use crate::file_utils::{FileManager, SampleWriter};
use crate::pipeline::DocumentProcessor;
use crate::renderer::{GroffRenderer, Renderer};

// @module: Application controller for dataset generation

/// Main application controller wiring configuration, renderer and files together
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Renderer used for extraction
    renderer: Arc<dyn Renderer>,
}

impl Controller {
    // @method: Create a new controller rendering with the configured external command
    pub fn with_config(config: Config) -> Result<Self> {
        let renderer = Arc::new(GroffRenderer::new(&config.renderer));
        Self::with_renderer(config, renderer)
    }

    // @method: Create a new controller with an explicit renderer
    pub fn with_renderer(config: Config, renderer: Arc<dyn Renderer>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config, renderer })
    }

    fn batch_processor(&self) -> Result<BatchProcessor> {
        let processor = DocumentProcessor::new(&self.config, self.renderer.clone())?;
        Ok(BatchProcessor::new(processor, self.config.concurrent_documents))
    }

    /// Extract documents from source pages and write the document collection
    pub async fn run_extract(&self, input_dir: Option<PathBuf>, output_file: &Path) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let sources = self.load_sources(input_dir).await?;
        let batch = self.batch_processor()?;

        let progress_bar = Self::progress_bar(sources.len() as u64, "pages");
        let (documents, summary) = batch
            .extract_documents(&sources, |current, total, name| {
                progress_bar.set_position(current as u64);
                progress_bar.set_message(format!("Processing {}/{}: {}", current, total, name));
            })
            .await;
        progress_bar.finish_and_clear();

        FileManager::write_documents(output_file, &documents)?;

        summary.log("Extraction");
        info!(
            "Saved {} documents to {:?} in {:.1}s",
            documents.len(),
            output_file,
            start_time.elapsed().as_secs_f64()
        );
        Ok(summary)
    }

    /// Generate the dataset from a document collection
    pub fn run_generate(&self, documents_file: &Path, output_file: &Path) -> Result<BatchSummary> {
        let documents = FileManager::read_documents(documents_file)?;
        let batch = self.batch_processor()?;

        let progress_bar = Self::progress_bar(documents.len() as u64, "documents");
        let mut writer = SampleWriter::create(output_file)?;
        let summary = batch.generate_samples(
            &documents,
            |current, total, name| {
                progress_bar.set_position(current as u64);
                progress_bar.set_message(format!("Processing {}/{}: {}", current, total, name));
            },
            |sample| writer.write(sample),
        )?;
        progress_bar.finish_and_clear();
        let written = writer.finish()?;

        summary.log("Generation");
        info!("Fine-tuning samples ({}) have been saved to {:?}", written, output_file);
        Ok(summary)
    }

    /// Extract and generate in one pass, streaming samples to the dataset file
    pub async fn run_all(&self, input_dir: Option<PathBuf>, output_file: &Path) -> Result<BatchSummary> {
        let sources = self.load_sources(input_dir).await?;
        let batch = self.batch_processor()?;

        let progress_bar = Self::progress_bar(sources.len() as u64, "pages");
        let mut writer = SampleWriter::create(output_file)?;
        let summary = batch
            .process_documents(
                &sources,
                |current, total, name| {
                    progress_bar.set_position(current as u64);
                    progress_bar.set_message(format!("Processing {}/{}: {}", current, total, name));
                },
                |sample| writer.write(sample),
            )
            .await?;
        progress_bar.finish_and_clear();
        let written = writer.finish()?;

        summary.log("Dataset");
        info!("Fine-tuning samples ({}) have been saved to {:?}", written, output_file);
        Ok(summary)
    }

    async fn load_sources(&self, input_dir: Option<PathBuf>) -> Result<Vec<SourceDocument>> {
        let paths = match input_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(AppError::File(format!("Input directory does not exist: {:?}", dir)).into());
                }
                FileManager::find_source_pages(&dir, &[])?
            }
            None => FileManager::find_source_pages(&self.config.sources.man_path, &self.config.sources.sections)?,
        };

        if paths.is_empty() {
            warn!("No source pages found");
        } else {
            info!("Found {} source pages", paths.len());
        }

        Ok(FileManager::read_sources(&paths, self.config.renderer.timeout_secs).await)
    }

    fn progress_bar(len: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
            unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }
}
