//! Pipeline orchestration.
//!
//! One document runs through the stages strictly in order; a stage, once
//! started, runs to completion, and cancellation is only honored at
//! stage boundaries. Documents share nothing, so batches fan out over a
//! worker pool with one document per task; a failed document is recorded
//! and skipped, never half-emitted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Deserialize;

use crate::config::PipelineConfig;
use crate::document::{Document, Node, assemble};
use crate::error::{Result, StructError};
use crate::layout::Page;
use crate::stages::tables::CellGridRegion;
use crate::stages::{cleaning, columns, fonts, headers, paragraphs, tables, titles};

/// Cooperative cancellation flag, checked between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One document's worth of analyzer output: the pages, and any cell
/// grids the external table service produced for its pre-detected
/// regions.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    pub name: String,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub cell_grids: Vec<CellGridRegion>,
}

/// Outcome of one document in a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<Document>,
}

/// The fixed stage chain, validated once at construction.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Builds a pipeline, rejecting invalid configuration before any
    /// document is touched.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn checkpoint(&self, cancel: &CancelToken) -> Result<()> {
        if cancel.is_cancelled() {
            Err(StructError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Runs the stage chain over one document's pages, in place. The
    /// caller owns the pages exclusively; composing a fan-out graph over
    /// shared input means cloning first (see [`Pipeline::run_document`]).
    pub fn process_pages(
        &self,
        pages: &mut Vec<Page>,
        grids: &[CellGridRegion],
        cancel: &CancelToken,
    ) -> Result<()> {
        let cfg = &self.config;

        cleaning::run(pages, &cfg.cleaning);
        self.checkpoint(cancel)?;
        headers::run(pages, &cfg.headers);
        self.checkpoint(cancel)?;
        columns::run(pages, &cfg.columns);
        self.checkpoint(cancel)?;
        tables::run(pages, grids, &cfg.tables)?;
        self.checkpoint(cancel)?;
        paragraphs::run(pages, &cfg.paragraphs)?;
        self.checkpoint(cancel)?;
        fonts::run(pages, &cfg.fonts);
        self.checkpoint(cancel)?;
        titles::run(pages);
        Ok(())
    }

    /// Processes a shared document input. The page list is cloned before
    /// any mutation, so several consumers may run over the same input
    /// concurrently.
    pub fn run_document(&self, input: &DocumentInput, cancel: &CancelToken) -> Result<Document> {
        let mut pages = input.pages.clone();
        self.finish(&input.name, &mut pages, &input.cell_grids, cancel)
    }

    /// Processes an owned document input without the defensive copy.
    pub fn run_document_owned(
        &self,
        mut input: DocumentInput,
        cancel: &CancelToken,
    ) -> Result<Document> {
        let grids = std::mem::take(&mut input.cell_grids);
        self.finish(&input.name, &mut input.pages, &grids, cancel)
    }

    fn finish(
        &self,
        name: &str,
        pages: &mut Vec<Page>,
        grids: &[CellGridRegion],
        cancel: &CancelToken,
    ) -> Result<Document> {
        self.process_pages(pages, grids, cancel)?;
        let content: Vec<Node> = assemble(pages, self.config.group_bullets);
        log::info!("reconstructed {name:?}: {} node(s)", content.len());
        Ok(Document {
            name: name.to_string(),
            content,
        })
    }

    /// Processes a batch, one worker task per document. Every outcome is
    /// recorded; one document's failure never stops the others.
    pub fn run_batch(&self, inputs: Vec<DocumentInput>, cancel: &CancelToken) -> Vec<BatchOutcome> {
        inputs
            .into_par_iter()
            .map(|input| {
                let name = input.name.clone();
                let result = self.run_document_owned(input, cancel);
                if let Err(err) = &result {
                    log::warn!("document {name:?} failed: {err}");
                }
                BatchOutcome { name, result }
            })
            .collect()
    }
}
