//! strata - document structure reconstruction.
//!
//! Takes the page-by-page tree of positioned elements an external layout
//! analyzer produced and rebuilds the document's logical structure:
//! recurring headers and footers are detected and removed, table regions
//! are found from their ruling and annotated with externally-extracted
//! cell grids, a title hierarchy is inferred from font populations,
//! multi-column reading order is reconciled, and wrongly-split
//! paragraphs are reassembled. The result is a flat sequence of typed
//! nodes (titles, paragraphs, tables) ready for any downstream renderer.

pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod stages;
pub mod utils;

pub use config::PipelineConfig;
pub use document::{Document, Node};
pub use error::{Result, StructError};
pub use pipeline::{BatchOutcome, CancelToken, DocumentInput, Pipeline};
pub use stages::cleaning::is_searchable_page;
pub use stages::tables::CellGridRegion;
