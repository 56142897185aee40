//! Reclassification stages.
//!
//! Each stage consumes the full page list produced by the previous stage
//! and rewrites it in place. The pipeline runs them in a fixed order,
//! once per document: cleaning, header/footer removal, column and line
//! reconciliation, table detection, paragraph reassembly, font signature
//! extraction, then title classification and normalization.

pub mod cleaning;
pub mod columns;
pub mod fonts;
pub mod headers;
pub mod paragraphs;
pub mod tables;
pub mod titles;
