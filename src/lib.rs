//! # cvpress
//!
//! Résumé structuring, editing, keyword coverage and paginated export.
//!
//! Plain résumé text is turned into a typed block document, edited with
//! undo/redo, checked against a keyword list, laid out onto fixed-size pages
//! and serialized as PDF, plain text or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cvpress::{infer, paginate, render, PageGeometry};
//!
//! fn main() -> cvpress::Result<()> {
//!     // Infer structure from plain text
//!     let doc = infer("JANE DOE\n\nSKILLS\nRust, Go");
//!
//!     // Lay it out on A4 pages
//!     let layout = paginate(&doc, &PageGeometry::a4())?;
//!
//!     // Serialize as PDF
//!     let pdf = render::to_pdf(&layout, &render::ExportOptions::default())?;
//!     std::fs::write("resume.pdf", pdf)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structure inference**: title, section headings and body paragraphs
//! - **Rich editing**: text, formatting, block kinds, undo/redo with revisions
//! - **Keyword coverage**: incremental presence tracking per revision
//! - **Pagination**: greedy wrapping, whole lines per page, parallel wrapping
//! - **Export**: PDF, plain text and JSON with stale-result detection

pub mod coverage;
pub mod edit;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use coverage::{
    CoverageDelta, CoverageState, CoverageTracker, KeywordSet, MatchStrategy,
};
pub use edit::{ChangeCause, ChangeEvent, EditCommand, Editor, Position, Selection};
pub use error::{Error, Result};
pub use layout::{paginate, AverageCharWidth, Paginator, TextMeasure};
pub use model::{
    Alignment, Attribute, Block, BlockKind, Document, Layout, Page, PageGeometry,
    PositionedLine, TextRun, TextStyle,
};
pub use parser::{infer, CleanupPreset, InferOptions, SectionVocabulary, StructureInferencer};
pub use render::{ExportFormat, ExportOptions, ExportOutput, JsonFormat};
pub use session::{ExportHandle, Session, SessionBuilder};

use std::path::Path;

/// Read a plain-text résumé and infer its structure.
///
/// # Example
///
/// ```no_run
/// use cvpress::infer_file;
///
/// let doc = infer_file("resume.txt").unwrap();
/// println!("Blocks: {}", doc.len());
/// ```
pub fn infer_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    infer_file_with_options(path, InferOptions::default())
}

/// Read a plain-text résumé and infer its structure with custom options.
pub fn infer_file_with_options<P: AsRef<Path>>(path: P, options: InferOptions) -> Result<Document> {
    let raw = std::fs::read_to_string(path)?;
    Ok(StructureInferencer::new(options).infer(&raw))
}

/// Lay out a document and serialize it as PDF.
///
/// # Example
///
/// ```no_run
/// use cvpress::{infer, to_pdf, PageGeometry};
///
/// let doc = infer("JANE DOE\n\nEXPERIENCE\n- Built things");
/// let bytes = to_pdf(&doc, &PageGeometry::letter()).unwrap();
/// std::fs::write("resume.pdf", bytes).unwrap();
/// ```
pub fn to_pdf(document: &Document, geometry: &PageGeometry) -> Result<Vec<u8>> {
    let layout = paginate(document, geometry)?;
    render::to_pdf(&layout, &ExportOptions::default())
}

/// Lay out a document and serialize it as plain text.
pub fn to_text(document: &Document, geometry: &PageGeometry) -> Result<String> {
    let layout = paginate(document, geometry)?;
    Ok(render::to_text(&layout))
}

/// Lay out a document and serialize it as JSON.
pub fn to_json(document: &Document, geometry: &PageGeometry, format: JsonFormat) -> Result<String> {
    let layout = paginate(document, geometry)?;
    render::to_json(&layout, format)
}

/// Infer, lay out and export a plain-text résumé file in one call.
///
/// # Example
///
/// ```no_run
/// use cvpress::{convert_file, ExportFormat, ExportOptions, PageGeometry};
///
/// let options = ExportOptions::new().with_format(ExportFormat::PlainText);
/// let output = convert_file("resume.txt", &PageGeometry::a4(), &options).unwrap();
/// output.write_to("resume.out.txt").unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>>(
    path: P,
    geometry: &PageGeometry,
    options: &ExportOptions,
) -> Result<ExportOutput> {
    let document = infer_file(path)?;
    let layout = paginate(&document, geometry)?;
    render::export(&layout, options)
}
