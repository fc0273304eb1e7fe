//! Pagination of a block document into positioned lines.

use std::sync::Arc;

use rayon::prelude::*;

use super::wrap::{Wrapper, EPSILON};
use super::{AverageCharWidth, TextMeasure};
use crate::edit::RevisionClock;
use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, BlockKind, Document, Layout, LineSpan, Page, PageGeometry, PositionedLine,
    TextStyle,
};

/// Lays out documents on fixed-size pages.
///
/// Layout is deterministic: the same document, geometry and measure always
/// produce the same [`Layout`], whether or not wrapping runs in parallel.
#[derive(Clone)]
pub struct Paginator {
    geometry: PageGeometry,
    measure: Arc<dyn TextMeasure>,
    parallel: bool,
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("geometry", &self.geometry)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl Paginator {
    /// Create a paginator using the average character width measure.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            measure: Arc::new(AverageCharWidth::default()),
            parallel: false,
        }
    }

    /// Use a custom text measure.
    pub fn with_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Wrap blocks on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Geometry in use.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lay out a document.
    pub fn paginate(&self, document: &Document) -> Result<Layout> {
        self.run(document, None)
    }

    /// Lay out a document, abandoning the work with [`Error::StaleResult`]
    /// as soon as `clock` shows a newer revision than the document's.
    pub fn paginate_tracked(&self, document: &Document, clock: &RevisionClock) -> Result<Layout> {
        self.run(document, Some(clock))
    }

    fn run(&self, document: &Document, clock: Option<&RevisionClock>) -> Result<Layout> {
        self.geometry.validate()?;
        let revision = document.revision();

        let markers = list_markers(document.blocks());
        let wrap_block = |(index, block): (usize, &Block)| -> Result<BlockLines> {
            check_stale(clock, revision)?;
            Ok(self.wrap_block(index, block, markers[index].as_deref()))
        };

        let wrapped: Vec<BlockLines> = if self.parallel {
            document
                .blocks()
                .par_iter()
                .enumerate()
                .map(wrap_block)
                .collect::<Result<_>>()?
        } else {
            document
                .blocks()
                .iter()
                .enumerate()
                .map(wrap_block)
                .collect::<Result<_>>()?
        };

        let pages = self.place(&wrapped);
        check_stale(clock, revision)?;

        log::debug!(
            "Laid out {} blocks on {} pages (revision {})",
            document.len(),
            pages.len(),
            revision
        );

        Ok(Layout {
            revision,
            geometry: self.geometry.clone(),
            pages,
            source: document.blocks().iter().map(Block::plain_text).collect(),
        })
    }

    fn wrap_block(&self, index: usize, block: &Block, marker: Option<&str>) -> BlockLines {
        let kind = block.kind;
        if block.is_blank() {
            return BlockLines::empty(index, kind);
        }

        let geometry = &self.geometry;
        let font_size = geometry.font_size.get(kind);
        let bold = kind.is_bold();
        let indent = if kind.is_list() {
            geometry.list_indent
        } else {
            0.0
        };
        let marker_width = marker
            .map(|m| {
                self.measure
                    .text_width(m, font_size, TextStyle::default())
            })
            .unwrap_or(0.0);

        let region_left = geometry.margin_left + indent;
        let region_width = geometry.content_width() - indent;
        let text_width = (region_width - marker_width).max(EPSILON);

        let lines = Wrapper::new(self.measure.as_ref(), font_size, text_width, bold)
            .wrap(&block.styled_chars());

        let align = if kind == BlockKind::Title {
            Alignment::Center
        } else {
            block.alignment
        };

        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let mut spans = line.spans();
                let mut width = line.width;
                let mut left = region_left;
                match marker {
                    Some(m) if i == 0 => {
                        spans.insert(
                            0,
                            LineSpan {
                                text: m.to_string(),
                                style: TextStyle::default(),
                            },
                        );
                        width += marker_width;
                    }
                    Some(_) => left += marker_width,
                    None => {}
                }

                let x = match align {
                    Alignment::Left => left,
                    Alignment::Center => region_left + (region_width - width) / 2.0,
                    Alignment::Right => region_left + region_width - width,
                };

                make_line(index, spans, x.max(region_left), font_size, bold, align)
            })
            .collect();

        BlockLines { index, kind, lines }
    }

    fn place(&self, blocks: &[BlockLines]) -> Vec<Page> {
        let geometry = &self.geometry;
        let bottom = geometry.content_bottom();

        let mut pages = vec![Page::new(1)];
        let mut cursor = geometry.margin_top;

        for block in blocks {
            if block.lines.is_empty() {
                continue;
            }
            let page_has_content = pages.last().map_or(false, |p| !p.is_empty());
            if block.kind.is_heading() && page_has_content {
                cursor += geometry.heading_space_before;
            }

            let line_height = geometry.line_height.get(block.kind);
            for line in &block.lines {
                let page_has_content = pages.last().map_or(false, |p| !p.is_empty());
                if page_has_content && cursor > bottom + EPSILON {
                    let number = pages.len() as u32 + 1;
                    log::debug!("Starting page {} at block {}", number, block.index);
                    pages.push(Page::new(number));
                    cursor = geometry.margin_top;
                }

                if let Some(page) = pages.last_mut() {
                    page.lines.push(PositionedLine {
                        y: cursor,
                        ..line.clone()
                    });
                }
                cursor += line_height;
            }

            if block.kind == BlockKind::Paragraph {
                cursor += geometry.paragraph_space_after;
            }
        }

        pages
    }
}

/// Lay out a document with the default measure.
pub fn paginate(document: &Document, geometry: &PageGeometry) -> Result<Layout> {
    Paginator::new(geometry.clone()).paginate(document)
}

/// Wrapped, horizontally placed lines of one block; `y` is set on placement.
struct BlockLines {
    index: usize,
    kind: BlockKind,
    lines: Vec<PositionedLine>,
}

impl BlockLines {
    fn empty(index: usize, kind: BlockKind) -> Self {
        Self {
            index,
            kind,
            lines: Vec::new(),
        }
    }
}

fn make_line(
    block: usize,
    spans: Vec<LineSpan>,
    x: f32,
    font_size: f32,
    kind_bold: bool,
    align: Alignment,
) -> PositionedLine {
    let text: String = spans.iter().map(|s| s.text.as_str()).collect();
    let all_bold = !spans.is_empty() && spans.iter().all(|s| s.style.bold);
    PositionedLine {
        block,
        text,
        x,
        y: 0.0,
        font_size,
        bold: kind_bold || all_bold,
        align,
        spans,
    }
}

/// List markers per block: `"• "` for bullets, `"N. "` for numbered items
/// counting consecutive numbered blocks.
fn list_markers(blocks: &[Block]) -> Vec<Option<String>> {
    let mut number = 0;
    blocks
        .iter()
        .map(|block| match block.kind {
            BlockKind::OrderedListItem => {
                number += 1;
                Some(format!("{}. ", number))
            }
            BlockKind::ListItem => {
                number = 0;
                Some("• ".to_string())
            }
            _ => {
                number = 0;
                None
            }
        })
        .collect()
}

fn check_stale(clock: Option<&RevisionClock>, revision: u64) -> Result<()> {
    match clock {
        Some(clock) if clock.is_superseded(revision) => {
            log::debug!(
                "Layout for revision {} superseded by {}",
                revision,
                clock.latest()
            );
            Err(Error::StaleResult {
                requested: revision,
                current: clock.latest(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KindMetrics, TextRun};

    /// 10 points per character at every size, 20pt lines, no extra spacing.
    fn geometry(width: f32, height: f32) -> PageGeometry {
        PageGeometry::a4()
            .with_size(width, height)
            .with_margins(10.0)
            .with_font_size(KindMetrics::uniform(20.0))
            .with_line_height(KindMetrics::uniform(20.0))
            .with_spacing(0.0, 0.0)
            .with_list_indent(0.0)
    }

    fn ys(layout: &Layout) -> Vec<(u32, f32)> {
        layout.lines().map(|(page, line)| (page, line.y)).collect()
    }

    #[test]
    fn test_five_lines_fill_one_page() {
        let doc = Document::from_blocks(vec![Block::paragraph("a\nb\nc\nd\ne")]);
        let layout = paginate(&doc, &geometry(1000.0, 100.0)).unwrap();

        assert_eq!(layout.page_count(), 1);
        assert_eq!(
            ys(&layout),
            vec![(1, 10.0), (1, 30.0), (1, 50.0), (1, 70.0), (1, 90.0)]
        );
    }

    #[test]
    fn test_sixth_line_starts_new_page() {
        let doc = Document::from_blocks(vec![Block::paragraph("a\nb\nc\nd\ne\nf")]);
        let layout = paginate(&doc, &geometry(1000.0, 100.0)).unwrap();

        assert_eq!(layout.page_count(), 2);
        let page2 = layout.get_page(2).unwrap();
        assert_eq!(page2.lines.len(), 1);
        assert_eq!(page2.lines[0].y, 10.0);
        assert_eq!(page2.lines[0].text, "f");
    }

    #[test]
    fn test_first_line_on_fresh_page_always_placed() {
        // Page too short for even one line below the top margin.
        let geometry = geometry(1000.0, 25.0);
        let doc = Document::from_blocks(vec![Block::paragraph("a\nb")]);
        let layout = paginate(&doc, &geometry).unwrap();

        assert_eq!(layout.page_count(), 2);
        assert_eq!(ys(&layout), vec![(1, 10.0), (2, 10.0)]);
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let layout = paginate(&Document::new(), &PageGeometry::a4()).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.line_count(), 0);
        assert_eq!(layout.source, vec![String::new()]);
    }

    #[test]
    fn test_empty_blocks_emit_nothing() {
        let doc = Document::from_blocks(vec![
            Block::paragraph("one"),
            Block::paragraph("   "),
            Block::heading(""),
            Block::paragraph("two"),
        ]);
        let layout = paginate(&doc, &geometry(1000.0, 1000.0)).unwrap();
        let blocks: Vec<usize> = layout.lines().map(|(_, l)| l.block).collect();
        assert_eq!(blocks, vec![0, 3]);
    }

    #[test]
    fn test_heading_space_only_below_content() {
        let geometry = geometry(1000.0, 1000.0).with_spacing(15.0, 5.0);
        let doc = Document::from_blocks(vec![
            Block::heading("SKILLS"),
            Block::paragraph("Rust"),
            Block::heading("EDUCATION"),
        ]);
        let layout = paginate(&doc, &geometry).unwrap();

        // heading at top: no space; paragraph adds 5 after; next heading adds 15.
        assert_eq!(
            ys(&layout),
            vec![(1, 10.0), (1, 30.0), (1, 30.0 + 20.0 + 5.0 + 15.0)]
        );
    }

    #[test]
    fn test_list_markers_and_hanging_indent() {
        let geometry = geometry(115.0, 1000.0).with_list_indent(20.0);
        let doc = Document::from_blocks(vec![
            Block::with_text(BlockKind::OrderedListItem, "aa bb"),
            Block::with_text(BlockKind::OrderedListItem, "cc"),
            Block::paragraph("x"),
            Block::with_text(BlockKind::OrderedListItem, "dd"),
            Block::with_text(BlockKind::ListItem, "ee"),
        ]);
        let layout = paginate(&doc, &geometry).unwrap();
        let lines: Vec<&PositionedLine> = layout.lines().map(|(_, l)| l).collect();

        // 95 wide content, 20 indent, 30 for "1. ": 45 left, so "aa bb" (50) wraps.
        assert_eq!(lines[0].text, "1. aa");
        assert_eq!(lines[0].x, 30.0);
        assert_eq!(lines[1].text, "bb");
        assert_eq!(lines[1].x, 60.0);
        assert_eq!(lines[2].text, "2. cc");
        assert_eq!(lines[4].text, "1. dd");
        assert_eq!(lines[5].text, "• ee");
    }

    #[test]
    fn test_title_centered_and_right_alignment() {
        let geometry = geometry(120.0, 1000.0);
        let doc = Document::from_blocks(vec![
            Block::with_text(BlockKind::Title, "ab"),
            Block::paragraph("ab").aligned(Alignment::Right),
            Block::paragraph("ab"),
        ]);
        let layout = paginate(&doc, &geometry).unwrap();
        let xs: Vec<f32> = layout.lines().map(|(_, l)| l.x).collect();
        // Content spans 10..110; "ab" is 20 wide.
        assert_eq!(xs, vec![50.0, 90.0, 10.0]);
    }

    #[test]
    fn test_overlong_word_is_never_dropped() {
        let geometry = geometry(50.0, 1000.0);
        let doc = Document::from_blocks(vec![Block::paragraph("abcdefghij")]);
        let layout = paginate(&doc, &geometry).unwrap();
        let text: String = layout.lines().map(|(_, l)| l.text.as_str()).collect();
        assert_eq!(text, "abcdefghij");
        assert_eq!(layout.line_count(), 4);
    }

    #[test]
    fn test_line_bold_and_spans() {
        let mut block = Block::new(BlockKind::Paragraph);
        block.push_run(TextRun::bold("Go"));
        block.push_run(TextRun::new(" dev"));
        let doc = Document::from_blocks(vec![block, Block::heading("SKILLS")]);
        let layout = paginate(&doc, &PageGeometry::a4()).unwrap();
        let lines: Vec<&PositionedLine> = layout.lines().map(|(_, l)| l).collect();

        assert!(!lines[0].bold);
        assert_eq!(lines[0].spans.len(), 2);
        assert!(lines[1].bold);
        assert_eq!(lines[1].font_size, 14.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = "word ".repeat(400);
        let doc = Document::from_blocks(
            (0..30)
                .map(|i| match i % 3 {
                    0 => Block::heading("EXPERIENCE"),
                    1 => Block::with_text(BlockKind::ListItem, text.clone()),
                    _ => Block::paragraph(text.clone()),
                })
                .collect(),
        );
        let sequential = Paginator::new(PageGeometry::letter()).paginate(&doc).unwrap();
        let parallel = Paginator::new(PageGeometry::letter())
            .parallel(true)
            .paginate(&doc)
            .unwrap();
        assert_eq!(sequential, parallel);
        assert!(sequential.page_count() > 1);
    }

    #[test]
    fn test_invalid_geometry() {
        let geometry = PageGeometry::a4().with_size(100.0, 100.0).with_margins(60.0);
        let err = paginate(&Document::new(), &geometry).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_stale_layout_abandoned() {
        let doc = Document::from_blocks(vec![Block::paragraph("text")]);
        let clock = RevisionClock::new(doc.revision() + 1);

        let err = Paginator::new(PageGeometry::a4())
            .paginate_tracked(&doc, &clock)
            .unwrap_err();
        assert!(err.is_stale());

        let current = RevisionClock::new(doc.revision());
        assert!(Paginator::new(PageGeometry::a4())
            .paginate_tracked(&doc, &current)
            .is_ok());
    }
}
