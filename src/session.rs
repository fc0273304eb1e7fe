//! Editing session: editor, keyword coverage and export wired together.
//!
//! A [`Session`] keeps coverage current after every edit and exports the
//! latest revision. Exports carry the revision they were requested for and
//! are dropped (`Ok(None)`) when a newer edit lands before they finish.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use crate::coverage::{CoverageDelta, CoverageState, CoverageTracker, KeywordSet, MatchStrategy};
use crate::edit::{ChangeEvent, EditCommand, Editor, HistoryOptions, RevisionClock};
use crate::error::{Error, Result};
use crate::layout::Paginator;
use crate::model::{Document, PageGeometry};
use crate::parser::{InferOptions, StructureInferencer};
use crate::render::{self, ExportFormat, ExportOptions, ExportOutput};

/// A revision an export was requested for.
#[derive(Debug, Clone)]
pub struct ExportTicket {
    revision: u64,
    clock: RevisionClock,
}

impl ExportTicket {
    /// Issue a ticket for `revision` observed through `clock`.
    pub fn new(revision: u64, clock: RevisionClock) -> Self {
        Self { revision, clock }
    }

    /// Requested revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if a newer revision exists.
    pub fn is_stale(&self) -> bool {
        self.clock.is_superseded(self.revision)
    }

    /// Fail with [`Error::StaleResult`] if a newer revision exists.
    pub fn check(&self) -> Result<()> {
        if self.is_stale() {
            return Err(Error::StaleResult {
                requested: self.revision,
                current: self.clock.latest(),
            });
        }
        Ok(())
    }
}

/// Builder for [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    geometry: PageGeometry,
    infer: InferOptions,
    history: HistoryOptions,
    keywords: KeywordSet,
    strategy: MatchStrategy,
    export: ExportOptions,
    parallel: bool,
}

impl SessionBuilder {
    /// Create a builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the structure inference options.
    pub fn with_infer_options(mut self, options: InferOptions) -> Self {
        self.infer = options;
        self
    }

    /// Set the undo history options.
    pub fn with_history(mut self, options: HistoryOptions) -> Self {
        self.history = options;
        self
    }

    /// Set the target keywords.
    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.keywords = keywords;
        self
    }

    /// Set the keyword matching strategy.
    pub fn with_match_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the export options.
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export = options;
        self
    }

    /// Wrap blocks in parallel during layout.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Infer a document from raw text and start a session on it.
    pub fn build_from_text(self, raw: &str) -> Result<Session> {
        let document = StructureInferencer::new(self.infer.clone()).infer(raw);
        self.build(document)
    }

    /// Start a session on an existing document.
    pub fn build(self, document: Document) -> Result<Session> {
        self.geometry.validate()?;

        let mut editor = Editor::with_history(document, self.history);
        let events = editor.subscribe();
        let mut tracker = CoverageTracker::with_strategy(self.keywords, self.strategy)?;
        tracker.update(editor.document());

        Ok(Session {
            editor,
            events,
            tracker,
            paginator: Paginator::new(self.geometry).parallel(self.parallel),
            export: self.export,
        })
    }
}

/// An interactive editing session.
#[derive(Debug)]
pub struct Session {
    editor: Editor,
    events: Receiver<ChangeEvent>,
    tracker: CoverageTracker,
    paginator: Paginator,
    export: ExportOptions,
}

impl Session {
    /// Create a builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// The editor.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    /// Current revision.
    pub fn revision(&self) -> u64 {
        self.editor.revision()
    }

    /// Coverage of the current revision.
    pub fn coverage(&self) -> Option<&CoverageState> {
        self.tracker.state()
    }

    /// Apply an edit and update coverage.
    ///
    /// Returns the coverage delta caused by the edit; a failed edit leaves
    /// everything unchanged.
    pub fn apply(&mut self, command: EditCommand) -> Result<CoverageDelta> {
        self.editor.apply(command)?;
        Ok(self.sync_coverage())
    }

    /// Apply edits directly on the editor, then update coverage.
    pub fn edit<T, F>(&mut self, f: F) -> Result<(T, CoverageDelta)>
    where
        F: FnOnce(&mut Editor) -> Result<T>,
    {
        let result = f(&mut self.editor);
        let delta = self.sync_coverage();
        result.map(|value| (value, delta))
    }

    /// Undo the latest edit. Returns `None` when there was nothing to undo.
    pub fn undo(&mut self) -> Option<CoverageDelta> {
        self.editor.undo().then(|| self.sync_coverage())
    }

    /// Redo the latest undone edit. Returns `None` when there was nothing to redo.
    pub fn redo(&mut self) -> Option<CoverageDelta> {
        self.editor.redo().then(|| self.sync_coverage())
    }

    /// Recompute coverage if change events arrived since the last update.
    fn sync_coverage(&mut self) -> CoverageDelta {
        if self.events.try_iter().count() == 0 {
            return CoverageDelta {
                revision: self.revision(),
                ..Default::default()
            };
        }
        self.tracker.update(self.editor.document())
    }

    /// A ticket for the current revision.
    pub fn ticket(&self) -> ExportTicket {
        ExportTicket::new(self.revision(), self.editor.clock())
    }

    /// Export the current revision with the session's options.
    pub fn export(&self) -> Result<Option<ExportOutput>> {
        self.export_with(&self.export)
    }

    /// Export the current revision in a given format.
    pub fn export_as(&self, format: ExportFormat) -> Result<Option<ExportOutput>> {
        let options = self.export.clone().with_format(format);
        self.export_with(&options)
    }

    fn export_with(&self, options: &ExportOptions) -> Result<Option<ExportOutput>> {
        discard_stale(run_export(
            &self.paginator,
            self.editor.document(),
            options,
            &self.ticket(),
        ))
    }

    /// Export the current revision on a worker thread.
    ///
    /// The worker lays out an immutable snapshot; edits may continue while
    /// it runs, in which case its result is discarded.
    pub fn spawn_export(&self) -> ExportHandle {
        let snapshot = self.editor.snapshot();
        let ticket = self.ticket();
        let paginator = self.paginator.clone();
        let options = self.export.clone();
        let (tx, rx) = bounded(1);

        let worker_ticket = ticket.clone();
        let handle = thread::spawn(move || {
            let result = run_export(&paginator, &snapshot, &options, &worker_ticket);
            let _ = tx.send(result);
        });

        ExportHandle {
            ticket,
            receiver: rx,
            handle: Some(handle),
        }
    }

    /// Consume the session, returning the current document.
    pub fn into_document(self) -> Document {
        self.editor.into_document()
    }
}

/// A pending background export.
#[derive(Debug)]
pub struct ExportHandle {
    ticket: ExportTicket,
    receiver: Receiver<Result<ExportOutput>>,
    handle: Option<JoinHandle<()>>,
}

impl ExportHandle {
    /// Revision being exported.
    pub fn revision(&self) -> u64 {
        self.ticket.revision()
    }

    /// Check if the export has been overtaken by an edit.
    pub fn is_stale(&self) -> bool {
        self.ticket.is_stale()
    }

    /// Block until the export finishes.
    ///
    /// Returns `Ok(None)` if a newer revision exists.
    pub fn wait(mut self) -> Result<Option<ExportOutput>> {
        let received = self.receiver.recv();
        self.join()?;
        let result = received.map_err(|_| Error::Render("export worker exited early".to_string()))?;
        self.finish(result)
    }

    /// Poll for the result without blocking.
    ///
    /// Returns `None` while the export is still running.
    pub fn try_wait(&mut self) -> Option<Result<Option<ExportOutput>>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                let joined = self.join();
                Some(joined.and_then(|_| self.finish(result)))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(
                self.join()
                    .and(Err(Error::Render("export worker exited early".to_string()))),
            ),
        }
    }

    fn finish(&self, result: Result<ExportOutput>) -> Result<Option<ExportOutput>> {
        let output = discard_stale(result)?;
        // An edit may have landed after the worker's last check.
        if self.ticket.is_stale() {
            log::debug!("Discarding export of revision {}", self.revision());
            return Ok(None);
        }
        Ok(output)
    }

    fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::Render("export worker panicked".to_string())),
            None => Ok(()),
        }
    }
}

fn run_export(
    paginator: &Paginator,
    document: &Document,
    options: &ExportOptions,
    ticket: &ExportTicket,
) -> Result<ExportOutput> {
    ticket.check()?;
    let layout = paginator.paginate_tracked(document, &ticket.clock)?;
    let output = render::export(&layout, options)?;
    ticket.check()?;
    Ok(output)
}

fn discard_stale(result: Result<ExportOutput>) -> Result<Option<ExportOutput>> {
    match result {
        Ok(output) => Ok(Some(output)),
        Err(Error::StaleResult { requested, current }) => {
            log::debug!(
                "Dropped stale export of revision {} (now at {})",
                requested,
                current
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
