//! Review session for one open document at a time.
//!
//! The session owns the annotation store of the active document, the selection state
//! machine and the navigator. Fetches run without holding the state lock; results are
//! applied only if no other document was opened in the meantime.

use std::sync::Arc;

use docreview_annotate::{
    AnnotationHost, AnnotationId, BackendError, Classification, Direction, DocumentAnnotations, Navigator,
    ReviewBackend, Selection, SelectionController, ViewMode,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::loader::{load_document, LoadReport};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a document is still loading")]
    Busy,
    #[error("no document is open")]
    NoDocument,
    #[error("annotation {0} is not part of the open document")]
    UnknownAnnotation(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { document_id: String },
    Ready,
    Failed { document_id: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    Applied(LoadReport),
    /// Another document was requested before this fetch finished.
    Discarded,
}

/// Point-in-time view of the session for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub document_id: Option<String>,
    pub load: LoadState,
    pub mode: ViewMode,
    pub selection: Selection,
    /// Annotation under the navigator cursor.
    pub current: Option<AnnotationId>,
    pub index: usize,
    pub total: usize,
    pub critical: usize,
}

struct SessionState {
    generation: u64,
    active: Option<String>,
    load: LoadState,
    document: Option<DocumentAnnotations>,
    selection: SelectionController,
    navigator: Navigator,
    host: Box<dyn AnnotationHost + Send>,
}

impl SessionState {
    fn ensure_ready(&self) -> Result<(), SessionError> {
        match self.load {
            LoadState::Loading { .. } => Err(SessionError::Busy),
            LoadState::Ready => Ok(()),
            LoadState::Idle | LoadState::Failed { .. } => Err(SessionError::NoDocument),
        }
    }

    fn contains(&self, id: &AnnotationId) -> bool {
        self.document.as_ref().is_some_and(|doc| doc.metadata(id).is_some())
    }

    fn rebuild_navigator(&mut self) {
        self.navigator = match &self.document {
            Some(doc) => Navigator::new(doc.navigation_entries(self.selection.mode())),
            None => Navigator::default(),
        };
    }

    fn clear_document(&mut self) {
        self.document = None;
        self.selection.forget();
        self.navigator = Navigator::default();
    }
}

pub struct ReviewSession<B> {
    backend: Arc<B>,
    state: Mutex<SessionState>,
}

impl<B: ReviewBackend> ReviewSession<B> {
    pub fn new(backend: Arc<B>, host: Box<dyn AnnotationHost + Send>) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState {
                generation: 0,
                active: None,
                load: LoadState::Idle,
                document: None,
                selection: SelectionController::new(ViewMode::Text),
                navigator: Navigator::default(),
                host,
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Makes `document_id` the active document and loads its annotations.
    pub async fn open_document(&self, document_id: &str) -> Result<OpenOutcome, SessionError> {
        let generation = {
            let mut st = self.state.lock().await;
            st.generation += 1;
            st.active = Some(document_id.to_string());
            st.load = LoadState::Loading {
                document_id: document_id.to_string(),
            };
            st.clear_document();
            st.generation
        };

        info!("Loading annotations for {}", document_id);
        let (boxes, images) = tokio::join!(
            self.backend.bounding_boxes(document_id),
            self.backend.images(document_id)
        );
        let fetched = boxes.and_then(|pages| images.map(|images| (pages, images)));

        let mut st = self.state.lock().await;
        if st.generation != generation {
            debug!("Discarding stale annotations for {}", document_id);
            return Ok(OpenOutcome::Discarded);
        }

        match fetched {
            Ok((pages, images)) => {
                let (doc, report) = load_document(document_id, &pages, &images);
                info!(
                    "Loaded {} annotations for {} ({} skipped)",
                    report.kept(),
                    document_id,
                    report.skipped()
                );
                st.document = Some(doc);
                st.load = LoadState::Ready;
                st.rebuild_navigator();
                Ok(OpenOutcome::Applied(report))
            }
            Err(err) => {
                warn!("Failed to load annotations for {}: {}", document_id, err);
                st.clear_document();
                st.load = LoadState::Failed {
                    document_id: document_id.to_string(),
                    message: err.to_string(),
                };
                Err(err.into())
            }
        }
    }

    /// Closes the active document. Any fetch still in flight is discarded.
    pub async fn close(&self) {
        let mut st = self.state.lock().await;
        st.generation += 1;
        st.active = None;
        st.load = LoadState::Idle;
        st.clear_document();
    }

    /// A click on the overlay with a wire id. Ids outside the open document are
    /// rejected and leave the selection untouched.
    pub async fn click(&self, raw_id: &str) -> Result<Selection, SessionError> {
        let mut guard = self.state.lock().await;
        let st = &mut *guard;
        st.ensure_ready()?;

        if !st.contains(&AnnotationId::parse(raw_id)) {
            return Err(SessionError::UnknownAnnotation(raw_id.to_string()));
        }

        let selection = st.selection.click(raw_id, st.host.as_mut()).clone();
        if let Some(id) = selection.id() {
            st.navigator.jump_to(id);
        }
        Ok(selection)
    }

    pub async fn switch_mode(&self, mode: ViewMode) -> Result<(), SessionError> {
        let mut guard = self.state.lock().await;
        let st = &mut *guard;
        if let LoadState::Loading { .. } = st.load {
            return Err(SessionError::Busy);
        }

        st.selection.switch_mode(mode, st.host.as_mut());
        st.rebuild_navigator();
        Ok(())
    }

    /// Steps through the active mode's annotations, selecting where it lands.
    pub async fn navigate(&self, direction: Direction, critical_only: bool) -> Result<Option<AnnotationId>, SessionError> {
        let mut guard = self.state.lock().await;
        let st = &mut *guard;
        st.ensure_ready()?;

        let landed = if critical_only {
            st.navigator.step_critical(direction, &mut st.selection, st.host.as_mut())
        } else {
            st.navigator.step(direction, &mut st.selection, st.host.as_mut())
        };
        Ok(landed)
    }

    /// Jumps to an annotation by id, switching mode first if it belongs to the other one.
    pub async fn jump_to(&self, raw_id: &str) -> Result<Selection, SessionError> {
        let mut guard = self.state.lock().await;
        let st = &mut *guard;
        st.ensure_ready()?;

        let id = AnnotationId::parse(raw_id);
        if !st.contains(&id) {
            return Err(SessionError::UnknownAnnotation(raw_id.to_string()));
        }

        if id.mode() != st.selection.mode() {
            st.selection.switch_mode(id.mode(), st.host.as_mut());
            st.rebuild_navigator();
        }
        st.navigator.jump_to(&id);
        Ok(st.selection.select(id, st.host.as_mut()).clone())
    }

    pub async fn estimate_classification(&self) -> Result<Option<Classification>, SessionError> {
        let st = self.state.lock().await;
        st.ensure_ready()?;
        Ok(st.document.as_ref().and_then(DocumentAnnotations::estimate_classification))
    }

    /// A copy of the open document's annotations.
    pub async fn document(&self) -> Option<DocumentAnnotations> {
        self.state.lock().await.document.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let st = self.state.lock().await;
        SessionSnapshot {
            document_id: st.active.clone(),
            load: st.load.clone(),
            mode: st.selection.mode(),
            selection: st.selection.selection().clone(),
            current: st.navigator.current().cloned(),
            index: st.navigator.index(),
            total: st.navigator.len(),
            critical: st.navigator.critical_count(),
        }
    }
}
