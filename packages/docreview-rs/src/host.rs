use docreview_annotate::{AnnotationHost, AnnotationId, Style};
use tracing::debug;

/// Host for headless use: restyle requests are only logged.
#[derive(Debug, Default)]
pub struct TracingHost {
    highlighted: Option<AnnotationId>,
}

impl TracingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The annotation currently drawn as selected, if any.
    pub fn highlighted(&self) -> Option<&AnnotationId> {
        self.highlighted.as_ref()
    }
}

impl AnnotationHost for TracingHost {
    fn restyle(&mut self, id: &AnnotationId, style: Style) {
        debug!("restyle {} -> {:?}", id, style);
        match style {
            Style::Selected => self.highlighted = Some(id.clone()),
            Style::Normal => {
                if self.highlighted.as_ref() == Some(id) {
                    self.highlighted = None;
                }
            }
        }
    }
}
