//! Selection state machine for the annotation overlay.
//!
//! The controller decides which annotation is selected and tells the visual host to
//! restyle annotations so that at most one carries the selected style.

use crate::annotation::{AnnotationId, ViewMode};

/// Visual style an annotation can be put in by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Selected,
}

/// The component that actually draws annotations, typically an embedded PDF viewer.
pub trait AnnotationHost {
    fn restyle(&mut self, id: &AnnotationId, style: Style);
}

/// Host that draws nothing.
#[derive(Debug, Default)]
pub struct NullHost;

impl AnnotationHost for NullHost {
    fn restyle(&mut self, _id: &AnnotationId, _style: Style) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Text(AnnotationId),
    Image(AnnotationId),
}

impl Selection {
    fn holding(id: AnnotationId) -> Self {
        match id.mode() {
            ViewMode::Text => Self::Text(id),
            ViewMode::Image => Self::Image(id),
        }
    }

    pub fn id(&self) -> Option<&AnnotationId> {
        match self {
            Self::Unselected => None,
            Self::Text(id) | Self::Image(id) => Some(id),
        }
    }

    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::Unselected)
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    mode: ViewMode,
    selection: Selection,
}

impl SelectionController {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            selection: Selection::Unselected,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// A click on the overlay. Ids from the other namespace deselect.
    pub fn click(&mut self, raw: &str, host: &mut dyn AnnotationHost) -> &Selection {
        let id = AnnotationId::parse(raw);
        let next = if id.mode() == self.mode {
            Selection::holding(id)
        } else {
            Selection::Unselected
        };
        self.transition(next, host)
    }

    /// Switching modes never carries a selection across.
    pub fn switch_mode(&mut self, mode: ViewMode, host: &mut dyn AnnotationHost) -> &Selection {
        self.mode = mode;
        self.transition(Selection::Unselected, host)
    }

    /// Programmatic selection, used for navigation. Skips the mode check.
    pub fn select(&mut self, id: AnnotationId, host: &mut dyn AnnotationHost) -> &Selection {
        self.transition(Selection::holding(id), host)
    }

    /// Drops the selection without telling the host, for when the annotations it
    /// referred to are gone.
    pub fn forget(&mut self) {
        self.selection = Selection::Unselected;
    }

    fn transition(&mut self, next: Selection, host: &mut dyn AnnotationHost) -> &Selection {
        if next != self.selection {
            if let Some(previous) = self.selection.id() {
                host.restyle(previous, Style::Normal);
            }
            if let Some(current) = next.id() {
                host.restyle(current, Style::Selected);
            }
            self.selection = next;
        }
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Records restyle calls and tracks which ids currently look selected.
    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<(String, Style)>,
        selected: HashSet<String>,
    }

    impl AnnotationHost for RecordingHost {
        fn restyle(&mut self, id: &AnnotationId, style: Style) {
            self.calls.push((id.to_string(), style));
            match style {
                Style::Selected => self.selected.insert(id.to_string()),
                Style::Normal => self.selected.remove(id.as_str()),
            };
        }
    }

    #[test]
    fn test_click_in_matching_mode_selects() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Text);
        let sel = ctl.click("1-1", &mut host).clone();
        assert_eq!(sel, Selection::Text(AnnotationId::parse("1-1")));
        assert!(sel.is_selected());
        assert_eq!(host.calls, vec![("1-1".to_string(), Style::Selected)]);
    }

    #[test]
    fn test_click_in_other_namespace_deselects() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Text);
        ctl.click("1-1", &mut host);
        assert_eq!(*ctl.click("img-1-0", &mut host), Selection::Unselected);
        assert!(!ctl.selection().is_selected());
        assert!(host.selected.is_empty());

        let mut ctl = SelectionController::new(ViewMode::Image);
        assert_eq!(*ctl.click("3-2", &mut host), Selection::Unselected);
    }

    #[test]
    fn test_new_selection_restores_previous_first() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Text);
        ctl.click("1-1", &mut host);
        ctl.click("1-2", &mut host);
        assert_eq!(
            host.calls,
            vec![
                ("1-1".to_string(), Style::Selected),
                ("1-1".to_string(), Style::Normal),
                ("1-2".to_string(), Style::Selected),
            ]
        );
    }

    #[test]
    fn test_reselecting_same_id_is_quiet() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Text);
        ctl.click("1-1", &mut host);
        ctl.click("1-1", &mut host);
        assert_eq!(host.calls.len(), 1);
    }

    #[test]
    fn test_switch_mode_clears_selection() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Image);
        ctl.click("img-2-1", &mut host);
        assert_eq!(*ctl.switch_mode(ViewMode::Text, &mut host), Selection::Unselected);
        assert_eq!(ctl.mode(), ViewMode::Text);
        assert!(host.selected.is_empty());
    }

    #[test]
    fn test_programmatic_select_bypasses_mode() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Text);
        let sel = ctl.select(AnnotationId::parse("img-4-0"), &mut host).clone();
        assert_eq!(sel, Selection::Image(AnnotationId::parse("img-4-0")));
        assert_eq!(ctl.mode(), ViewMode::Text);
    }

    #[test]
    fn test_at_most_one_selected_style() {
        let mut host = RecordingHost::default();
        let mut ctl = SelectionController::new(ViewMode::Text);
        let script: [(&str, Option<ViewMode>); 8] = [
            ("1-1", None),
            ("img-1-0", None),
            ("2-1", None),
            ("", Some(ViewMode::Image)),
            ("img-1-0", None),
            ("img-2-0", None),
            ("1-1", None),
            ("", Some(ViewMode::Text)),
        ];
        for (raw, switch) in script {
            match switch {
                Some(mode) => {
                    ctl.switch_mode(mode, &mut host);
                }
                None => {
                    ctl.click(raw, &mut host);
                }
            }
            assert!(host.selected.len() <= 1);
            ctl.select(AnnotationId::parse("9-9"), &mut host);
            assert_eq!(host.selected.len(), 1);
        }
    }
}
