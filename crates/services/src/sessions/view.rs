use serde::Serialize;

use drill_core::model::{BlockId, WordRow};

use super::engine::Completion;
use super::progress::SessionProgress;

/// One of the two reference rows around the targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryView {
    pub display: String,
    pub has_definition: bool,
}

impl BoundaryView {
    pub(crate) fn from_row(row: &WordRow) -> Self {
        Self {
            display: row.display.clone(),
            has_definition: row.definition.is_some(),
        }
    }
}

/// Render state of one target slot.
///
/// `display` stays `None` until the slot is found, so a front-end cannot leak
/// the answer by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub slot: usize,
    pub found: bool,
    pub display: Option<String>,
    /// Hint text currently shown, if any.
    pub hint: Option<String>,
}

/// Presentation-agnostic snapshot of a session.
///
/// This is intentionally **not** a UI view-model: no pre-formatted messages,
/// no localization. Front-ends decide how to draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub block_id: BlockId,
    pub start: BoundaryView,
    pub end: BoundaryView,
    pub slots: Vec<SlotView>,
    pub progress: SessionProgress,
    pub aid_used: bool,
    pub completion: Option<Completion>,
}

impl SessionView {
    /// Slots still hidden, in order.
    pub fn hidden_slots(&self) -> impl Iterator<Item = &SlotView> {
        self.slots.iter().filter(|slot| !slot.found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_view_reports_definition_presence() {
        let bare = BoundaryView::from_row(&WordRow::bare("ABAC"));
        assert_eq!(bare.display, "ABAC");
        assert!(!bare.has_definition);

        let defined = BoundaryView::from_row(&WordRow::bare("ABRI").with_definition("refuge"));
        assert!(defined.has_definition);
    }

    #[test]
    fn view_serializes_for_front_ends() {
        let view = SessionView {
            block_id: BlockId::new(3),
            start: BoundaryView::from_row(&WordRow::bare("ABAC")),
            end: BoundaryView::from_row(&WordRow::bare("ABSOUTE")),
            slots: vec![
                SlotView {
                    slot: 0,
                    found: true,
                    display: Some("ABRI".into()),
                    hint: None,
                },
                SlotView {
                    slot: 1,
                    found: false,
                    display: None,
                    hint: Some("5".into()),
                },
            ],
            progress: SessionProgress {
                total: 2,
                found: 1,
                remaining: 1,
                is_complete: false,
            },
            aid_used: true,
            completion: None,
        };

        assert_eq!(view.hidden_slots().map(|s| s.slot).collect::<Vec<_>>(), vec![1]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["block_id"], 3);
        assert_eq!(json["slots"][1]["hint"], "5");
        assert_eq!(json["slots"][1]["display"], serde_json::Value::Null);
        assert_eq!(json["progress"]["remaining"], 1);
    }
}
