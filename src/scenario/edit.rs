//! Interactive step editing
//!
//! Editors hold steps as [`StepDraft`]s: a known type plus whatever fields
//! the user has filled in so far. Changing a draft's type goes through
//! [`apply_type_change`], which rebuilds the draft for the new type instead
//! of patching fields in place.

use serde::{Deserialize, Serialize};

use super::model::StepType;

/// An editable step that may still be missing required fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDraft {
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms: Option<u64>,
}

impl StepDraft {
    /// A draft of the given type with no fields set
    pub fn empty(step_type: StepType) -> Self {
        Self {
            step_type,
            selector: None,
            value: None,
            key: None,
            path: None,
            ms: None,
        }
    }
}

fn or_default(field: &Option<String>, default: &str) -> Option<String> {
    Some(field.clone().unwrap_or_else(|| default.to_string()))
}

/// Rebuild `draft` as a step of `new_type`.
///
/// Fields the new type does not use are dropped. Fields it requires are kept
/// when present and otherwise filled with a fixed default. Applying the same
/// type twice yields the same draft.
pub fn apply_type_change(draft: &StepDraft, new_type: StepType) -> StepDraft {
    let mut next = StepDraft::empty(new_type);
    match new_type {
        StepType::Goto => {
            next.path = or_default(&draft.path, "/");
        }
        StepType::Click | StepType::ExpectVisible | StepType::ExpectHidden => {
            next.selector = or_default(&draft.selector, "text=Some text");
        }
        StepType::Fill => {
            next.selector = or_default(&draft.selector, "input");
            next.value = or_default(&draft.value, "");
        }
        StepType::Press => {
            next.selector = or_default(&draft.selector, "input");
            next.key = or_default(&draft.key, "Enter");
        }
        StepType::WaitFor => {
            next.selector = draft.selector.clone();
            next.ms = match next.selector {
                Some(_) => draft.ms,
                None => Some(draft.ms.unwrap_or(800)),
            };
        }
        StepType::ExpectTextContains => {
            next.selector = or_default(&draft.selector, "body");
            next.value = or_default(&draft.value, "");
        }
        StepType::ExpectUrlContains => {
            next.value = or_default(&draft.value, "/");
        }
        StepType::ExpectTitleContains => {
            next.value = or_default(&draft.value, "");
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_everything() -> StepDraft {
        StepDraft {
            step_type: StepType::Fill,
            selector: Some("#email".into()),
            value: Some("a@b.c".into()),
            key: Some("Tab".into()),
            path: Some("/old".into()),
            ms: Some(50),
        }
    }

    #[test]
    fn test_type_change_is_idempotent_for_every_type() {
        let starts = [
            draft_with_everything(),
            StepDraft::empty(StepType::Goto),
            StepDraft::empty(StepType::WaitFor),
        ];
        for start in &starts {
            for t in StepType::ALL {
                let once = apply_type_change(start, t);
                let twice = apply_type_change(&once, t);
                assert_eq!(once, twice, "type {} from {:?}", t, start.step_type);
            }
        }
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let blank = StepDraft::empty(StepType::Click);

        let press = apply_type_change(&blank, StepType::Press);
        assert_eq!(press.selector.as_deref(), Some("input"));
        assert_eq!(press.key.as_deref(), Some("Enter"));

        let goto = apply_type_change(&blank, StepType::Goto);
        assert_eq!(goto.path.as_deref(), Some("/"));
        assert_eq!(goto.selector, None);

        let text = apply_type_change(&blank, StepType::ExpectTextContains);
        assert_eq!(text.selector.as_deref(), Some("body"));
        assert_eq!(text.value.as_deref(), Some(""));

        let url = apply_type_change(&blank, StepType::ExpectUrlContains);
        assert_eq!(url.value.as_deref(), Some("/"));

        let click = apply_type_change(&StepDraft::empty(StepType::Goto), StepType::Click);
        assert_eq!(click.selector.as_deref(), Some("text=Some text"));
    }

    #[test]
    fn test_irrelevant_fields_are_dropped() {
        let url = apply_type_change(&draft_with_everything(), StepType::ExpectUrlContains);
        assert_eq!(
            url,
            StepDraft {
                step_type: StepType::ExpectUrlContains,
                selector: None,
                value: Some("a@b.c".into()),
                key: None,
                path: None,
                ms: None,
            }
        );
    }

    #[test]
    fn test_wait_for_only_defaults_ms_without_selector() {
        let with_selector = apply_type_change(&draft_with_everything(), StepType::WaitFor);
        assert_eq!(with_selector.selector.as_deref(), Some("#email"));
        assert_eq!(with_selector.ms, Some(50));

        let mut no_ms = draft_with_everything();
        no_ms.ms = None;
        let waited = apply_type_change(&no_ms, StepType::WaitFor);
        assert_eq!(waited.ms, None);

        let bare = apply_type_change(&StepDraft::empty(StepType::Goto), StepType::WaitFor);
        assert_eq!(bare.selector, None);
        assert_eq!(bare.ms, Some(800));
    }
}
