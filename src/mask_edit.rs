//!
//! Edit session for one masked field.
//!
//! The session is idle until [EditSession::begin_edit] and returns
//! to idle with a successful [EditSession::end_edit]. All edits
//! are done with [apply_edit](edit_op::apply_edit).
//!
//! Cursor positions are display positions, the logical cursor is
//! the index into the raw value.
//!

use crate::autocomplete::Autocomplete;
use crate::compiler::CompiledMask;
use crate::mask_edit::edit_op::{EditOp, EditState, RenderedDisplay, apply_edit, render};
use crate::scanner::ScanResult;
use crate::{MaskError, upos_type};
use dyn_clone::clone_box;
use log::debug;
use std::ops::Range;
use std::sync::Arc;

pub mod edit_op;

/// Mode of the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Editing,
}

/// Live edit state of a field.
#[derive(Debug)]
pub struct EditSession {
    mask: Arc<CompiledMask>,
    mode: EditMode,
    state: EditState,
    rendered: RenderedDisplay,
    completion: Option<Box<dyn Autocomplete>>,
}

impl Clone for EditSession {
    fn clone(&self) -> Self {
        Self {
            mask: Arc::clone(&self.mask),
            mode: self.mode,
            state: self.state.clone(),
            rendered: self.rendered.clone(),
            completion: self.completion.as_ref().map(|v| clone_box(v.as_ref())),
        }
    }
}

impl EditSession {
    /// New idle session.
    pub fn new(mask: Arc<CompiledMask>) -> Self {
        let state = EditState::default();
        let rendered = render(&mask, &state).unwrap_or_else(|_| RenderedDisplay {
            text: mask.empty_text(),
            ..Default::default()
        });
        Self {
            mask,
            mode: EditMode::Idle,
            state,
            rendered,
            completion: None,
        }
    }

    /// With an autocompletion.
    pub fn with_completion(mut self, completion: impl Autocomplete + 'static) -> Self {
        self.completion = Some(Box::new(completion));
        self
    }

    /// Set the autocompletion.
    pub fn set_completion(&mut self, completion: Option<Box<dyn Autocomplete>>) {
        self.completion = completion;
    }

    pub fn mask(&self) -> &Arc<CompiledMask> {
        &self.mask
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[inline]
    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Start editing the value.
    ///
    /// Selects all of a non-empty value, the cursor is at the
    /// end of the content. An invalid value fails and the session
    /// stays idle.
    pub fn begin_edit(&mut self, value: &str) -> Result<(), MaskError> {
        let state = EditState::new(value);
        let op = if value.is_empty() {
            EditOp::MoveEnd { extend: false }
        } else {
            EditOp::SelectAll
        };
        let (state, rendered) = apply_edit(&self.mask, &state, &op, None)?;
        self.state = state;
        self.rendered = rendered;
        self.mode = EditMode::Editing;
        Ok(())
    }

    /// Commit the value.
    ///
    /// Fails with [MaskError::InvalidEntry] if some slots are not
    /// complete, the session stays in editing mode in that case.
    pub fn end_edit(&mut self) -> Result<String, MaskError> {
        let scan = self.mask.scan(&self.state.text)?;
        let incomplete = self.mask.validator().incomplete_slots(&scan.captured);
        if !incomplete.is_empty() {
            debug!(
                "incomplete {:?} for {:?}: {:?}",
                self.state.text,
                self.mask.pattern(),
                incomplete
            );
            return Err(MaskError::InvalidEntry(incomplete));
        }
        self.mode = EditMode::Idle;
        Ok(self.state.text.clone())
    }

    /// Run one edit operation.
    ///
    /// Invalid input leaves the session unchanged.
    pub fn edit(&mut self, op: EditOp) -> Result<(), MaskError> {
        if self.mode != EditMode::Editing {
            return Err(MaskError::NotEditing);
        }
        let (state, rendered) =
            apply_edit(&self.mask, &self.state, &op, self.completion.as_deref())?;
        self.state = state;
        self.rendered = rendered;
        Ok(())
    }

    /// Insert text at the cursor. Replaces the selection.
    pub fn insert_text(&mut self, text: &str) -> Result<(), MaskError> {
        self.edit(EditOp::Insert(text.to_string()))
    }

    /// Delete the selection or the char after the cursor.
    pub fn delete(&mut self) -> Result<(), MaskError> {
        self.edit(EditOp::Delete)
    }

    /// Delete the selection or the char before the cursor.
    pub fn backspace(&mut self) -> Result<(), MaskError> {
        self.edit(EditOp::Backspace)
    }

    /// Replace the whole text.
    ///
    /// The cursor is a logical position into the new text,
    /// None sets it at the end.
    pub fn replace(&mut self, text: &str, cursor: Option<upos_type>) -> Result<(), MaskError> {
        self.edit(EditOp::Replace {
            text: text.to_string(),
            cursor,
        })
    }

    fn move_op(&mut self, op: EditOp) -> bool {
        let old = self.state.clone();
        match self.edit(op) {
            Ok(()) => old != self.state,
            Err(_) => false,
        }
    }

    /// Set the cursor to a display position.
    ///
    /// The position is clamped to the content and moved out of
    /// literal runs.
    pub fn move_cursor(&mut self, pos: upos_type, extend_selection: bool) -> bool {
        self.move_op(EditOp::MoveCursor {
            pos,
            extend: extend_selection,
        })
    }

    pub fn move_left(&mut self, extend_selection: bool) -> bool {
        self.move_op(EditOp::MoveLeft {
            extend: extend_selection,
        })
    }

    pub fn move_right(&mut self, extend_selection: bool) -> bool {
        self.move_op(EditOp::MoveRight {
            extend: extend_selection,
        })
    }

    pub fn move_home(&mut self, extend_selection: bool) -> bool {
        self.move_op(EditOp::MoveHome {
            extend: extend_selection,
        })
    }

    pub fn move_end(&mut self, extend_selection: bool) -> bool {
        self.move_op(EditOp::MoveEnd {
            extend: extend_selection,
        })
    }

    pub fn select_all(&mut self) -> bool {
        self.move_op(EditOp::SelectAll)
    }

    /// Display text.
    #[inline]
    pub fn display(&self) -> &str {
        &self.rendered.text
    }

    /// Display cursor.
    #[inline]
    pub fn cursor(&self) -> upos_type {
        self.rendered.cursor
    }

    #[inline]
    pub fn anchor(&self) -> upos_type {
        self.rendered.anchor
    }

    /// Cursor as index into the value.
    #[inline]
    pub fn logical_cursor(&self) -> upos_type {
        self.rendered.logical_cursor
    }

    /// Display range of the selection.
    #[inline]
    pub fn selection(&self) -> Range<upos_type> {
        self.rendered.selection()
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.rendered.has_selection()
    }

    /// Canonical raw value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.state.text
    }

    /// All slots are complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.rendered.complete
    }

    /// Current state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Rendered display.
    pub fn rendered(&self) -> &RenderedDisplay {
        &self.rendered
    }

    /// Scan of the current value.
    pub fn scan(&self) -> Result<ScanResult, MaskError> {
        self.mask.scan(&self.state.text)
    }
}
