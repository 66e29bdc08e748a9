//!
//! Edit operations as a pure function.
//!
//! [apply_edit] takes the current [EditState] and an [EditOp] and
//! returns the new state together with the rendered display.
//! Every edit rescans the complete text.
//!
//! Positions in [EditState] are display positions. The logical
//! position is the index into the raw text.
//!

use crate::autocomplete::Autocomplete;
use crate::compiler::CompiledMask;
use crate::scanner::ScanResult;
use crate::{MaskError, upos_type};
use log::debug;
use std::borrow::Cow;
use std::cmp::{max, min};
use std::ops::Range;

/// Edit operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Insert at the cursor, replaces the selection.
    Insert(String),
    /// Delete the selection or the char after the cursor.
    Delete,
    /// Delete the selection or the char before the cursor.
    Backspace,
    /// Replace the whole text.
    ///
    /// The cursor is a logical position into the text,
    /// None sets the cursor at the end.
    Replace {
        text: String,
        cursor: Option<upos_type>,
    },
    /// Set the cursor to a display position.
    MoveCursor { pos: upos_type, extend: bool },
    MoveLeft { extend: bool },
    MoveRight { extend: bool },
    MoveHome { extend: bool },
    MoveEnd { extend: bool },
    /// Select all and set the cursor at the end.
    SelectAll,
}

/// Edit state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditState {
    /// Canonical raw text.
    pub text: String,
    /// Display position of the cursor.
    pub cursor: upos_type,
    /// Display position of the selection anchor.
    pub anchor: upos_type,
}

/// Rendered display of an [EditState].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderedDisplay {
    /// Literals and captures, padded with placeholders.
    pub text: String,
    /// Display cursor.
    pub cursor: upos_type,
    /// Display anchor.
    pub anchor: upos_type,
    /// Cursor as index into the raw text.
    pub logical_cursor: upos_type,
    /// All slots are complete.
    pub complete: bool,
}

impl EditState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            anchor: 0,
        }
    }

    /// Selection range.
    #[inline]
    pub fn selection(&self) -> Range<upos_type> {
        min(self.cursor, self.anchor)..max(self.cursor, self.anchor)
    }
}

impl RenderedDisplay {
    /// Selection range.
    #[inline]
    pub fn selection(&self) -> Range<upos_type> {
        min(self.cursor, self.anchor)..max(self.cursor, self.anchor)
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.cursor != self.anchor
    }
}

/// Display layout of one slot.
#[derive(Debug)]
struct SlotLayout {
    phys: upos_type,
    width: upos_type,
    literal: bool,
    /// Literal text or the displayed capture.
    text: Vec<char>,
    /// Number of scanned chars.
    raw_len: upos_type,
    /// Leading zeros added for display.
    pad: upos_type,
    filled: bool,
}

/// Layout of the display for a scan.
#[derive(Debug)]
struct Layout {
    slots: Vec<SlotLayout>,
    /// Runs of consecutive literal slots.
    runs: Vec<Range<upos_type>>,
    last_content: Option<usize>,
    content_end: upos_type,
    /// End of a leading literal run.
    min_pos: upos_type,
    display: String,
    complete: bool,
}

/// One char of the edit text.
#[derive(Debug, Clone, Copy)]
struct Piece {
    c: char,
    phys: upos_type,
    literal: bool,
}

impl Layout {
    fn new(mask: &CompiledMask, scan: &ScanResult) -> Self {
        let placeholder = mask.placeholder();
        let pending = scan.pending_slot(mask.lexicon());

        let mut slots = Vec::with_capacity(mask.tokens().len());
        let mut display = String::new();
        let mut phys = 0;
        for (i, token) in mask.tokens().iter().enumerate() {
            let captured = scan.captured.get(i).map(|v| v.as_str()).unwrap_or_default();
            let raw_len = captured.chars().count() as upos_type;

            let slot = if token.is_literal() {
                display.push_str(&token.placeholder);
                let text = token.placeholder.chars().collect::<Vec<_>>();
                SlotLayout {
                    phys,
                    width: text.len() as upos_type,
                    literal: true,
                    text,
                    raw_len,
                    pad: 0,
                    filled: raw_len > 0,
                }
            } else {
                // slots before the pending one are done.
                let shown = if i < pending {
                    token.proper_display(captured)
                } else {
                    Cow::Borrowed(captured)
                };
                let text = shown.chars().collect::<Vec<_>>();
                let len = text.len() as upos_type;
                display.push_str(&shown);
                for _ in len..token.max_width {
                    display.push(placeholder);
                }
                SlotLayout {
                    phys,
                    width: max(len, token.max_width),
                    literal: false,
                    text,
                    raw_len,
                    pad: len.saturating_sub(raw_len),
                    filled: raw_len > 0,
                }
            };
            phys += slot.width;
            slots.push(slot);
        }

        let mut runs: Vec<Range<upos_type>> = Vec::new();
        for slot in slots.iter().filter(|v| v.literal && v.width > 0) {
            match runs.last_mut() {
                Some(run) if run.end == slot.phys => run.end = slot.phys + slot.width,
                _ => runs.push(slot.phys..slot.phys + slot.width),
            }
        }

        let last_content = slots.iter().rposition(|v| v.filled);
        let content_end = match last_content {
            Some(i) => slots[i].phys + slots[i].text.len() as upos_type,
            None => 0,
        };
        let min_pos = match runs.first() {
            Some(run) if run.start == 0 => run.end,
            _ => 0,
        };

        Self {
            slots,
            runs,
            last_content,
            content_end,
            min_pos,
            display,
            complete: mask.validator().is_complete(&scan.captured),
        }
    }

    /// Slots that make up the canonical text.
    ///
    /// A literal behind empty input slots is left out, unless no
    /// input slot precedes it.
    fn kept(&self) -> impl Iterator<Item = &SlotLayout> {
        let last = self.last_content.map(|v| v + 1).unwrap_or_default();
        let mut input = false;
        let mut content = false;
        self.slots[..last].iter().filter(move |v| {
            if v.literal {
                !input || content
            } else {
                input = true;
                content |= v.filled;
                true
            }
        })
    }

    /// Raw text with literals and padded captures.
    fn canonical(&self) -> String {
        self.kept().flat_map(|v| v.text.iter()).collect()
    }

    /// Chars of all slots with their display position.
    fn pieces(&self) -> Vec<Piece> {
        let mut pieces = Vec::new();
        for slot in &self.slots {
            for (k, c) in slot.text.iter().enumerate() {
                pieces.push(Piece {
                    c: *c,
                    phys: slot.phys + k as upos_type,
                    literal: slot.literal,
                });
            }
        }
        pieces
    }

    /// Map an index into the scanned text to a display position.
    fn raw_to_phys(&self, raw: upos_type) -> upos_type {
        let mut start = 0;
        for slot in &self.slots {
            if raw < start + slot.raw_len {
                let offset = raw - start;
                return if offset == 0 {
                    slot.phys
                } else {
                    slot.phys + slot.pad + offset
                };
            }
            start += slot.raw_len;
        }
        self.content_end
    }

    /// Map a display position to an index into the canonical text.
    fn logical(&self, pos: upos_type) -> upos_type {
        self.kept()
            .map(|v| min(pos.saturating_sub(v.phys), v.text.len() as upos_type))
            .sum()
    }

    /// Literal run containing the position.
    fn run_at(&self, pos: upos_type) -> Option<&Range<upos_type>> {
        self.runs.iter().find(|v| v.contains(&pos))
    }

    /// Clamp to the content and move out of literal runs.
    ///
    /// Moving forward skips a literal run that starts at the position.
    /// Moving backward leaves a run at its start, except a leading run.
    fn adjust(&self, pos: upos_type, forward: bool) -> upos_type {
        let upper = max(self.content_end, self.min_pos);
        let pos = pos.clamp(self.min_pos, upper);
        for run in &self.runs {
            if run.start < pos && pos < run.end {
                return if forward || run.start == 0 {
                    run.end
                } else {
                    run.start
                };
            } else if forward && pos == run.start {
                return run.end;
            }
        }
        pos
    }

    /// Input char deleted by backspace.
    fn backspace_target(&self, cursor: upos_type) -> Option<upos_type> {
        if cursor <= self.min_pos {
            return None;
        }
        let pos = cursor - 1;
        match self.run_at(pos) {
            Some(run) if run.start == 0 => None,
            Some(run) => Some(run.start - 1),
            None => Some(pos),
        }
    }

    /// Input char deleted by delete.
    fn delete_target(&self, cursor: upos_type) -> Option<upos_type> {
        let pos = match self.run_at(cursor) {
            Some(run) => run.end,
            None => cursor,
        };
        if pos < self.content_end {
            Some(pos)
        } else {
            None
        }
    }

    fn render(&self, state: &EditState) -> RenderedDisplay {
        RenderedDisplay {
            text: self.display.clone(),
            cursor: state.cursor,
            anchor: state.anchor,
            logical_cursor: self.logical(state.cursor),
            complete: self.complete,
        }
    }
}

/// Remove all input chars in the range.
fn remove_range(pieces: &mut Vec<Piece>, range: Range<upos_type>) -> bool {
    let len = pieces.len();
    pieces.retain(|v| v.literal || !range.contains(&v.phys));
    len != pieces.len()
}

/// Index of the first piece at or after the display position.
fn piece_index(pieces: &[Piece], pos: upos_type) -> usize {
    pieces
        .iter()
        .position(|v| v.phys >= pos)
        .unwrap_or(pieces.len())
}

/// Scan the pieces. Returns the layout and the index of the marker
/// into the scanned text.
///
/// If the text with literals is rejected, the text without them
/// is tried too. The first error is reported.
fn rescan(
    mask: &CompiledMask,
    mut pieces: Vec<Piece>,
    marker: usize,
) -> Result<(Layout, upos_type), MaskError> {
    while pieces.last().is_some_and(|v| v.literal) {
        pieces.pop();
    }
    let marker = min(marker, pieces.len());

    let text = pieces.iter().map(|v| v.c).collect::<String>();
    let err = match mask.scan(&text) {
        Ok(scan) => return Ok((Layout::new(mask, &scan), marker as upos_type)),
        Err(err) => err,
    };

    let text2 = pieces
        .iter()
        .filter(|v| !v.literal)
        .map(|v| v.c)
        .collect::<String>();
    if text2 == text {
        return Err(err);
    }
    match mask.scan(&text2) {
        Ok(scan) => {
            let marker = pieces[..marker].iter().filter(|v| !v.literal).count();
            Ok((Layout::new(mask, &scan), marker as upos_type))
        }
        Err(_) => Err(err),
    }
}

/// Ask the provider for a completion of the canonical text.
///
/// Returns the new layout and the display position where the
/// suggestion starts.
fn complete(
    mask: &CompiledMask,
    layout: &Layout,
    completion: &dyn Autocomplete,
) -> Option<(Layout, upos_type)> {
    let typed = layout.canonical();
    let suggestion = completion.complete(&typed)?;

    let typed_len = typed.chars().count();
    if suggestion.chars().count() <= typed_len
        || !suggestion.to_uppercase().starts_with(&typed.to_uppercase())
    {
        return None;
    }

    let text = typed
        .chars()
        .chain(suggestion.chars().skip(typed_len))
        .collect::<String>();
    match mask.scan(&text) {
        Ok(scan) => {
            let layout = Layout::new(mask, &scan);
            let start = layout.raw_to_phys(typed_len as upos_type);
            Some((layout, start))
        }
        Err(e) => {
            debug!("completion {:?} rejected: {}", suggestion, e);
            None
        }
    }
}

/// Render the display for a state.
pub fn render(mask: &CompiledMask, state: &EditState) -> Result<RenderedDisplay, MaskError> {
    let scan = mask.scan(&state.text)?;
    Ok(Layout::new(mask, &scan).render(state))
}

/// Apply one edit operation.
///
/// Fails if the resulting text is rejected by the mask. The given
/// state is not changed in any case.
pub fn apply_edit(
    mask: &CompiledMask,
    state: &EditState,
    op: &EditOp,
    completion: Option<&dyn Autocomplete>,
) -> Result<(EditState, RenderedDisplay), MaskError> {
    let scan = mask.scan(&state.text)?;
    let current = Layout::new(mask, &scan);
    let selection = state.selection();

    let (layout, new_state) = match op {
        EditOp::Insert(text) => {
            let mut pieces = current.pieces();
            remove_range(&mut pieces, selection.clone());

            let idx = piece_index(&pieces, selection.start);
            let at_end = pieces[idx..].iter().all(|v| v.literal);
            let len = text.chars().count();
            pieces.splice(
                idx..idx,
                text.chars().map(|c| Piece {
                    c,
                    phys: selection.start,
                    literal: false,
                }),
            );

            let (layout, raw) = rescan(mask, pieces, idx + len)?;
            let cursor = layout.adjust(layout.raw_to_phys(raw), true);

            let completed = match completion {
                Some(completion) if at_end && len > 0 => complete(mask, &layout, completion),
                _ => None,
            };
            match completed {
                Some((layout, start)) => {
                    let new_state = EditState {
                        text: layout.canonical(),
                        cursor: start,
                        anchor: layout.content_end,
                    };
                    (layout, new_state)
                }
                None => {
                    let new_state = EditState {
                        text: layout.canonical(),
                        cursor,
                        anchor: cursor,
                    };
                    (layout, new_state)
                }
            }
        }
        EditOp::Delete | EditOp::Backspace => {
            let mut pieces = current.pieces();
            let pos = if !selection.is_empty() {
                remove_range(&mut pieces, selection.clone());
                selection.start
            } else {
                let target = if *op == EditOp::Delete {
                    current.delete_target(state.cursor)
                } else {
                    current.backspace_target(state.cursor)
                };
                match target {
                    Some(pos) if remove_range(&mut pieces, pos..pos + 1) => pos,
                    _ => {
                        // nothing to delete
                        let new_state = EditState {
                            text: current.canonical(),
                            cursor: state.cursor,
                            anchor: state.anchor,
                        };
                        return Ok((new_state.clone(), current.render(&new_state)));
                    }
                }
            };

            let idx = piece_index(&pieces, pos);
            let (layout, raw) = rescan(mask, pieces, idx)?;
            let cursor = layout.adjust(layout.raw_to_phys(raw), false);
            let new_state = EditState {
                text: layout.canonical(),
                cursor,
                anchor: cursor,
            };
            (layout, new_state)
        }
        EditOp::Replace { text, cursor } => {
            let scan = mask.scan(text)?;
            let layout = Layout::new(mask, &scan);
            let len = text.chars().count() as upos_type;
            let raw = match cursor {
                Some(cursor) => min(*cursor, len),
                None => len,
            };
            let cursor = layout.adjust(layout.raw_to_phys(raw), true);
            let new_state = EditState {
                text: layout.canonical(),
                cursor,
                anchor: cursor,
            };
            (layout, new_state)
        }
        EditOp::MoveCursor { pos, extend } => {
            let cursor = current.adjust(*pos, *pos >= state.cursor);
            let new_state = moved(&current, state, cursor, *extend);
            (current, new_state)
        }
        EditOp::MoveLeft { extend } => {
            let cursor = current.adjust(state.cursor.saturating_sub(1), false);
            let new_state = moved(&current, state, cursor, *extend);
            (current, new_state)
        }
        EditOp::MoveRight { extend } => {
            let cursor = current.adjust(state.cursor + 1, true);
            let new_state = moved(&current, state, cursor, *extend);
            (current, new_state)
        }
        EditOp::MoveHome { extend } => {
            let cursor = current.adjust(0, false);
            let new_state = moved(&current, state, cursor, *extend);
            (current, new_state)
        }
        EditOp::MoveEnd { extend } => {
            let cursor = current.adjust(current.content_end, true);
            let new_state = moved(&current, state, cursor, *extend);
            (current, new_state)
        }
        EditOp::SelectAll => {
            let new_state = EditState {
                text: current.canonical(),
                cursor: max(current.content_end, current.min_pos),
                anchor: 0,
            };
            (current, new_state)
        }
    };

    let rendered = layout.render(&new_state);
    Ok((new_state, rendered))
}

fn moved(layout: &Layout, state: &EditState, cursor: upos_type, extend: bool) -> EditState {
    EditState {
        text: layout.canonical(),
        cursor,
        anchor: if extend { state.anchor } else { cursor },
    }
}
