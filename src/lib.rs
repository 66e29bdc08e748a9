#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod autocomplete;
pub mod compiler;
pub mod date_value;
pub mod input_token;
pub mod lexicon;
pub mod mask_edit;
pub mod mask_token;
pub mod scanner;
pub mod tokenizer;
pub mod validate;

pub use autocomplete::{Autocomplete, LookupCompletion};
pub use compiler::{CompiledMask, MaskCompiler, MaskConfig, MaskFlags};
pub use date_value::DateParts;
pub use format_num_pattern::NumberSymbols;
pub use mask_edit::{EditMode, EditSession};
pub use mask_token::MaskType;

pub mod core {
    //!
    //! Core structs of the mask engine.
    //! The session and compiler are built on top of these.
    //!

    pub use crate::input_token::{
        CharTest, InputKind, InputToken, SlotKind, Step, build_input_tokens,
    };
    pub use crate::lexicon::{Edge, Lexicon, LexiconState, StateId, StateKey};
    pub use crate::mask_edit::edit_op::{EditOp, EditState, RenderedDisplay, apply_edit, render};
    pub use crate::mask_token::{CaseDirection, MaskToken};
    pub use crate::scanner::{ScanResult, scan};
    pub use crate::tokenizer::{TokenizedMask, compile, lex};
    pub use crate::validate::Validator;
}

/// Errors of the mask engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The mask pattern is malformed.
    ///
    /// Contains the char position in the pattern and a description.
    MaskDefinition {
        pos: upos_type,
        msg: Cow<'static, str>,
    },
    /// A char of the input matches no transition of the automaton.
    ///
    /// Contains the char index into the scanned text and the char.
    InvalidInputCharacter { pos: upos_type, ch: char },
    /// The input is not complete.
    ///
    /// Contains the indices of the incomplete slots.
    InvalidEntry(Vec<usize>),
    /// The session is not in editing mode.
    NotEditing,
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskError::MaskDefinition { pos, msg } => {
                write!(f, "invalid mask at {}: {}", pos, msg)
            }
            MaskError::InvalidInputCharacter { pos, ch } => {
                write!(f, "invalid input {:?} at {}", ch, pos)
            }
            MaskError::InvalidEntry(_) => write!(f, "incomplete entry"),
            MaskError::NotEditing => write!(f, "this field can not be changed"),
        }
    }
}

impl Error for MaskError {}

impl MaskError {
    pub(crate) fn definition(pos: usize, msg: impl Into<Cow<'static, str>>) -> Self {
        MaskError::MaskDefinition {
            pos: pos as upos_type,
            msg: msg.into(),
        }
    }

    /// Edit-time error that leaves the session untouched.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, MaskError::InvalidInputCharacter { .. })
    }
}

/// Position type. Counts chars, not bytes.
#[allow(non_camel_case_types)]
pub type upos_type = u32;

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
