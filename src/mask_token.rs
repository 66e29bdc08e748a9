//!
//! Tokens produced by the mask tokenizer.
//!

use crate::input_token::SlotKind;
use crate::upos_type;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Forced case for a text slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseDirection {
    Upper,
    Lower,
}

/// Apparent type of a mask.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskType {
    #[default]
    Text,
    Numeric,
    Date,
}

/// One token of the mask pattern.
///
/// `Repeater` and `CaseModifier` only occur in the raw lexer output.
/// They are resolved by [compile](crate::tokenizer::compile).
#[allow(variant_size_differences)]
#[derive(Clone, PartialEq, Eq)]
pub enum MaskToken {
    /// Literal text. Consecutive literals are merged later on.
    Literal(Box<str>),
    /// One of the reserved mask codes.
    CharClass {
        kind: SlotKind,
        width: upos_type,
        case: Option<CaseDirection>,
    },
    /// `{n}`
    Repeater(upos_type),
    /// `<` or `>`
    CaseModifier(CaseDirection),
    /// `[...]`. Case modifiers pass over a set.
    CustomSet { chars: Box<str> },
    /// `!`
    RightToLeft,
}

impl Debug for CaseDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CaseDirection::Upper => "<",
                CaseDirection::Lower => ">",
            }
        )
    }
}

impl Display for MaskToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskToken::Literal(s) => {
                if s.chars().count() == 1 {
                    write!(f, "\\{}", s)
                } else {
                    write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
                }
            }
            MaskToken::CharClass { kind, case, .. } => {
                if let Some(case) = case {
                    write!(f, "{:?}", case)?;
                }
                write!(f, "{}", kind.symbol())
            }
            MaskToken::Repeater(n) => write!(f, "{{{}}}", n),
            MaskToken::CaseModifier(case) => write!(f, "{:?}", case),
            MaskToken::CustomSet { chars } => {
                write!(
                    f,
                    "[{}]",
                    chars
                        .replace('[', "\\[")
                        .replace(']', "\\]")
                )
            }
            MaskToken::RightToLeft => write!(f, "!"),
        }
    }
}

impl Debug for MaskToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskToken::Literal(s) => write!(f, "Literal({:?})", s),
            MaskToken::CharClass { kind, width, case } => {
                write!(f, "{:?}/{}", kind, width)?;
                if let Some(case) = case {
                    write!(f, "{:?}", case)?;
                }
                Ok(())
            }
            MaskToken::Repeater(n) => write!(f, "Repeater({})", n),
            MaskToken::CaseModifier(c) => write!(f, "Case({:?})", c),
            MaskToken::CustomSet { chars } => write!(f, "Set({:?})", chars),
            MaskToken::RightToLeft => write!(f, "RightToLeft"),
        }
    }
}

impl MaskToken {
    /// Literal text.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, MaskToken::Literal(_))
    }

    /// A set made of digits only.
    #[inline]
    pub(crate) fn is_numeric_set(chars: &str) -> bool {
        !chars.is_empty() && chars.chars().all(|c| c.is_ascii_digit())
    }

    /// Token can take a case modifier. Only the text codes do.
    #[inline]
    pub(crate) fn is_text(&self) -> bool {
        match self {
            MaskToken::CharClass { kind, .. } => kind.is_text(),
            _ => false,
        }
    }

    /// Set the forced case.
    pub(crate) fn set_case(&mut self, direction: CaseDirection) {
        if let MaskToken::CharClass { case, .. } = self {
            *case = Some(direction);
        }
    }

    /// Classification used for the mask type.
    pub(crate) fn mask_type(&self) -> Option<MaskType> {
        match self {
            MaskToken::Literal(_) => None,
            MaskToken::CharClass { kind, .. } => Some(kind.mask_type()),
            MaskToken::CustomSet { chars, .. } => {
                if Self::is_numeric_set(chars) {
                    Some(MaskType::Numeric)
                } else {
                    Some(MaskType::Text)
                }
            }
            MaskToken::RightToLeft => Some(MaskType::Numeric),
            MaskToken::Repeater(_) | MaskToken::CaseModifier(_) => None,
        }
    }
}
