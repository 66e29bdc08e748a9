//!
//! Mask pattern tokenizer.
//!
//! [lex] splits the pattern into the raw token stream, [compile]
//! resolves repeaters and case modifiers, removes the right-to-left
//! marker and infers the mask type.
//!

use crate::MaskError;
use crate::input_token::SlotKind;
use crate::mask_token::{CaseDirection, MaskToken, MaskType};
use crate::upos_type;
use log::warn;

/// Result of [compile].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedMask {
    /// Expanded tokens.
    pub tokens: Vec<MaskToken>,
    /// Inferred type.
    pub mask_type: MaskType,
    /// Token index of the right-to-left marker, 0 if there is none.
    pub rtl_pos: upos_type,
}

#[derive(Debug)]
enum LexState {
    Default,
    Escape,
    Quoted(char),
    QuotedEscape(char),
    Repeater(usize, String),
    Set(usize, String),
    SetEscape(usize, String),
}

/// Split the pattern into raw tokens.
///
/// Repeater and case modifier tokens are still contained.
pub fn lex(pattern: &str) -> Result<Vec<MaskToken>, MaskError> {
    Ok(lex_pos(pattern)?.into_iter().map(|(_, v)| v).collect())
}

/// Raw tokens with their char position in the pattern.
fn lex_pos(pattern: &str) -> Result<Vec<(usize, MaskToken)>, MaskError> {
    let mut tokens = Vec::new();
    let mut singles = Vec::<char>::new();
    let mut state = LexState::Default;
    let mut last_pos = 0;

    for (pos, c) in pattern.chars().enumerate() {
        last_pos = pos;
        state = match state {
            LexState::Default => match c {
                '\\' => LexState::Escape,
                '\'' | '"' => LexState::Quoted(c),
                '{' => LexState::Repeater(pos, String::new()),
                '[' => LexState::Set(pos, String::new()),
                ' ' => {
                    tokens.push((pos, MaskToken::Literal(Box::from(" "))));
                    LexState::Default
                }
                '<' => {
                    tokens.push((pos, MaskToken::CaseModifier(CaseDirection::Upper)));
                    LexState::Default
                }
                '>' => {
                    tokens.push((pos, MaskToken::CaseModifier(CaseDirection::Lower)));
                    LexState::Default
                }
                '!' => {
                    if singles.contains(&c) {
                        return Err(MaskError::definition(pos, "'!' can only occur once"));
                    }
                    singles.push(c);
                    tokens.push((pos, MaskToken::RightToLeft));
                    LexState::Default
                }
                c => {
                    let Some(kind) = SlotKind::from_code(c) else {
                        return Err(MaskError::definition(
                            pos,
                            format!("unknown mask character {:?}", c),
                        ));
                    };
                    if kind.is_single() {
                        if singles.contains(&c) {
                            return Err(MaskError::definition(
                                pos,
                                format!("{:?} can only occur once", c),
                            ));
                        }
                        singles.push(c);
                    }
                    tokens.push((pos, MaskToken::CharClass {
                        kind,
                        width: kind.width(),
                        case: None,
                    }));
                    LexState::Default
                }
            },
            LexState::Escape => {
                tokens.push((pos, MaskToken::Literal(c.to_string().into())));
                LexState::Default
            }
            LexState::Quoted(q) => {
                if c == q {
                    LexState::Default
                } else if c == '\\' {
                    LexState::QuotedEscape(q)
                } else {
                    tokens.push((pos, MaskToken::Literal(c.to_string().into())));
                    LexState::Quoted(q)
                }
            }
            LexState::QuotedEscape(q) => {
                if c == q {
                    tokens.push((pos, MaskToken::Literal(c.to_string().into())));
                    LexState::Quoted(q)
                } else if c == '\\' {
                    // the backslash itself, the next one may escape again.
                    tokens.push((pos, MaskToken::Literal(Box::from("\\"))));
                    LexState::QuotedEscape(q)
                } else {
                    tokens.push((pos, MaskToken::Literal(Box::from("\\"))));
                    tokens.push((pos, MaskToken::Literal(c.to_string().into())));
                    LexState::Quoted(q)
                }
            }
            LexState::Repeater(start, mut buf) => {
                if c == '}' {
                    if buf.is_empty() {
                        return Err(MaskError::definition(start, "empty repeater"));
                    }
                    let Ok(n) = buf.parse::<upos_type>() else {
                        return Err(MaskError::definition(start, "repeater out of range"));
                    };
                    if n == 0 {
                        return Err(MaskError::definition(start, "repeater must be at least 1"));
                    }
                    tokens.push((start, MaskToken::Repeater(n)));
                    LexState::Default
                } else if c.is_ascii_digit() {
                    buf.push(c);
                    LexState::Repeater(start, buf)
                } else {
                    return Err(MaskError::definition(
                        pos,
                        format!("invalid char {:?} in repeater", c),
                    ));
                }
            }
            LexState::Set(start, mut buf) => match c {
                ']' => {
                    if buf.is_empty() {
                        return Err(MaskError::definition(start, "empty char set"));
                    }
                    tokens.push((start, MaskToken::CustomSet { chars: buf.into() }));
                    LexState::Default
                }
                '\\' => LexState::SetEscape(start, buf),
                c => {
                    buf.push(c);
                    LexState::Set(start, buf)
                }
            },
            LexState::SetEscape(start, mut buf) => match c {
                '[' | ']' => {
                    buf.push(c);
                    LexState::Set(start, buf)
                }
                // a plain backslash, the char is read as usual.
                '\\' => {
                    buf.push('\\');
                    LexState::SetEscape(start, buf)
                }
                c => {
                    buf.push('\\');
                    buf.push(c);
                    LexState::Set(start, buf)
                }
            },
        };
    }

    match state {
        LexState::Default => Ok(tokens),
        LexState::Escape => Err(MaskError::definition(last_pos, "unterminated escape")),
        LexState::Quoted(_) | LexState::QuotedEscape(_) => {
            Err(MaskError::definition(last_pos, "unterminated quote"))
        }
        LexState::Repeater(start, _) => {
            Err(MaskError::definition(start, "unterminated repeater"))
        }
        LexState::Set(start, _) | LexState::SetEscape(start, _) => {
            Err(MaskError::definition(start, "unterminated char set"))
        }
    }
}

/// Tokenize the pattern and resolve repeaters and case modifiers.
pub fn compile(pattern: &str) -> Result<TokenizedMask, MaskError> {
    let raw = lex_pos(pattern)?;

    let mut tokens = Vec::<MaskToken>::with_capacity(raw.len());
    let mut pending = Vec::<CaseDirection>::new();
    // last token of the raw stream, to check the repeaters.
    let mut last: Option<&MaskToken> = None;

    for (pos, token) in raw.iter() {
        let pos = *pos;
        match token {
            MaskToken::Repeater(n) => {
                match last {
                    None => {
                        return Err(MaskError::definition(pos, "repeater without token"));
                    }
                    Some(MaskToken::CaseModifier(_)) => {
                        return Err(MaskError::definition(
                            pos,
                            "repeater after case modifier",
                        ));
                    }
                    Some(MaskToken::RightToLeft) if *n > 1 => {
                        return Err(MaskError::definition(pos, "'!' can only occur once"));
                    }
                    Some(MaskToken::CharClass { kind, .. }) if kind.is_single() && *n > 1 => {
                        return Err(MaskError::definition(
                            pos,
                            format!("{:?} can only occur once", kind.symbol()),
                        ));
                    }
                    Some(_) => {}
                }
                // copies keep the case of the resolved token.
                if let Some(prev) = tokens.last().cloned() {
                    for _ in 1..*n {
                        tokens.push(prev.clone());
                    }
                }
            }
            MaskToken::CaseModifier(direction) => {
                pending.push(*direction);
            }
            token => {
                let mut token = token.clone();
                if !pending.is_empty() && token.is_text() {
                    let direction = pending.remove(0);
                    token.set_case(direction);
                }
                tokens.push(token);
            }
        }
        if !matches!(token, MaskToken::Repeater(_)) {
            last = Some(token);
        }
    }

    if !pending.is_empty() {
        warn!("case modifier at the end of mask {:?} is ignored", pattern);
    }

    let mut num_markers = 0;
    let mut date_markers = 0;
    let mut text_markers = 0;
    for token in &tokens {
        match token.mask_type() {
            Some(MaskType::Numeric) => num_markers += 1,
            Some(MaskType::Date) => date_markers += 1,
            Some(MaskType::Text) => text_markers += 1,
            None => {}
        }
    }

    let rtl_pos = match tokens.iter().position(|v| *v == MaskToken::RightToLeft) {
        Some(pos) => {
            tokens.remove(pos);
            pos as upos_type
        }
        None => 0,
    };

    let mask_type = if text_markers > 0 || (num_markers > 0 && date_markers > 0) {
        MaskType::Text
    } else if num_markers > 0 {
        MaskType::Numeric
    } else {
        MaskType::Date
    };

    Ok(TokenizedMask {
        tokens,
        mask_type,
        rtl_pos,
    })
}
