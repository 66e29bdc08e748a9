//!
//! Compiles mask patterns and caches the result.
//!
//! ```
//! use rat_mask::MaskCompiler;
//!
//! let compiler = MaskCompiler::new();
//! let mask = compiler.compile("m/d/y").expect("valid mask");
//!
//! let mut session = mask.new_session();
//! session.begin_edit("").expect("empty value");
//! session.insert_text("1225").expect("valid input");
//! assert_eq!(session.display(), "12/25/__");
//! assert_eq!(session.cursor(), 6);
//! ```
//!

use crate::_private::NonExhaustive;
use crate::input_token::{InputToken, build_input_tokens};
use crate::lexicon::Lexicon;
use crate::mask_edit::EditSession;
use crate::mask_token::{MaskToken, MaskType};
use crate::scanner::{ScanResult, scan};
use crate::tokenizer::compile;
use crate::validate::Validator;
use crate::{MaskError, upos_type};
use format_num_pattern::{CurrencySym, NumberSymbols};
use log::debug;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

/// Configuration for the compiled masks.
#[derive(Debug, Clone)]
pub struct MaskConfig {
    /// Display of an empty slot.
    pub placeholder: char,
    /// Decimal and grouping separator. Default is `.` and `,`.
    pub symbols: Option<NumberSymbols>,

    pub non_exhaustive: NonExhaustive,
}

/// Flags that change the compiled mask.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskFlags {
    /// Overrides the inferred mask type.
    pub mask_type: Option<MaskType>,
}

/// A compiled mask.
///
/// Immutable after construction.
#[derive(Debug)]
pub struct CompiledMask {
    pattern: String,
    mask_type: MaskType,
    rtl_pos: upos_type,
    placeholder: char,
    mask_tokens: Vec<MaskToken>,
    empty_display: Vec<String>,
    lexicon: Lexicon,
    validator: Validator,
}

/// Compiles mask patterns.
///
/// Keeps a cache of all compiled masks, keyed by pattern and flags.
#[derive(Debug, Default)]
pub struct MaskCompiler {
    config: MaskConfig,
    cache: Mutex<FxHashMap<(String, MaskFlags), Arc<CompiledMask>>>,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            placeholder: '_',
            symbols: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl MaskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder char.
    pub fn with_placeholder(mut self, placeholder: char) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Number symbols for the separators.
    pub fn with_symbols(mut self, sym: NumberSymbols) -> Self {
        self.symbols = Some(sym);
        self
    }

    /// Number symbols or the defaults.
    pub fn symbols(&self) -> NumberSymbols {
        match &self.symbols {
            Some(sym) => sym.clone(),
            None => NumberSymbols {
                decimal_sep: '.',
                decimal_grp: Some(','),
                negative_sym: '-',
                positive_sym: ' ',
                exponent_upper_sym: 'E',
                exponent_lower_sym: 'e',
                currency_sym: CurrencySym::new("$"),
            },
        }
    }
}

impl MaskFlags {
    /// Override the mask type.
    pub fn with_mask_type(mut self, mask_type: MaskType) -> Self {
        self.mask_type = Some(mask_type);
        self
    }
}

impl MaskCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// New compiler with a config.
    pub fn with_config(config: MaskConfig) -> Self {
        Self {
            config,
            cache: Default::default(),
        }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Compile with default flags.
    pub fn compile(&self, pattern: &str) -> Result<Arc<CompiledMask>, MaskError> {
        self.compile_with(pattern, MaskFlags::default())
    }

    /// Compile a pattern or return the cached mask.
    ///
    /// Invalid patterns are not cached.
    pub fn compile_with(
        &self,
        pattern: &str,
        flags: MaskFlags,
    ) -> Result<Arc<CompiledMask>, MaskError> {
        // the lock is held while compiling, so each mask is built once.
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        let key = (pattern.to_string(), flags);
        if let Some(mask) = cache.get(&key) {
            debug!("mask cache hit {:?}", pattern);
            return Ok(Arc::clone(mask));
        }

        debug!("mask cache miss {:?}", pattern);
        let mask = Arc::new(CompiledMask::new(pattern, flags, &self.config)?);
        debug!(
            "compiled {:?}: {} slots, {} states",
            pattern,
            mask.tokens().len(),
            mask.lexicon().len()
        );
        cache.insert(key, Arc::clone(&mask));
        Ok(mask)
    }

    /// Number of cached masks.
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached masks.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl CompiledMask {
    /// Compile without any caching.
    pub fn new(pattern: &str, flags: MaskFlags, config: &MaskConfig) -> Result<Self, MaskError> {
        let tokenized = compile(pattern)?;
        let (tokens, empty_display) =
            build_input_tokens(&tokenized.tokens, config.placeholder, &config.symbols());
        let validator = Validator::new(&tokens);
        let lexicon = Lexicon::build(tokens);

        Ok(Self {
            pattern: pattern.to_string(),
            mask_type: flags.mask_type.unwrap_or(tokenized.mask_type),
            rtl_pos: tokenized.rtl_pos,
            placeholder: config.placeholder,
            mask_tokens: tokenized.tokens,
            empty_display,
            lexicon,
            validator,
        })
    }

    /// Start a new edit session.
    pub fn new_session(self: &Arc<Self>) -> EditSession {
        EditSession::new(Arc::clone(self))
    }

    /// Mask pattern as given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mask_type(&self) -> MaskType {
        self.mask_type
    }

    /// Position of the right-to-left marker.
    pub fn rtl_pos(&self) -> upos_type {
        self.rtl_pos
    }

    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    /// Expanded mask tokens.
    pub fn mask_tokens(&self) -> &[MaskToken] {
        &self.mask_tokens
    }

    /// Slots.
    pub fn tokens(&self) -> &[InputToken] {
        self.lexicon.tokens()
    }

    /// Empty display per slot.
    pub fn empty_display(&self) -> &[String] {
        &self.empty_display
    }

    /// Display of the empty mask.
    pub fn empty_text(&self) -> String {
        self.empty_display.concat()
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Scan a text.
    pub fn scan(&self, text: &str) -> Result<ScanResult, MaskError> {
        scan(&self.lexicon, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_poisoned_cache() {
        let compiler = Arc::new(MaskCompiler::new());
        compiler.compile("m/d/y").expect("ok");

        let c = Arc::clone(&compiler);
        let r = thread::spawn(move || {
            let _guard = c.cache.lock().expect("lock");
            panic!("poison");
        })
        .join();
        assert!(r.is_err());
        assert!(compiler.cache.is_poisoned());

        assert_eq!(compiler.len(), 1);
        compiler.compile("00").expect("ok");
        assert_eq!(compiler.len(), 2);
        compiler.clear();
        assert!(compiler.is_empty());
    }
}
