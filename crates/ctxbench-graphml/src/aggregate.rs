//! Symbol frequency aggregation across GraphML documents
//!
//! A [`SymbolAggregator`] folds the node symbols of many documents into one
//! [`SymbolCount`]. Files that do not qualify (wrong extension, pattern
//! mismatch, unreadable, malformed) are skipped with a recorded reason and
//! never stop the batch.

use crate::error::GraphmlError;
use crate::extract::extract_symbols;
use indexmap::IndexMap;

/// Symbol → number of nodes carrying it, first seen first
pub type SymbolCount = IndexMap<String, u64>;

/// File selection for one aggregation batch
///
/// A file qualifies when its name ends in `.graphml` and contains the
/// pattern as a substring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilePattern {
    pattern: String,
}

impl FilePattern {
    /// Required file extension
    pub const EXTENSION: &'static str = ".graphml";

    /// Select `.graphml` files whose name contains `pattern`
    #[inline]
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Select every `.graphml` file
    #[inline]
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// The substring pattern
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Check a file name against extension and pattern
    ///
    /// # Errors
    /// Returns the [`SkipReason`] if the file does not qualify.
    pub fn check(&self, file_name: &str) -> Result<(), SkipReason> {
        if !file_name.ends_with(Self::EXTENSION) {
            return Err(SkipReason::NotGraphml);
        }
        if !file_name.contains(&self.pattern) {
            return Err(SkipReason::PatternMismatch(self.pattern.clone()));
        }
        Ok(())
    }
}

/// Why a file was left out of a batch
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    /// Wrong extension
    #[error("not a .graphml file")]
    NotGraphml,

    /// Name lacks the batch pattern
    #[error("does not match pattern '{0}'")]
    PatternMismatch(String),

    /// I/O failure reported by the caller
    #[error("could not be read: {0}")]
    Unreadable(String),

    /// Malformed document or broken key scheme
    #[error("{0}")]
    Invalid(#[from] GraphmlError),
}

/// A skipped file and the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    /// File name as given to the aggregator
    pub file: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Folds symbol occurrences of many documents into one count
#[derive(Debug, Clone, Default)]
pub struct SymbolAggregator {
    pattern: FilePattern,
    counts: SymbolCount,
    skipped: Vec<SkippedFile>,
    folded: usize,
}

impl SymbolAggregator {
    /// Start an empty batch for `pattern`
    #[inline]
    #[must_use]
    pub fn new(pattern: FilePattern) -> Self {
        Self {
            pattern,
            ..Self::default()
        }
    }

    /// Pattern of this batch
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &FilePattern {
        &self.pattern
    }

    /// Whether `file_name` qualifies for this batch
    ///
    /// A rejected file is recorded as skipped. Check this before reading a
    /// file's content.
    pub fn accepts(&mut self, file_name: &str) -> bool {
        match self.pattern.check(file_name) {
            Ok(()) => true,
            Err(reason) => {
                tracing::info!("Skipping file {}: {}", file_name, reason);
                self.skipped.push(SkippedFile {
                    file: file_name.to_string(),
                    reason,
                });
                false
            }
        }
    }

    /// Extract the symbols of one document and add them to the count
    ///
    /// Returns `false` (and records the file as skipped) if the document is
    /// malformed or breaks the key scheme; the count is unchanged then.
    pub fn fold_document(&mut self, file_name: &str, text: &str) -> bool {
        match extract_symbols(text) {
            Ok(symbols) => {
                tracing::debug!("Folding {} symbols from {}", symbols.len(), file_name);
                self.fold_symbols(symbols.values());
                self.folded += 1;
                true
            }
            Err(e) => {
                tracing::warn!("Skipping unusable GraphML file {}: {}", file_name, e);
                self.record_skip(file_name, SkipReason::Invalid(e));
                false
            }
        }
    }

    /// Filter, then fold one document
    pub fn ingest(&mut self, file_name: &str, text: &str) -> bool {
        self.accepts(file_name) && self.fold_document(file_name, text)
    }

    /// Count one occurrence for every symbol yielded
    pub fn fold_symbols<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for symbol in symbols {
            let symbol = symbol.as_ref();
            match self.counts.get_mut(symbol) {
                Some(count) => *count += 1,
                None => {
                    self.counts.insert(symbol.to_string(), 1);
                }
            }
        }
    }

    /// Record a file that was skipped for a reason found by the caller
    pub fn record_skip(&mut self, file_name: &str, reason: SkipReason) {
        self.skipped.push(SkippedFile {
            file: file_name.to_string(),
            reason,
        });
    }

    /// Counts so far
    #[inline]
    #[must_use]
    pub fn counts(&self) -> &SymbolCount {
        &self.counts
    }

    /// Counted symbols, first seen first
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.counts.keys().cloned().collect()
    }

    /// Files left out of the batch
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Number of documents folded into the count
    #[inline]
    #[must_use]
    pub fn documents_folded(&self) -> usize {
        self.folded
    }

    /// Finish the batch and take the counts
    #[inline]
    #[must_use]
    pub fn into_counts(self) -> SymbolCount {
        self.counts
    }
}
