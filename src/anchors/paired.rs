//! Paired keyword extraction
//!
//! Finds spans enclosed by configured open/close delimiter literals, e.g.
//! `《...》` or `<...>`, including spans nested inside other spans:
//!
//! ```text
//! <example text> containing 《some <keywords>》.
//! ^^^^^^^^^^^^^^            ^^^^^^^^^^^^^^^^^^  root spans
//!                                 ^^^^^^^^^^    child of 《some <keywords>》
//! ```
//!
//! The scan keeps a stack of open delimiters. A match that closes the pair
//! opened at the top of the stack pops it and yields a span; anything else is
//! pushed. Delimiters still on the stack at the end produce no span.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::config::DelimiterPair;
use crate::core::span::{Keyword, KeywordId, PairedKeyword, PairedKeywords};
use crate::core::util::is_blank;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ConfigError;

/// Stack-based matcher for nested delimiter pairs
#[derive(Debug, Clone)]
pub struct PairedKeywordExtractor {
    /// Opening literal -> accepted closing literals
    closers: HashMap<String, Vec<String>>,
    /// Alternation of every delimiter literal, longest first
    pattern: Regex,
}

/// Outcome of one scan, before diagnostics are reported
struct Scan<'t> {
    keywords: PairedKeywords,
    unresolved: Vec<(usize, &'t str)>,
}

impl PairedKeywordExtractor {
    /// Build an extractor from a non-empty set of delimiter pairs
    pub fn new<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<DelimiterPair>,
    {
        let mut closers: HashMap<String, Vec<String>> = HashMap::new();
        let mut literals: Vec<String> = Vec::new();

        for (index, pair) in pairs.into_iter().map(Into::into).enumerate() {
            if pair.open.is_empty() {
                return Err(ConfigError::EmptyDelimiter { index, side: "open" });
            }
            if pair.close.is_empty() {
                return Err(ConfigError::EmptyDelimiter {
                    index,
                    side: "close",
                });
            }
            literals.push(pair.open.clone());
            literals.push(pair.close.clone());
            let accepted = closers.entry(pair.open).or_default();
            if !accepted.contains(&pair.close) {
                accepted.push(pair.close);
            }
        }

        if closers.is_empty() {
            return Err(ConfigError::EmptyPairs);
        }

        // Longest literal first so "<<" wins over "<" at the same position.
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        literals.dedup();

        let alternation = literals
            .iter()
            .map(|literal| regex::escape(literal))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).map_err(|e| ConfigError::Pattern(e.to_string()))?;

        Ok(Self { closers, pattern })
    }

    /// Whether `open` followed by `close` forms a configured pair
    pub fn is_pair(&self, open: &str, close: &str) -> bool {
        self.closers
            .get(open)
            .is_some_and(|accepted| accepted.iter().any(|c| c == close))
    }

    /// Extract paired keywords, silently dropping unresolved delimiters
    pub fn extract(&self, text: &str) -> PairedKeywords {
        self.scan(text).keywords
    }

    /// Extract paired keywords and report unresolved delimiters to `sink`
    pub fn extract_with(&self, text: &str, sink: &mut dyn DiagnosticSink) -> PairedKeywords {
        let scan = self.scan(text);
        for (offset, literal) in scan.unresolved {
            sink.report(Diagnostic::UnresolvedDelimiter {
                offset,
                literal: literal.to_string(),
            });
        }
        scan.keywords
    }

    fn scan<'t>(&self, text: &'t str) -> Scan<'t> {
        if is_blank(text) {
            return Scan {
                keywords: PairedKeywords::default(),
                unresolved: Vec::new(),
            };
        }

        let mut stack: Vec<(usize, &'t str)> = Vec::new();
        // start offset -> (keyword, open len, close len)
        let mut spans: BTreeMap<usize, (Keyword, usize, usize)> = BTreeMap::new();
        // (child start, parent start), resolved once every span is known
        let mut pending: Vec<(usize, usize)> = Vec::new();

        for m in self.pattern.find_iter(text) {
            let current = m.as_str();
            match stack.last().copied() {
                Some((open_at, open)) if self.is_pair(open, current) => {
                    stack.pop();
                    let end = m.end();
                    spans.insert(
                        open_at,
                        (
                            Keyword::new(&text[open_at..end], open_at, end),
                            open.len(),
                            current.len(),
                        ),
                    );
                    // Either nested, or the enclosing half is missing.
                    if let Some(&(parent_at, _)) = stack.last() {
                        pending.push((open_at, parent_at));
                    }
                }
                _ => stack.push((m.start(), current)),
            }
        }

        let handles: HashMap<usize, KeywordId> = spans
            .keys()
            .enumerate()
            .map(|(i, start)| (*start, KeywordId(i)))
            .collect();
        let mut items: Vec<PairedKeyword> = spans
            .into_values()
            .map(|(keyword, open_len, close_len)| PairedKeyword::new(keyword, open_len, close_len))
            .collect();

        pending.sort_unstable();
        for (child_at, parent_at) in pending {
            if let (Some(&child), Some(&parent)) = (handles.get(&child_at), handles.get(&parent_at)) {
                items[child.0].parent = Some(parent);
                items[parent.0].children.push(child);
            }
        }

        Scan {
            keywords: PairedKeywords::from_sorted(items),
            unresolved: stack,
        }
    }
}
