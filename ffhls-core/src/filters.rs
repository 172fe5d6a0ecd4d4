//! Filter stages contributing tokens to an ffmpeg command.
//!
//! Every stage has a priority. A [`FilterChain`] applies its stages in
//! ascending priority order; stages sharing a priority keep the order in
//! which they were added.

use crate::format::Format;
use std::fmt;
use std::rc::Rc;

/// Priority of stages that do not ask for one.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Priority of the stage carrying a format's extra parameters.
pub const FORMAT_PARAMS_PRIORITY: i32 = 10;

/// A unit of command tokens.
pub trait Filter: fmt::Debug {
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Tokens this stage adds for the given output format.
    fn apply(&self, format: &dyn Format) -> Vec<String>;
}

// ============================================================================
// FILTER IMPLEMENTATIONS
// ============================================================================

/// Appends a fixed list of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleFilter {
    params: Vec<String>,
    priority: i32,
}

impl SimpleFilter {
    #[must_use]
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_priority(params, DEFAULT_PRIORITY)
    }

    #[must_use]
    pub fn with_priority<I, S>(params: I, priority: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            priority,
        }
    }
}

impl Filter for SimpleFilter {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn apply(&self, _format: &dyn Format) -> Vec<String> {
        self.params.clone()
    }
}

/// Resamples the audio to a new rate (`-ar`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleFilter {
    rate: u32,
    priority: i32,
}

impl ResampleFilter {
    #[must_use]
    pub fn new(rate: u32) -> Self {
        Self {
            rate,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Moves the filter to another position in the chain.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn rate(&self) -> u32 {
        self.rate
    }
}

impl Filter for ResampleFilter {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn apply(&self, _format: &dyn Format) -> Vec<String> {
        vec!["-ar".to_string(), self.rate.to_string()]
    }
}

/// A raw audio filter graph passed through `-af`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFilter {
    filter: String,
    priority: i32,
}

impl CustomFilter {
    #[must_use]
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            priority: DEFAULT_PRIORITY,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Filter for CustomFilter {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn apply(&self, _format: &dyn Format) -> Vec<String> {
        vec!["-af".to_string(), self.filter.clone()]
    }
}

/// Writes container metadata (`-metadata key=value`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    entries: Vec<(String, String)>,
}

impl MetadataFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }
}

impl Filter for MetadataFilter {
    fn apply(&self, _format: &dyn Format) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(k, v)| ["-metadata".to_string(), format!("{k}={v}")])
            .collect()
    }
}

// ============================================================================
// FILTER CHAIN
// ============================================================================

/// Ordered collection of filter stages.
///
/// Cloning is cheap: stages are shared, so a chain can be copied per export
/// and extended without touching the original.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Rc<dyn Filter>>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Rc::new(filter));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Stages in application order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Filter> {
        let mut ordered: Vec<&dyn Filter> = self.filters.iter().map(|f| f.as_ref()).collect();
        ordered.sort_by_key(|f| f.priority());
        ordered.into_iter()
    }

    /// Applies every stage in order and concatenates their tokens.
    #[must_use]
    pub fn apply(&self, format: &dyn Format) -> Vec<String> {
        self.iter().flat_map(|f| f.apply(format)).collect()
    }
}
