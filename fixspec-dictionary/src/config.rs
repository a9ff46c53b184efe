/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Compiler configuration.

use crate::sequence::MAX_TAG_BOUND;
use tracing::warn;

/// Configuration for compiling one dictionary version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Size of each tag sequence table. `None` sizes it from the largest
    /// tag used by any message or group member list.
    pub tag_bound: Option<u32>,
    /// Whether a member that resolves to nothing is fatal.
    pub strict_references: bool,
}

impl CompilerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tag_bound: None,
            strict_references: true,
        }
    }

    /// Creates a configuration that keeps unresolved members as placeholders.
    #[must_use]
    pub fn lenient() -> Self {
        Self::new().with_strict_references(false)
    }

    /// Sets a fixed tag sequence table size.
    #[must_use]
    pub fn with_tag_bound(mut self, bound: u32) -> Self {
        self.tag_bound = Some(bound);
        self
    }

    /// Sets whether unresolved members are fatal.
    #[must_use]
    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    /// Returns the table size to use when the largest tag placed in any
    /// member list is `max_used_tag`.
    ///
    /// The result never exceeds [`MAX_TAG_BOUND`]; tags past it are left
    /// out of the tables.
    #[must_use]
    pub fn resolve_tag_bound(&self, max_used_tag: u32) -> u32 {
        let bound = self
            .tag_bound
            .unwrap_or_else(|| max_used_tag.saturating_add(1));
        if bound > MAX_TAG_BOUND {
            warn!(bound, max = MAX_TAG_BOUND, "tag bound clamped");
            return MAX_TAG_BOUND;
        }
        bound
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new()
    }
}
