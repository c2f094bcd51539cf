//! Resolver configuration.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_INHERITANCE_DEPTH, DEFAULT_SCOPE_NAMES,
};

/// Knobs shared by every resolver.
///
/// Owned by the host. Replacing it advances the host's generation, since
/// every cached answer may depend on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Depth bound of the transitive unit walk.
    pub max_depth: usize,
    /// Depth bound of ancestor walks, on top of cycle detection.
    pub max_inheritance_depth: usize,
    /// Unit scope names that may be dropped from a unit reference
    /// (`Vcl.Forms` is reachable as `Forms` when `Vcl` is listed).
    pub scope_names: Arc<[SmolStr]>,
    /// Whether unit lookups may fall back to library search paths.
    pub use_search_path: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_inheritance_depth: DEFAULT_MAX_INHERITANCE_DEPTH,
            scope_names: DEFAULT_SCOPE_NAMES.iter().copied().map(SmolStr::new).collect(),
            use_search_path: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }

    /// Replace the scope name list.
    pub fn with_scope_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scope_names = names.into_iter().map(|n| SmolStr::new(n.as_ref())).collect();
        self
    }

    pub fn with_search_path(mut self, enabled: bool) -> Self {
        self.use_search_path = enabled;
        self
    }
}
