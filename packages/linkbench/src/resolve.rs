//! Single-slot resolution cache for endpoint key lookups.
//!
//! Link dumps exhibit strong run-length locality: consecutive edges very
//! frequently share their source key (all outgoing links of a page are
//! contiguous in the input). A depth-1 memo of the last resolved
//! (key, handle) pair per endpoint role therefore eliminates most key
//! index queries at negligible memory cost. Locality does not extend
//! beyond one step, so a deeper cache buys nothing.
//!
//! This is a performance optimization only; resolution falls back to the
//! backend index on every miss and correctness never depends on a hit.

/// Memo of the most recently resolved (key, handle) pair for one
/// endpoint role.
#[derive(Debug, Clone, Default)]
pub struct EndpointSlot<H> {
    entry: Option<(String, H)>,
}

impl<H: Clone + PartialEq> EndpointSlot<H> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Handle for `key` if it was the last key resolved through this slot.
    pub fn hit(&self, key: &str) -> Option<H> {
        match &self.entry {
            Some((k, h)) if k == key => Some(h.clone()),
            _ => None,
        }
    }

    /// Replace the slot content with the latest resolution.
    pub fn store(&mut self, key: &str, handle: H) {
        match &mut self.entry {
            // Reuse the existing String allocation where possible.
            Some((k, h)) => {
                k.clear();
                k.push_str(key);
                *h = handle;
            }
            None => self.entry = Some((key.to_string(), handle)),
        }
    }
}

/// Two independent slots, one per endpoint role. Invariant: a populated
/// slot always refers to a live vertex for its key (keys and handles are
/// never invalidated within a run).
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache<H> {
    pub from: EndpointSlot<H>,
    pub to: EndpointSlot<H>,
}

impl<H: Clone + PartialEq> ResolutionCache<H> {
    pub fn new() -> Self {
        Self {
            from: EndpointSlot::new(),
            to: EndpointSlot::new(),
        }
    }
}
