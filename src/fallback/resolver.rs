use tracing::debug;
use url::Url;

/// Where a fallback chain stands, from the consuming widget's point of
/// view. `Loaded` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Loaded,
    Failed,
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadPhase::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadPhase::Failed)
    }
}

/// Result of advancing a chain past a failed candidate.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance<'a> {
    /// Try this URL next
    Next(&'a str),
    /// Nothing left to attempt: the chain is terminal. Check
    /// `FallbackChain::phase` to tell a failed chain (render the
    /// placeholder/error state) from one that already loaded.
    Exhausted,
}

/// Builds candidate URL lists for a resource reference that may be
/// hosted at several locations.
///
/// A bare filename like `cert.png` is expanded against each configured
/// base path in order; the placeholder asset is always the last resort.
/// An already-absolute URL is trusted as the primary candidate.
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    base_paths: Vec<String>,
    placeholder: String,
}

impl FallbackResolver {
    pub fn new(base_paths: Vec<String>, placeholder: impl Into<String>) -> Self {
        Self {
            base_paths,
            placeholder: placeholder.into(),
        }
    }

    /// Expand `reference` into the ordered candidate list.
    ///
    /// Pure: the same reference always yields the same sequence.
    pub fn build_candidates(&self, reference: &str) -> Vec<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return vec![self.placeholder.clone()];
        }

        // An absolute URL names its own location; only the placeholder
        // backs it up.
        if Url::parse(reference).is_ok() {
            return vec![reference.to_string(), self.placeholder.clone()];
        }

        let mut candidates: Vec<String> = self
            .base_paths
            .iter()
            .map(|base| join_path(base, reference))
            .collect();
        candidates.push(self.placeholder.clone());
        candidates
    }

    /// Start a fresh chain for `reference`, positioned on the first
    /// candidate. A changed reference always gets a new chain.
    pub fn chain(&self, reference: &str) -> FallbackChain {
        let chain = FallbackChain::new(self.build_candidates(reference));
        debug!(
            reference = reference,
            candidates = chain.len(),
            "fallback chain created"
        );
        chain
    }
}

fn join_path(base: &str, reference: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

/// Ordered sequence of candidate URLs with a forward-only cursor.
///
/// The consumer renders `current()` and calls `advance` exactly once per
/// observed load failure. Calling it twice for one failure would skip a
/// candidate, so it must be gated behind the real failure signal.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    candidates: Vec<String>,
    cursor: usize,
    phase: LoadPhase,
}

impl FallbackChain {
    pub fn new(candidates: Vec<String>) -> Self {
        let phase = if candidates.is_empty() {
            LoadPhase::Failed
        } else {
            LoadPhase::Loading
        };
        Self {
            candidates,
            cursor: 0,
            phase,
        }
    }

    /// The URL currently being attempted, if the chain is still live.
    pub fn current(&self) -> Option<&str> {
        if self.phase.is_loading() {
            self.candidates.get(self.cursor).map(String::as_str)
        } else {
            None
        }
    }

    /// Record that the current candidate failed to load and move to the
    /// next one. Once every candidate has failed, the chain is
    /// terminally `Failed` and keeps answering `Exhausted`. A stray
    /// failure signal on an already `Loaded` chain is ignored the same
    /// way: `Exhausted` comes back but the phase stays `Loaded`.
    pub fn advance(&mut self) -> Advance<'_> {
        if !self.phase.is_loading() {
            return Advance::Exhausted;
        }
        self.cursor += 1;
        if self.cursor < self.candidates.len() {
            Advance::Next(&self.candidates[self.cursor])
        } else {
            self.cursor = self.candidates.len();
            self.phase = LoadPhase::Failed;
            Advance::Exhausted
        }
    }

    /// Record that the current candidate loaded successfully.
    pub fn mark_loaded(&mut self) {
        if self.phase.is_loading() {
            self.phase = LoadPhase::Loaded;
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase.is_failed()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FallbackResolver {
        FallbackResolver::new(
            vec![
                "https://cdn.example.com/uploads".to_string(),
                "/images".to_string(),
            ],
            "/images/placeholder.png",
        )
    }

    #[test]
    fn test_empty_reference_yields_placeholder_only() {
        let candidates = resolver().build_candidates("");
        assert_eq!(candidates, vec!["/images/placeholder.png"]);
    }

    #[test]
    fn test_absolute_url_is_primary_candidate() {
        let candidates = resolver().build_candidates("https://x/y.png");
        assert_eq!(
            candidates,
            vec!["https://x/y.png", "/images/placeholder.png"]
        );
    }

    #[test]
    fn test_bare_reference_expands_against_base_paths() {
        let candidates = resolver().build_candidates("photo.jpg");
        assert_eq!(
            candidates,
            vec![
                "https://cdn.example.com/uploads/photo.jpg",
                "/images/photo.jpg",
                "/images/placeholder.png",
            ]
        );
        // One candidate per base path, plus the placeholder
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_build_candidates_is_deterministic() {
        let r = resolver();
        assert_eq!(r.build_candidates("cert.png"), r.build_candidates("cert.png"));
    }

    #[test]
    fn test_slashes_are_normalized_when_joining() {
        let r = FallbackResolver::new(
            vec!["https://cdn.example.com/uploads/".to_string()],
            "/placeholder.png",
        );
        let candidates = r.build_candidates("/logo.svg");
        assert_eq!(candidates[0], "https://cdn.example.com/uploads/logo.svg");
    }

    #[test]
    fn test_chain_advances_through_all_candidates() {
        let mut chain = resolver().chain("cert.png");
        assert_eq!(chain.current(), Some("https://cdn.example.com/uploads/cert.png"));

        assert_eq!(chain.advance(), Advance::Next("/images/cert.png"));
        assert_eq!(chain.advance(), Advance::Next("/images/placeholder.png"));
        assert_eq!(chain.advance(), Advance::Exhausted);
        assert!(chain.is_exhausted());
        assert_eq!(chain.current(), None);
    }

    #[test]
    fn test_exhausted_chain_stays_exhausted() {
        let mut chain = FallbackChain::new(vec!["a".into(), "b".into()]);
        chain.advance();
        assert_eq!(chain.advance(), Advance::Exhausted);
        assert_eq!(chain.advance(), Advance::Exhausted);
        // The cursor clamps at candidates.len()
        assert_eq!(chain.cursor(), 2);
    }

    #[test]
    fn test_loaded_is_terminal() {
        let mut chain = resolver().chain("https://x/y.png");
        chain.mark_loaded();
        assert!(chain.phase().is_loaded());
        assert_eq!(chain.current(), None);
        // A stray failure signal after success does not restart loading
        assert_eq!(chain.advance(), Advance::Exhausted);
        assert!(chain.phase().is_loaded());
    }

    #[test]
    fn test_new_reference_starts_fresh_chain() {
        let r = resolver();
        let mut first = r.chain("a.png");
        first.advance();
        let second = r.chain("b.png");
        assert_eq!(second.cursor(), 0);
        assert!(second.phase().is_loading());
    }

    #[test]
    fn test_empty_candidate_list_is_immediately_failed() {
        let mut chain = FallbackChain::new(Vec::new());
        assert!(chain.is_exhausted());
        assert_eq!(chain.current(), None);
        assert_eq!(chain.advance(), Advance::Exhausted);
    }

    #[test]
    fn test_single_candidate_chain_exhausts_on_first_failure() {
        // An empty reference produces just the placeholder; if even that
        // fails to load the chain is done.
        let mut chain = resolver().chain("");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.advance(), Advance::Exhausted);
    }
}
