use crate::stream::{normalize, std_poly_form, WordToken};

/// Decides whether a base token and an overlay token are the same word.
pub trait TokenMatcher: Sync {
    fn matches(&self, base: &WordToken, overlay: &WordToken) -> bool;
}

/// Compares surface forms ignoring case. Breathings and accents stay significant, so `ἡ` and `ἤ`
/// are different words; a grave counts as an acute and trailing punctuation is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceMatcher;

impl TokenMatcher for SurfaceMatcher {
    fn matches(&self, base: &WordToken, overlay: &WordToken) -> bool {
        let key = std_poly_form(&base.surface, false);
        !key.is_empty() && key == std_poly_form(&overlay.surface, false)
    }
}

/// Compares normalized forms, ignoring case and every diacritic. For editions whose accentuation
/// is missing or unreliable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedMatcher;

impl NormalizedMatcher {
    fn key(token: &WordToken) -> String {
        if token.normalized.is_empty() {
            normalize(&token.surface)
        } else {
            token.normalized.to_lowercase()
        }
    }
}

impl TokenMatcher for NormalizedMatcher {
    fn matches(&self, base: &WordToken, overlay: &WordToken) -> bool {
        let key = NormalizedMatcher::key(base);
        !key.is_empty() && key == NormalizedMatcher::key(overlay)
    }
}

/// Hits when the two tokens share a lexical reference number.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMatcher;

impl TokenMatcher for IdentityMatcher {
    fn matches(&self, base: &WordToken, overlay: &WordToken) -> bool {
        base.lex_ids.intersects(&overlay.lex_ids)
    }
}
