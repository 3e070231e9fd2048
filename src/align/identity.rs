use crate::{
    align::{matcher::TokenMatcher, OrderAssignment, VerseAlignment},
    stream::WordToken,
};

/// Walks both sequences with a shared order counter.
struct Cursors<'s, M: ?Sized> {
    seq_a: &'s [WordToken],
    seq_b: &'s [WordToken],
    matcher: &'s M,
    max_lookahead: Option<usize>,
    cursor_a: usize,
    cursor_b: usize,
    order: u32,
    orders_a: Vec<OrderAssignment>,
    orders_b: Vec<OrderAssignment>,
    matches: Vec<Option<usize>>,
}

impl<'s, M: TokenMatcher + ?Sized> Cursors<'s, M> {
    fn hit(&self, a: usize, b: usize) -> bool {
        self.matcher.matches(&self.seq_a[a], &self.seq_b[b])
    }

    fn window_end(&self, cursor: usize, len: usize) -> usize {
        match self.max_lookahead {
            Some(limit) => len.min(cursor.saturating_add(limit).saturating_add(1)),
            None => len,
        }
    }

    /// Distance from `cursor_a` to the first A token that hits `B[cursor_b]`.
    fn ahead_in_a(&self) -> Option<usize> {
        let end = self.window_end(self.cursor_a, self.seq_a.len());
        (self.cursor_a..end)
            .find(|a| self.hit(*a, self.cursor_b))
            .map(|a| a - self.cursor_a)
    }

    /// Distance from `cursor_b` to the first B token that hits `A[cursor_a]`.
    fn ahead_in_b(&self) -> Option<usize> {
        let end = self.window_end(self.cursor_b, self.seq_b.len());
        (self.cursor_b..end)
            .find(|b| self.hit(self.cursor_a, *b))
            .map(|b| b - self.cursor_b)
    }

    fn next_order(&mut self) -> OrderAssignment {
        let assignment = OrderAssignment::new(self.order, 1);
        self.order += 1;
        assignment
    }

    fn flush_a(&mut self, count: usize) {
        for _ in 0..count {
            let order = self.next_order();
            self.orders_a.push(order);
            self.cursor_a += 1;
        }
    }

    fn flush_b(&mut self, count: usize) {
        for _ in 0..count {
            let order = self.next_order();
            self.orders_b.push(order);
            self.matches.push(None);
            self.cursor_b += 1;
        }
    }

    fn pair(&mut self) {
        let order = self.next_order();
        self.orders_a.push(order);
        self.orders_b.push(order);
        self.matches.push(Some(self.cursor_a));
        self.cursor_a += 1;
        self.cursor_b += 1;
    }

    fn run(&mut self) {
        while self.cursor_a < self.seq_a.len() && self.cursor_b < self.seq_b.len() {
            let before = (self.cursor_a, self.cursor_b);
            if self.hit(self.cursor_a, self.cursor_b) {
                self.pair();
            } else {
                match (self.ahead_in_a(), self.ahead_in_b()) {
                    (Some(in_a), Some(in_b)) if in_b < in_a => self.flush_b(in_b),
                    (None, Some(in_b)) => self.flush_b(in_b),
                    // equal distances resolve toward A
                    (Some(in_a), _) => self.flush_a(in_a),
                    (None, None) => self.flush_a(1),
                }
            }
            assert_ne!(
                before,
                (self.cursor_a, self.cursor_b),
                "identity alignment made no progress at A[{}], B[{}]",
                before.0,
                before.1
            );
        }
        let rest_a = self.seq_a.len() - self.cursor_a;
        self.flush_a(rest_a);
        let rest_b = self.seq_b.len() - self.cursor_b;
        self.flush_b(rest_b);
    }
}

/// Align two editions of one verse by lexical identity.
///
/// Direct hits share an order value. On a miss, both sequences are searched ahead for a resync
/// point: the side whose hit is strictly closer has its skipped tokens flushed as insertions, with
/// ties going to A; with no hit on either side `A[cursor_a]` alone is flushed. Every token of
/// both sequences receives exactly one order value, strictly increasing within each sequence.
///
/// # Panics
///
/// If an iteration advances neither cursor.
pub fn match_by_identity<M: TokenMatcher + ?Sized>(
    seq_a: &[WordToken],
    seq_b: &[WordToken],
    matcher: &M,
    max_lookahead: Option<usize>,
) -> VerseAlignment {
    let mut cursors = Cursors {
        seq_a,
        seq_b,
        matcher,
        max_lookahead,
        cursor_a: 0,
        cursor_b: 0,
        order: 1,
        orders_a: Vec::with_capacity(seq_a.len()),
        orders_b: Vec::with_capacity(seq_b.len()),
        matches: Vec::with_capacity(seq_b.len()),
    };
    cursors.run();
    VerseAlignment {
        base: cursors.orders_a,
        overlay: cursors.orders_b,
        matches: cursors.matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        align::IdentityMatcher,
        stream::{Edition, VerseRef},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Misses the first comparison and hits every later one.
    #[derive(Default)]
    struct HitsAfterFirstCall {
        calls: AtomicUsize,
    }

    impl TokenMatcher for HitsAfterFirstCall {
        fn matches(&self, _base: &WordToken, _overlay: &WordToken) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst) > 0
        }
    }

    fn seq(edition: Edition, ids: &[u32]) -> Vec<WordToken> {
        ids.iter()
            .enumerate()
            .map(|(idx, id)| {
                WordToken::new(edition, VerseRef::new("MAT", 1, 1), idx + 1, format!("w{id}"))
                    .with_lex_ids([*id])
            })
            .collect()
    }

    fn orders(orders: &[OrderAssignment]) -> Vec<u32> {
        orders.iter().map(|o| o.word_order).collect()
    }

    #[test]
    fn test_missing_word_in_b() {
        let a = seq(Edition::Base, &[10, 20, 30]);
        let b = seq(Edition::Overlay, &[10, 30]);
        let aligned = match_by_identity(&a, &b, &IdentityMatcher, None);
        assert_eq!(orders(&aligned.base), vec![1, 2, 3]);
        assert_eq!(orders(&aligned.overlay), vec![1, 3]);
        assert_eq!(aligned.matches, vec![Some(0), Some(2)]);
    }

    #[test]
    fn test_extra_word_in_b() {
        let a = seq(Edition::Base, &[10, 30]);
        let b = seq(Edition::Overlay, &[10, 20, 30]);
        let aligned = match_by_identity(&a, &b, &IdentityMatcher, None);
        assert_eq!(orders(&aligned.base), vec![1, 3]);
        assert_eq!(orders(&aligned.overlay), vec![1, 2, 3]);
        assert_eq!(aligned.matches, vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn test_equal_lookahead_flushes_a() {
        // A: 1 2 ; B: 2 1 -> both lookaheads are at distance 1
        let a = seq(Edition::Base, &[1, 2]);
        let b = seq(Edition::Overlay, &[2, 1]);
        let aligned = match_by_identity(&a, &b, &IdentityMatcher, None);
        assert_eq!(orders(&aligned.base), vec![1, 2]);
        assert_eq!(orders(&aligned.overlay), vec![2, 3]);
        assert_eq!(aligned.matches, vec![Some(1), None]);
    }

    #[test]
    fn test_no_hits_flushes_a_then_rest_of_b() {
        let a = seq(Edition::Base, &[1, 2]);
        let b = seq(Edition::Overlay, &[7, 8, 9]);
        let aligned = match_by_identity(&a, &b, &IdentityMatcher, None);
        assert_eq!(orders(&aligned.base), vec![1, 2]);
        assert_eq!(orders(&aligned.overlay), vec![3, 4, 5]);
        assert!(aligned.matches.iter().all(Option::is_none));
    }

    #[test]
    fn test_lookahead_bound() {
        let a = seq(Edition::Base, &[5, 6, 7, 8]);
        let b = seq(Edition::Overlay, &[8]);
        let unbounded = match_by_identity(&a, &b, &IdentityMatcher, None);
        assert_eq!(orders(&unbounded.overlay), vec![4]);

        let bounded = match_by_identity(&a, &b, &IdentityMatcher, Some(1));
        assert_eq!(orders(&bounded.base), vec![1, 2, 3, 4]);
        assert_eq!(orders(&bounded.overlay), vec![4]);
    }

    #[test]
    fn test_empty_sides() {
        let a = seq(Edition::Base, &[1, 2]);
        let aligned = match_by_identity(&a, &[], &IdentityMatcher, None);
        assert_eq!(orders(&aligned.base), vec![1, 2]);
        assert!(aligned.overlay.is_empty());
        let aligned = match_by_identity(&[], &a, &IdentityMatcher, None);
        assert_eq!(orders(&aligned.overlay), vec![1, 2]);
        assert_eq!(aligned.matches, vec![None, None]);
    }

    #[test]
    #[should_panic(expected = "identity alignment made no progress at A[0], B[0]")]
    fn test_inconsistent_matcher_is_fatal() {
        let a = seq(Edition::Base, &[10, 20]);
        let b = seq(Edition::Overlay, &[10, 20]);
        match_by_identity(&a, &b, &HitsAfterFirstCall::default(), None);
    }
}
