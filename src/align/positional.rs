use std::collections::{BTreeMap, BTreeSet};

use crate::{
    align::{matcher::TokenMatcher, OrderAssignment},
    stream::WordToken,
};

/// Match overlay tokens, in order, to base tokens.
///
/// Each overlay token takes the first unconsumed base token after the last match that `matcher`
/// accepts, so matched base indices strictly increase and a repeated word matches its next
/// occurrence. Returns, per overlay token, the 0-based index of its base token.
pub fn match_positional<M: TokenMatcher + ?Sized>(
    base: &[WordToken],
    overlay: &[WordToken],
    matcher: &M,
) -> Vec<Option<usize>> {
    let mut floor = 0;
    overlay
        .iter()
        .map(|token| {
            let found = (floor..base.len()).find(|idx| matcher.matches(&base[*idx], token));
            if let Some(idx) = found {
                floor = idx + 1;
            }
            found
        })
        .collect()
}

/// Order assignments for both streams given the matches from [match_positional].
pub fn positional_orders(
    base_len: usize,
    matches: &[Option<usize>],
) -> (Vec<OrderAssignment>, Vec<OrderAssignment>) {
    let base = base_orders(base_len, matches);
    let overlay = overlay_orders(&base, matches);
    (base, overlay)
}

fn base_orders(base_len: usize, matches: &[Option<usize>]) -> Vec<OrderAssignment> {
    let matched: BTreeSet<usize> = matches.iter().flatten().copied().collect();
    let claimed: BTreeSet<u32> = matched.iter().map(|idx| position(*idx)).collect();

    let mut word_order = OrderAssignment::UNSET;
    let mut secondary = 1;
    (0..base_len)
        .map(|idx| {
            if matched.contains(&idx) {
                word_order = position(idx);
                secondary = 1;
            } else if claimed.contains(&(word_order + 1)) {
                secondary += 1;
            } else if word_order == OrderAssignment::UNSET {
                secondary += 1;
            } else {
                word_order += 1;
                secondary = 1;
            }
            OrderAssignment::new(word_order, secondary)
        })
        .collect()
}

fn overlay_orders(base: &[OrderAssignment], matches: &[Option<usize>]) -> Vec<OrderAssignment> {
    let mut max_base_secondary: BTreeMap<u32, u32> = BTreeMap::new();
    for order in base {
        let slot = max_base_secondary.entry(order.word_order).or_default();
        *slot = (*slot).max(order.secondary_word_order);
    }

    let mut previous: Option<OrderAssignment> = None;
    let mut orders = Vec::with_capacity(matches.len());
    for (idx, matched) in matches.iter().enumerate() {
        let order = match matched {
            Some(base_idx) => base[*base_idx],
            None => {
                let floor = previous.map(|p| p.word_order).unwrap_or(OrderAssignment::UNSET);
                let ceiling = matches[idx + 1..]
                    .iter()
                    .flatten()
                    .next()
                    .map(|base_idx| base[*base_idx].word_order.saturating_sub(1));
                let mut word_order = position(idx).max(floor);
                if let Some(ceiling) = ceiling {
                    word_order = word_order.min(ceiling.max(floor));
                }
                let after_base = max_base_secondary.get(&word_order).copied().unwrap_or(0);
                let after_previous = previous
                    .filter(|p| p.word_order == word_order)
                    .map(|p| p.secondary_word_order)
                    .unwrap_or(0);
                OrderAssignment::new(word_order, after_base.max(after_previous) + 1)
            }
        };
        previous = Some(order);
        orders.push(order);
    }
    orders
}

fn position(idx: usize) -> u32 {
    u32::try_from(idx + 1).unwrap_or(u32::MAX)
}
