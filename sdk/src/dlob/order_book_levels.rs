use std::ops::Sub;

use drift::state::oracle::OraclePriceData;
use solana_sdk::pubkey::Pubkey;

use super::dlob_node::{DLOBNode, OrderNode};

pub const DEFAULT_TOP_OF_BOOK_QUOTE_AMOUNTS: [u64; 4] =
    [500_000_000, 1_000_000_000, 2_000_000_000, 5_000_000_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiquiditySource {
    Dlob,
    Vamm,
    Phoenix,
    Serum,
}

#[derive(Debug, Clone)]
pub struct L2Level {
    pub price: u64,
    pub size: u64,
    pub sources: Vec<(LiquiditySource, u64)>,
}

impl L2Level {
    pub fn new(price: u64, size: u64, source: LiquiditySource) -> Self {
        Self {
            price,
            size,
            sources: vec![(source, size)],
        }
    }

    /// Adds to a source's contribution, summing into the existing entry
    /// for that source rather than appending a duplicate one.
    pub fn add_source(&mut self, source: LiquiditySource, size: u64) {
        match self.sources.iter_mut().find(|(s, _)| *s == source) {
            Some(entry) => entry.1 += size,
            None => self.sources.push((source, size)),
        }
    }

    fn merge(&mut self, other: L2Level) {
        self.size += other.size;
        for (source, size) in other.sources {
            self.add_source(source, size);
        }
    }
}

#[derive(Debug, Clone)]
pub struct L2OrderBook {
    pub asks: Vec<L2Level>,
    pub bids: Vec<L2Level>,
    pub slot: u64,
}

#[derive(Debug, Clone)]
pub struct L3Level {
    pub price: u64,
    pub size: u64,
    pub maker: Pubkey,
    pub order_id: u32,
}

#[derive(Debug, Clone)]
pub struct L3OrderBook {
    pub asks: Vec<L3Level>,
    pub bids: Vec<L3Level>,
    pub slot: u64,
}

/// A lazy source of `L2Level`s for one side of the book. The maker side
/// (resting DLOB orders) and every fallback venue (vAMM, Phoenix, Serum)
/// implement this so `DLOB::get_l2` can merge them uniformly.
pub trait L2OrderBookGenerator {
    fn get_l2_bids(&mut self) -> Box<dyn Iterator<Item = L2Level> + Send + '_>;
    fn get_l2_asks(&mut self) -> Box<dyn Iterator<Item = L2Level> + Send + '_>;
}

/// Converts resting DLOB nodes (already sorted best-first by the caller)
/// into a sequence of single-order `L2Level`s.
pub fn get_l2_generator_from_dlob_nodes(
    nodes: impl Iterator<Item = OrderNode> + 'static,
    oracle_price_data: OraclePriceData,
    slot: u64,
) -> impl Iterator<Item = L2Level> {
    nodes.map(move |node| {
        let price = node.get_price(&oracle_price_data, slot);
        let size = node
            .get_order()
            .base_asset_amount
            .sub(node.get_order().base_asset_amount_filled);
        L2Level::new(price, size, LiquiditySource::Dlob)
    })
}

/// K-way merges already-sorted level generators into a single best-first
/// sequence, using `is_better` to pick whichever head is nearer the top of
/// book (ascending for asks, descending for bids).
pub fn merge_l2_level_generators<F>(
    mut generators: Vec<Box<dyn Iterator<Item = L2Level>>>,
    is_better: F,
) -> impl Iterator<Item = L2Level>
where
    F: Fn(&L2Level, &L2Level) -> bool,
{
    let mut heads: Vec<Option<L2Level>> = generators.iter_mut().map(|g| g.next()).collect();

    std::iter::from_fn(move || {
        let mut best_idx: Option<usize> = None;
        for (idx, head) in heads.iter().enumerate() {
            if let Some(level) = head {
                match best_idx {
                    None => best_idx = Some(idx),
                    Some(current) => {
                        let current_level = heads[current].as_ref().unwrap();
                        if is_better(level, current_level) {
                            best_idx = Some(idx);
                        }
                    }
                }
            }
        }

        let idx = best_idx?;
        let level = heads[idx].take().unwrap();
        heads[idx] = generators[idx].next();
        Some(level)
    })
}

/// Collapses a best-first level stream into at most `depth` price levels,
/// combining consecutive entries that share a price into one level with
/// summed size and merged liquidity sources.
pub fn create_l2_levels(
    mut levels: impl Iterator<Item = L2Level>,
    depth: usize,
) -> Vec<L2Level> {
    let mut out: Vec<L2Level> = Vec::new();

    while let Some(level) = levels.next() {
        if let Some(last) = out.last_mut() {
            if last.price == level.price {
                last.merge(level);
                continue;
            }
        }
        if out.len() >= depth {
            break;
        }
        out.push(level);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_equal_price_levels_and_respects_depth() {
        let levels = vec![
            L2Level::new(100, 5, LiquiditySource::Dlob),
            L2Level::new(100, 3, LiquiditySource::Vamm),
            L2Level::new(101, 2, LiquiditySource::Dlob),
            L2Level::new(102, 1, LiquiditySource::Dlob),
        ];

        let out = create_l2_levels(levels.into_iter(), 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].price, 100);
        assert_eq!(out[0].sources.len(), 2);
        assert!(out[0].sources.contains(&(LiquiditySource::Dlob, 5)));
        assert!(out[0].sources.contains(&(LiquiditySource::Vamm, 3)));
        assert_eq!(out[0].size, 8);
        assert_eq!(out[1].price, 101);
    }

    #[test]
    fn merge_generators_picks_lower_price_for_asks() {
        let a: Box<dyn Iterator<Item = L2Level>> =
            Box::new(vec![L2Level::new(105, 1, LiquiditySource::Dlob)].into_iter());
        let b: Box<dyn Iterator<Item = L2Level>> =
            Box::new(vec![L2Level::new(100, 1, LiquiditySource::Vamm)].into_iter());

        let merged: Vec<_> = merge_l2_level_generators(vec![a, b], |x, y| x.price < y.price)
            .take(2)
            .collect();
        assert_eq!(merged[0].price, 100);
        assert_eq!(merged[1].price, 105);
    }
}
