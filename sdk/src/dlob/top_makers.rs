use std::collections::HashSet;

use solana_sdk::pubkey::Pubkey;

use super::order_book_levels::L3Level;

/// Resolves a maker's authority to its user-stats account, populated
/// lazily the first time a maker is looked up (mirrors the teacher's
/// `UserStatsMap`/`mustGet` idiom, see `usermap::user_stats_map`).
pub trait MakerStatsLookup {
    fn lookup(&self, maker_authority: &Pubkey) -> Option<Pubkey>;
}

#[derive(Debug, Clone)]
pub struct TopMaker {
    pub maker: Pubkey,
    pub user_stats: Option<Pubkey>,
}

/// Walks resting-limit levels in book order (best price first, as `levels`
/// is already sorted by the caller) and emits up to `limit` distinct maker
/// user accounts, first-seen order, deduped by pubkey. Not a size ranking:
/// a maker resting deep in the book but first to appear outranks one with
/// more total size further down.
pub fn top_makers(
    levels: &[L3Level],
    limit: usize,
    stats: Option<&dyn MakerStatsLookup>,
) -> Vec<TopMaker> {
    let mut seen: HashSet<Pubkey> = HashSet::new();
    let mut makers = Vec::new();

    for level in levels {
        if makers.len() >= limit {
            break;
        }
        if !seen.insert(level.maker) {
            continue;
        }
        makers.push(TopMaker {
            maker: level.maker,
            user_stats: stats.and_then(|s| s.lookup(&level.maker)),
        });
    }

    makers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_by_maker_in_book_order() {
        let maker_a = Pubkey::new_unique();
        let maker_b = Pubkey::new_unique();

        let levels = vec![
            L3Level { price: 1, size: 5, maker: maker_a, order_id: 1 },
            L3Level { price: 2, size: 3, maker: maker_a, order_id: 2 },
            L3Level { price: 3, size: 20, maker: maker_b, order_id: 3 },
        ];

        let top = top_makers(&levels, 10, None);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].maker, maker_a);
        assert_eq!(top[1].maker, maker_b);
    }

    #[test]
    fn respects_limit_even_with_distinct_makers_further_down() {
        let levels: Vec<_> = (0..5)
            .map(|i| L3Level {
                price: i,
                size: i as u64 + 1,
                maker: Pubkey::new_unique(),
                order_id: i as u32,
            })
            .collect();

        let top = top_makers(&levels, 2, None);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].maker, levels[0].maker);
        assert_eq!(top[1].maker, levels[1].maker);
    }

    #[test]
    fn a_large_maker_later_in_book_order_does_not_bump_an_earlier_one() {
        let maker_small_first = Pubkey::new_unique();
        let maker_large_second = Pubkey::new_unique();

        let levels = vec![
            L3Level { price: 1, size: 1, maker: maker_small_first, order_id: 1 },
            L3Level { price: 2, size: 1_000, maker: maker_large_second, order_id: 2 },
        ];

        let top = top_makers(&levels, 1, None);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].maker, maker_small_first);
    }
}
