use std::collections::BTreeMap;

use dlob_sdk::dlob::order_book_levels::L2Level;

/// Buckets L2 levels into price intervals of width `grouping`: bids round
/// down to the bucket floor, asks round up to the bucket ceiling. Sizes and
/// per-source contributions are summed within a bucket. Applying `depth`
/// to the result is the caller's job -- per the spec, depth is applied
/// *after* grouping, not before.
pub fn group_levels(levels: Vec<L2Level>, grouping: u64, round_up: bool) -> Vec<L2Level> {
    let grouping = grouping.max(1);
    let mut buckets: BTreeMap<u64, L2Level> = BTreeMap::new();

    for level in levels {
        let bucket_price = if round_up {
            (level.price + grouping - 1) / grouping * grouping
        } else {
            level.price / grouping * grouping
        };

        buckets
            .entry(bucket_price)
            .and_modify(|existing| {
                existing.size += level.size;
                for (source, size) in &level.sources {
                    existing.add_source(*source, *size);
                }
            })
            .or_insert_with(|| L2Level {
                price: bucket_price,
                size: level.size,
                sources: level.sources.clone(),
            });
    }

    let mut out: Vec<L2Level> = buckets.into_values().collect();
    if round_up {
        out.sort_by_key(|level| level.price);
    } else {
        out.sort_by(|a, b| b.price.cmp(&a.price));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlob_sdk::dlob::order_book_levels::LiquiditySource;

    #[test]
    fn asks_round_up_to_next_bucket() {
        let levels = vec![
            L2Level::new(101, 1, LiquiditySource::Dlob),
            L2Level::new(102, 1, LiquiditySource::Dlob),
            L2Level::new(103, 1, LiquiditySource::Dlob),
            L2Level::new(104, 1, LiquiditySource::Dlob),
        ];

        let grouped = group_levels(levels, 10, true);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].price, 110);
        assert_eq!(grouped[0].size, 4);
        assert_eq!(grouped[0].sources, vec![(LiquiditySource::Dlob, 4)]);
    }

    #[test]
    fn same_source_contributions_sum_instead_of_duplicating() {
        let levels = vec![
            L2Level::new(101, 2, LiquiditySource::Dlob),
            L2Level::new(102, 3, LiquiditySource::Vamm),
            L2Level::new(103, 5, LiquiditySource::Dlob),
        ];

        let grouped = group_levels(levels, 10, true);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].size, 10);
        assert_eq!(grouped[0].sources.len(), 2);
        assert!(grouped[0].sources.contains(&(LiquiditySource::Dlob, 7)));
        assert!(grouped[0].sources.contains(&(LiquiditySource::Vamm, 3)));
    }

    #[test]
    fn bids_round_down_and_sort_descending() {
        let levels = vec![
            L2Level::new(119, 1, LiquiditySource::Dlob),
            L2Level::new(101, 1, LiquiditySource::Dlob),
        ];

        let grouped = group_levels(levels, 10, false);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].price, 110);
        assert_eq!(grouped[1].price, 100);
    }
}
