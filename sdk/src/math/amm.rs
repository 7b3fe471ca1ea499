use drift::{
    math::constants::BID_ASK_SPREAD_PRECISION,
    state::{oracle::OraclePriceData, perp_market::AMM},
};
use drift::controller::position::PositionDirection;

use crate::types::SdkResult;

/// Applies the AMM's quoted long/short spread to its constant-product
/// reserves, returning `(base_asset_reserve, quote_asset_reserve, sqrt_k,
/// peg_multiplier)` ready for `drift::math::amm::calculate_price`.
///
/// This is a simplified, repeg-unaware version of the on-chain spread
/// calculation: it widens the quote side of the curve by the spread
/// fraction rather than running the full oracle-budget repeg. Good enough
/// for a read-only top-of-book estimate; a filler bot computing actual fill
/// economics would need the real repeg-aware version.
pub fn calculate_updated_amm_spread_reserves(
    amm: &AMM,
    direction: PositionDirection,
    _oracle_price_data: &OraclePriceData,
) -> SdkResult<(u128, u128, u128, u128)> {
    let spread = match direction {
        PositionDirection::Long => amm.long_spread,
        PositionDirection::Short => amm.short_spread,
    } as u128;

    let quote_asset_reserve = match direction {
        PositionDirection::Long => {
            amm.quote_asset_reserve + amm.quote_asset_reserve * spread / BID_ASK_SPREAD_PRECISION as u128
        }
        PositionDirection::Short => {
            amm.quote_asset_reserve - amm.quote_asset_reserve * spread / BID_ASK_SPREAD_PRECISION as u128
        }
    };

    Ok((
        amm.base_asset_reserve,
        quote_asset_reserve,
        amm.sqrt_k,
        amm.peg_multiplier,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_amm() -> AMM {
        AMM {
            base_asset_reserve: 1_000_000_000,
            quote_asset_reserve: 1_000_000_000,
            sqrt_k: 1_000_000_000,
            peg_multiplier: 22_000_000,
            long_spread: 500,
            short_spread: 500,
            ..Default::default()
        }
    }

    #[test]
    fn long_spread_widens_quote_reserve_short_narrows() {
        let amm = base_amm();
        let oracle = OraclePriceData::default();

        let (_, long_quote, _, _) =
            calculate_updated_amm_spread_reserves(&amm, PositionDirection::Long, &oracle).unwrap();
        let (_, short_quote, _, _) =
            calculate_updated_amm_spread_reserves(&amm, PositionDirection::Short, &oracle).unwrap();

        assert!(long_quote > amm.quote_asset_reserve);
        assert!(short_quote < amm.quote_asset_reserve);
    }
}
