use drift::controller::position::PositionDirection;
use drift::state::{oracle::OraclePriceData, perp_market::PerpMarket};

use crate::math::market::{calculate_ask_price, calculate_bid_price};
use crate::types::SdkResult;

use super::order_book_levels::{L2Level, L2OrderBookGenerator, LiquiditySource};

/// Synthesizes a ladder of synthetic liquidity levels from a perp market's
/// constant-product AMM curve, standing in for the on-chain vAMM as a
/// fallback liquidity source when the resting limit book runs dry.
///
/// This is read-only depth estimation, not a fill-economics engine: each
/// level's price steps outward from the spread-adjusted top of book by a
/// fixed basis-point increment, and its size is sized to the corresponding
/// `top_of_book_quote_amounts` notional (falling back to the last supplied
/// amount once that list is exhausted).
pub struct VammL2Generator {
    bids: Vec<L2Level>,
    asks: Vec<L2Level>,
}

const LEVEL_STEP_BPS: u64 = 5;

impl VammL2Generator {
    pub fn new(
        market: &PerpMarket,
        oracle_price_data: &OraclePriceData,
        num_orders: usize,
        _now: Option<u64>,
        top_of_book_quote_amounts: Option<Vec<u64>>,
    ) -> SdkResult<Self> {
        let quote_amounts = top_of_book_quote_amounts
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| super::order_book_levels::DEFAULT_TOP_OF_BOOK_QUOTE_AMOUNTS.to_vec());

        let bid_price = calculate_bid_price(market, oracle_price_data)?;
        let ask_price = calculate_ask_price(market, oracle_price_data)?;

        Ok(Self {
            bids: generate_side(bid_price, Side::Bid, num_orders, &quote_amounts),
            asks: generate_side(ask_price, Side::Ask, num_orders, &quote_amounts),
        })
    }
}

enum Side {
    Bid,
    Ask,
}

fn generate_side(
    top_price: u64,
    side: Side,
    num_orders: usize,
    quote_amounts: &[u64],
) -> Vec<L2Level> {
    let mut levels = Vec::with_capacity(num_orders);
    let last_amount = *quote_amounts.last().unwrap_or(&1_000_000_000);

    for i in 0..num_orders {
        let step = top_price.saturating_mul(LEVEL_STEP_BPS * (i as u64 + 1)) / 10_000;
        let price = match side {
            Side::Bid => top_price.saturating_sub(step),
            Side::Ask => top_price.saturating_add(step),
        };

        let quote_amount = quote_amounts.get(i).copied().unwrap_or(last_amount);
        let size = quote_amount / price.max(1);

        levels.push(L2Level::new(price, size, LiquiditySource::Vamm));
    }

    levels
}

impl L2OrderBookGenerator for VammL2Generator {
    fn get_l2_bids(&mut self) -> Box<dyn Iterator<Item = L2Level> + Send + '_> {
        Box::new(self.bids.iter().cloned())
    }

    fn get_l2_asks(&mut self) -> Box<dyn Iterator<Item = L2Level> + Send + '_> {
        Box::new(self.asks.iter().cloned())
    }
}

/// Direction used purely to select which side of the spread to read from
/// the AMM curve; unrelated to an order's own `PositionDirection`.
impl From<Side> for PositionDirection {
    fn from(side: Side) -> Self {
        match side {
            Side::Bid => PositionDirection::Short,
            Side::Ask => PositionDirection::Long,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_market() -> PerpMarket {
        let mut market = PerpMarket::default();
        market.amm.base_asset_reserve = 1_000_000_000_000;
        market.amm.quote_asset_reserve = 1_000_000_000_000;
        market.amm.sqrt_k = 1_000_000_000_000;
        market.amm.peg_multiplier = 22_000_000;
        market.amm.long_spread = 500;
        market.amm.short_spread = 500;
        market
    }

    #[test]
    fn ladder_widens_away_from_top_of_book() {
        let market = base_market();
        let oracle = OraclePriceData {
            price: 22_000_000,
            ..Default::default()
        };

        let mut generator = VammL2Generator::new(&market, &oracle, 3, None, None).unwrap();
        let asks: Vec<_> = generator.get_l2_asks().collect();
        assert_eq!(asks.len(), 3);
        assert!(asks[0].price < asks[1].price);
        assert!(asks[1].price < asks[2].price);

        let bids: Vec<_> = generator.get_l2_bids().collect();
        assert!(bids[0].price > bids[1].price);
    }
}
