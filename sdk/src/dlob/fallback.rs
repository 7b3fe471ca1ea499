use super::order_book_levels::{L2Level, L2OrderBookGenerator};

/// Mirrors a restartable, lazy `(price, size)` sequence from an external
/// venue (Phoenix or Serum). The actual websocket/account subscription that
/// keeps this snapshot current is out of scope here (spec treats it as a
/// contract, see `AccountProvider`); this type only holds whatever the
/// latest subscription delivered and downgrades gracefully to an empty book
/// side if nothing has arrived yet, rather than failing the tick.
#[derive(Debug, Clone, Default)]
pub struct ExternalL2Generator {
    label: &'static str,
    bids: Vec<L2Level>,
    asks: Vec<L2Level>,
}

impl ExternalL2Generator {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Replaces the cached snapshot; called by the (not-yet-implemented)
    /// venue subscriber whenever it receives a fresh depth update.
    pub fn update(&mut self, bids: Vec<L2Level>, asks: Vec<L2Level>) {
        self.bids = bids;
        self.asks = asks;
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl L2OrderBookGenerator for ExternalL2Generator {
    fn get_l2_bids(&mut self) -> Box<dyn Iterator<Item = L2Level> + Send + '_> {
        Box::new(self.bids.iter().cloned())
    }

    fn get_l2_asks(&mut self) -> Box<dyn Iterator<Item = L2Level> + Send + '_> {
        Box::new(self.asks.iter().cloned())
    }
}

pub fn phoenix_generator() -> ExternalL2Generator {
    ExternalL2Generator::new("phoenix")
}

pub fn serum_generator() -> ExternalL2Generator {
    ExternalL2Generator::new("serum")
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::order_book_levels::LiquiditySource;

    #[test]
    fn empty_until_a_snapshot_is_pushed() {
        let mut generator = phoenix_generator();
        assert_eq!(generator.get_l2_bids().count(), 0);

        generator.update(vec![L2Level::new(100, 1, LiquiditySource::Phoenix)], vec![]);
        assert_eq!(generator.get_l2_bids().count(), 1);
    }
}
