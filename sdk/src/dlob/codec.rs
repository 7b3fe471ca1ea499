use borsh::BorshSerialize;
use drift::state::user::Order;
use solana_sdk::pubkey::Pubkey;

/// Binary representation served by `/orders/idl` and `/orders/idlWithSlot`.
///
/// Serializes the actual on-chain `Order` struct via the `BorshSerialize`
/// impl it already derives (it's an Anchor account field, so its borsh
/// layout is the program's own), paired with the user account pubkey that
/// owns it. This is the program's real IDL layout, not a hand-picked subset
/// of fields.
#[derive(Debug, Clone, BorshSerialize)]
pub struct IdlOrder {
    pub maker: Pubkey,
    pub order: Order,
}

#[derive(Debug, Clone, BorshSerialize)]
pub struct IdlOrderBook {
    pub bids: Vec<IdlOrder>,
    pub asks: Vec<IdlOrder>,
}

#[derive(Debug, Clone, BorshSerialize)]
pub struct IdlOrderBookWithSlot {
    pub slot: u64,
    pub book: IdlOrderBook,
}

fn to_idl_order((maker, order): &(Pubkey, Order)) -> IdlOrder {
    IdlOrder { maker: *maker, order: *order }
}

pub fn encode_orders(bids: &[(Pubkey, Order)], asks: &[(Pubkey, Order)]) -> std::io::Result<Vec<u8>> {
    let book = IdlOrderBook {
        bids: bids.iter().map(to_idl_order).collect(),
        asks: asks.iter().map(to_idl_order).collect(),
    };
    borsh::to_vec(&book)
}

pub fn encode_orders_with_slot(
    slot: u64,
    bids: &[(Pubkey, Order)],
    asks: &[(Pubkey, Order)],
) -> std::io::Result<Vec<u8>> {
    let book = IdlOrderBookWithSlot {
        slot,
        book: IdlOrderBook {
            bids: bids.iter().map(to_idl_order).collect(),
            asks: asks.iter().map(to_idl_order).collect(),
        },
    };
    borsh::to_vec(&book)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_error_and_is_nonempty() {
        let maker = Pubkey::new_unique();
        let order = Order { order_id: 1, price: 100, base_asset_amount: 5, ..Default::default() };
        let bids = vec![(maker, order)];
        let bytes = encode_orders(&bids, &[]).unwrap();
        assert!(!bytes.is_empty());

        let with_slot = encode_orders_with_slot(42, &bids, &[]).unwrap();
        assert!(with_slot.len() > bytes.len());
    }
}
