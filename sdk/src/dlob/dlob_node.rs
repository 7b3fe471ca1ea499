use drift::state::{oracle::OraclePriceData, user::Order};
use solana_sdk::pubkey::Pubkey;

use crate::math::order::get_limit_price;

/// Identifies which per-market list an order belongs to, matching the
/// classification `get_node_subtype_and_type` assigns at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    RestingLimit,
    FloatingLimit,
    TakingLimit,
    Market,
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubType {
    Bid,
    Ask,
    Above,
    Below,
}

/// Unique handle for an order: no two live orders share a (user, orderId) pair.
pub type OrderSignature = (Pubkey, u32);

pub fn get_order_signature(order_id: u32, user_account: Pubkey) -> OrderSignature {
    (user_account, order_id)
}

/// A single order resting somewhere in the book, paired with the account
/// that owns it. `Order` is a plain-old-data on-chain struct, so nodes are
/// cheap to copy rather than reference-count.
#[derive(Debug, Clone, Copy)]
pub struct OrderNode {
    order: Order,
    user_account: Pubkey,
}

pub trait DLOBNode {
    fn get_order(&self) -> &Order;
    fn get_user_account(&self) -> Pubkey;
    fn get_signature(&self) -> OrderSignature;
    /// Effective price used for book ordering: resolves auctions, oracle
    /// offsets and static limit prices through `math::order::get_limit_price`.
    fn get_price(&self, oracle_price_data: &OraclePriceData, slot: u64) -> u64;
}

impl OrderNode {
    pub fn new(order: Order, user_account: Pubkey) -> Self {
        Self {
            order,
            user_account,
        }
    }
}

impl DLOBNode for OrderNode {
    fn get_order(&self) -> &Order {
        &self.order
    }

    fn get_user_account(&self) -> Pubkey {
        self.user_account
    }

    fn get_signature(&self) -> OrderSignature {
        get_order_signature(self.order.order_id, self.user_account)
    }

    fn get_price(&self, oracle_price_data: &OraclePriceData, slot: u64) -> u64 {
        get_limit_price(&self.order, oracle_price_data, slot, Some(0)).unwrap_or(0)
    }
}

pub fn create_node(order: Order, user_account: Pubkey) -> OrderNode {
    OrderNode::new(order, user_account)
}

/// Wraps an `OrderNode` for insertion into a `BinaryHeap`, ordering by the
/// spec's tie-break rule: ascending slot, then ascending order id. `BinaryHeap`
/// is a max-heap, so `Ord` is inverted here to make the earliest-submitted
/// order compare greatest and pop first.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalNode {
    pub node: OrderNode,
}

impl DirectionalNode {
    pub fn new(node: OrderNode) -> Self {
        Self { node }
    }

    fn sort_key(&self) -> (u64, u32) {
        (self.node.order.slot, self.node.order.order_id)
    }
}

impl PartialEq for DirectionalNode {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for DirectionalNode {}

impl PartialOrd for DirectionalNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DirectionalNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.sort_key().cmp(&self.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn node(order_id: u32, slot: u64) -> DirectionalNode {
        DirectionalNode::new(OrderNode::new(
            Order {
                order_id,
                slot,
                ..Default::default()
            },
            Pubkey::new_unique(),
        ))
    }

    #[test]
    fn pops_in_ascending_slot_then_order_id() {
        let mut heap = BinaryHeap::new();
        heap.push(node(3, 5));
        heap.push(node(1, 1));
        heap.push(node(2, 1));

        assert_eq!(heap.pop().unwrap().node.get_order().order_id, 1);
        assert_eq!(heap.pop().unwrap().node.get_order().order_id, 2);
        assert_eq!(heap.pop().unwrap().node.get_order().order_id, 3);
    }
}
