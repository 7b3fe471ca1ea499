use std::collections::BinaryHeap;

use super::dlob_node::{DLOBNode, DirectionalNode, OrderNode, OrderSignature};

/// One side-pair of order queues for a single node classification
/// (resting limit, floating limit, taking limit, market, or trigger) within
/// one market. Bids and asks are independent heaps; ordering within each
/// heap is the insertion tie-break only (ascending slot, ascending order
/// id) -- price ordering across the combined resting book is applied
/// afterwards by the caller, since floating-limit prices move with the
/// oracle and can't be baked into heap order at insert time.
#[derive(Debug, Clone, Default)]
pub struct Orderlist {
    pub bids: BinaryHeap<DirectionalNode>,
    pub asks: BinaryHeap<DirectionalNode>,
}

impl Orderlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_bid(&mut self, node: OrderNode) {
        self.bids.push(DirectionalNode::new(node));
    }

    pub fn insert_ask(&mut self, node: OrderNode) {
        self.asks.push(DirectionalNode::new(node));
    }

    pub fn bids_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn asks_empty(&self) -> bool {
        self.asks.is_empty()
    }

    pub fn get_best_bid(&mut self) -> Option<OrderNode> {
        self.bids.pop().map(|d| d.node)
    }

    pub fn get_best_ask(&mut self) -> Option<OrderNode> {
        self.asks.pop().map(|d| d.node)
    }

    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn get_node(&self, signature: &OrderSignature) -> Option<OrderNode> {
        self.bids
            .iter()
            .map(|d| &d.node)
            .chain(self.asks.iter().map(|d| &d.node))
            .find(|node| &node.get_signature() == signature)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift::state::user::Order;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn best_bid_pops_earliest_slot_first() {
        let mut list = Orderlist::new();
        let user = Pubkey::new_unique();
        list.insert_bid(OrderNode::new(
            Order {
                order_id: 2,
                slot: 5,
                ..Default::default()
            },
            user,
        ));
        list.insert_bid(OrderNode::new(
            Order {
                order_id: 1,
                slot: 1,
                ..Default::default()
            },
            user,
        ));

        assert_eq!(list.get_best_bid().unwrap().get_order().order_id, 1);
        assert_eq!(list.get_best_bid().unwrap().get_order().order_id, 2);
        assert!(list.bids_empty());
    }
}
