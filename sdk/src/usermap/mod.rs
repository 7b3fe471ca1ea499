pub mod order_subscriber;
pub mod user_map;
pub mod user_stats_map;

pub use order_subscriber::OrderSubscriber;
pub use user_map::UserMap;
pub use user_stats_map::UserStatsIndex;

use async_trait::async_trait;
use drift::state::user::User as UserAccount;
use solana_sdk::pubkey::Pubkey;

use crate::types::SdkResult;

/// Source of truth for the set of user accounts the book builder reads
/// orders from. `UserMap` (full account map) and `OrderSubscriber` (compact
/// order-only stream) are the two concrete variants; `DLOB::build_from_accounts`
/// is generic over either via this trait.
#[async_trait]
pub trait DlobProvider: Send + Sync {
    async fn subscribe(&self) -> SdkResult<()>;
    fn size(&self) -> usize;
    fn get_user_account(&self, pubkey: &Pubkey) -> Option<UserAccount>;
    fn get_unique_authorities(&self) -> Vec<Pubkey>;
    /// Snapshot of every tracked `(pubkey, account)` pair, consumed by
    /// `DLOB::build_from_accounts` once per tick.
    fn user_accounts(&self) -> Vec<(Pubkey, UserAccount)>;
    /// Removes a previously-tracked account. A closed account never reappears
    /// in a `get_multiple_accounts` response, so providers call this once
    /// a tracked pubkey stops resolving rather than leaving its last-known
    /// orders in the book forever.
    fn delete(&self, pubkey: &Pubkey);
}
