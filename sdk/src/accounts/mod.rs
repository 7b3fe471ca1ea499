use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::types::{DataAndSlot, SdkResult};

/// The account-stream contract. Concrete wire fetch and decode live outside
/// this crate; everything here is generic over this trait so the DLOB
/// engine never talks to an RPC endpoint directly (see the `oracle` and
/// `usermap` modules for concrete consumers).
#[async_trait]
pub trait AccountProvider: Send + Sync + Clone + 'static {
    async fn get_account(&self, pubkey: &Pubkey) -> SdkResult<DataAndSlot<Vec<u8>>>;
    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> SdkResult<Vec<Option<DataAndSlot<Vec<u8>>>>>;
}

/// Decodes a raw account buffer into a typed value. Kept as a plain
/// function pointer (not a trait) since decode logic is stateless and
/// swappable per account type.
pub type AccountDecoder<T> = fn(&[u8]) -> SdkResult<T>;
