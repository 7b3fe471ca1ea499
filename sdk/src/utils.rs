use anchor_lang::AccountDeserialize;

use crate::types::{SdkError, SdkResult};

/// Decodes an already-fetched raw account buffer into a typed anchor
/// account. This is what `AccountDecoder` callbacks (`usermap`, `oracle`,
/// `dlob::market_provider`) are built from.
pub fn decode_account_bytes<T: AccountDeserialize>(data: &[u8]) -> SdkResult<T> {
    T::try_deserialize(&mut &data[..]).map_err(|_| SdkError::Deserializing)
}
