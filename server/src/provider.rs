use async_trait::async_trait;
use dlob_sdk::types::SdkResult;
use dlob_sdk::usermap::{DlobProvider, OrderSubscriber, UserMap};
use drift::state::user::User as UserAccount;
use solana_sdk::pubkey::Pubkey;

use crate::rpc_provider::RpcAccountProvider;

/// The two `DlobProvider` variants the operator picks between at startup
/// via `USE_ORDER_SUBSCRIBER`: a full user-account map, or the compact
/// order-only stream. A single enum rather than a trait object so this can
/// still satisfy `Clone` (`BookBuilder` requires it) -- a statically typed
/// stand-in for the two concrete implementations of one interface.
#[derive(Clone)]
pub enum AccountStreamProvider {
    UserMap(UserMap<RpcAccountProvider>),
    OrderSubscriber(OrderSubscriber<RpcAccountProvider>),
}

#[async_trait]
impl DlobProvider for AccountStreamProvider {
    async fn subscribe(&self) -> SdkResult<()> {
        match self {
            Self::UserMap(provider) => provider.subscribe().await,
            Self::OrderSubscriber(provider) => provider.subscribe().await,
        }
    }

    fn size(&self) -> usize {
        match self {
            Self::UserMap(provider) => provider.size(),
            Self::OrderSubscriber(provider) => provider.size(),
        }
    }

    fn get_user_account(&self, pubkey: &Pubkey) -> Option<UserAccount> {
        match self {
            Self::UserMap(provider) => provider.get_user_account(pubkey),
            Self::OrderSubscriber(provider) => provider.get_user_account(pubkey),
        }
    }

    fn get_unique_authorities(&self) -> Vec<Pubkey> {
        match self {
            Self::UserMap(provider) => provider.get_unique_authorities(),
            Self::OrderSubscriber(provider) => provider.get_unique_authorities(),
        }
    }

    fn user_accounts(&self) -> Vec<(Pubkey, UserAccount)> {
        match self {
            Self::UserMap(provider) => provider.user_accounts(),
            Self::OrderSubscriber(provider) => provider.user_accounts(),
        }
    }

    fn delete(&self, pubkey: &Pubkey) {
        match self {
            Self::UserMap(provider) => provider.delete(pubkey),
            Self::OrderSubscriber(provider) => provider.delete(pubkey),
        }
    }
}
