use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use drift::state::user::User as UserAccount;
use log::warn;
use parking_lot::Mutex;
use solana_sdk::pubkey::Pubkey;
use tokio::time::{self, Duration};

use crate::accounts::{AccountDecoder, AccountProvider};
use crate::types::SdkResult;

use super::DlobProvider;

/// Compact counterpart to `UserMap`: rather than hydrating a full
/// `UserAccount` per user, it decodes only the order-bearing slice of the
/// account (the `decoder` passed in is expected to zero everything else),
/// synthesizing a minimal shell good enough for `DLOB::build_from_accounts`
/// to read orders from. Trades staleness of non-order fields (authority
/// aside) for a much smaller per-tick payload -- useful when the process
/// only cares about the book, not full account state.
pub struct OrderSubscriber<T: AccountProvider> {
    account_provider: T,
    decoder: AccountDecoder<UserAccount>,
    accounts: Arc<DashMap<Pubkey, UserAccount>>,
    tracked: Arc<Mutex<Vec<Pubkey>>>,
    polling_frequency: Duration,
    running: Arc<AtomicBool>,
}

impl<T: AccountProvider> Clone for OrderSubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            account_provider: self.account_provider.clone(),
            decoder: self.decoder,
            accounts: self.accounts.clone(),
            tracked: self.tracked.clone(),
            polling_frequency: self.polling_frequency,
            running: self.running.clone(),
        }
    }
}

impl<T: AccountProvider> OrderSubscriber<T> {
    pub fn new(
        account_provider: T,
        decoder: AccountDecoder<UserAccount>,
        initial_pubkeys: Vec<Pubkey>,
        polling_frequency: Duration,
    ) -> Self {
        Self {
            account_provider,
            decoder,
            accounts: Arc::new(DashMap::new()),
            tracked: Arc::new(Mutex::new(initial_pubkeys)),
            polling_frequency,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn add_pubkey(&self, pubkey: Pubkey) {
        self.tracked.lock().push(pubkey);
    }

    async fn poll_once(&self) -> SdkResult<()> {
        let pubkeys = self.tracked.lock().clone();
        if pubkeys.is_empty() {
            return Ok(());
        }

        let results = self.account_provider.get_multiple_accounts(&pubkeys).await?;
        for (pubkey, result) in pubkeys.iter().zip(results) {
            let Some(data_and_slot) = result else {
                self.delete(pubkey);
                continue;
            };
            match (self.decoder)(&data_and_slot.data) {
                Ok(user) => {
                    self.accounts.insert(*pubkey, user);
                }
                Err(e) => warn!("failed to decode order shell for {pubkey}: {e}"),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<T: AccountProvider> DlobProvider for OrderSubscriber<T> {
    async fn subscribe(&self) -> SdkResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.poll_once().await?;

        let subscriber = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(subscriber.polling_frequency);
            while subscriber.running.load(Ordering::SeqCst) {
                interval.tick().await;
                if let Err(e) = subscriber.poll_once().await {
                    warn!("order subscriber poll failed: {e}");
                }
            }
        });

        Ok(())
    }

    fn size(&self) -> usize {
        self.accounts.len()
    }

    fn get_user_account(&self, pubkey: &Pubkey) -> Option<UserAccount> {
        self.accounts.get(pubkey).map(|entry| *entry.value())
    }

    fn get_unique_authorities(&self) -> Vec<Pubkey> {
        let mut authorities: Vec<_> = self
            .accounts
            .iter()
            .map(|entry| entry.value().authority)
            .collect();
        authorities.sort();
        authorities.dedup();
        authorities
    }

    fn user_accounts(&self) -> Vec<(Pubkey, UserAccount)> {
        self.accounts
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    fn delete(&self, pubkey: &Pubkey) {
        self.accounts.remove(pubkey);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataAndSlot;

    #[derive(Clone)]
    struct ToggleProvider {
        present: Arc<AtomicBool>,
    }

    #[async_trait]
    impl AccountProvider for ToggleProvider {
        async fn get_account(&self, _pubkey: &Pubkey) -> SdkResult<DataAndSlot<Vec<u8>>> {
            Err(crate::types::SdkError::InvalidAccount)
        }

        async fn get_multiple_accounts(&self, pubkeys: &[Pubkey]) -> SdkResult<Vec<Option<DataAndSlot<Vec<u8>>>>> {
            if self.present.load(Ordering::SeqCst) {
                Ok(pubkeys.iter().map(|_| Some(DataAndSlot { slot: 1, data: vec![] })).collect())
            } else {
                Ok(vec![None; pubkeys.len()])
            }
        }
    }

    fn decode(_data: &[u8]) -> SdkResult<UserAccount> {
        Ok(UserAccount::default())
    }

    #[tokio::test]
    async fn a_pubkey_absent_from_a_later_poll_is_pruned() {
        let present = Arc::new(AtomicBool::new(true));
        let provider = ToggleProvider { present: present.clone() };
        let pubkey = Pubkey::new_unique();

        let subscriber = OrderSubscriber::new(provider, decode, vec![pubkey], Duration::from_secs(1));
        subscriber.poll_once().await.unwrap();
        assert_eq!(subscriber.size(), 1);

        present.store(false, Ordering::SeqCst);
        subscriber.poll_once().await.unwrap();
        assert_eq!(subscriber.size(), 0);
    }
}
