use async_trait::async_trait;

use crate::usermap::DlobProvider;

use super::dlob::DLOB;
use super::types::DlobSource;

/// Bridges a `DlobProvider` (the `UserMap`/`OrderSubscriber` account stream)
/// into the `DlobSource` contract `DLOBSubscriber` depends on: each tick,
/// rebuilds the book wholesale from whatever the provider currently has
/// tracked, at the slot `DLOBSubscriber` supplies.
#[derive(Clone)]
pub struct BookBuilder<P: DlobProvider + Clone> {
    provider: P,
}

impl<P: DlobProvider + Clone> BookBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: DlobProvider + Clone + Send + Sync> DlobSource for BookBuilder<P> {
    async fn get_dlob(&self, slot: u64) -> DLOB {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let mut dlob = DLOB::new();
        dlob.build_from_accounts(self.provider.user_accounts(), slot, now);
        dlob
    }
}
