use std::sync::Arc;

use async_trait::async_trait;
use dlob_sdk::types::{DataAndSlot, SdkResult};
use dlob_sdk::AccountProvider;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

const GET_MULTIPLE_ACCOUNTS_CHUNK_SIZE: usize = 99;

/// Thin `AccountProvider` over `solana-client`'s non-blocking RPC client --
/// the same `getMultipleAccounts` batching `BulkAccountLoader` uses, wired
/// up so `UserMap`/`OrderSubscriber`/`OracleMap`/`MarketAccountMap` never
/// need to know the transport is RPC polling rather than a websocket push.
#[derive(Clone)]
pub struct RpcAccountProvider {
    client: Arc<RpcClient>,
}

impl RpcAccountProvider {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Arc::new(RpcClient::new(endpoint.to_string())),
        }
    }
}

#[async_trait]
impl AccountProvider for RpcAccountProvider {
    async fn get_account(&self, pubkey: &Pubkey) -> SdkResult<DataAndSlot<Vec<u8>>> {
        let response = self
            .client
            .get_multiple_accounts_with_commitment(&[*pubkey], CommitmentConfig::confirmed())
            .await?;
        let slot = response.context.slot;
        let data = response
            .value
            .into_iter()
            .next()
            .flatten()
            .map(|account| account.data)
            .unwrap_or_default();
        Ok(DataAndSlot { slot, data })
    }

    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> SdkResult<Vec<Option<DataAndSlot<Vec<u8>>>>> {
        let mut out = Vec::with_capacity(pubkeys.len());
        for chunk in pubkeys.chunks(GET_MULTIPLE_ACCOUNTS_CHUNK_SIZE) {
            let response = self
                .client
                .get_multiple_accounts_with_commitment(chunk, CommitmentConfig::confirmed())
                .await?;
            let slot = response.context.slot;
            out.extend(
                response
                    .value
                    .into_iter()
                    .map(|maybe| maybe.map(|account| DataAndSlot { slot, data: account.data })),
            );
        }
        Ok(out)
    }
}
