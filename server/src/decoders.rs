use dlob_sdk::oracle::OracleDecoder;
use dlob_sdk::types::{SdkError, SdkResult};
use dlob_sdk::utils::decode_account_bytes;
use dlob_sdk::AccountDecoder;
use drift::state::oracle::{OraclePriceData, OracleSource};
use drift::state::perp_market::PerpMarket;
use drift::state::spot_market::SpotMarket;
use drift::state::user::User as UserAccount;

pub const USER_ACCOUNT_DECODER: AccountDecoder<UserAccount> = decode_account_bytes::<UserAccount>;
pub const PERP_MARKET_DECODER: AccountDecoder<PerpMarket> = decode_account_bytes::<PerpMarket>;
pub const SPOT_MARKET_DECODER: AccountDecoder<SpotMarket> = decode_account_bytes::<SpotMarket>;

/// Oracle wire decoding (Pyth pull, Pyth legacy, Switchboard) is out of
/// scope (the spec treats `OracleView` as a contract over an injected
/// decoder) -- this reports every oracle as unavailable rather than
/// fabricating an unverified wire parser for a format never specified.
fn undecoded_oracle(_source: OracleSource, _data: &[u8]) -> SdkResult<OraclePriceData> {
    Err(SdkError::InvalidOracle)
}

pub const ORACLE_DECODER: OracleDecoder = undecoded_oracle;
