use dlob_sdk::constants::MarketRegistry;
use drift::state::user::MarketType;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct MarketSelector {
    pub market_type: MarketType,
    pub market_index: u16,
}

pub fn parse_market_type(raw: &str) -> Result<MarketType, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "perp" => Ok(MarketType::Perp),
        "spot" => Ok(MarketType::Spot),
        other => Err(ApiError::ClientValidation(format!("invalid marketType: {other}"))),
    }
}

/// Resolves `marketName` OR (`marketType` + `marketIndex`) against the
/// static market registry. Either form is accepted; any other combination
/// (neither, or a half-supplied pair) is a 400.
pub fn resolve_market(
    registry: &MarketRegistry,
    market_name: Option<&str>,
    market_type: Option<&str>,
    market_index: Option<&str>,
) -> Result<MarketSelector, ApiError> {
    if let Some(name) = market_name {
        let info = registry
            .lookup_ci(name)
            .ok_or_else(|| ApiError::ClientValidation(format!("unknown marketName: {name}")))?;
        return Ok(MarketSelector {
            market_type: info.market_type,
            market_index: info.market_index,
        });
    }

    let (Some(market_type), Some(market_index)) = (market_type, market_index) else {
        return Err(ApiError::ClientValidation(
            "either marketName or both marketType and marketIndex are required".to_string(),
        ));
    };

    let market_type = parse_market_type(market_type)?;
    let market_index: u16 = market_index
        .parse()
        .map_err(|_| ApiError::ClientValidation(format!("invalid marketIndex: {market_index}")))?;

    if !registry.exists(market_type, market_index) {
        return Err(ApiError::ClientValidation(format!(
            "unknown market: {market_type:?}/{market_index}"
        )));
    }

    Ok(MarketSelector { market_type, market_index })
}

/// Batch normalization for `/batchL2`: every list-valued param must share
/// one length; a missing param is treated as an all-`None` list of that
/// length (callers just never see a `Some` for it). Mismatched lengths are
/// a 400, not silently truncated.
pub fn batch_len(lists: &[Option<&[String]>]) -> Result<usize, ApiError> {
    let mut len = None;
    for list in lists.iter().flatten() {
        match len {
            None => len = Some(list.len()),
            Some(expected) if expected != list.len() => {
                return Err(ApiError::ClientValidation(
                    "batch L2 params must all be the same length".to_string(),
                ))
            }
            _ => {}
        }
    }
    Ok(len.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_name() {
        let registry = MarketRegistry::load("devnet");
        let selector = resolve_market(&registry, Some("sol-perp"), None, None).unwrap();
        assert_eq!(selector.market_type, MarketType::Perp);
        assert_eq!(selector.market_index, 0);
    }

    #[test]
    fn rejects_half_supplied_pair() {
        let registry = MarketRegistry::load("devnet");
        assert!(resolve_market(&registry, None, Some("perp"), None).is_err());
    }

    #[test]
    fn rejects_unknown_index() {
        let registry = MarketRegistry::load("devnet");
        assert!(resolve_market(&registry, None, Some("perp"), Some("999")).is_err());
    }

    #[test]
    fn batch_len_rejects_mismatched_lists() {
        let a = vec!["1".to_string(), "2".to_string()];
        let b = vec!["1".to_string()];
        assert!(batch_len(&[Some(&a), Some(&b)]).is_err());
    }

    #[test]
    fn batch_len_defaults_to_zero_when_all_missing() {
        assert_eq!(batch_len(&[None, None]).unwrap(), 0);
    }
}
