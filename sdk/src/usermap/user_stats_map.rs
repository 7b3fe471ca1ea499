use dashmap::DashMap;
use solana_sdk::pubkey::Pubkey;

use crate::addresses::pda::get_user_stats_account_pubkey;
use crate::dlob::top_makers::MakerStatsLookup;

/// Caches `authority -> userStats PDA` derivations. The stats account
/// address is deterministic (a PDA seeded on the authority), so this never
/// needs an RPC round trip -- it's populated lazily the first time a maker
/// authority is looked up by `/topMakers?includeUserStats=true`, matching
/// the teacher's `UserStatsMap`/`mustGet` idiom without the network call.
#[derive(Debug, Clone)]
pub struct UserStatsIndex {
    program_id: Pubkey,
    cache: std::sync::Arc<DashMap<Pubkey, Pubkey>>,
}

impl UserStatsIndex {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            cache: std::sync::Arc::new(DashMap::new()),
        }
    }

    pub fn must_get(&self, authority: &Pubkey) -> Pubkey {
        if let Some(existing) = self.cache.get(authority) {
            return *existing;
        }
        let derived = get_user_stats_account_pubkey(&self.program_id, *authority);
        self.cache.insert(*authority, derived);
        derived
    }

    /// Eagerly derives PDAs for every authority currently known to the
    /// account provider, so `size()` reflects readiness at startup instead
    /// of staying empty until the first `/topMakers?includeUserStats=true`
    /// call.
    pub fn populate(&self, authorities: &[Pubkey]) {
        for authority in authorities {
            self.must_get(authority);
        }
    }

    pub fn size(&self) -> usize {
        self.cache.len()
    }
}

impl MakerStatsLookup for UserStatsIndex {
    fn lookup(&self, maker_authority: &Pubkey) -> Option<Pubkey> {
        Some(self.must_get(maker_authority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_same_pda_on_repeat_lookup() {
        let index = UserStatsIndex::new(Pubkey::new_unique());
        let authority = Pubkey::new_unique();

        let first = index.must_get(&authority);
        let second = index.must_get(&authority);
        assert_eq!(first, second);
    }

    #[test]
    fn populate_makes_size_nonzero_without_a_lookup() {
        let index = UserStatsIndex::new(Pubkey::new_unique());
        assert_eq!(index.size(), 0);

        let authorities = vec![Pubkey::new_unique(), Pubkey::new_unique()];
        index.populate(&authorities);
        assert_eq!(index.size(), 2);
    }
}
