//! Persistent demo world: the ledger plus a party label registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use swaplock_core::{Coin, Ledger, Party};

/// Everything one demo run persists between invocations.
#[derive(Serialize, Deserialize)]
pub struct World {
    pub ledger: Ledger<Coin>,
    /// Party labels seen so far, for friendly display of identity hashes.
    pub labels: BTreeMap<String, Party>,
}

impl World {
    /// Fresh world whose ledger mints identities from a seed phrase.
    pub fn new(seed: &str) -> Self {
        Self {
            ledger: Ledger::with_seed(Sha256::digest(seed.as_bytes()).into()),
            labels: BTreeMap::new(),
        }
    }

    /// Resolves a party given as a label or as an identity string,
    /// remembering new labels for later display.
    pub fn party(&mut self, s: &str) -> anyhow::Result<Party> {
        if s.starts_with("0x") {
            return Ok(s.parse()?);
        }
        let party = Party::from_label(s);
        self.labels.insert(s.to_string(), party);
        Ok(party)
    }

    /// Friendly name for a party, falling back to its identity hash.
    pub fn name_of(&self, party: Party) -> String {
        self.labels
            .iter()
            .find(|(_, known)| **known == party)
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| party.to_string())
    }
}
