use super::Ledger;
use crate::error::{ReputeError, Result};
use crate::types::config::ReputeConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON file holding the ledger state for one workspace.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn for_workspace(root: &Path, config: &ReputeConfig) -> Self {
        Self::new(root.join(config.state_file()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Ledger> {
        if !self.exists() {
            return Err(ReputeError::LedgerNotDeployed(
                self.path.display().to_string(),
            ));
        }
        let content = fs::read_to_string(&self.path)?;
        let ledger = serde_json::from_str(&content)?;
        Ok(ledger)
    }

    pub fn create(&self, ledger: &Ledger, force: bool) -> Result<()> {
        if self.exists() && !force {
            return Err(ReputeError::LedgerExists(self.path.display().to_string()));
        }
        self.save(ledger)
    }

    /// Writes through a sibling temp file so a crash never leaves a torn ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(ledger)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), events = ledger.events.len(), "ledger saved");
        Ok(())
    }

    /// Loads, applies `op`, and persists only when `op` succeeds.
    pub fn update<T>(&self, op: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let mut ledger = self.load()?;
        let value = op(&mut ledger)?;
        self.save(&ledger)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::addr;
    use crate::ledger::ReputationStore;
    use tempfile::TempDir;

    #[test]
    fn load_fails_before_deploy() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = LedgerStore::new(dir.path().join(".repute/ledger.json"));
        assert!(matches!(
            store.load(),
            Err(ReputeError::LedgerNotDeployed(_))
        ));
    }

    #[test]
    fn create_round_trips_and_refuses_overwrite() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = LedgerStore::for_workspace(dir.path(), &ReputeConfig::default());
        let owner = addr(1);
        let mut ledger = Ledger::new(owner.clone());
        ledger.set_oracle_updater(&owner, &owner).expect("set");
        ledger.set_reputation(&owner, &addr(2), 11).expect("write");

        store.create(&ledger, false).expect("first create should succeed");
        assert!(matches!(
            store.create(&ledger, false),
            Err(ReputeError::LedgerExists(_))
        ));
        store.create(&ledger, true).expect("forced create should succeed");

        let loaded = store.load().expect("ledger should load");
        assert_eq!(loaded.get_reputation(&addr(2)), 11);
        assert_eq!(loaded.events, ledger.events);
    }

    #[test]
    fn failed_update_leaves_file_untouched() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = LedgerStore::new(dir.path().join("ledger.json"));
        let owner = addr(1);
        let mut ledger = Ledger::new(owner.clone());
        ledger.set_oracle_updater(&owner, &owner).expect("set");
        ledger.set_reputation(&owner, &addr(2), 50).expect("write");
        store.create(&ledger, false).expect("create");
        let before = fs::read_to_string(store.path()).expect("read");

        let result = store.update(|ledger| ledger.set_reputation(&addr(2), &addr(2), 999));
        assert!(matches!(result, Err(ReputeError::Unauthorized(_))));

        let after = fs::read_to_string(store.path()).expect("read");
        assert_eq!(before, after);
    }
}
