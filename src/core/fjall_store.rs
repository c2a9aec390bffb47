use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use anyhow::{Result, Context};

use super::store::KvStore;

const PARTITION: &str = "omni";

/// On-disk persistence collaborator backed by a Fjall keyspace
pub struct FjallStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let keyspace = Config::new(path)
            .open()
            .context("Failed to open Fjall keyspace")?;

        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open omni partition")?;

        Ok(Self {
            keyspace,
            partition,
        })
    }

    /// Sync the journal to disk
    pub fn flush(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)
            .context("Failed to persist keyspace")?;
        Ok(())
    }
}

impl KvStore for FjallStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let res = self.partition
            .get(key)
            .context("Failed to get value from DB")?;
        match res {
            Some(slice) => {
                let value = String::from_utf8(slice.to_vec())
                    .context(format!("Value under '{}' is not valid UTF-8", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key, value)
            .context("Failed to put value in DB")?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.partition.remove(key)
            .context("Failed to delete value from DB")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fjall_store_kv_operations() {
        let temp_dir = TempDir::new().unwrap();
        let store = FjallStore::open(temp_dir.path()).unwrap();

        store.set("omni_history", "[]").unwrap();
        assert_eq!(store.get("omni_history").unwrap().as_deref(), Some("[]"));

        store.delete("omni_history").unwrap();
        assert!(store.get("omni_history").unwrap().is_none());
    }

    #[test]
    fn test_fjall_store_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = FjallStore::open(temp_dir.path()).unwrap();
            store.set("omni_memory", "[{\"id\":1}]").unwrap();
            store.flush().unwrap();
        }

        {
            let store = FjallStore::open(temp_dir.path()).unwrap();
            assert_eq!(store.get("omni_memory").unwrap().as_deref(), Some("[{\"id\":1}]"));
        }
    }
}
