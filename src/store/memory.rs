use super::KvStore;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

/// In-process store. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<StdMutex<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let data = self.data.lock().map_err(|_| anyhow!("memory store poisoned"))?;

        Ok(data.get(key).cloned())
    }

    async fn write(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut data = self.data.lock().map_err(|_| anyhow!("memory store poisoned"))?;

        data.insert(key.to_vec(), value.to_vec());

        Ok(())
    }
}
