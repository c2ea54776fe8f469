use std::collections::HashMap;
use std::sync::RwLock;

use futures::future::{BoxFuture, FutureExt};

use crate::backing::Backing;
use crate::errors::StoreError;

/// The browser-style backing: a key-value namespace held in memory.
/// Durability belongs to whatever hosts the namespace, which already
/// persists everything it is handed.
#[derive(Default)]
pub struct MemoryBacking {
    pub(crate) map: RwLock<HashMap<String, String>>,
    key: String,
}

impl MemoryBacking {
    pub fn new(key: impl AsRef<str>) -> Self {
        MemoryBacking {
            key: key.as_ref().to_owned(),
            ..Default::default()
        }
    }
}

impl Backing for MemoryBacking {
    fn load(&self) -> BoxFuture<Result<Option<String>, StoreError>> {
        let value = self.map.read().unwrap().get(&self.key).cloned();

        async move { Ok(value) }.boxed()
    }

    fn save(&self, raw: String) -> BoxFuture<Result<(), StoreError>> {
        self.map.write().unwrap().insert(self.key.clone(), raw);

        async move { Ok(()) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::{Backing, MemoryBacking};

    #[tokio::test]
    async fn unwritten_namespace_loads_as_none() {
        let backing = MemoryBacking::new("journal");

        assert_eq!(backing.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn values_live_under_their_own_key() {
        let backing = MemoryBacking::new("journal");

        backing.save("[]".to_owned()).await.expect("save");

        assert_eq!(backing.load().await.expect("load").as_deref(), Some("[]"));
        assert!(backing.map.read().unwrap().contains_key("journal"));
    }
}
