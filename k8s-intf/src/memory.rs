// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! An in-process stand-in for the API server.
//!
//! The store keeps the bookkeeping the API server does on its side: unique ids,
//! resource versions, generations and generated names. Objects otherwise stay as they
//! were submitted, unless an observer rewrites them when they are read back.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use kube::Resource;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::client::RemoteApi;
use crate::error::{CONFLICT, RemoteError, UNPROCESSABLE};

/// Hook called each time an object is read, with the number of reads of that object so far
pub type Observer<K> = Arc<dyn Fn(&mut K, usize) + Send + Sync>;

struct Stored<K> {
    object: K,
    reads: usize,
}

struct Store<K> {
    objects: BTreeMap<String, Stored<K>>,
    version: u64,
    observer: Option<Observer<K>>,
    failure: Option<RemoteError>,
}

/// [`RemoteApi`] backed by a map in memory
pub struct MemoryApi<K> {
    store: Mutex<Store<K>>,
}

impl<K> Default for MemoryApi<K> {
    fn default() -> Self {
        Self {
            store: Mutex::new(Store {
                objects: BTreeMap::new(),
                version: 0,
                observer: None,
                failure: None,
            }),
        }
    }
}

impl<K> MemoryApi<K>
where
    K: Resource<DynamicType = ()> + Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a hook rewriting objects as they are read, e.g. to walk them through
    /// their provisioning phases.
    #[must_use]
    pub fn with_observer(self, observer: impl Fn(&mut K, usize) + Send + Sync + 'static) -> Self {
        self.store.lock().observer = Some(Arc::new(observer));
        self
    }

    /// Make the next call fail with `error`, whatever the operation
    pub fn fail_next(&self, error: RemoteError) {
        self.store.lock().failure = Some(error);
    }

    /// Store `object` as is, bypassing the remote bookkeeping
    pub fn insert(&self, object: K) {
        let name = object.meta().name.clone().unwrap_or_default();
        self.store.lock().objects.insert(name, Stored { object, reads: 0 });
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.store.lock().objects.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.lock().objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.lock().objects.is_empty()
    }

    /// A copy of the stored object, not counted as a read
    #[must_use]
    pub fn peek(&self, name: &str) -> Option<K> {
        self.store
            .lock()
            .objects
            .get(name)
            .map(|stored| stored.object.clone())
    }

    fn kind() -> String {
        K::kind(&()).to_string()
    }
}

impl<K> Store<K> {
    fn take_failure(&mut self) -> Result<(), RemoteError> {
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn next_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }
}

#[async_trait]
impl<K> RemoteApi<K> for MemoryApi<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    async fn get(&self, name: &str) -> Result<K, RemoteError> {
        let mut store = self.store.lock();
        store.take_failure()?;
        let observer = store.observer.clone();
        let stored = store
            .objects
            .get_mut(name)
            .ok_or_else(|| RemoteError::not_found(&Self::kind(), name))?;
        stored.reads += 1;
        if let Some(observer) = observer {
            observer(&mut stored.object, stored.reads);
        }
        Ok(stored.object.clone())
    }

    async fn create(&self, object: &K) -> Result<K, RemoteError> {
        let mut store = self.store.lock();
        store.take_failure()?;
        let version = store.next_version();

        let mut object = object.clone();
        let meta = object.meta_mut();
        let name = match (meta.name.as_deref(), meta.generate_name.as_deref()) {
            (Some(name), _) if !name.is_empty() => name.to_string(),
            (_, Some(prefix)) if !prefix.is_empty() => format!("{prefix}{version:05x}"),
            _ => {
                return Err(RemoteError::Api {
                    code: UNPROCESSABLE,
                    message: "name or generateName is required".to_string(),
                });
            }
        };
        if store.objects.contains_key(&name) {
            return Err(RemoteError::Api {
                code: CONFLICT,
                message: format!("{} \"{name}\" already exists", Self::kind()),
            });
        }

        meta.name = Some(name.clone());
        meta.uid = Some(Uuid::new_v4().to_string());
        meta.resource_version = Some(version.to_string());
        meta.generation = Some(1);
        debug!("Created {} '{name}'", Self::kind());
        store.objects.insert(
            name,
            Stored {
                object: object.clone(),
                reads: 0,
            },
        );
        Ok(object)
    }

    async fn replace(&self, name: &str, object: &K) -> Result<K, RemoteError> {
        let mut store = self.store.lock();
        store.take_failure()?;
        let version = store.next_version();
        let stored = store
            .objects
            .get_mut(name)
            .ok_or_else(|| RemoteError::not_found(&Self::kind(), name))?;

        let current = stored.object.meta();
        let mut object = object.clone();
        let meta = object.meta_mut();
        if let Some(expected) = meta.resource_version.as_deref()
            && current.resource_version.as_deref() != Some(expected)
        {
            return Err(RemoteError::Api {
                code: CONFLICT,
                message: format!("{} \"{name}\" has been modified", Self::kind()),
            });
        }
        meta.name = Some(name.to_string());
        meta.uid.clone_from(&current.uid);
        meta.resource_version = Some(version.to_string());
        meta.generation = Some(current.generation.unwrap_or_default() + 1);
        stored.object = object.clone();
        Ok(object)
    }

    async fn delete(&self, name: &str) -> Result<(), RemoteError> {
        let mut store = self.store.lock();
        store.take_failure()?;
        store
            .objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(&Self::kind(), name))
    }
}
