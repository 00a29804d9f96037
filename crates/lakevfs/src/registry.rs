//! Scheme registry.
//!
//! Maps URL schemes (`lakefs://…`) to configured filesystem instances,
//! so generic tooling can resolve a URL to a facade plus a flat path.
//! Registration is explicit — a configured `LakeFs` is handed in, no
//! constructor closures or implicit global state.

use crate::error::FsError;
use crate::fs::LakeFs;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Registry of scheme → filesystem bindings.
#[derive(Default)]
pub struct Registry {
    schemes: RwLock<HashMap<String, Arc<LakeFs>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a filesystem under a scheme, replacing any previous binding.
    pub fn register(&self, scheme: impl Into<String>, fs: Arc<LakeFs>) {
        self.write().insert(scheme.into(), fs);
    }

    /// Look up a scheme directly.
    pub fn get(&self, scheme: &str) -> Option<Arc<LakeFs>> {
        self.read().get(scheme).cloned()
    }

    /// Resolve `scheme://repository/ref/key` to the bound filesystem
    /// and the flat path after the scheme.
    pub fn resolve(&self, url: &str) -> Result<(Arc<LakeFs>, String), FsError> {
        let (scheme, rest) = url.split_once("://").ok_or_else(|| FsError::Address {
            path: url.to_string(),
            reason: "expected scheme://repository/ref/key".to_string(),
        })?;
        let fs = self.get(scheme).ok_or_else(|| FsError::Address {
            path: url.to_string(),
            reason: format!("no filesystem registered for scheme {scheme:?}"),
        })?;
        Ok((fs, rest.to_string()))
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<LakeFs>>> {
        self.schemes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<LakeFs>>> {
        self.schemes.write().unwrap_or_else(|e| e.into_inner())
    }
}
