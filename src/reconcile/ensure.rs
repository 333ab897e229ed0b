// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-if-absent, adopt-if-present.

use crate::error::Result;
use crate::kubernetes::{ObjectKey, ObjectStore};
use kube::Resource;
use std::fmt;
use tracing::{debug, info, instrument};

/// How a managed resource came to exist after an ensure call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// Already present, left untouched
    Adopted,
    Created,
    /// Absent on fetch, but another writer created it before we did
    AdoptedAfterRace,
}

impl fmt::Display for Ensured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ensured::Adopted => write!(f, "adopted"),
            Ensured::Created => write!(f, "created"),
            Ensured::AdoptedAfterRace => write!(f, "adopted after create race"),
        }
    }
}

/// Make sure `desired` exists in the store.
///
/// An existing object is never overwritten with the desired spec, fields that
/// must follow the parent are handled by drift correction.
#[instrument(skip(store, desired), fields(kind = %K::kind(&()), key = tracing::field::Empty))]
pub async fn ensure<K, S>(store: &S, desired: &K) -> Result<Ensured>
where
    K: Resource<DynamicType = ()> + Send + Sync,
    S: ObjectStore<K> + ?Sized,
{
    let key = ObjectKey::of(desired)?;
    tracing::Span::current().record("key", tracing::field::display(&key));

    match store.get(&key).await {
        Ok(_) => {
            debug!("{} {} already exists", K::kind(&()), key);
            Ok(Ensured::Adopted)
        }
        Err(e) if e.is_not_found() => match store.create(desired).await {
            Ok(_) => {
                info!("Created {} {}", K::kind(&()), key);
                Ok(Ensured::Created)
            }
            Err(e) if e.is_already_exists() => {
                debug!("{} {} was created concurrently, adopting it", K::kind(&()), key);
                Ok(Ensured::AdoptedAfterRace)
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}
