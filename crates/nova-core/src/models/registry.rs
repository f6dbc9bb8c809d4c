//! Registry of every profile seen on this device, keyed by email.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::profile::UserProfile;
use crate::repository::Slot;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry {
    users: BTreeMap<String, UserProfile>,
}

impl UserRegistry {
    /// Insert or replace the snapshot for `profile.email`.
    ///
    /// Admin snapshots, unauthenticated profiles and profiles without a
    /// display name are never recorded. Returns whether the registry
    /// changed.
    pub fn upsert(&mut self, profile: &UserProfile) -> bool {
        if profile.is_admin()
            || !profile.is_authenticated
            || profile.email.is_empty()
            || profile.name.trim().is_empty()
        {
            return false;
        }
        match self.users.get(&profile.email) {
            Some(existing) if existing == profile => false,
            _ => {
                self.users.insert(profile.email.clone(), profile.clone());
                true
            }
        }
    }

    pub fn get(&self, email: &str) -> Option<&UserProfile> {
        self.users.get(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserProfile> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Slot for UserRegistry {
    const KEY: &'static str = "nova_all_users";
}
