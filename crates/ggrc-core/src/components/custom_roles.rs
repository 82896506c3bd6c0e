use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::deferred_save::DeferredSave;
use crate::errors::ExError;
use crate::instance::Instance;
use crate::ops::filter_acl;

/// Editor for the custom role assignments of an instance
///
/// While a role group is being saved its id is kept in
/// `updatable_group_id` so the template can show a spinner for that group
/// only.
#[derive(Debug)]
pub struct CustomRoles {
    pub instance: Arc<Instance>,
    updatable_group_id: Arc<Mutex<Option<String>>>,
    deferred_save: Option<DeferredSave>,
}

fn slot(m: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CustomRoles {
    pub fn new(instance: Arc<Instance>) -> Self {
        Self {
            instance,
            updatable_group_id: Arc::new(Mutex::new(None)),
            deferred_save: None,
        }
    }

    /// Route saves through a shared coordinator instead of saving directly
    pub fn with_deferred_save(mut self, deferred_save: DeferredSave) -> Self {
        self.deferred_save = Some(deferred_save);
        self
    }

    pub fn updatable_group_id(&self) -> Option<String> {
        slot(&self.updatable_group_id).clone()
    }

    /// Role editing is read-only for proposable models
    pub fn is_read_only_for_instance(instance: Option<&Instance>) -> bool {
        instance.is_some_and(|i| i.class().is_proposable)
    }

    pub fn is_read_only(&self) -> bool {
        Self::is_read_only_for_instance(Some(&*self.instance))
    }

    /// Drop ACL entries the server has not assigned an id yet
    ///
    /// # Errors
    ///
    /// Fails only if the ACL attribute cannot be written back.
    pub fn filter_acl(&self) -> Result<usize, ExError> {
        filter_acl(&self.instance).map_err(ExError::from)
    }

    /// Persist the role group `group_id`
    ///
    /// With a coordinator the group is marked as updating when its round
    /// starts, so several quick edits share one save. On success the ACL is
    /// filtered; the group marker is cleared either way.
    ///
    /// # Errors
    ///
    /// Returns the save error shared by the round.
    pub async fn save(&self, group_id: Option<String>) -> Result<Value, ExError> {
        let outcome = match &self.deferred_save {
            Some(deferred_save) => {
                let marker = self.updatable_group_id.clone();
                deferred_save
                    .push(move || {
                        *slot(&marker) = group_id;
                    })
                    .await
            }
            None => {
                *slot(&self.updatable_group_id) = group_id;
                let outcome = self.instance.save().await;
                if outcome.is_ok() {
                    self.instance.dispatch("refreshInstance");
                }
                outcome
            }
        };

        let outcome = match outcome {
            Ok(response) => self.filter_acl().map(|_| response),
            Err(err) => Err(err),
        };
        *slot(&self.updatable_group_id) = None;
        outcome
    }
}
