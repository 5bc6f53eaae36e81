//! Persisted narrative decisions: affinity, the last choice made, the
//! minigame result and the moral flag.
//!
//! Writes go straight to the backing store. A failed write is logged and the
//! game carries on; reads of missing keys yield the defaults.

use serde_json::Value;

use crate::storager::types::keys;
use crate::storager::{self, SharedStore};

/// The only record later `BRANCH` lines can test against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastChoice {
    pub id: String,
    pub opt: String,
}

impl LastChoice {
    pub fn matches(&self, id: &str, opt: &str) -> bool {
        self.id == id && self.opt == opt
    }
}

#[derive(Clone)]
pub struct DecisionStore {
    store: SharedStore,
}

impl DecisionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        storager::read(&*self.store.borrow(), key)
    }

    fn put(&self, key: &str, value: Value) {
        if let Err(e) = self.store.borrow_mut().set(key, value) {
            log::error!("Failed to persist '{}': {:#}", key, e);
        }
    }

    pub fn affinity(&self) -> i64 {
        self.get(keys::AFFINITY).unwrap_or(0)
    }

    /// Returns the new total.
    pub fn add_affinity(&self, delta: i64) -> i64 {
        let total = self.affinity().saturating_add(delta);
        self.put(keys::AFFINITY, Value::from(total));
        log::debug!("Affinity {:+} -> {}", delta, total);
        total
    }

    pub fn set_last_choice(&self, id: &str, opt: &str) {
        self.put(keys::LAST_CHOICE_ID, Value::from(id));
        self.put(keys::LAST_CHOICE_OPT, Value::from(opt));
    }

    pub fn last_choice(&self) -> Option<LastChoice> {
        let id: String = self.get(keys::LAST_CHOICE_ID)?;
        let opt: String = self.get(keys::LAST_CHOICE_OPT).unwrap_or_default();
        Some(LastChoice { id, opt })
    }

    pub fn set_minigame_result(&self, success: bool) {
        self.put(keys::MINIGAME_RESULT, Value::from(success));
    }

    pub fn minigame_result(&self) -> bool {
        self.get(keys::MINIGAME_RESULT).unwrap_or(false)
    }

    pub fn set_moral_flag(&self, told_full_truth: bool) {
        self.put(keys::MORAL_TRUTH, Value::from(told_full_truth));
    }

    pub fn moral_flag(&self) -> bool {
        self.get(keys::MORAL_TRUTH).unwrap_or(false)
    }

    /// Clear every decision. Only a fresh game calls this.
    pub fn reset_all(&self) {
        let mut store = self.store.borrow_mut();
        for key in keys::DECISION_KEYS {
            if let Err(e) = store.delete(key) {
                log::error!("Failed to clear '{}': {:#}", key, e);
            }
        }
        log::info!("Decision store reset");
    }
}
