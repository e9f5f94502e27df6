//! Local mirror of server-confirmed records
//!
//! Each collection is held in memory as an ordered list and serialized
//! wholesale to the key/value store whenever it changes. The list and its
//! stored copy are always written together. Storage failures never reach the
//! user: reads fall back to an empty collection, writes are logged and dropped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::models::{BusinessTransaction, Customer, Transaction};
use crate::store::KeyValueStore;

/// Mirrored entity collections and their storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Transactions,
    Customers,
    BusinessTransactions,
}

impl Collection {
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Customers => "customers",
            Self::BusinessTransactions => "businessTransactions",
        }
    }

    pub fn all() -> &'static [Collection] {
        &[
            Self::Transactions,
            Self::Customers,
            Self::BusinessTransactions,
        ]
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

/// Load one collection, falling back to empty on any read or parse failure
pub fn load_collection<T, S>(store: &S, collection: Collection) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(collection.storage_key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            error!(
                collection = %collection,
                store = store.name(),
                "Error loading from storage: {}",
                e
            );
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            error!(collection = %collection, "Error parsing stored collection: {}", e);
            Vec::new()
        }
    }
}

/// Serialize and store one collection, logging (and otherwise ignoring) failures
pub fn save_collection<T, S>(store: &mut S, collection: Collection, items: &[T])
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = match serde_json::to_string(items) {
        Ok(raw) => raw,
        Err(e) => {
            error!(collection = %collection, "Error serializing collection: {}", e);
            return;
        }
    };

    if let Err(e) = store.set(collection.storage_key(), &raw) {
        error!(collection = %collection, store = store.name(), "Error saving to storage: {}", e);
    } else {
        debug!(collection = %collection, count = items.len(), "Collection saved");
    }
}

/// The client's copy of server state
pub struct LocalMirror<S: KeyValueStore> {
    store: S,
    transactions: Vec<Transaction>,
    customers: Vec<Customer>,
    business_transactions: Vec<BusinessTransaction>,
}

impl<S: KeyValueStore> LocalMirror<S> {
    /// Open the mirror, loading every collection from the store
    pub fn open(store: S) -> Self {
        let transactions = load_collection(&store, Collection::Transactions);
        let customers = load_collection(&store, Collection::Customers);
        let business_transactions = load_collection(&store, Collection::BusinessTransactions);
        debug!(
            transactions = transactions.len(),
            customers = customers.len(),
            business_transactions = business_transactions.len(),
            "Local mirror loaded"
        );
        Self {
            store,
            transactions,
            customers,
            business_transactions,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn business_transactions(&self) -> &[BusinessTransaction] {
        &self.business_transactions
    }

    pub fn find_transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == Some(id))
    }

    /// Record a server-confirmed transaction
    ///
    /// Appends unless `editing_id` names a mirrored record, which is then
    /// replaced in place. No other deduplication happens.
    pub fn record_transaction(&mut self, tx: Transaction, editing_id: Option<i64>) {
        let slot = editing_id
            .and_then(|id| self.transactions.iter().position(|t| t.id == Some(id)));
        match slot {
            Some(index) => self.transactions[index] = tx,
            None => self.transactions.push(tx),
        }
        save_collection(&mut self.store, Collection::Transactions, &self.transactions);
    }

    /// Remove a transaction after the server confirmed the delete
    pub fn remove_transaction(&mut self, id: i64) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != Some(id));
        let removed = self.transactions.len() != before;
        if removed {
            save_collection(&mut self.store, Collection::Transactions, &self.transactions);
        } else {
            warn!(id, "Deleted transaction was not in the local mirror");
        }
        removed
    }

    /// Replace the whole transaction list with a fresh server copy
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
        save_collection(&mut self.store, Collection::Transactions, &self.transactions);
    }

}
