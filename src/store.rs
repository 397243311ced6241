use std::collections::HashMap;

use crate::api::types::{Account, Status};

/// Statuses and accounts seen in API responses, keyed by ID.
///
/// Entries are replaced wholesale on import; nothing edits a stored status.
#[derive(Debug, Default)]
pub struct StatusStore {
    statuses: HashMap<String, Status>,
    accounts: HashMap<String, Account>,
}

impl StatusStore {
    pub fn import_statuses<I>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = Status>,
    {
        for status in statuses {
            self.accounts
                .insert(status.account.id.clone(), status.account.clone());
            self.statuses.insert(status.id.clone(), status);
        }
    }

    pub fn status(&self, id: &str) -> Option<&Status> {
        self.statuses.get(id)
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures::status;

    #[test]
    fn import_merges_and_replaces() {
        let mut store = StatusStore::default();
        store.import_statuses(vec![status("1", None, 0), status("2", Some("1"), 1)]);
        assert_eq!(store.len(), 2);

        let mut updated = status("2", Some("1"), 1);
        updated.replies_count = 5;
        store.import_statuses([updated]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.status("2").map(|s| s.replies_count), Some(5));
        assert!(store.account("acc-alice").is_some());
    }
}
