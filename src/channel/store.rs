//! Durable channel storage.
//!
//! Channels live in a single JSON file:
//!
//! ```json
//! { "next_id": 3, "channels": [ { "id": 1, ... }, { "id": 2, ... } ] }
//! ```
//!
//! Every mutation builds the next state, writes it to a sibling temp file,
//! renames it over the store file, and only then replaces the in-memory
//! state. The write lock is held for the whole sequence.

use super::{Channel, ChannelId, ChannelStatus, FieldErrors, validate::check_required};
use crate::{
    debug,
    error::{Error, Result},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

const FIRST_ID: ChannelId = 1;

const fn first_id() -> ChannelId {
    FIRST_ID
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "first_id")]
    next_id: ChannelId,
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Clone)]
struct StoreState {
    next_id: ChannelId,
    channels: BTreeMap<ChannelId, Channel>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            channels: BTreeMap::new(),
        }
    }
}

impl From<StoreFile> for StoreState {
    fn from(file: StoreFile) -> Self {
        let channels: BTreeMap<_, _> = file.channels.into_iter().map(|c| (c.id, c)).collect();
        // never hand out an id that is already taken; a saturated `next_id`
        // makes the next add fail instead of overwriting the last record
        let past_last = channels
            .keys()
            .next_back()
            .map_or(FIRST_ID, |id| id.saturating_add(1));
        Self {
            next_id: file.next_id.max(past_last),
            channels,
        }
    }
}

/// Channel records keyed by id.
#[derive(Debug, Default)]
pub struct ChannelStore {
    /// `None` for the in-memory variant.
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
}

impl ChannelStore {
    /// Open (or lazily create) the store file at `path`.
    ///
    /// A missing file is an empty store; it is written on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|e| Error::Storage(path.clone(), e))?;
            let file: StoreFile =
                serde_json::from_str(&json).map_err(|e| Error::Corrupt(path.clone(), e))?;
            StoreState::from(file)
        } else {
            StoreState::default()
        };

        debug!("store"; "opened {} ({} channels)", path.display(), state.channels.len());
        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.state.read().channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new channel and return its assigned id.
    ///
    /// Any id already set on `channel` is ignored.
    pub fn add_channel(&self, mut channel: Channel) -> Result<ChannelId> {
        require_fields(&channel)?;

        let mut state = self.state.write();
        let mut next = state.clone();
        let id = next.next_id;
        next.next_id = id.checked_add(1).ok_or(Error::IdsExhausted)?;
        channel.id = id;
        next.channels.insert(id, channel);

        self.commit(&mut state, next)?;
        debug!("store"; "added channel {id}");
        Ok(id)
    }

    /// Replace the record with `channel.id`.
    pub fn update_channel(&self, channel: Channel) -> Result<()> {
        require_fields(&channel)?;

        let mut state = self.state.write();
        if !state.channels.contains_key(&channel.id) {
            return Err(Error::NotFound(channel.id));
        }
        let id = channel.id;
        let mut next = state.clone();
        next.channels.insert(id, channel);

        self.commit(&mut state, next)?;
        debug!("store"; "updated channel {id}");
        Ok(())
    }

    /// Read, change and persist one record under a single write lock, so
    /// concurrent changes to the same channel are applied one after another.
    ///
    /// Nothing is written when `change` fails or leaves required fields
    /// blank. The record keeps its id whatever `change` does.
    pub fn modify<T>(
        &self,
        id: ChannelId,
        change: impl FnOnce(&mut Channel) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.write();
        let mut channel = state.channels.get(&id).cloned().ok_or(Error::NotFound(id))?;
        let out = change(&mut channel)?;
        channel.id = id;
        require_fields(&channel)?;

        let mut next = state.clone();
        next.channels.insert(id, channel);
        self.commit(&mut state, next)?;
        debug!("store"; "modified channel {id}");
        Ok(out)
    }

    /// Remove a channel, returning the removed record.
    pub fn delete_channel(&self, id: ChannelId) -> Result<Channel> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let removed = next.channels.remove(&id).ok_or(Error::NotFound(id))?;

        self.commit(&mut state, next)?;
        debug!("store"; "deleted channel {id}");
        Ok(removed)
    }

    pub fn get_channel(&self, id: ChannelId) -> Result<Channel> {
        self.state
            .read()
            .channels
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    /// Channels matching `status`, in ascending id order.
    pub fn get_channels(&self, status: ChannelStatus) -> Vec<Channel> {
        self.state
            .read()
            .channels
            .values()
            .filter(|c| c.matches_status(status))
            .cloned()
            .collect()
    }

    /// Persist `next`, then make it the visible state.
    fn commit(&self, state: &mut StoreState, next: StoreState) -> Result<()> {
        if let Some(path) = &self.path {
            write_atomic(path, &next)?;
        }
        *state = next;
        Ok(())
    }
}

fn require_fields(channel: &Channel) -> Result<()> {
    let mut errors = FieldErrors::new();
    check_required(channel, &mut errors);
    errors.into_result()
}

/// Write to `<path>.tmp` and rename over `path`.
fn write_atomic(path: &Path, state: &StoreState) -> Result<()> {
    let file = StoreFile {
        next_id: state.next_id,
        channels: state.channels.values().cloned().collect(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(Error::serialize)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::Storage(parent.to_path_buf(), e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).map_err(|e| Error::Storage(tmp.clone(), e))?;
    fs::rename(&tmp, path).map_err(|e| Error::Storage(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::fields,
        filter::{Filter, FilterOp},
    };
    use tempfile::TempDir;

    fn channel(title: &str) -> Channel {
        Channel::new("ART", "rss_2.0", title, "test rss descr")
    }

    #[test]
    fn test_add_then_get_round_trips() {
        let store = ChannelStore::in_memory();
        let mut draft = channel("test rss title");
        draft.category = Some("cat1".into());
        draft.active = true;
        draft.filters = vec![Filter::new("Titolo", FilterOp::Contains("rust".into()))];

        let id = store.add_channel(draft.clone()).unwrap();
        assert_eq!(id, 1);

        let stored = store.get_channel(id).unwrap();
        assert_eq!(stored, Channel { id, ..draft });
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = ChannelStore::in_memory();
        let first = store.add_channel(channel("a")).unwrap();
        let second = store.add_channel(channel("b")).unwrap();
        store.delete_channel(second).unwrap();
        let third = store.add_channel(channel("c")).unwrap();

        assert_eq!((first, second, third), (1, 2, 3));
    }

    #[test]
    fn test_draft_id_is_ignored() {
        let store = ChannelStore::in_memory();
        let mut draft = channel("a");
        draft.id = 42;
        assert_eq!(store.add_channel(draft).unwrap(), 1);
        assert!(store.get_channel(42).is_err());
    }

    #[test]
    fn test_add_requires_fields() {
        let store = ChannelStore::in_memory();
        let err = store
            .add_channel(Channel::new("ART", "", " ", ""))
            .unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected validation error, got {err}");
        };
        assert!(errors.contains(fields::TITLE));
        assert!(errors.contains(fields::DESCRIPTION));
        assert!(errors.contains(fields::FEED_TYPE));
        assert!(store.is_empty());
    }

    #[test]
    fn test_status_partition() {
        let store = ChannelStore::in_memory();
        for i in 0..5 {
            let mut c = channel(&format!("c{i}"));
            c.active = i % 2 == 0;
            store.add_channel(c).unwrap();
        }

        let all = store.get_channels(ChannelStatus::All);
        let active = store.get_channels(ChannelStatus::Active);
        let inactive = store.get_channels(ChannelStatus::NotActive);
        assert_eq!(all.len(), active.len() + inactive.len());
        assert_eq!(active.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_update_and_delete_missing() {
        let store = ChannelStore::in_memory();
        let mut ghost = channel("ghost");
        ghost.id = 7;
        assert!(matches!(store.update_channel(ghost), Err(Error::NotFound(7))));
        assert!(matches!(store.delete_channel(7), Err(Error::NotFound(7))));
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let store = ChannelStore::in_memory();
        let id = store.add_channel(channel("a")).unwrap();
        let removed = store.delete_channel(id).unwrap();
        assert_eq!(removed.title, "a");
        assert!(matches!(store.get_channel(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("channels.json");

        {
            let store = ChannelStore::open(&path).unwrap();
            assert!(store.is_empty());
            assert!(!path.exists());

            let id = store.add_channel(channel("first")).unwrap();
            store.add_channel(channel("second")).unwrap();
            let mut updated = store.get_channel(id).unwrap();
            updated.active = true;
            store.update_channel(updated).unwrap();
            store.delete_channel(2).unwrap();
        }

        let store = ChannelStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_channel(1).unwrap().active);
        // next id survives the reopen
        assert_eq!(store.add_channel(channel("third")).unwrap(), 3);
        assert!(!dir.path().join("data").join("channels.json.tmp").exists());
    }

    #[test]
    fn test_persisted_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("channels.json");
        let store = ChannelStore::open(&path).unwrap();
        store.add_channel(channel("t")).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["next_id"], 2);
        let record = &json["channels"][0];
        assert_eq!(record["id"], 1);
        assert_eq!(record["content_type"], "ART");
        assert_eq!(record["feed_type"], "rss_2.0");
        assert_eq!(record["active"], false);
        assert!(record.get("category").is_none());
        assert!(record.get("filters").is_none());
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        // a directory where the store file should be makes the rename fail
        let path = dir.path().join("channels.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let store = ChannelStore {
            path: Some(path),
            state: RwLock::default(),
        };
        let err = store.add_channel(channel("a")).unwrap_err();
        assert!(matches!(err, Error::Storage(..)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_modify_keeps_every_change() {
        let dir = TempDir::new().unwrap();
        let store = ChannelStore::open(dir.path().join("channels.json")).unwrap();
        let id = store.add_channel(channel("busy")).unwrap();

        std::thread::scope(|s| {
            for t in 0..8 {
                let store = &store;
                s.spawn(move || {
                    for i in 0..25 {
                        store
                            .modify(id, |c| {
                                c.filters.push(Filter::new(
                                    format!("T{t}"),
                                    FilterOp::Equals(i.to_string()),
                                ));
                                Ok(())
                            })
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(store.get_channel(id).unwrap().filters.len(), 200);
        let reopened = ChannelStore::open(store.path().unwrap()).unwrap();
        assert_eq!(reopened.get_channel(id).unwrap().filters.len(), 200);
    }

    #[test]
    fn test_modify_failure_keeps_record() {
        let store = ChannelStore::in_memory();
        let id = store.add_channel(channel("a")).unwrap();

        let err = store
            .modify(id, |c| {
                c.title = "changed".into();
                Err::<(), _>(Error::NotFound(99))
            })
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(99)));

        let blanked = store.modify(id, |c| {
            c.title.clear();
            Ok(())
        });
        assert!(matches!(blanked, Err(Error::Validation(_))));
        assert_eq!(store.get_channel(id).unwrap().title, "a");
        assert!(matches!(store.modify(7, |_| Ok(())), Err(Error::NotFound(7))));
    }

    #[test]
    fn test_exhausted_ids_fail_instead_of_wrapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("channels.json");
        let record = serde_json::to_string(&Channel {
            id: ChannelId::MAX,
            ..channel("last")
        })
        .unwrap();
        fs::write(&path, format!(r#"{{"channels": [{record}]}}"#)).unwrap();

        let store = ChannelStore::open(&path).unwrap();
        assert!(matches!(
            store.add_channel(channel("overflow")),
            Err(Error::IdsExhausted)
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_channel(ChannelId::MAX).unwrap().title, "last");
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("channels.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ChannelStore::open(&path), Err(Error::Corrupt(..))));
    }

    #[test]
    fn test_next_id_repaired_from_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("channels.json");
        let record = serde_json::to_string(&Channel {
            id: 9,
            ..channel("x")
        })
        .unwrap();
        fs::write(&path, format!(r#"{{"next_id": 1, "channels": [{record}]}}"#)).unwrap();

        let store = ChannelStore::open(&path).unwrap();
        assert_eq!(store.add_channel(channel("y")).unwrap(), 10);
    }
}
