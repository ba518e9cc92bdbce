//! Nullable document server — in-memory purge databases for testing.

use async_trait::async_trait;
use purge_store::{
    ChangeEntry, ChangesRequest, ChangesResponse, CheckpointDoc, DbInfo, DocumentServer, PurgeDb,
    RevisionRef, StoreError,
};
use purge_types::{purged_record_id, Seq};
use purge_utils::CallStats;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory document server. Databases are created on first open and
/// live as long as the server.
pub struct NullDocumentServer {
    dbs: Mutex<HashMap<String, Arc<NullPurgeDb>>>,
    unavailable: AtomicBool,
    stats: CallStats,
}

impl NullDocumentServer {
    pub fn new() -> Self {
        Self {
            dbs: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
            stats: CallStats::new(),
        }
    }

    /// Get (or create) a database directly, bypassing the call counters.
    pub fn db(&self, name: &str) -> Arc<NullPurgeDb> {
        self.dbs
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(NullPurgeDb::new(name)))
            .clone()
    }

    /// Names of every database that exists on this server.
    pub fn db_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dbs.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of `open_or_create` calls served.
    pub fn open_calls(&self) -> u64 {
        self.stats.get("open_or_create")
    }

    /// Make every subsequent `open_or_create` fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for NullDocumentServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentServer for NullDocumentServer {
    async fn open_or_create(&self, name: &str) -> Result<Arc<dyn PurgeDb>, StoreError> {
        self.stats.increment("open_or_create");
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("cannot open {name}")));
        }
        Ok(self.db(name))
    }
}

struct RecordState {
    rev: u64,
    deleted: bool,
    seq: u64,
}

#[derive(Default)]
struct DbState {
    update_seq: u64,
    records: HashMap<String, RecordState>,
    checkpoints: HashMap<String, CheckpointDoc>,
}

impl DbState {
    fn write_record(&mut self, record_id: String, deleted: bool) {
        self.update_seq += 1;
        let seq = self.update_seq;
        let record = self.records.entry(record_id).or_insert(RecordState {
            rev: 0,
            deleted,
            seq,
        });
        record.rev += 1;
        record.deleted = deleted;
        record.seq = seq;
    }
}

/// An in-memory purge database with a sequence-ordered change feed.
///
/// Like a real server, the feed reports each record once, at the sequence of
/// its latest write.
pub struct NullPurgeDb {
    name: String,
    state: Mutex<DbState>,
    requests: Mutex<Vec<ChangesRequest>>,
    unavailable: AtomicBool,
    stats: CallStats,
}

impl NullPurgeDb {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(DbState::default()),
            requests: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
            stats: CallStats::new(),
        }
    }

    /// Write (or restore) the purge record of `doc_id`.
    pub fn purge(&self, doc_id: &str) {
        self.state
            .lock()
            .unwrap()
            .write_record(purged_record_id(doc_id), false);
    }

    /// Delete the purge record of `doc_id`.
    pub fn unpurge(&self, doc_id: &str) {
        self.state
            .lock()
            .unwrap()
            .write_record(purged_record_id(doc_id), true);
    }

    /// Bump the update sequence with a write that no purge query can see.
    pub fn touch(&self) {
        self.state.lock().unwrap().update_seq += 1;
    }

    pub fn update_seq(&self) -> u64 {
        self.state.lock().unwrap().update_seq
    }

    /// Stored checkpoint, looked up by its full `_local/…` ID.
    pub fn checkpoint(&self, doc_id: &str) -> Option<CheckpointDoc> {
        self.state.lock().unwrap().checkpoints.get(doc_id).cloned()
    }

    /// Every change-feed request received, oldest first.
    pub fn changes_requests(&self) -> Vec<ChangesRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls to the named operation (`changes`, `get_checkpoint`,
    /// `put_checkpoint`, `info`).
    pub fn calls(&self, op: &str) -> u64 {
        self.stats.get(op)
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn begin(&self, op: &str) -> Result<(), StoreError> {
        self.stats.increment(op);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{}: {op} failed", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl PurgeDb for NullPurgeDb {
    fn name(&self) -> &str {
        &self.name
    }

    async fn changes(&self, request: ChangesRequest) -> Result<ChangesResponse, StoreError> {
        self.requests.lock().unwrap().push(request.clone());
        self.begin("changes")?;

        let state = self.state.lock().unwrap();
        let since = match &request.since {
            Some(seq) => seq
                .ordinal()
                .ok_or_else(|| StoreError::Backend(format!("malformed since: {seq}")))?,
            None => 0,
        };

        let mut requested = HashSet::new();
        let mut matching: Vec<(&String, &RecordState)> = request
            .doc_ids
            .iter()
            .filter(|id| requested.insert(id.as_str()))
            .filter_map(|id| state.records.get_key_value(id))
            .filter(|(_, record)| record.seq > since)
            .collect();
        matching.sort_by_key(|(_, record)| record.seq);

        let limited = request.limit.is_some_and(|limit| matching.len() > limit);
        if let Some(limit) = request.limit {
            matching.truncate(limit);
        }

        let last_seq = match matching.last() {
            Some((_, record)) if limited => record.seq,
            _ => state.update_seq,
        };

        let results = matching
            .into_iter()
            .map(|(id, record)| ChangeEntry {
                id: id.clone(),
                deleted: record.deleted,
                changes: vec![RevisionRef {
                    rev: format!("{}-{:032x}", record.rev, record.seq),
                }],
                seq: Some(Seq::Number(record.seq)),
            })
            .collect();

        Ok(ChangesResponse {
            results,
            last_seq: Seq::Number(last_seq),
        })
    }

    async fn get_checkpoint(&self, doc_id: &str) -> Result<CheckpointDoc, StoreError> {
        self.begin("get_checkpoint")?;
        self.checkpoint(doc_id)
            .ok_or_else(|| StoreError::NotFound(doc_id.to_string()))
    }

    async fn put_checkpoint(&self, doc: &CheckpointDoc) -> Result<String, StoreError> {
        self.begin("put_checkpoint")?;
        let mut state = self.state.lock().unwrap();
        let next = match state.checkpoints.get(&doc.id) {
            Some(existing) if existing.rev != doc.rev => {
                return Err(StoreError::Conflict(doc.id.clone()));
            }
            Some(existing) => existing
                .rev
                .as_deref()
                .and_then(|rev| rev.strip_prefix("0-"))
                .and_then(|n| n.parse::<u64>().ok())
                .unwrap_or(0)
                + 1,
            None => 1,
        };
        let rev = format!("0-{next}");
        let mut stored = doc.clone();
        stored.rev = Some(rev.clone());
        state.checkpoints.insert(doc.id.clone(), stored);
        Ok(rev)
    }

    async fn info(&self) -> Result<DbInfo, StoreError> {
        self.begin("info")?;
        let state = self.state.lock().unwrap();
        Ok(DbInfo {
            db_name: self.name.clone(),
            update_seq: Seq::Number(state.update_seq),
            doc_count: state.records.values().filter(|r| !r.deleted).count() as u64,
        })
    }
}
