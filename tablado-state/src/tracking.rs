//! JSON-array tracking collections (ignored, failed, deferred).
//!
//! Files are loosely typed: entries carry `id`, `title`, `url` and `reason`
//! plus any number of extra diagnostic fields, all of which survive a
//! read-modify-write cycle. Array items that are not objects are kept as they
//! are and written back after the entries. A file that cannot be parsed at
//! all is treated as empty and the loss is reported; reads never fail.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tablado_core::{Diagnostics, TitleStub};

use crate::error::StateError;

/// One persisted row.
///
/// Any JSON object reads as an entry. Fields of the wrong type are coerced
/// where that is unambiguous; an `accepted` value that cannot be read as a
/// boolean stays in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct TrackingEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub reason: String,
    /// Operator acceptance marker, only meaningful in the deferred queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    /// Free-form diagnostics.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for TrackingEntry {
    fn from(mut fields: Map<String, Value>) -> Self {
        let mut text = |key: &str| fields.remove(key).map(lenient_string).unwrap_or_default();
        let id = text("id");
        let title = text("title");
        let url = text("url");
        let reason = text("reason");

        let accepted = match fields.remove("accepted") {
            None | Some(Value::Null) => None,
            Some(raw) => match lenient_bool(&raw) {
                Some(b) => Some(b),
                None => {
                    fields.insert("accepted".to_string(), raw);
                    None
                }
            },
        };

        Self {
            id,
            title,
            url,
            reason,
            accepted,
            extra: fields,
        }
    }
}

impl TrackingEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            reason: reason.into(),
            accepted: None,
            extra: Map::new(),
        }
    }

    pub fn for_stub(stub: &TitleStub, reason: impl Into<String>) -> Self {
        Self::new(&stub.id, &stub.title, &stub.url, reason)
    }

    /// Attach a diagnostic field.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Set the acceptance marker, replacing any unreadable value.
    pub fn set_accepted(&mut self, accepted: bool) {
        self.extra.remove("accepted");
        self.accepted = Some(accepted);
    }
}

/// Strings, numbers and booleans as text; null becomes empty.
fn lenient_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Booleans as typed by hand: `true`, `"yes"`, `1` and their opposites.
fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// File contents split into readable entries and everything else.
struct Rows {
    entries: Vec<TrackingEntry>,
    unreadable: Vec<Value>,
}

/// A JSON array of [`TrackingEntry`] rows on disk.
#[derive(Clone)]
pub struct TrackingCollection {
    path: PathBuf,
    diag: Arc<dyn Diagnostics>,
}

impl TrackingCollection {
    pub fn new(path: impl Into<PathBuf>, diag: Arc<dyn Diagnostics>) -> Self {
        Self {
            path: path.into(),
            diag,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries. Missing, empty or corrupt files read as empty.
    pub fn read(&self) -> Vec<TrackingEntry> {
        self.load().entries
    }

    fn load(&self) -> Rows {
        let mut rows = Rows {
            entries: Vec::new(),
            unreadable: Vec::new(),
        };
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return rows,
            Err(e) => {
                self.diag.error(format!(
                    "Could not read {}: {e}; treating as empty",
                    self.path.display()
                ));
                return rows;
            }
        };
        if contents.trim().is_empty() {
            return rows;
        }

        let items = match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                self.diag.warn(format!(
                    "{} is not a JSON array; its contents will be discarded",
                    self.path.display()
                ));
                return rows;
            }
            Err(e) => {
                self.diag.warn(format!(
                    "{} is corrupt ({e}); its contents will be discarded",
                    self.path.display()
                ));
                return rows;
            }
        };

        for item in items {
            match item {
                Value::Object(fields) => rows.entries.push(TrackingEntry::from(fields)),
                other => {
                    self.diag.warn(format!(
                        "Skipping unreadable item in {}: {other}",
                        self.path.display()
                    ));
                    rows.unreadable.push(other);
                }
            }
        }
        rows
    }

    /// Read-modify-write. The file is rewritten only if `f` changed the
    /// entries; unreadable items are written back as they were.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<TrackingEntry>) -> R) -> Result<R, StateError> {
        let mut rows = self.load();
        let before = rows.entries.clone();
        let result = f(&mut rows.entries);
        if rows.entries != before {
            let mut items = Vec::with_capacity(rows.entries.len() + rows.unreadable.len());
            for entry in &rows.entries {
                items.push(serde_json::to_value(entry)?);
            }
            items.extend(rows.unreadable);
            self.write_atomic(&serde_json::to_string_pretty(&Value::Array(items))?)?;
        }
        Ok(result)
    }

    /// Atomically replace the collection.
    pub fn write(&self, entries: &[TrackingEntry]) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(entries)?;
        self.write_atomic(&json)
    }

    /// Replace the collection with a raw JSON value.
    ///
    /// Anything other than an array is refused: the refusal is reported and
    /// the file is left as it was.
    pub fn write_value(&self, value: &Value) -> Result<(), StateError> {
        if !value.is_array() {
            self.diag.error(format!(
                "Refusing to write non-array data to {}",
                self.path.display()
            ));
            return Ok(());
        }
        let json = serde_json::to_string_pretty(value)?;
        self.write_atomic(&json)
    }

    fn write_atomic(&self, json: &str) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::io(parent, e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StateError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StateError::io(&self.path, e))?;
        Ok(())
    }

    /// Append one entry. Duplicates are kept.
    pub fn append(&self, entry: TrackingEntry) -> Result<(), StateError> {
        self.update(|entries| entries.push(entry))
    }

    /// Ids of every entry.
    pub fn id_set(&self) -> HashSet<String> {
        self.read().into_iter().map(|e| e.id).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().iter().any(|e| e.id == id)
    }

    /// Remove every entry with the given id. Returns how many were removed;
    /// the file is only rewritten when something changed.
    pub fn remove_by_id(&self, id: &str) -> Result<usize, StateError> {
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            before - entries.len()
        })
    }
}

impl std::fmt::Debug for TrackingCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingCollection")
            .field("path", &self.path)
            .finish()
    }
}
