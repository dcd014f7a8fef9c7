//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StoreError;

use super::store::{DocumentStore, SqlQuerySpec};

/// `SELECT [TOP n] * FROM <c> <alias> WHERE (<alias>.<field> = @param) ORDER BY <alias>.<field> [ASC|DESC]`
static SELECT_ORDERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*SELECT\s+(?:TOP\s+\d+\s+)?\*\s+FROM\s+\w+\s+(?P<alias>\w+)\s+WHERE\s+\(?\s*(?P<walias>\w+)\.(?P<field>\w+)\s*=\s*(?P<param>@\w+)\s*\)?\s+ORDER\s+BY\s+(?P<oalias>\w+)\.(?P<order>\w+)(?:\s+(?P<dir>ASC|DESC))?\s*$",
    )
    .expect("query pattern is valid")
});

/// Documents of one collection, keyed by `(partition key, id)`.
type Collection = HashMap<(String, String), Value>;

/// In-memory document store backed by a HashMap per collection.
///
/// Ids are unique per partition, as in the real store. Clone-friendly via Arc:
/// clones share the same documents.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<HashMap<String, Collection>>>,
}

/// A query this store knows how to evaluate.
struct SelectOrdered {
    field: String,
    value: Value,
    order_by: String,
    descending: bool,
}

impl InMemoryDocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents of a collection, ordered by id.
    pub fn documents(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("document scan"))?;

        let mut docs: Vec<Value> = storage
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default();
        docs.sort_by(|a, b| compare_values(a.get("id"), b.get("id")));
        Ok(docs)
    }

    fn parse_query(query: &SqlQuerySpec) -> Result<SelectOrdered, StoreError> {
        let unsupported = || StoreError::Request {
            code: 400,
            message: format!("unsupported query: {}", query.query),
        };

        let caps = SELECT_ORDERED.captures(&query.query).ok_or_else(unsupported)?;
        let alias = &caps["alias"];
        if &caps["walias"] != alias || &caps["oalias"] != alias {
            return Err(unsupported());
        }

        let param = &caps["param"];
        let value = query.parameter(param).cloned().ok_or_else(|| StoreError::Request {
            code: 400,
            message: format!("missing query parameter {}", param),
        })?;

        Ok(SelectOrdered {
            field: caps["field"].to_string(),
            value,
            order_by: caps["order"].to_string(),
            descending: caps
                .name("dir")
                .is_some_and(|d| d.as_str().eq_ignore_ascii_case("DESC")),
        })
    }
}

/// Total order over JSON values for ORDER BY: missing < null < bool < number < string.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_u64(), y.as_u64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn metadata(collection: &str) -> (String, String, String, i64) {
    let rid = STANDARD.encode(Uuid::new_v4().as_bytes());
    let self_link = format!("{}/docs/{}", collection, rid);
    let etag = format!("\"{}\"", Uuid::new_v4());
    (rid, self_link, etag, Utc::now().timestamp())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        document: Value,
        partition_key: &str,
    ) -> Result<Value, StoreError> {
        let Value::Object(mut body) = document else {
            return Err(StoreError::Request {
                code: 400,
                message: "document must be a JSON object".into(),
            });
        };
        let id = match body.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => {
                return Err(StoreError::Request {
                    code: 400,
                    message: "document id must be a non-empty string".into(),
                })
            }
        };

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("document insert"))?;

        let docs = storage.entry(collection.to_string()).or_default();
        let key = (partition_key.to_string(), id);
        if docs.contains_key(&key) {
            warn!(collection, id = %key.1, partition_key, "document id conflict");
            return Err(StoreError::Conflict {
                id: key.1,
                partition_key: key.0,
            });
        }

        let (rid, self_link, etag, ts) = metadata(collection);
        body.insert("_rid".into(), Value::String(rid));
        body.insert("_self".into(), Value::String(self_link));
        body.insert("_etag".into(), Value::String(etag));
        body.insert("_ts".into(), Value::from(ts));

        let stored = Value::Object(body);
        debug!(collection, id = %key.1, partition_key, "document inserted");
        docs.insert(key, stored.clone());
        Ok(stored)
    }

    async fn read(
        &self,
        collection: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<Value>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("document read"))?;

        Ok(storage
            .get(collection)
            .and_then(|docs| docs.get(&(partition_key.to_string(), id.to_string())))
            .cloned())
    }

    async fn query_one(
        &self,
        collection: &str,
        query: &SqlQuerySpec,
    ) -> Result<Option<Value>, StoreError> {
        let select = Self::parse_query(query)?;

        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("document query"))?;

        let first = storage
            .get(collection)
            .into_iter()
            .flat_map(|docs| docs.values())
            .filter(|doc| doc.get(&select.field) == Some(&select.value))
            .min_by(|a, b| {
                let by_order = compare_values(a.get(&select.order_by), b.get(&select.order_by));
                let by_order = if select.descending {
                    by_order.reverse()
                } else {
                    by_order
                };
                by_order.then_with(|| compare_values(a.get("id"), b.get("id")))
            });

        match first {
            Some(doc) => Ok(Some(doc.clone())),
            None => Err(StoreError::NotFound),
        }
    }
}
