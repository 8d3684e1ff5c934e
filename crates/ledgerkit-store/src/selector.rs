//! Rich query selectors.
//!
//! Queries are JSON documents in the style of CouchDB's Mango syntax:
//!
//! ```json
//! {"selector": {"docType": "asset", "value": {"$gt": 100}}, "limit": 10}
//! ```
//!
//! Supported operators: implicit equality, `$eq`, `$ne`, `$gt`, `$gte`,
//! `$lt`, `$lte`, `$in`, `$nin`, `$exists`, `$and`, `$or`. Field names may be
//! dotted paths (`owner.name`) or nested objects. Ledger values that are not
//! JSON objects never match. `sort`, `fields`, `use_index` and `bookmark`
//! are accepted and ignored: results keep ledger order.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// A parsed rich query.
#[derive(Debug, Clone, PartialEq)]
pub struct RichQuery {
    selector: Selector,
    limit: Option<usize>,
    skip: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    All(Vec<Selector>),
    Any(Vec<Selector>),
    Field { path: Vec<String>, op: Op },
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
}

impl RichQuery {
    /// Parse a query string.
    pub fn parse(query: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(query)
            .map_err(|e| StoreError::InvalidQuery(format!("not JSON: {}", e)))?;
        let doc = match doc {
            Value::Object(doc) => doc,
            _ => return Err(StoreError::InvalidQuery("query must be an object".into())),
        };

        let selector = match doc.get("selector") {
            Some(Value::Object(sel)) => parse_selector(sel, &[])?,
            Some(_) => return Err(StoreError::InvalidQuery("selector must be an object".into())),
            None => return Err(StoreError::InvalidQuery("missing selector".into())),
        };

        Ok(Self {
            selector,
            limit: parse_count(&doc, "limit")?,
            skip: parse_count(&doc, "skip")?.unwrap_or(0),
        })
    }

    /// Whether a raw ledger value matches the selector.
    pub fn matches_bytes(&self, raw: &[u8]) -> bool {
        match serde_json::from_slice::<Value>(raw) {
            Ok(doc @ Value::Object(_)) => self.matches(&doc),
            _ => false,
        }
    }

    /// Whether a JSON document matches the selector.
    pub fn matches(&self, doc: &Value) -> bool {
        self.selector.matches(doc)
    }

    /// Filter `(key, raw value)` pairs in order, applying `skip` and `limit`.
    pub fn filter<I, K, V>(&self, entries: I) -> Vec<(K, V)>
    where
        I: IntoIterator<Item = (K, V)>,
        V: AsRef<[u8]>,
    {
        entries
            .into_iter()
            .filter(|(_, v)| self.matches_bytes(v.as_ref()))
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

fn parse_count(doc: &Map<String, Value>, name: &str) -> Result<Option<usize>> {
    match doc.get(name) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| StoreError::InvalidQuery(format!("{} must be a non-negative integer", name))),
    }
}

fn parse_selector(sel: &Map<String, Value>, prefix: &[String]) -> Result<Selector> {
    let mut parts = Vec::with_capacity(sel.len());
    for (key, cond) in sel {
        match key.as_str() {
            "$and" | "$or" => {
                let items = cond.as_array().ok_or_else(|| {
                    StoreError::InvalidQuery(format!("{} expects an array", key))
                })?;
                let mut subs = Vec::with_capacity(items.len());
                for item in items {
                    let obj = item.as_object().ok_or_else(|| {
                        StoreError::InvalidQuery(format!("{} items must be objects", key))
                    })?;
                    subs.push(parse_selector(obj, prefix)?);
                }
                parts.push(if key == "$and" { Selector::All(subs) } else { Selector::Any(subs) });
            }
            op if op.starts_with('$') => {
                if prefix.is_empty() {
                    return Err(StoreError::InvalidQuery(format!("operator {} needs a field", op)));
                }
                parts.push(Selector::Field {
                    path: prefix.to_vec(),
                    op: parse_op(op, cond)?,
                });
            }
            field => {
                let mut path = prefix.to_vec();
                path.extend(field.split('.').map(str::to_string));
                parts.push(parse_condition(cond, path)?);
            }
        }
    }
    Ok(Selector::All(parts))
}

fn parse_condition(cond: &Value, path: Vec<String>) -> Result<Selector> {
    match cond {
        Value::Object(obj) if !obj.is_empty() => parse_selector(obj, &path),
        other => Ok(Selector::Field {
            path,
            op: Op::Eq(other.clone()),
        }),
    }
}

fn parse_op(op: &str, arg: &Value) -> Result<Op> {
    let list = |arg: &Value| -> Result<Vec<Value>> {
        arg.as_array()
            .cloned()
            .ok_or_else(|| StoreError::InvalidQuery(format!("{} expects an array", op)))
    };
    Ok(match op {
        "$eq" => Op::Eq(arg.clone()),
        "$ne" => Op::Ne(arg.clone()),
        "$gt" => Op::Gt(arg.clone()),
        "$gte" => Op::Gte(arg.clone()),
        "$lt" => Op::Lt(arg.clone()),
        "$lte" => Op::Lte(arg.clone()),
        "$in" => Op::In(list(arg)?),
        "$nin" => Op::Nin(list(arg)?),
        "$exists" => Op::Exists(
            arg.as_bool()
                .ok_or_else(|| StoreError::InvalidQuery("$exists expects a boolean".into()))?,
        ),
        other => return Err(StoreError::InvalidQuery(format!("unsupported operator {}", other))),
    })
}

impl Selector {
    fn matches(&self, doc: &Value) -> bool {
        match self {
            Selector::All(parts) => parts.iter().all(|p| p.matches(doc)),
            Selector::Any(parts) => parts.iter().any(|p| p.matches(doc)),
            Selector::Field { path, op } => op.matches(lookup(doc, path)),
        }
    }
}

impl Op {
    fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Op::Exists(want), v) => v.is_some() == *want,
            (Op::Ne(arg), Some(v)) => !json_eq(v, arg),
            (Op::Nin(args), Some(v)) => !args.iter().any(|a| json_eq(v, a)),
            (_, None) => false,
            (Op::Eq(arg), Some(v)) => json_eq(v, arg),
            (Op::In(args), Some(v)) => args.iter().any(|a| json_eq(v, a)),
            (Op::Gt(arg), Some(v)) => json_cmp(v, arg) == Some(Ordering::Greater),
            (Op::Gte(arg), Some(v)) => {
                matches!(json_cmp(v, arg), Some(Ordering::Greater | Ordering::Equal))
            }
            (Op::Lt(arg), Some(v)) => json_cmp(v, arg) == Some(Ordering::Less),
            (Op::Lte(arg), Some(v)) => {
                matches!(json_cmp(v, arg), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

fn lookup<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |cur, seg| cur.as_object()?.get(seg))
}

/// Equality with numbers compared by value (`1 == 1.0`).
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between two numbers or two strings; other pairs are unordered.
fn json_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(s: &str) -> RichQuery {
        RichQuery::parse(s).unwrap()
    }

    #[test]
    fn test_implicit_equality() {
        let query = q(r#"{"selector":{"docType":"asset"}}"#);
        assert!(query.matches(&json!({"docType": "asset", "id": 1})));
        assert!(!query.matches(&json!({"docType": "user"})));
        assert!(!query.matches(&json!({"id": 1})));
    }

    #[test]
    fn test_comparison_operators() {
        let query = q(r#"{"selector":{"value":{"$gt":100,"$lte":300}}}"#);
        assert!(query.matches(&json!({"value": 300})));
        assert!(query.matches(&json!({"value": 100.5})));
        assert!(!query.matches(&json!({"value": 100})));
        assert!(!query.matches(&json!({"value": "200"})));
    }

    #[test]
    fn test_nested_and_dotted_paths() {
        let doc = json!({"owner": {"name": "alice", "org": "Org1"}});
        assert!(q(r#"{"selector":{"owner.name":"alice"}}"#).matches(&doc));
        assert!(q(r#"{"selector":{"owner":{"org":"Org1"}}}"#).matches(&doc));
        assert!(!q(r#"{"selector":{"owner.name":"bob"}}"#).matches(&doc));
    }

    #[test]
    fn test_in_nin_exists() {
        let doc = json!({"color": "red"});
        assert!(q(r#"{"selector":{"color":{"$in":["red","blue"]}}}"#).matches(&doc));
        assert!(!q(r#"{"selector":{"color":{"$nin":["red"]}}}"#).matches(&doc));
        assert!(q(r#"{"selector":{"size":{"$exists":false}}}"#).matches(&doc));
        assert!(q(r#"{"selector":{"color":{"$ne":"blue"}}}"#).matches(&doc));
        // $ne does not match a missing field
        assert!(!q(r#"{"selector":{"size":{"$ne":3}}}"#).matches(&doc));
    }

    #[test]
    fn test_and_or() {
        let query = q(r#"{"selector":{"$or":[{"color":"red"},{"size":{"$gte":10}}]}}"#);
        assert!(query.matches(&json!({"color": "red", "size": 1})));
        assert!(query.matches(&json!({"color": "blue", "size": 10})));
        assert!(!query.matches(&json!({"color": "blue", "size": 9})));

        let query = q(r#"{"selector":{"$and":[{"color":"red"},{"size":1}]}}"#);
        assert!(query.matches(&json!({"color": "red", "size": 1})));
        assert!(!query.matches(&json!({"color": "red", "size": 2})));
    }

    #[test]
    fn test_empty_selector_matches_objects_only() {
        let query = q(r#"{"selector":{}}"#);
        assert!(query.matches_bytes(br#"{"a":1}"#));
        assert!(!query.matches_bytes(b"[1,2]"));
        assert!(!query.matches_bytes(b"\x00\x01binary"));
    }

    #[test]
    fn test_skip_and_limit() {
        let query = q(r#"{"selector":{"t":"x"},"skip":1,"limit":2}"#);
        let entries: Vec<(String, Vec<u8>)> = (0..5)
            .map(|i| (format!("k{}", i), br#"{"t":"x"}"#.to_vec()))
            .collect();
        let keys: Vec<String> = query.filter(entries).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["k1", "k2"]);
    }

    #[test]
    fn test_invalid_queries() {
        for bad in [
            "not json",
            "[]",
            r#"{"limit":1}"#,
            r#"{"selector":[]}"#,
            r#"{"selector":{"$gt":1}}"#,
            r#"{"selector":{"a":{"$regex":"x"}}}"#,
            r#"{"selector":{"a":{"$in":1}}}"#,
            r#"{"selector":{"a":1},"limit":-1}"#,
        ] {
            assert!(
                matches!(RichQuery::parse(bad), Err(StoreError::InvalidQuery(_))),
                "expected rejection: {}",
                bad
            );
        }
    }
}
