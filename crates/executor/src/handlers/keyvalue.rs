//! Key-value adapter.
//!
//! | Command | Result |
//! |---------|--------|
//! | GET | `{key, value}` (`value` null when absent) |
//! | EXISTS | `{key, exists}` |
//! | KEYS | one `{key}` per match |
//! | HGET | `{key, field, value}` |
//! | HGETALL | one `{field, value}` per pair |
//! | LRANGE | one `{index, value}` per element, zero-based |
//! | SMEMBERS | one `{value}` per member |
//! | TTL | `{key, ttl}`, `-1` no expiry, `-2` missing |
//! | SET, HSET | count 1 |
//! | DEL | keys removed |
//! | LPUSH, RPUSH | new list length |
//! | SADD | members added |
//! | EXPIRE | 1, or 0 when the key is missing |

use std::time::Duration;

use querygate_engine::KeyValueClient;
use serde_json::json;

use super::row;
use crate::normalize::{KvAction, KvOperation};
use crate::{QueryResult, Result};

/// Execute one key-value command in either surface form.
pub fn execute(client: &dyn KeyValueClient, command: &str) -> Result<QueryResult> {
    let op = KvOperation::parse(command)?;
    let kind = op.kind();

    Ok(match op.action {
        KvAction::Get { key } => {
            let value = client.get(&key)?;
            QueryResult::read(kind, vec![row([("key", json!(key)), ("value", json!(value))])])
        }
        KvAction::Set { key, value, expire } => {
            let ttl = expire.filter(|s| *s > 0).map(|s| Duration::from_secs(s as u64));
            client.set(&key, &value, ttl)?;
            QueryResult::write(kind, 1)
        }
        KvAction::Del { keys } => QueryResult::write(kind, client.delete(&keys)?),
        KvAction::Exists { key } => {
            let exists = client.exists(&key)?;
            QueryResult::read(kind, vec![row([("key", json!(key)), ("exists", json!(exists))])])
        }
        KvAction::Keys { pattern } => {
            let rows = client
                .keys(&pattern)?
                .into_iter()
                .map(|key| row([("key", json!(key))]))
                .collect();
            QueryResult::read(kind, rows)
        }
        KvAction::HGet { key, field } => {
            let value = client.hget(&key, &field)?;
            QueryResult::read(
                kind,
                vec![row([("key", json!(key)), ("field", json!(field)), ("value", json!(value))])],
            )
        }
        KvAction::HSet { key, field, value } => {
            client.hset(&key, &field, &value)?;
            QueryResult::write(kind, 1)
        }
        KvAction::HGetAll { key } => {
            let rows = client
                .hgetall(&key)?
                .into_iter()
                .map(|(field, value)| row([("field", json!(field)), ("value", json!(value))]))
                .collect();
            QueryResult::read(kind, rows)
        }
        KvAction::LRange { key, start, end } => {
            let rows = client
                .lrange(&key, start, end)?
                .into_iter()
                .enumerate()
                .map(|(index, value)| row([("index", json!(index)), ("value", json!(value))]))
                .collect();
            QueryResult::read(kind, rows)
        }
        KvAction::LPush { key, values } => QueryResult::write(kind, client.lpush(&key, &values)?),
        KvAction::RPush { key, values } => QueryResult::write(kind, client.rpush(&key, &values)?),
        KvAction::SMembers { key } => {
            let rows = client
                .smembers(&key)?
                .into_iter()
                .map(|value| row([("value", json!(value))]))
                .collect();
            QueryResult::read(kind, rows)
        }
        KvAction::SAdd { key, members } => QueryResult::write(kind, client.sadd(&key, &members)?),
        KvAction::Ttl { key } => {
            let ttl = client.ttl(&key)?;
            QueryResult::read(kind, vec![row([("key", json!(key)), ("ttl", json!(ttl))])])
        }
        KvAction::Expire { key, seconds } => {
            let applied = client.expire(&key, seconds)?;
            QueryResult::write(kind, u64::from(applied))
        }
    })
}
