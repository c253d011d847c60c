//! MemoryKeyValueStore: embedded key-value backend
//!
//! ## Design
//!
//! The keyspace is a `DashMap` of typed entries (string, hash, list, set),
//! each with an optional deadline. Expiry is lazy: an expired key is removed
//! the next time anything touches it, and skipped by `KEYS`.
//!
//! Hashes and sets are ordered collections, so `HGETALL` and `SMEMBERS`
//! return fields and members in sorted order.
//!
//! ## Thread Safety
//!
//! All operations take `&self`. Single-key operations are atomic per key;
//! `KEYS` sees a per-shard consistent view.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use regex::Regex;

use crate::traits::KeyValueClient;
use crate::{EngineError, EngineResult};

/// TTL reported for a key without expiry.
pub const TTL_PERSISTENT: i64 = -1;
/// TTL reported for a missing key.
pub const TTL_MISSING: i64 = -2;

#[derive(Debug, Clone, PartialEq)]
enum Data {
    Str(String),
    Hash(BTreeMap<String, String>),
    List(VecDeque<String>),
    Set(BTreeSet<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    data: Data,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(data: Data) -> Self {
        Self {
            data,
            expires_at: None,
        }
    }

    /// Expiry instant for `ttl` from now; a TTL past the clock's range never expires.
    fn deadline(ttl: Duration) -> Option<Instant> {
        Instant::now().checked_add(ttl)
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process [`KeyValueClient`].
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: DashMap<String, Entry>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    /// Whether there are no live keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge(&self, key: &str) {
        let now = Instant::now();
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
    }

    fn read<T>(&self, key: &str, missing: T, f: impl FnOnce(&Data) -> EngineResult<T>) -> EngineResult<T> {
        self.purge(key);
        match self.entries.get(key) {
            Some(entry) => f(&entry.data),
            None => Ok(missing),
        }
    }

    fn write<T>(
        &self,
        key: &str,
        create: impl FnOnce() -> Data,
        f: impl FnOnce(&mut Data) -> EngineResult<T>,
    ) -> EngineResult<T> {
        self.purge(key);
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(create()));
        f(&mut entry.data)
    }
}

/// Translate a glob pattern into an anchored regex.
///
/// `*` any run, `?` one char, `[abc]`/`[^a-z]` classes, `\x` literal `x`.
pub fn glob_to_regex(pattern: &str) -> EngineResult<Regex> {
    let mut re = String::from("(?s)^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    re.push_str(&regex::escape(&next.to_string()));
                }
            }
            '[' => {
                re.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    re.push('^');
                }
                loop {
                    match chars.next() {
                        None => {
                            return Err(EngineError::invalid_query(
                                "pattern",
                                format!("unterminated character class in '{pattern}'"),
                            ))
                        }
                        Some(']') => break,
                        Some('-') => re.push('-'),
                        Some('\\') => {
                            if let Some(next) = chars.next() {
                                re.push_str(&regex::escape(&next.to_string()));
                            }
                        }
                        Some(other) => re.push_str(&regex::escape(&other.to_string())),
                    }
                }
                re.push(']');
            }
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| EngineError::invalid_query("pattern", e.to_string()))
}

impl KeyValueClient for MemoryKeyValueStore {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        self.read(key, None, |data| match data {
            Data::Str(s) => Ok(Some(s.clone())),
            _ => Err(EngineError::WrongType),
        })
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> EngineResult<()> {
        let mut entry = Entry::new(Data::Str(value.to_string()));
        entry.expires_at = ttl.and_then(Entry::deadline);
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, keys: &[String]) -> EngineResult<u64> {
        let mut removed = 0;
        for key in keys {
            self.purge(key);
            if self.entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn exists(&self, key: &str) -> EngineResult<bool> {
        self.purge(key);
        Ok(self.entries.contains_key(key))
    }

    fn keys(&self, pattern: &str) -> EngineResult<Vec<String>> {
        let matcher = glob_to_regex(pattern)?;
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !e.is_expired(now) && matcher.is_match(e.key()))
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn hget(&self, key: &str, field: &str) -> EngineResult<Option<String>> {
        self.read(key, None, |data| match data {
            Data::Hash(h) => Ok(h.get(field).cloned()),
            _ => Err(EngineError::WrongType),
        })
    }

    fn hset(&self, key: &str, field: &str, value: &str) -> EngineResult<bool> {
        self.write(key, || Data::Hash(BTreeMap::new()), |data| match data {
            Data::Hash(h) => Ok(h.insert(field.to_string(), value.to_string()).is_none()),
            _ => Err(EngineError::WrongType),
        })
    }

    fn hgetall(&self, key: &str) -> EngineResult<Vec<(String, String)>> {
        self.read(key, Vec::new(), |data| match data {
            Data::Hash(h) => Ok(h.iter().map(|(f, v)| (f.clone(), v.clone())).collect()),
            _ => Err(EngineError::WrongType),
        })
    }

    fn lrange(&self, key: &str, start: i64, end: i64) -> EngineResult<Vec<String>> {
        self.read(key, Vec::new(), |data| {
            let list = match data {
                Data::List(l) => l,
                _ => return Err(EngineError::WrongType),
            };
            let len = list.len() as i64;
            let start = if start < 0 { (start + len).max(0) } else { start };
            let end = if end < 0 { end + len } else { end.min(len - 1) };
            if start > end || start >= len {
                return Ok(Vec::new());
            }
            Ok(list
                .iter()
                .skip(start as usize)
                .take((end - start + 1) as usize)
                .cloned()
                .collect())
        })
    }

    fn lpush(&self, key: &str, values: &[String]) -> EngineResult<u64> {
        self.write(key, || Data::List(VecDeque::new()), |data| match data {
            Data::List(l) => {
                for v in values {
                    l.push_front(v.clone());
                }
                Ok(l.len() as u64)
            }
            _ => Err(EngineError::WrongType),
        })
    }

    fn rpush(&self, key: &str, values: &[String]) -> EngineResult<u64> {
        self.write(key, || Data::List(VecDeque::new()), |data| match data {
            Data::List(l) => {
                l.extend(values.iter().cloned());
                Ok(l.len() as u64)
            }
            _ => Err(EngineError::WrongType),
        })
    }

    fn smembers(&self, key: &str) -> EngineResult<Vec<String>> {
        self.read(key, Vec::new(), |data| match data {
            Data::Set(s) => Ok(s.iter().cloned().collect()),
            _ => Err(EngineError::WrongType),
        })
    }

    fn sadd(&self, key: &str, members: &[String]) -> EngineResult<u64> {
        self.write(key, || Data::Set(BTreeSet::new()), |data| match data {
            Data::Set(s) => Ok(members.iter().filter(|m| s.insert((*m).clone())).count() as u64),
            _ => Err(EngineError::WrongType),
        })
    }

    fn ttl(&self, key: &str) -> EngineResult<i64> {
        self.purge(key);
        let Some(entry) = self.entries.get(key) else {
            return Ok(TTL_MISSING);
        };
        Ok(match entry.expires_at {
            None => TTL_PERSISTENT,
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                ((remaining.as_millis() + 500) / 1000) as i64
            }
        })
    }

    fn expire(&self, key: &str, seconds: i64) -> EngineResult<bool> {
        self.purge(key);
        if seconds <= 0 {
            return Ok(self.entries.remove(key).is_some());
        }
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.expires_at = Entry::deadline(Duration::from_secs(seconds as u64));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ping(&self) -> EngineResult<()> {
        Ok(())
    }
}
