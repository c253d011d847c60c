//! Key-value command normalization.
//!
//! Two input surfaces are accepted:
//!
//! - native terse form: `SET user:1 alice EX 60`
//! - JSON form: `{"command": "SET", "key": "user:1", "value": "alice", "expire": 60}`
//!
//! Both are first reduced to the same [`KvParams`], then validated into a
//! typed [`KvAction`] by one shared routine. Equivalent inputs therefore
//! produce identical actions regardless of surface.
//!
//! The native grammar is the static [`GRAMMAR`] table: each command lists the
//! slots its tokens fill, in order. Adding a command is a table entry.

use querygate_core::{json_to_text, JsonValue, Row};

use crate::{Error, Result};

/// Supported key-value commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KvCommand {
    Get,
    Set,
    Del,
    Exists,
    Keys,
    HGet,
    HSet,
    HGetAll,
    LRange,
    LPush,
    RPush,
    SMembers,
    SAdd,
    Ttl,
    Expire,
}

impl KvCommand {
    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            KvCommand::Get => "GET",
            KvCommand::Set => "SET",
            KvCommand::Del => "DEL",
            KvCommand::Exists => "EXISTS",
            KvCommand::Keys => "KEYS",
            KvCommand::HGet => "HGET",
            KvCommand::HSet => "HSET",
            KvCommand::HGetAll => "HGETALL",
            KvCommand::LRange => "LRANGE",
            KvCommand::LPush => "LPUSH",
            KvCommand::RPush => "RPUSH",
            KvCommand::SMembers => "SMEMBERS",
            KvCommand::SAdd => "SADD",
            KvCommand::Ttl => "TTL",
            KvCommand::Expire => "EXPIRE",
        }
    }

    /// Operation kind tag, e.g. `KV_GET`.
    pub fn kind(&self) -> String {
        format!("KV_{}", self.as_str())
    }
}

/// What a native token fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Key,
    Field,
    Value,
    Start,
    End,
    Seconds,
    /// Optional trailing pattern.
    Pattern,
    /// One or more trailing values.
    Values,
    /// Optional trailing `EX <seconds>`.
    Expiry,
}

/// One row of the native grammar.
#[derive(Debug)]
pub struct Grammar {
    /// Accepted names; the first is canonical.
    pub names: &'static [&'static str],
    pub command: KvCommand,
    pub slots: &'static [Slot],
    pub usage: &'static str,
}

use Slot::*;

/// Native grammar table.
pub static GRAMMAR: &[Grammar] = &[
    Grammar { names: &["GET"], command: KvCommand::Get, slots: &[Key], usage: "GET key" },
    Grammar { names: &["SET"], command: KvCommand::Set, slots: &[Key, Value, Expiry], usage: "SET key value [EX seconds]" },
    Grammar { names: &["DEL", "DELETE"], command: KvCommand::Del, slots: &[Key], usage: "DEL key" },
    Grammar { names: &["EXISTS"], command: KvCommand::Exists, slots: &[Key], usage: "EXISTS key" },
    Grammar { names: &["KEYS"], command: KvCommand::Keys, slots: &[Pattern], usage: "KEYS [pattern]" },
    Grammar { names: &["HGET"], command: KvCommand::HGet, slots: &[Key, Field], usage: "HGET key field" },
    Grammar { names: &["HSET"], command: KvCommand::HSet, slots: &[Key, Field, Value], usage: "HSET key field value" },
    Grammar { names: &["HGETALL"], command: KvCommand::HGetAll, slots: &[Key], usage: "HGETALL key" },
    Grammar { names: &["LRANGE"], command: KvCommand::LRange, slots: &[Key, Start, End], usage: "LRANGE key start end" },
    Grammar { names: &["LPUSH"], command: KvCommand::LPush, slots: &[Key, Values], usage: "LPUSH key value [value ...]" },
    Grammar { names: &["RPUSH"], command: KvCommand::RPush, slots: &[Key, Values], usage: "RPUSH key value [value ...]" },
    Grammar { names: &["SMEMBERS"], command: KvCommand::SMembers, slots: &[Key], usage: "SMEMBERS key" },
    Grammar { names: &["SADD"], command: KvCommand::SAdd, slots: &[Key, Values], usage: "SADD key member [member ...]" },
    Grammar { names: &["TTL"], command: KvCommand::Ttl, slots: &[Key], usage: "TTL key" },
    Grammar { names: &["EXPIRE"], command: KvCommand::Expire, slots: &[Key, Seconds], usage: "EXPIRE key seconds" },
];

impl Grammar {
    /// Find the grammar row for a command name, case-insensitively.
    pub fn lookup(name: &str) -> Result<&'static Grammar> {
        let upper = name.trim().to_ascii_uppercase();
        GRAMMAR
            .iter()
            .find(|g| g.names.contains(&upper.as_str()))
            .ok_or_else(|| Error::invalid(format!("unsupported key-value command: {}", name.trim())))
    }

    fn arity_error(&self) -> Error {
        Error::invalid(format!("wrong number of arguments, usage: {}", self.usage))
    }
}

/// Parameters extracted from either surface, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvParams {
    pub key: Option<String>,
    pub keys: Vec<String>,
    pub field: Option<String>,
    pub value: Option<String>,
    pub values: Vec<String>,
    pub pattern: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub seconds: Option<i64>,
    pub expire: Option<i64>,
}

/// A validated key-value action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvAction {
    Get { key: String },
    Set { key: String, value: String, expire: Option<i64> },
    Del { keys: Vec<String> },
    Exists { key: String },
    Keys { pattern: String },
    HGet { key: String, field: String },
    HSet { key: String, field: String, value: String },
    HGetAll { key: String },
    LRange { key: String, start: i64, end: i64 },
    LPush { key: String, values: Vec<String> },
    RPush { key: String, values: Vec<String> },
    SMembers { key: String },
    SAdd { key: String, members: Vec<String> },
    Ttl { key: String },
    Expire { key: String, seconds: i64 },
}

/// A normalized key-value operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvOperation {
    pub command: KvCommand,
    pub action: KvAction,
}

impl KvOperation {
    /// Parse either surface. Text starting with `{` is the JSON form.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (command, params) = if text.starts_with('{') {
            parse_json(text)?
        } else {
            parse_native(text)?
        };
        Ok(Self {
            command,
            action: validate(command, params)?,
        })
    }

    /// Operation kind tag.
    pub fn kind(&self) -> String {
        self.command.kind()
    }
}

/// Split native text into grammar slots.
pub fn parse_native(text: &str) -> Result<(KvCommand, KvParams)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some((name, args)) = tokens.split_first() else {
        return Err(Error::invalid("key-value command must not be blank"));
    };
    let grammar = Grammar::lookup(name)?;
    let mut params = KvParams::default();
    let mut pos = 0;

    let next = |pos: &mut usize| -> Result<String> {
        let token = args.get(*pos).ok_or_else(|| grammar.arity_error())?;
        *pos += 1;
        Ok(token.to_string())
    };

    for slot in grammar.slots {
        match slot {
            Key => params.key = Some(next(&mut pos)?),
            Field => params.field = Some(next(&mut pos)?),
            Value => params.value = Some(next(&mut pos)?),
            Start => params.start = Some(parse_int("start", &next(&mut pos)?)?),
            End => params.end = Some(parse_int("end", &next(&mut pos)?)?),
            Seconds => params.seconds = Some(parse_int("seconds", &next(&mut pos)?)?),
            Pattern => {
                if pos < args.len() {
                    params.pattern = Some(next(&mut pos)?);
                }
            }
            Values => {
                let rest = &args[pos.min(args.len())..];
                match rest {
                    [] => return Err(grammar.arity_error()),
                    [one] => params.value = Some(one.to_string()),
                    many => params.values = many.iter().map(|s| s.to_string()).collect(),
                }
                pos = args.len();
            }
            Expiry => {
                if pos < args.len() {
                    let marker = next(&mut pos)?;
                    if !marker.eq_ignore_ascii_case("EX") {
                        return Err(grammar.arity_error());
                    }
                    params.expire = Some(parse_int("seconds", &next(&mut pos)?)?);
                }
            }
        }
    }

    if pos < args.len() {
        return Err(grammar.arity_error());
    }
    Ok((grammar.command, params))
}

/// Read parameters from the JSON object form.
pub fn parse_json(text: &str) -> Result<(KvCommand, KvParams)> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|e| Error::invalid(format!("malformed key-value command: {e}")))?;
    let JsonValue::Object(obj) = value else {
        return Err(Error::invalid("key-value command must be a JSON object"));
    };
    let name = string_param(&obj, "command")?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::invalid("command must not be blank"))?;
    let grammar = Grammar::lookup(&name)?;

    let params = KvParams {
        key: string_param(&obj, "key")?,
        keys: list_param(&obj, "keys")?,
        field: string_param(&obj, "field")?,
        value: string_param(&obj, "value")?,
        values: list_param(&obj, "values")?,
        pattern: string_param(&obj, "pattern")?,
        start: int_param(&obj, "start")?,
        end: int_param(&obj, "end")?,
        seconds: int_param(&obj, "seconds")?,
        expire: int_param(&obj, "expire")?,
    };
    Ok((grammar.command, params))
}

/// Check the parameters a command needs and build its action.
pub fn validate(command: KvCommand, p: KvParams) -> Result<KvAction> {
    let name = command.as_str();
    let key = || {
        p.key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::invalid(format!("{name} requires key")))
    };
    let field = || {
        p.field
            .clone()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| Error::invalid(format!("{name} requires field")))
    };
    let value = || {
        p.value
            .clone()
            .ok_or_else(|| Error::invalid(format!("{name} requires value")))
    };
    let values = || {
        let mut all = p.values.clone();
        if all.is_empty() {
            all.extend(p.value.clone());
        }
        if all.is_empty() {
            return Err(Error::invalid(format!("{name} requires value or values")));
        }
        Ok(all)
    };

    Ok(match command {
        KvCommand::Get => KvAction::Get { key: key()? },
        KvCommand::Set => KvAction::Set {
            key: key()?,
            value: value()?,
            expire: p.expire,
        },
        KvCommand::Del => {
            let keys: Vec<String> = if p.keys.is_empty() {
                p.key.iter().cloned().collect()
            } else {
                p.keys.clone()
            };
            let keys: Vec<String> = keys.into_iter().filter(|k| !k.trim().is_empty()).collect();
            if keys.is_empty() {
                return Err(Error::invalid(format!("{name} requires key or keys")));
            }
            KvAction::Del { keys }
        }
        KvCommand::Exists => KvAction::Exists { key: key()? },
        KvCommand::Keys => KvAction::Keys {
            pattern: p
                .pattern
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "*".to_string()),
        },
        KvCommand::HGet => KvAction::HGet {
            key: key()?,
            field: field()?,
        },
        KvCommand::HSet => KvAction::HSet {
            key: key()?,
            field: field()?,
            value: value()?,
        },
        KvCommand::HGetAll => KvAction::HGetAll { key: key()? },
        KvCommand::LRange => KvAction::LRange {
            key: key()?,
            start: p.start.unwrap_or(0),
            end: p.end.unwrap_or(-1),
        },
        KvCommand::LPush => KvAction::LPush {
            key: key()?,
            values: values()?,
        },
        KvCommand::RPush => KvAction::RPush {
            key: key()?,
            values: values()?,
        },
        KvCommand::SMembers => KvAction::SMembers { key: key()? },
        KvCommand::SAdd => KvAction::SAdd {
            key: key()?,
            members: values()?,
        },
        KvCommand::Ttl => KvAction::Ttl { key: key()? },
        KvCommand::Expire => KvAction::Expire {
            key: key()?,
            seconds: p
                .seconds
                .ok_or_else(|| Error::invalid(format!("{name} requires seconds")))?,
        },
    })
}

fn parse_int(name: &str, token: &str) -> Result<i64> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|e| Error::invalid(format!("{name} must be an integer: {e}")))
}

/// Scalars are accepted as strings; numbers and booleans are stringified.
fn scalar_text(name: &str, value: &JsonValue) -> Result<Option<String>> {
    match value {
        JsonValue::Array(_) | JsonValue::Object(_) => {
            Err(Error::invalid(format!("{name} must be a string")))
        }
        other => Ok(json_to_text(other)),
    }
}

fn string_param(obj: &Row, name: &str) -> Result<Option<String>> {
    match obj.get(name) {
        None => Ok(None),
        Some(value) => scalar_text(name, value),
    }
}

fn list_param(obj: &Row, name: &str) -> Result<Vec<String>> {
    match obj.get(name) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.extend(scalar_text(name, item)?);
            }
            Ok(out)
        }
        Some(scalar) => Ok(scalar_text(name, scalar)?.into_iter().collect()),
    }
}

fn int_param(obj: &Row, name: &str) -> Result<Option<i64>> {
    match obj.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::invalid(format!("{name} must be an integer, got {n}"))),
        Some(JsonValue::String(s)) => parse_int(name, s).map(Some),
        Some(other) => Err(Error::invalid(format!(
            "{name} must be an integer, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(text: &str) -> KvAction {
        KvOperation::parse(text).unwrap().action
    }

    fn reason(text: &str) -> String {
        match KvOperation::parse(text).unwrap_err() {
            Error::InvalidArgument { reason } => reason,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_native_grammar() {
        assert_eq!(action("get user:1"), KvAction::Get { key: "user:1".into() });
        assert_eq!(
            action("SET k v EX 10"),
            KvAction::Set { key: "k".into(), value: "v".into(), expire: Some(10) }
        );
        assert_eq!(
            action("SET k v"),
            KvAction::Set { key: "k".into(), value: "v".into(), expire: None }
        );
        assert_eq!(action("DELETE k"), KvAction::Del { keys: vec!["k".into()] });
        assert_eq!(action("KEYS"), KvAction::Keys { pattern: "*".into() });
        assert_eq!(action("KEYS user:*"), KvAction::Keys { pattern: "user:*".into() });
        assert_eq!(
            action("LRANGE l 0 -1"),
            KvAction::LRange { key: "l".into(), start: 0, end: -1 }
        );
        assert_eq!(
            action("SADD s a b c"),
            KvAction::SAdd { key: "s".into(), members: vec!["a".into(), "b".into(), "c".into()] }
        );
        assert_eq!(action("EXPIRE k 30"), KvAction::Expire { key: "k".into(), seconds: 30 });
    }

    #[test]
    fn test_delete_reports_canonical_kind() {
        assert_eq!(KvOperation::parse("DELETE k").unwrap().kind(), "KV_DEL");
        assert_eq!(KvOperation::parse(r#"{"command": "delete", "key": "k"}"#).unwrap().kind(), "KV_DEL");
    }

    #[test]
    fn test_strict_arity() {
        assert_eq!(reason("GET"), "wrong number of arguments, usage: GET key");
        assert_eq!(reason("GET a b"), "wrong number of arguments, usage: GET key");
        assert_eq!(reason("SET k v PX 10"), "wrong number of arguments, usage: SET key value [EX seconds]");
        assert!(reason("SET k v EX").contains("SET key value [EX seconds]"));
        assert!(reason("SET k v EX 1 extra").contains("usage"));
        assert!(reason("KEYS a b").contains("KEYS [pattern]"));
        assert!(reason("LPUSH l").contains("LPUSH key value"));
        assert!(reason("HSET h f").contains("HSET key field value"));
    }

    #[test]
    fn test_bad_integers() {
        assert!(reason("LRANGE l zero 1").starts_with("start must be an integer"));
        assert!(reason("EXPIRE k soon").starts_with("seconds must be an integer"));
        assert!(reason(r#"{"command": "LRANGE", "key": "l", "start": "x"}"#).starts_with("start must be an integer"));
        assert!(reason(r#"{"command": "EXPIRE", "key": "k", "seconds": 1.5}"#).starts_with("seconds must be an integer"));
    }

    #[test]
    fn test_unknown_and_blank() {
        assert_eq!(reason("FLUSHALL"), "unsupported key-value command: FLUSHALL");
        assert_eq!(reason("   "), "key-value command must not be blank");
        assert_eq!(reason(r#"{"key": "a"}"#), "command must not be blank");
        assert!(reason("{not json").starts_with("malformed key-value command"));
    }

    #[test]
    fn test_json_form_and_coercion() {
        assert_eq!(
            action(r#"{"command": "set", "key": 42, "value": true, "expire": "5"}"#),
            KvAction::Set { key: "42".into(), value: "true".into(), expire: Some(5) }
        );
        assert_eq!(
            action(r#"{"command": "DEL", "keys": ["a", "b"]}"#),
            KvAction::Del { keys: vec!["a".into(), "b".into()] }
        );
        assert_eq!(
            action(r#"{"command": "LRANGE", "key": "l"}"#),
            KvAction::LRange { key: "l".into(), start: 0, end: -1 }
        );
        assert_eq!(action(r#"{"command": "KEYS", "pattern": " "}"#), KvAction::Keys { pattern: "*".into() });
        assert_eq!(
            action(r#"{"command": "RPUSH", "key": "l", "values": [1, 2]}"#),
            KvAction::RPush { key: "l".into(), values: vec!["1".into(), "2".into()] }
        );
    }

    #[test]
    fn test_json_required_fields() {
        assert_eq!(reason(r#"{"command": "GET"}"#), "GET requires key");
        assert_eq!(reason(r#"{"command": "SET", "key": "k"}"#), "SET requires value");
        assert_eq!(reason(r#"{"command": "HGET", "key": "h"}"#), "HGET requires field");
        assert_eq!(reason(r#"{"command": "SADD", "key": "s"}"#), "SADD requires value or values");
        assert_eq!(reason(r#"{"command": "DEL", "keys": []}"#), "DEL requires key or keys");
        assert_eq!(reason(r#"{"command": "EXPIRE", "key": "k"}"#), "EXPIRE requires seconds");
        assert_eq!(reason(r#"{"command": "GET", "key": {"a": 1}}"#), "key must be a string");
    }

    #[test]
    fn test_surfaces_agree() {
        let pairs = [
            ("GET user:1", r#"{"command": "GET", "key": "user:1"}"#),
            ("HSET h f v", r#"{"command": "HSET", "key": "h", "field": "f", "value": "v"}"#),
            ("LPUSH l a", r#"{"command": "LPUSH", "key": "l", "value": "a"}"#),
            ("LPUSH l a b", r#"{"command": "LPUSH", "key": "l", "values": ["a", "b"]}"#),
            ("SET k v EX 9", r#"{"command": "SET", "key": "k", "value": "v", "expire": 9}"#),
            ("TTL k", r#"{"command": "ttl", "key": "k"}"#),
        ];
        for (native, json) in pairs {
            assert_eq!(KvOperation::parse(native).unwrap(), KvOperation::parse(json).unwrap(), "{native}");
        }
    }
}
