//! SQL statement classification.
//!
//! Only the leading keyword is inspected; the statement itself is passed to
//! the backend untouched.

/// Statement category derived from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Truncate,
    Other,
}

impl StatementKind {
    /// Classify by the first whitespace-delimited token, case-insensitively.
    pub fn classify(sql: &str) -> Self {
        let Some(first) = sql.split_whitespace().next() else {
            return StatementKind::Other;
        };
        match first.to_ascii_uppercase().as_str() {
            "SELECT" => StatementKind::Select,
            "INSERT" => StatementKind::Insert,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            "CREATE" => StatementKind::Create,
            "DROP" => StatementKind::Drop,
            "ALTER" => StatementKind::Alter,
            "TRUNCATE" => StatementKind::Truncate,
            _ => StatementKind::Other,
        }
    }

    /// Operation kind tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Create => "CREATE",
            StatementKind::Drop => "DROP",
            StatementKind::Alter => "ALTER",
            StatementKind::Truncate => "TRUNCATE",
            StatementKind::Other => "OTHER",
        }
    }

    /// Whether the statement returns rows.
    pub fn is_read(&self) -> bool {
        matches!(self, StatementKind::Select)
    }
}
