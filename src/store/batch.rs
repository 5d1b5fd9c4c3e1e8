//! Grouped writes flushed to the store in a single round trip.
//!
//! A batch is a best-effort grouping, not a transaction: other clients may
//! observe the store between any two operations of a batch being applied.

/// A single queued mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Set one field of a hash
    HashSet {
        key: String,
        field: String,
        value: String,
    },

    /// Delete fields of a hash
    HashDelete { key: String, fields: Vec<String> },

    /// Delete whole keys of any type
    Delete { keys: Vec<String> },

    /// Add members to a set
    SetAdd { key: String, members: Vec<String> },

    /// Remove members from a set
    SetRemove { key: String, members: Vec<String> },

    /// Add or rescore a sorted-set member
    SortedSetAdd {
        key: String,
        member: String,
        score: f64,
    },

    /// Remove members from a sorted set
    SortedSetRemove { key: String, members: Vec<String> },
}

/// An ordered list of writes.
///
/// Builders skip operations with nothing to act on, since the store rejects
/// variadic commands given zero arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_set(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(WriteOp::HashSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn hash_delete(&mut self, key: impl Into<String>, fields: Vec<String>) -> &mut Self {
        if !fields.is_empty() {
            self.ops.push(WriteOp::HashDelete {
                key: key.into(),
                fields,
            });
        }
        self
    }

    pub fn delete(&mut self, keys: Vec<String>) -> &mut Self {
        if !keys.is_empty() {
            self.ops.push(WriteOp::Delete { keys });
        }
        self
    }

    pub fn set_add(&mut self, key: impl Into<String>, members: Vec<String>) -> &mut Self {
        if !members.is_empty() {
            self.ops.push(WriteOp::SetAdd {
                key: key.into(),
                members,
            });
        }
        self
    }

    pub fn set_remove(&mut self, key: impl Into<String>, members: Vec<String>) -> &mut Self {
        if !members.is_empty() {
            self.ops.push(WriteOp::SetRemove {
                key: key.into(),
                members,
            });
        }
        self
    }

    pub fn sorted_set_add(
        &mut self,
        key: impl Into<String>,
        member: impl Into<String>,
        score: f64,
    ) -> &mut Self {
        self.ops.push(WriteOp::SortedSetAdd {
            key: key.into(),
            member: member.into(),
            score,
        });
        self
    }

    pub fn sorted_set_remove(&mut self, key: impl Into<String>, members: Vec<String>) -> &mut Self {
        if !members.is_empty() {
            self.ops.push(WriteOp::SortedSetRemove {
                key: key.into(),
                members,
            });
        }
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
