//! Deterministic expression fingerprinting for downstream plan caches.
#![allow(clippy::cast_possible_truncation)]

use crate::{
    model::Value,
    query::{
        criteria::SqlParameter,
        expression::{SqlExpression, SqlInclude, SqlSortingMember, SqlWhereCriteria},
    },
};
use sha2::{Digest, Sha256};

///
/// ExpressionFingerprint
///
/// Stable SHA-256 digest of a compiled expression.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExpressionFingerprint([u8; 32]);

impl ExpressionFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl std::fmt::Display for ExpressionFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl SqlExpression {
    /// Compute a stable fingerprint for this expression.
    #[must_use]
    pub fn fingerprint(&self) -> ExpressionFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"exprfp:v1");

        write_tag(&mut hasher, 0x01);
        write_u32(&mut hasher, self.members().len() as u32);
        for member in self.members() {
            write_u32(&mut hasher, member.index as u32);
            write_str(&mut hasher, &member.path);
        }

        write_tag(&mut hasher, 0x02);
        hash_criteria(&mut hasher, self.where_criteria());

        write_tag(&mut hasher, 0x03);
        write_u32(&mut hasher, self.sorting_members().len() as u32);
        for sorting in self.sorting_members() {
            hash_sorting(&mut hasher, sorting);
        }

        write_tag(&mut hasher, 0x04);
        write_u32(&mut hasher, self.includes().len() as u32);
        for include in self.includes() {
            hash_include(&mut hasher, include);
        }

        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);

        ExpressionFingerprint(out)
    }
}

fn hash_criteria(hasher: &mut Sha256, criteria: &SqlWhereCriteria) {
    write_str(hasher, &criteria.sql);
    write_u32(hasher, criteria.params.len() as u32);
    for SqlParameter { name, value } in &criteria.params {
        write_str(hasher, name);
        write_value(hasher, value);
    }
}

fn hash_sorting(hasher: &mut Sha256, sorting: &SqlSortingMember) {
    write_u32(hasher, sorting.member_index as u32);
    write_str(hasher, &sorting.member_path);
    write_str(hasher, &sorting.alias);
    write_str(hasher, sorting.value_column);
    write_tag(hasher, sorting.direction.tag());
    write_tag(hasher, sorting.data_type_code.tag());
}

fn hash_include(hasher: &mut Sha256, include: &SqlInclude) {
    write_u32(hasher, include.index as u32);
    write_str(hasher, &include.referenced_structure_name);
    write_str(hasher, &include.alias);
    write_str(hasher, include.value_column);
    write_str(hasher, &include.id_reference_path);
    write_str(hasher, &include.object_reference_path);
    write_tag(hasher, include.data_type_code.tag());
}

fn write_value(hasher: &mut Sha256, value: &Value) {
    write_tag(hasher, value.tag());
    match value {
        Value::Null => {}
        Value::Int(v) => hasher.update(v.to_be_bytes()),
        Value::Float(v) => hasher.update(v.to_bits().to_be_bytes()),
        Value::Bool(v) => write_tag(hasher, u8::from(*v)),
        Value::Guid(v) => hasher.update(v.to_bytes()),
        Value::DateTime(_) | Value::Text(_) | Value::Enum(_) => {
            write_str(hasher, &value.to_string());
        }
        Value::List(items) => {
            write_u32(hasher, items.len() as u32);
            for item in items {
                write_value(hasher, item);
            }
        }
    }
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
