//! Version assignment policy for uploaded filenames.
//!
//! The catalog groups files into families: every record whose filename
//! differs only by its duplicate marker shares a canonical key, and the
//! marker value doubles as the record's version. Version 0 is the
//! unmarked original. An upload is planned against the set of versions
//! its family already occupies; freed versions are reused before new
//! ones are minted.

use std::collections::BTreeSet;

use fileshelf_entity::file::{CanonicalKey, FileName};

/// A fully resolved naming decision: what to store, where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePlan {
    /// The final filename to persist.
    pub filename: String,
    /// The family the record joins.
    pub key: CanonicalKey,
    /// The version slot the record occupies.
    pub version: i64,
}

/// Outcome of planning an upload against the unmarked family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPlan {
    /// The upload resolved in one pass.
    Resolved(NamePlan),
    /// The uploaded name's own marker is already an assigned version.
    /// The literal name (marker included) anchors a family of its own;
    /// the caller must fetch that family's versions and re-plan with
    /// [`plan_literal_upload`].
    MarkerCollision {
        /// Key of the literal-name family.
        literal_key: CanonicalKey,
    },
}

/// The smallest positive integer absent from `existing`.
pub fn next_version(existing: &BTreeSet<i64>) -> i64 {
    let mut candidate = 1;
    for &version in existing.range(1..) {
        if version == candidate {
            candidate += 1;
        } else {
            break;
        }
    }
    candidate
}

/// Plan an upload against the versions its unmarked family occupies.
///
/// An unmarked name takes slot 0 when free, otherwise the smallest free
/// positive slot with the matching marker appended. A marked name whose
/// marker is not yet an assigned version keeps its name verbatim and
/// joins the family at that version.
pub fn plan_upload(name: &FileName, family: &BTreeSet<i64>) -> UploadPlan {
    let key = CanonicalKey::of(name);
    match name.marker {
        None => {
            if family.contains(&0) {
                let version = next_version(family);
                UploadPlan::Resolved(NamePlan {
                    filename: name.versioned(version).render(),
                    key,
                    version,
                })
            } else {
                UploadPlan::Resolved(NamePlan {
                    filename: name.render(),
                    key,
                    version: 0,
                })
            }
        }
        Some(marker) => {
            if family.contains(&marker) {
                UploadPlan::MarkerCollision {
                    literal_key: CanonicalKey::of_literal(name),
                }
            } else {
                UploadPlan::Resolved(NamePlan {
                    filename: name.render(),
                    key,
                    version: marker,
                })
            }
        }
    }
}

/// Resolve a marker collision inside the literal-name family.
///
/// The literal uploaded name is itself already stored (that is what made
/// its marker collide), so slot 0 is never assigned here: the first copy
/// becomes version 1, appending a second marker to the literal name.
pub fn plan_literal_upload(name: &FileName, literal_family: &BTreeSet<i64>) -> NamePlan {
    let version = next_version(literal_family);
    let nested = FileName {
        base: literal_base(name),
        marker: Some(version),
        extension: name.extension.clone(),
    };
    NamePlan {
        filename: nested.render(),
        key: CanonicalKey::of_literal(name),
        version,
    }
}

/// The uploaded name's stem with its own marker folded back in, so a
/// fresh marker can be appended after it.
fn literal_base(name: &FileName) -> String {
    match name.marker {
        Some(marker) => format!("{}({marker})", name.base),
        None => name.base.clone(),
    }
}
