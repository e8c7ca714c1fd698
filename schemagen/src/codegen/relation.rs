//! Relation planning for generated models
//!
//! Foreign keys are grouped by the table on the other side, and each group
//! picks a [`NamingStrategy`]: a lone link is named after the other table, while
//! several links between the same two tables are named after their columns so
//! the accessor names stay distinct.

use std::collections::HashMap;

use super::naming::{pluralize, strip_foreign_key_affixes, to_camel_case, to_pascal_case};
use crate::catalog::{ForeignKeyDescriptor, ReverseReferenceDescriptor};

/// Type of relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    /// This table holds the key (many-to-one)
    BelongsTo,
    /// Another table holds the key (one-to-many)
    HasMany,
}

impl RelationType {
    /// Eloquent method returning the association
    pub fn eloquent_method(&self) -> &'static str {
        match self {
            RelationType::BelongsTo => "belongsTo",
            RelationType::HasMany => "hasMany",
        }
    }
}

/// How accessors in one target group are named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStrategy {
    /// Exactly one link to the target table
    SingleTarget,
    /// Several links to the same target table
    MultiTarget,
}

impl NamingStrategy {
    fn for_group_size(size: usize) -> Self {
        if size > 1 {
            NamingStrategy::MultiTarget
        } else {
            NamingStrategy::SingleTarget
        }
    }

    /// Accessor name for a forward (belongs-to) relation
    /// e.g., SingleTarget: "user_id" -> "user" (table); MultiTarget: "approver_id" -> "approver"
    pub fn belongs_to_name(&self, foreign_key: &ForeignKeyDescriptor) -> String {
        match self {
            NamingStrategy::SingleTarget => to_camel_case(&foreign_key.referenced_table),
            NamingStrategy::MultiTarget => {
                to_camel_case(strip_foreign_key_affixes(&foreign_key.column_name))
            }
        }
    }

    /// Accessor name for a reverse (has-many) relation
    /// e.g., SingleTarget: table "post" -> "posts"; MultiTarget: "author_id" on "post" -> "authorPosts"
    pub fn has_many_name(&self, reference: &ReverseReferenceDescriptor) -> String {
        let base = match self {
            NamingStrategy::SingleTarget => to_camel_case(&reference.table_name),
            NamingStrategy::MultiTarget => format!(
                "{}{}",
                to_camel_case(strip_foreign_key_affixes(&reference.column_name)),
                to_pascal_case(&reference.table_name)
            ),
        };
        pluralize(&base)
    }
}

/// A relation accessor to be rendered on a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRelation {
    /// Accessor method name
    pub method_name: String,
    pub relation_type: RelationType,
    /// Class of the model on the other side
    pub related_class: String,
    /// Key column (on this table for BelongsTo, on the related table for HasMany)
    pub foreign_key: String,
    /// Column the key points at
    pub owner_key: String,
}

/// Count descriptors per group key.
fn group_sizes<'a, T>(items: &'a [T], key: impl Fn(&'a T) -> &'a str) -> HashMap<&'a str, usize> {
    let mut sizes = HashMap::new();
    for item in items {
        *sizes.entry(key(item)).or_insert(0) += 1;
    }
    sizes
}

/// Plan belongs-to accessors, in catalog order
pub fn plan_belongs_to(foreign_keys: &[ForeignKeyDescriptor]) -> Vec<PlannedRelation> {
    let sizes = group_sizes(foreign_keys, |fk| fk.referenced_table.as_str());

    foreign_keys
        .iter()
        .map(|fk| {
            let strategy = NamingStrategy::for_group_size(sizes[fk.referenced_table.as_str()]);
            PlannedRelation {
                method_name: strategy.belongs_to_name(fk),
                relation_type: RelationType::BelongsTo,
                related_class: to_pascal_case(&fk.referenced_table),
                foreign_key: fk.column_name.clone(),
                owner_key: fk.referenced_column.clone(),
            }
        })
        .collect()
}

/// Plan has-many accessors, in catalog order
pub fn plan_has_many(references: &[ReverseReferenceDescriptor]) -> Vec<PlannedRelation> {
    let sizes = group_sizes(references, |r| r.table_name.as_str());

    references
        .iter()
        .map(|reference| {
            let strategy = NamingStrategy::for_group_size(sizes[reference.table_name.as_str()]);
            PlannedRelation {
                method_name: strategy.has_many_name(reference),
                relation_type: RelationType::HasMany,
                related_class: to_pascal_case(&reference.table_name),
                foreign_key: reference.column_name.clone(),
                owner_key: reference.referenced_column.clone(),
            }
        })
        .collect()
}
