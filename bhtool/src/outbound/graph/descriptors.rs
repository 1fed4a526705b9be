//! Cypher statement templates per entity type.
//!
//! Each supported [`EntityType`] maps to one [`EntityTypeDescriptor`]. The
//! statements differ only in the node label, so they are generated from the
//! label at compile time; supporting a new type means adding a variant and a
//! descriptor line below.

use crate::domain::EntityType;

/// Parameter carrying the entity name in lookup and mark statements.
pub const NAME_PARAM: &str = "name";
/// Column returned by the lookup statement.
pub const OWNED_COLUMN: &str = "owned";
/// Column returned by the mark and owned-list statements.
pub const NAME_COLUMN: &str = "name";

/// Statement templates for one node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTypeDescriptor {
    /// Graph label matched by every statement.
    pub label: &'static str,
    /// Returns `owned` for the node named `$name`.
    pub lookup: &'static str,
    /// Sets `owned = true` on the node named `$name`, returning its name.
    pub mark: &'static str,
    /// Returns `name` of every node with `owned = true`.
    pub list_owned: &'static str,
}

macro_rules! entity_descriptor {
    ($label:literal) => {
        EntityTypeDescriptor {
            label: $label,
            lookup: concat!(
                "MATCH (n:",
                $label,
                ") WHERE n.name = $name RETURN n.owned AS owned"
            ),
            mark: concat!(
                "MATCH (n:",
                $label,
                ") WHERE n.name = $name SET n.owned = true RETURN n.name AS name"
            ),
            list_owned: concat!(
                "MATCH (n:",
                $label,
                ") WHERE n.owned = true RETURN n.name AS name"
            ),
        }
    };
}

const USER: EntityTypeDescriptor = entity_descriptor!("User");
const COMPUTER: EntityTypeDescriptor = entity_descriptor!("Computer");

/// Descriptor for `entity_type`.
#[must_use]
pub const fn descriptor_for(entity_type: EntityType) -> &'static EntityTypeDescriptor {
    match entity_type {
        EntityType::User => &USER,
        EntityType::Computer => &COMPUTER,
    }
}
