/// Descriptor of a concrete entity type the runtime can spawn.
///
/// Stored `entity_type` tags resolve to one of these, and the snapshot
/// factory provider then picks a factory from the descriptor's capability
/// rather than from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKind {
    pub name: &'static str,
    /// Whether entities of this type carry a skeleton (locomotion state and
    /// animations).
    pub skeletal: bool,
}

impl EntityKind {
    pub const ENTITY: EntityKind = EntityKind {
        name: "Entity",
        skeletal: false,
    };

    pub const SKELETAL_ENTITY: EntityKind = EntityKind {
        name: "SkeletalEntity",
        skeletal: true,
    };

    pub const DELVER: EntityKind = EntityKind {
        name: "Delver",
        skeletal: true,
    };

    /// Every registered type, in lookup order.
    pub const ALL: &'static [EntityKind] = &[Self::ENTITY, Self::SKELETAL_ENTITY, Self::DELVER];

    /// Resolve a stored `entity_type` tag.
    pub fn from_tag(tag: &str) -> Option<&'static EntityKind> {
        Self::ALL.iter().find(|kind| kind.name == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_tags() {
        assert_eq!(EntityKind::from_tag("Entity"), Some(&EntityKind::ENTITY));
        assert!(EntityKind::from_tag("Delver").unwrap().skeletal);
        assert!(!EntityKind::from_tag("Entity").unwrap().skeletal);
    }

    #[test]
    fn unknown_tag_is_none() {
        assert!(EntityKind::from_tag("Goal").is_none());
        assert!(EntityKind::from_tag("").is_none());
    }
}
