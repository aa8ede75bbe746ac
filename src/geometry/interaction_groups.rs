//! Collision filtering: category/mask bits plus a group index (spec §3, §4.2).

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionGroups {
    /// The categories this fixture belongs to.
    pub memberships: u32,
    /// The categories this fixture will test against.
    pub filter: u32,
    /// When non-zero and equal (in absolute value) between two fixtures with
    /// the same sign, the group index overrides category/mask filtering:
    /// positive groups always collide, negative groups never do.
    pub group: i32,
}

impl Default for InteractionGroups {
    fn default() -> Self {
        Self::all()
    }
}

impl InteractionGroups {
    pub fn all() -> Self {
        Self {
            memberships: u32::MAX,
            filter: u32::MAX,
            group: 0,
        }
    }

    pub fn none() -> Self {
        Self {
            memberships: 0,
            filter: 0,
            group: 0,
        }
    }

    pub fn new(memberships: u32, filter: u32) -> Self {
        Self {
            memberships,
            filter,
            group: 0,
        }
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }

    /// Whether fixtures carrying `self` and `other` are allowed to generate
    /// contacts, per the broadphase filter rules of spec §4.2.
    pub fn test(&self, other: &InteractionGroups) -> bool {
        if self.group != 0 && self.group == other.group {
            return self.group > 0;
        }
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn negative_group_never_collides() {
        let a = InteractionGroups::all().with_group(-1);
        let b = InteractionGroups::all().with_group(-1);
        assert!(!a.test(&b));
    }

    #[test]
    fn positive_group_always_collides() {
        let a = InteractionGroups::new(0, 0).with_group(5);
        let b = InteractionGroups::new(0, 0).with_group(5);
        assert!(a.test(&b));
    }

    #[test]
    fn category_mask_without_group() {
        let a = InteractionGroups::new(0b0001, 0b0010);
        let b = InteractionGroups::new(0b0010, 0b0001);
        assert!(a.test(&b));
        let c = InteractionGroups::new(0b0100, 0b0100);
        assert!(!a.test(&c));
    }
}
