//! Island builder (spec §4.6): groups awake, interacting bodies into
//! connected components so the solver (and the sleep heuristic) can treat
//! each one independently.

use std::collections::{BTreeMap, HashSet};

use crate::data::Index;
use crate::dynamics::joint::JointSet;
use crate::dynamics::rigid_body::MassType;
use crate::dynamics::RigidBodySet;
use crate::geometry::NarrowPhase;

/// One connected component of the body/contact/joint graph: the bodies that
/// must be solved together this step, and the contacts and joints between
/// them. Static bodies a member touches are not listed in `bodies` (they
/// never move and may belong to several islands at once) but their
/// contacts/joints still appear in `contacts`/`joints`.
#[derive(Clone, Debug, Default)]
pub struct Island {
    pub bodies: Vec<Index>,
    /// Fixture pairs, normalized so the lower-ordered fixture comes first.
    pub contacts: Vec<(Index, Index)>,
    pub joints: Vec<Index>,
}

enum Edge {
    Contact(Index, Index),
    Joint(Index),
}

fn is_static(bodies: &RigidBodySet, id: Index) -> bool {
    bodies
        .get(id)
        .map(|b| matches!(b.mass_type, MassType::Infinite))
        .unwrap_or(true)
}

/// Traverses touching non-sensor contacts and enabled joints starting from
/// each awake, non-static, not-yet-visited body (spec §4.6). Sensor contacts
/// never connect bodies into an island (spec §9 Open Question).
pub fn build_islands(bodies: &RigidBodySet, narrow_phase: &NarrowPhase, joints: &JointSet) -> Vec<Island> {
    // A `BTreeMap` so that, on top of `narrow_phase.contacts()` and
    // `joints.iter()` already walking in fixture/joint-id order, this
    // adjacency structure itself never introduces a hash-seed-dependent
    // order anywhere downstream (spec §5, §8 determinism).
    let mut adjacency: BTreeMap<Index, Vec<(Index, Edge)>> = BTreeMap::new();

    for pair in narrow_phase.contacts() {
        if pair.is_sensor || !pair.enabled || !pair.is_touching() {
            continue;
        }
        adjacency
            .entry(pair.body_a)
            .or_default()
            .push((pair.body_b, Edge::Contact(pair.fixture_a, pair.fixture_b)));
        adjacency
            .entry(pair.body_b)
            .or_default()
            .push((pair.body_a, Edge::Contact(pair.fixture_a, pair.fixture_b)));
    }
    for (joint_id, instance) in joints.iter() {
        if !instance.enabled {
            continue;
        }
        adjacency
            .entry(instance.body_a)
            .or_default()
            .push((instance.body_b, Edge::Joint(joint_id)));
        adjacency
            .entry(instance.body_b)
            .or_default()
            .push((instance.body_a, Edge::Joint(joint_id)));
    }

    let mut visited: HashSet<Index> = HashSet::new();
    let mut islands = Vec::new();

    for (id, body) in bodies.iter() {
        if !body.awake || !body.active || is_static(bodies, id) || visited.contains(&id) {
            continue;
        }

        let mut island = Island::default();
        let mut contact_seen: HashSet<(Index, Index)> = HashSet::new();
        let mut joint_seen: HashSet<Index> = HashSet::new();
        let mut stack = vec![id];
        visited.insert(id);

        while let Some(current) = stack.pop() {
            island.bodies.push(current);
            let Some(edges) = adjacency.get(&current) else {
                continue;
            };
            for (neighbor, edge) in edges {
                match edge {
                    Edge::Contact(fa, fb) => {
                        let key = if fa.into_raw_parts() <= fb.into_raw_parts() {
                            (*fa, *fb)
                        } else {
                            (*fb, *fa)
                        };
                        if contact_seen.insert(key) {
                            island.contacts.push(key);
                        }
                    }
                    Edge::Joint(joint_id) => {
                        if joint_seen.insert(*joint_id) {
                            island.joints.push(*joint_id);
                        }
                    }
                }

                if is_static(bodies, *neighbor) {
                    continue; // not a traversal root, never marked visited
                }
                let neighbor_awake = bodies.get(*neighbor).map(|b| b.awake && b.active).unwrap_or(false);
                if neighbor_awake && visited.insert(*neighbor) {
                    stack.push(*neighbor);
                }
            }
        }

        islands.push(island);
    }

    islands
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::joint::{Joint, JointInstance};
    use crate::dynamics::rigid_body::RigidBodyBuilder;
    use crate::geometry::{ContactId, ContactManifold, ManifoldPoint};
    use crate::math::{Point, Vector};

    fn touching_manifold() -> ContactManifold {
        let mut manifold = ContactManifold::new(Vector::new(0.0, 1.0));
        manifold
            .points
            .push(ManifoldPoint::new(Point::origin(), 0.01, ContactId::Circle));
        manifold
    }

    #[test]
    fn two_bodies_sharing_a_touching_contact_form_one_island() {
        let mut bodies = RigidBodySet::new();
        let floor = bodies.insert(RigidBodyBuilder::fixed().build());
        let ball = bodies.insert(RigidBodyBuilder::dynamic().build());

        let mut narrow_phase = NarrowPhase::new();
        let fixture_a = Index::from_raw_parts(0, 0);
        let fixture_b = Index::from_raw_parts(1, 0);
        narrow_phase.test_insert(
            fixture_a,
            fixture_b,
            floor,
            ball,
            touching_manifold(),
            false,
            0.3,
            0.0,
        );

        let joints = JointSet::new();
        let islands = build_islands(&bodies, &narrow_phase, &joints);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].bodies, vec![ball]);
        assert_eq!(islands[0].contacts.len(), 1);
    }

    #[test]
    fn disjoint_bodies_form_separate_islands() {
        let mut bodies = RigidBodySet::new();
        let a = bodies.insert(RigidBodyBuilder::dynamic().build());
        let b = bodies.insert(RigidBodyBuilder::dynamic().build());

        let narrow_phase = NarrowPhase::new();
        let joints = JointSet::new();
        let islands = build_islands(&bodies, &narrow_phase, &joints);
        assert_eq!(islands.len(), 2);
        let _ = (a, b);
    }

    #[test]
    fn joint_between_two_dynamic_bodies_merges_islands() {
        let mut bodies = RigidBodySet::new();
        let a = bodies.insert(RigidBodyBuilder::dynamic().build());
        let b = bodies.insert(RigidBodyBuilder::dynamic().build());

        let narrow_phase = NarrowPhase::new();
        let mut joints = JointSet::new();
        joints.insert(JointInstance::new(
            Joint::Weld(crate::dynamics::joint::WeldJoint::default()),
            a,
            b,
        ));

        let islands = build_islands(&bodies, &narrow_phase, &joints);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].bodies.len(), 2);
    }
}
