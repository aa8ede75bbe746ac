//! The contact manager (spec §4.5): reconciles the broadphase's candidate
//! pairs against the previous step's contacts, re-running narrowphase only
//! on survivors, warm-starting manifolds by feature id, and emitting
//! begin/persist/end events. Pre-solve/post-solve events are emitted by the
//! constraint solver, which owns the impulse data this module only stores.

use std::collections::BTreeMap;

use crate::data::Index;
use crate::geometry::contact::ContactManifold;
use crate::geometry::interaction_groups::InteractionGroups;
use crate::geometry::manifold;
use crate::geometry::shape::Shape;
use crate::math::Isometry;

/// What the contact manager needs to know about a fixture to run
/// narrowphase on it. Implemented by whatever owns body/fixture storage
/// (the dynamics world) so this module stays ignorant of bodies.
pub trait FixtureQuery {
    fn shape(&self, fixture: Index) -> &Shape;
    fn transform(&self, fixture: Index) -> Isometry;
    fn filter(&self, fixture: Index) -> InteractionGroups;
    fn is_sensor(&self, fixture: Index) -> bool;
    fn body_of(&self, fixture: Index) -> Index;
    fn friction(&self, fixture: Index) -> crate::math::Real;
    fn restitution(&self, fixture: Index) -> crate::math::Real;
    /// Whether both bodies backing this fixture pair are asleep/static, in
    /// which case narrowphase work can be skipped entirely.
    fn pair_can_sleep(&self, fixture_a: Index, fixture_b: Index) -> bool;
}

#[derive(Clone, Debug)]
pub struct ContactPair {
    pub fixture_a: Index,
    pub fixture_b: Index,
    pub body_a: Index,
    pub body_b: Index,
    pub manifold: ContactManifold,
    pub is_sensor: bool,
    pub enabled: bool,
    /// Combined `sqrt(mu_a * mu_b)` friction and `max(e_a, e_b)`
    /// restitution for this pair (spec §4.7 step 3).
    pub friction: crate::math::Real,
    pub restitution: crate::math::Real,
    touching: bool,
}

impl ContactPair {
    pub fn is_touching(&self) -> bool {
        self.touching
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct PairKey(Index, Index);

fn pair_key(a: Index, b: Index) -> PairKey {
    if a.into_raw_parts() <= b.into_raw_parts() {
        PairKey(a, b)
    } else {
        PairKey(b, a)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ContactEvent {
    Began(Index, Index),
    Persisted(Index, Index),
    Ended(Index, Index),
}

/// Owns the live set of contact pairs between fixtures (spec §4.5).
///
/// Keyed by a `BTreeMap` rather than a `HashMap`: the solver walks
/// `contacts()` in this map's iteration order to decide what order to
/// apply impulses in, and `HashMap`'s per-process random seed would make
/// that order (and so a step's output) nondeterministic across runs of
/// identical inputs (spec §5, §8).
#[derive(Default)]
pub struct NarrowPhase {
    pairs: BTreeMap<PairKey, ContactPair>,
}

impl NarrowPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> impl Iterator<Item = &ContactPair> {
        self.pairs.values()
    }

    pub fn contacts_mut(&mut self) -> impl Iterator<Item = &mut ContactPair> {
        self.pairs.values_mut()
    }

    pub fn get(&self, fixture_a: Index, fixture_b: Index) -> Option<&ContactPair> {
        self.pairs.get(&pair_key(fixture_a, fixture_b))
    }

    pub fn get_mut(&mut self, fixture_a: Index, fixture_b: Index) -> Option<&mut ContactPair> {
        self.pairs.get_mut(&pair_key(fixture_a, fixture_b))
    }

    /// Seeds a pair directly, bypassing `update()`'s broadphase/narrowphase
    /// reconciliation. Only meant for tests that exercise island building or
    /// the solver against a hand-built contact.
    #[cfg(test)]
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn test_insert(
        &mut self,
        fixture_a: Index,
        fixture_b: Index,
        body_a: Index,
        body_b: Index,
        manifold: ContactManifold,
        is_sensor: bool,
        friction: crate::math::Real,
        restitution: crate::math::Real,
    ) {
        let key = pair_key(fixture_a, fixture_b);
        let touching = manifold.is_touching();
        self.pairs.insert(
            key,
            ContactPair {
                fixture_a,
                fixture_b,
                body_a,
                body_b,
                manifold,
                is_sensor,
                enabled: true,
                friction,
                restitution,
                touching,
            },
        );
    }

    /// Reconciles `candidate_pairs` (this step's broadphase overlaps)
    /// against the previous step's contact set: drops pairs no longer
    /// overlapping (emitting `Ended`), creates new ones (emitting `Began`
    /// once they start touching), and re-runs narrowphase plus warm-start
    /// matching on survivors (spec §4.5 steps 1-2).
    pub fn update(
        &mut self,
        candidate_pairs: &[(Index, Index)],
        query: &dyn FixtureQuery,
    ) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        let mut next: BTreeMap<PairKey, ContactPair> = BTreeMap::new();

        for &(fixture_a, fixture_b) in candidate_pairs {
            if query.body_of(fixture_a) == query.body_of(fixture_b) {
                continue; // no self-contacts between fixtures on the same body
            }
            if !query.filter(fixture_a).test(&query.filter(fixture_b)) {
                continue;
            }

            let key = pair_key(fixture_a, fixture_b);
            let is_sensor = query.is_sensor(fixture_a) || query.is_sensor(fixture_b);

            if query.pair_can_sleep(fixture_a, fixture_b) {
                // Preserve a sleeping pair untouched rather than dropping it;
                // re-detecting it on wake would lose warm-start state.
                if let Some(existing) = self.pairs.remove(&key) {
                    next.insert(key, existing);
                }
                continue;
            }

            let transform_a = query.transform(fixture_a);
            let transform_b = query.transform(fixture_b);
            // Sensors only need a touching/not-touching verdict, never
            // impulse data, but reuse the same clipping for consistency.
            let new_manifold = manifold::collide(
                query.shape(fixture_a),
                &transform_a,
                query.shape(fixture_b),
                &transform_b,
            );

            let Some(mut new_manifold) = new_manifold else {
                if let Some(old) = self.pairs.remove(&key) {
                    if old.is_touching() {
                        events.push(ContactEvent::Ended(fixture_a, fixture_b));
                    }
                }
                continue;
            };

            let was_touching = self
                .pairs
                .get(&key)
                .map(|p| p.is_touching())
                .unwrap_or(false);
            if let Some(old) = self.pairs.get(&key) {
                new_manifold.warm_start_from(&old.manifold);
            }

            let touching = new_manifold.is_touching();
            if touching && !was_touching {
                events.push(ContactEvent::Began(fixture_a, fixture_b));
            } else if !touching && was_touching {
                events.push(ContactEvent::Ended(fixture_a, fixture_b));
            } else if touching && was_touching {
                events.push(ContactEvent::Persisted(fixture_a, fixture_b));
            }

            let friction = (query.friction(fixture_a) * query.friction(fixture_b)).max(0.0).sqrt();
            let restitution = query.restitution(fixture_a).max(query.restitution(fixture_b));

            next.insert(
                key,
                ContactPair {
                    fixture_a,
                    fixture_b,
                    body_a: query.body_of(fixture_a),
                    body_b: query.body_of(fixture_b),
                    manifold: new_manifold,
                    is_sensor,
                    enabled: true,
                    friction,
                    restitution,
                    touching,
                },
            );
        }

        for (key, old) in self.pairs.drain() {
            if !next.contains_key(&key) && old.is_touching() {
                events.push(ContactEvent::Ended(old.fixture_a, old.fixture_b));
            }
        }

        self.pairs = next;
        events
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shape::{Circle, Shape};
    use crate::math::Isometry;

    struct FakeWorld {
        shapes: Vec<Shape>,
        transforms: Vec<Isometry>,
        bodies: Vec<Index>,
    }

    impl FixtureQuery for FakeWorld {
        fn shape(&self, fixture: Index) -> &Shape {
            &self.shapes[fixture.into_raw_parts().0 as usize]
        }
        fn transform(&self, fixture: Index) -> Isometry {
            self.transforms[fixture.into_raw_parts().0 as usize]
        }
        fn filter(&self, _fixture: Index) -> InteractionGroups {
            InteractionGroups::all()
        }
        fn is_sensor(&self, _fixture: Index) -> bool {
            false
        }
        fn body_of(&self, fixture: Index) -> Index {
            self.bodies[fixture.into_raw_parts().0 as usize]
        }
        fn friction(&self, _fixture: Index) -> crate::math::Real {
            0.3
        }
        fn restitution(&self, _fixture: Index) -> crate::math::Real {
            0.0
        }
        fn pair_can_sleep(&self, _a: Index, _b: Index) -> bool {
            false
        }
    }

    #[test]
    fn touching_pair_emits_began_then_persisted_then_ended() {
        let world = FakeWorld {
            shapes: vec![
                Shape::Circle(Circle::new(1.0).unwrap()),
                Shape::Circle(Circle::new(1.0).unwrap()),
            ],
            transforms: vec![
                Isometry::translation(0.0, 0.0),
                Isometry::translation(1.0, 0.0),
            ],
            bodies: vec![Index::from_raw_parts(0, 0), Index::from_raw_parts(1, 0)],
        };
        let fa = Index::from_raw_parts(0, 0);
        let fb = Index::from_raw_parts(1, 0);

        let mut narrow = NarrowPhase::new();
        let events = narrow.update(&[(fa, fb)], &world);
        assert!(matches!(events[0], ContactEvent::Began(_, _)));

        let events = narrow.update(&[(fa, fb)], &world);
        assert!(matches!(events[0], ContactEvent::Persisted(_, _)));

        let events = narrow.update(&[], &world);
        assert!(matches!(events[0], ContactEvent::Ended(_, _)));
    }
}
