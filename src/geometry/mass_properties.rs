//! Per-shape mass/inertia and their composition (spec §4.1, §8 round trips).

use crate::math::{Point, Real};

/// The mass, center of mass and rotational inertia contributed by one
/// fixture, or the composition of several.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MassProperties {
    /// Local-space center of mass.
    pub local_com: Point,
    pub mass: Real,
    /// Rotational inertia about the *local* center of mass.
    pub inertia: Real,
}

impl MassProperties {
    pub fn zero() -> Self {
        Self {
            local_com: Point::origin(),
            mass: 0.0,
            inertia: 0.0,
        }
    }

    pub fn new(local_com: Point, mass: Real, inertia: Real) -> Self {
        Self {
            local_com,
            mass,
            inertia,
        }
    }

    /// Additive composition of fixture masses (spec §8: "createMass is
    /// additive"), applying the parallel-axis theorem to re-express each
    /// contributor's inertia about the compound's shared center of mass.
    pub fn compose(contributions: &[MassProperties]) -> MassProperties {
        let mut total_mass = 0.0;
        let mut com = crate::math::Vector::zeros();
        for mp in contributions {
            total_mass += mp.mass;
            com += mp.local_com.coords * mp.mass;
        }

        if total_mass > 0.0 {
            com /= total_mass;
        }
        let com = Point::from(com);

        let mut inertia = 0.0;
        for mp in contributions {
            let offset = mp.local_com - com;
            inertia += mp.inertia + mp.mass * offset.norm_squared();
        }

        MassProperties::new(com, total_mass, inertia)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn compose_is_additive_in_mass() {
        let a = MassProperties::new(Point::new(-1.0, 0.0), 2.0, 0.1);
        let b = MassProperties::new(Point::new(1.0, 0.0), 3.0, 0.2);
        let combined = MassProperties::compose(&[a, b]);
        assert_relative_eq!(combined.mass, 5.0, epsilon = 1e-6);
    }
}
