use super::error::CrystalError;
use super::groups::{generators, normalize_group_name};
use super::symmetry::SpaceSymmetry;
use tracing::debug;

/// Upper bound on the order of any crystallographic group (F m -3 m has 192).
const MAX_GROUP_ORDER: usize = 384;

/// A finite space group, stored as the full list of its symmetry operations.
///
/// The identity is always the first element.
#[derive(Debug, Clone)]
pub struct SpaceGroup<const D: usize> {
    name: String,
    symmetries: Vec<SpaceSymmetry<D>>,
}

impl<const D: usize> SpaceGroup<D> {
    pub fn trivial() -> Self {
        let name = match D {
            1 => "1",
            2 => "p 1",
            _ => "P 1",
        };
        Self {
            name: name.to_string(),
            symmetries: vec![SpaceSymmetry::identity()],
        }
    }

    /// Looks a group up in the built-in database.
    ///
    /// Underscores and repeated whitespace in `name` are ignored, so
    /// `"I_m_-3_m"` and `"I m -3 m"` name the same group. `"I"` is accepted as
    /// an alias of the trivial group in every dimension.
    pub fn from_name(name: &str) -> Result<Self, CrystalError> {
        let key = normalize_group_name(name);
        if key == "I" {
            return Ok(Self::trivial());
        }
        let list = generators(D, &key).ok_or_else(|| CrystalError::UnknownGroup {
            name: name.to_string(),
            dimension: D,
        })?;
        let generators = list
            .split(';')
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(SpaceSymmetry::from_jones)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_generators(&key, &generators)
    }

    /// Closes a set of generators under composition.
    pub fn from_generators(
        name: &str,
        generators: &[SpaceSymmetry<D>],
    ) -> Result<Self, CrystalError> {
        let mut symmetries = vec![SpaceSymmetry::identity()];
        let mut frontier = symmetries.clone();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for element in &frontier {
                for generator in generators {
                    let product = element.compose(generator);
                    if !symmetries.iter().any(|s| s.approx_eq(&product)) {
                        if symmetries.len() >= MAX_GROUP_ORDER {
                            return Err(CrystalError::GroupClosure {
                                name: name.to_string(),
                                limit: MAX_GROUP_ORDER,
                            });
                        }
                        symmetries.push(product);
                        next.push(product);
                    }
                }
            }
            frontier = next;
        }
        debug!(group = name, order = symmetries.len(), "Closed space group.");
        Ok(Self {
            name: name.to_string(),
            symmetries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> usize {
        self.symmetries.len()
    }

    pub fn symmetries(&self) -> &[SpaceSymmetry<D>] {
        &self.symmetries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpaceSymmetry<D>> {
        self.symmetries.iter()
    }

    /// True if the group contains an operation with rotational part `-I`.
    pub fn is_centrosymmetric(&self) -> bool {
        self.symmetries.iter().any(SpaceSymmetry::is_inversion)
    }

    /// Returns the first operation that does not map the mesh onto itself.
    ///
    /// An operation is compatible with mesh `N` when `N_i R_ij ≡ 0 (mod N_j)`
    /// for all `i, j`, and every `N_i t_i` is an integer.
    pub fn incompatible_symmetry(&self, dimensions: &[usize; D]) -> Option<&SpaceSymmetry<D>> {
        self.symmetries.iter().find(|symmetry| {
            let rotation = symmetry.rotation();
            let translation = symmetry.translation();
            (0..D).any(|i| {
                let n_i = dimensions[i] as i64;
                let rotation_breaks = (0..D).any(|j| {
                    (n_i * i64::from(rotation[i][j])).rem_euclid(dimensions[j] as i64) != 0
                });
                let shift = n_i as f64 * translation[i];
                rotation_breaks || (shift - shift.round()).abs() > 1.0e-6
            })
        })
    }
}
