//! Particle collections: named parallel scalar arrays with a sealed schema.

use indexmap::IndexMap;
use silt_core::SchemaError;

/// Properties every collection carries, with their default values.
///
/// Position, momentum velocity, mass, density, smoothing length, and
/// pressure. Everything else (advection velocities, accelerations,
/// wall extrapolation buffers) is declared per collection at setup.
pub const STANDARD_PROPERTIES: [(&str, f64); 8] = [
    ("x", 0.0),
    ("y", 0.0),
    ("u", 0.0),
    ("v", 0.0),
    ("m", 0.0),
    ("rho", 0.0),
    ("h", 0.0),
    ("p", 0.0),
];

/// Builder declaring a collection's full property schema up front.
///
/// The schema is sealed when [`build`](Self::build) runs; the resulting
/// [`ParticleCollection`] rejects any further declaration. Duplicate
/// declarations (including redeclaring a standard property) surface at
/// `build` time as [`SchemaError::DuplicateProperty`].
#[derive(Clone, Debug)]
pub struct CollectionBuilder {
    name: String,
    declared: Vec<(String, f64)>,
}

impl CollectionBuilder {
    /// Start a schema for a collection with the given name.
    ///
    /// The standard kinematic properties are always included.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: STANDARD_PROPERTIES
                .iter()
                .map(|&(n, d)| (n.to_string(), d))
                .collect(),
        }
    }

    /// Declare an extra property with its per-particle default value.
    pub fn with_property(mut self, name: impl Into<String>, default: f64) -> Self {
        self.declared.push((name.into(), default));
        self
    }

    /// Declare several properties sharing a default of zero.
    pub fn with_zeroed(mut self, names: &[&str]) -> Self {
        for name in names {
            self.declared.push((name.to_string(), 0.0));
        }
        self
    }

    /// Seal the schema and allocate storage for `count` particles.
    ///
    /// Every property array is filled with its declared default.
    pub fn build(self, count: usize) -> Result<ParticleCollection, SchemaError> {
        let mut props: IndexMap<String, Vec<f64>> = IndexMap::with_capacity(self.declared.len());
        let mut defaults: IndexMap<String, f64> = IndexMap::with_capacity(self.declared.len());
        for (name, default) in self.declared {
            if props.contains_key(&name) {
                return Err(SchemaError::DuplicateProperty {
                    collection: self.name,
                    property: name,
                });
            }
            props.insert(name.clone(), vec![default; count]);
            defaults.insert(name, default);
        }
        Ok(ParticleCollection {
            name: self.name,
            count,
            props,
            defaults,
        })
    }
}

/// A named, mutable set of particles with a sealed property schema.
///
/// Properties are parallel `f64` arrays keyed by name; every array's
/// length equals the particle count at all times. Iteration order of
/// properties is declaration order, so output is deterministic.
#[derive(Clone, Debug)]
pub struct ParticleCollection {
    name: String,
    count: usize,
    props: IndexMap<String, Vec<f64>>,
    defaults: IndexMap<String, f64>,
}

impl ParticleCollection {
    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the collection (e.g. after a partition).
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the collection holds no particles.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether a property is declared.
    pub fn has_property(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Declared property names, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// Read a property array.
    pub fn scalar(&self, name: &str) -> Result<&[f64], SchemaError> {
        self.props
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| self.undeclared(name))
    }

    /// Mutably borrow a property array.
    pub fn scalar_mut(&mut self, name: &str) -> Result<&mut [f64], SchemaError> {
        match self.props.get_mut(name) {
            Some(v) => Ok(v.as_mut_slice()),
            None => Err(SchemaError::UndeclaredProperty {
                collection: self.name.clone(),
                property: name.to_string(),
            }),
        }
    }

    /// Overwrite every element of a property with one value.
    pub fn fill(&mut self, name: &str, value: f64) -> Result<(), SchemaError> {
        self.scalar_mut(name)?.fill(value);
        Ok(())
    }

    /// Replace a property array wholesale.
    ///
    /// The replacement must match the particle count exactly.
    pub fn set_scalar(&mut self, name: &str, values: &[f64]) -> Result<(), SchemaError> {
        if values.len() != self.count {
            return Err(SchemaError::LengthMismatch {
                collection: self.name.clone(),
                property: name.to_string(),
                expected: self.count,
                actual: values.len(),
            });
        }
        self.scalar_mut(name)?.copy_from_slice(values);
        Ok(())
    }

    /// Post-seal declarations are always rejected.
    ///
    /// The full schema must be declared through [`CollectionBuilder`]
    /// before setup completes.
    pub fn declare_property(&self, name: &str) -> Result<(), SchemaError> {
        Err(SchemaError::SchemaSealed {
            collection: self.name.clone(),
            property: name.to_string(),
        })
    }

    /// Append one particle carrying the declared default for every property.
    pub fn push_default(&mut self) {
        for (name, values) in &mut self.props {
            // Defaults and props share keys by construction.
            let default = self.defaults.get(name).copied().unwrap_or(0.0);
            values.push(default);
        }
        self.count += 1;
    }

    /// Remove the given particles in place.
    ///
    /// Survivors keep their relative order. Indices may arrive in any
    /// order and may repeat; an out-of-range index is an error and
    /// leaves the collection untouched.
    pub fn remove(&mut self, indices: &[usize]) -> Result<(), SchemaError> {
        for &index in indices {
            if index >= self.count {
                return Err(SchemaError::IndexOutOfRange {
                    collection: self.name.clone(),
                    index,
                    len: self.count,
                });
            }
        }
        let mut doomed = vec![false; self.count];
        for &index in indices {
            doomed[index] = true;
        }
        let removed = doomed.iter().filter(|&&d| d).count();
        for values in self.props.values_mut() {
            let mut write = 0;
            for read in 0..values.len() {
                if !doomed[read] {
                    values[write] = values[read];
                    write += 1;
                }
            }
            values.truncate(write);
        }
        self.count -= removed;
        Ok(())
    }

    /// Split into `(matching, rest)` by a predicate over position.
    ///
    /// Both halves keep the full schema, defaults, and name; callers
    /// typically [`rename`](Self::rename) one half. Relative particle
    /// order is preserved on both sides.
    pub fn partition<F>(self, predicate: F) -> (ParticleCollection, ParticleCollection)
    where
        F: Fn(f64, f64) -> bool,
    {
        // x/y are standard properties; present by construction.
        let xs = &self.props["x"];
        let ys = &self.props["y"];
        let matches: Vec<bool> = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| predicate(x, y))
            .collect();

        let split = |keep: bool| -> IndexMap<String, Vec<f64>> {
            self.props
                .iter()
                .map(|(name, values)| {
                    let kept: Vec<f64> = values
                        .iter()
                        .zip(matches.iter())
                        .filter(|(_, &m)| m == keep)
                        .map(|(&v, _)| v)
                        .collect();
                    (name.clone(), kept)
                })
                .collect()
        };

        let matching_props = split(true);
        let rest_props = split(false);
        let matching_count = matches.iter().filter(|&&m| m).count();
        let rest_count = self.count - matching_count;

        let matching = ParticleCollection {
            name: self.name.clone(),
            count: matching_count,
            props: matching_props,
            defaults: self.defaults.clone(),
        };
        let rest = ParticleCollection {
            name: self.name,
            count: rest_count,
            props: rest_props,
            defaults: self.defaults,
        };
        (matching, rest)
    }

    /// Fail if the collection is empty.
    ///
    /// Used after a partition when the caller requires a non-empty result.
    pub fn require_non_empty(&self) -> Result<&Self, SchemaError> {
        if self.count == 0 {
            return Err(SchemaError::EmptyPartition {
                collection: self.name.clone(),
            });
        }
        Ok(self)
    }

    /// Append all of `other`'s particles.
    ///
    /// The inverse of [`partition`](Self::partition): re-merging the two
    /// halves reconstructs the original multiset of particles. Schemas
    /// must match exactly.
    pub fn extend(&mut self, other: &ParticleCollection) -> Result<(), SchemaError> {
        let same_schema = self.props.len() == other.props.len()
            && self.props.keys().zip(other.props.keys()).all(|(a, b)| a == b);
        if !same_schema {
            return Err(SchemaError::IncompatibleSchema {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }
        for (name, values) in &mut self.props {
            values.extend_from_slice(&other.props[name]);
        }
        self.count += other.count;
        Ok(())
    }

    fn undeclared(&self, name: &str) -> SchemaError {
        SchemaError::UndeclaredProperty {
            collection: self.name.clone(),
            property: name.to_string(),
        }
    }
}
