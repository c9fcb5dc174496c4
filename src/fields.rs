//! An in-memory registry of time-leveled mesh fields.
use crate::Real;
use cvfem_traits::{EntityRank, FieldHandle, FieldId, FieldRegistry, FieldState, SolutionOptions};
use eyre::eyre;
use nalgebra::{DMatrix, Scalar};

/// The maximum number of time states a field can store (n-1, n and n+1).
pub const MAX_FIELD_STATES: usize = 3;

#[derive(Debug, Clone)]
struct FieldEntry<T: Scalar> {
    name: String,
    rank: EntityRank,
    num_components: usize,
    // Indexed by `FieldState::index`, newest first
    states: Vec<DMatrix<T>>,
}

/// Field storage for a mesh with a fixed number of nodes and elements.
///
/// Every field stores one `(entities x components)` matrix per time state, where the number of
/// entities is determined by the rank of the field.
#[derive(Debug, Clone)]
pub struct MeshFields<T: Scalar> {
    num_nodes: usize,
    num_elements: usize,
    fields: Vec<FieldEntry<T>>,
}

impl<T: Real> MeshFields<T> {
    pub fn new(num_nodes: usize, num_elements: usize) -> Self {
        Self {
            num_nodes,
            num_elements,
            fields: Vec::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn num_entities(&self, rank: EntityRank) -> usize {
        match rank {
            EntityRank::Node => self.num_nodes,
            EntityRank::Element => self.num_elements,
        }
    }

    /// Declares a new zero-initialized field.
    ///
    /// Returns an error if a field with the same rank and name already exists, if the field has
    /// no components or if the number of states is not between 1 and 3.
    pub fn declare_field(
        &mut self,
        rank: EntityRank,
        name: impl Into<String>,
        num_components: usize,
        num_states: usize,
    ) -> eyre::Result<FieldHandle> {
        let name = name.into();
        if self.get_field(rank, &name).is_some() {
            return Err(eyre!("field `{}` has already been declared", name));
        }
        if num_components == 0 {
            return Err(eyre!("field `{}` must have at least one component", name));
        }
        if num_states == 0 || num_states > MAX_FIELD_STATES {
            return Err(eyre!(
                "field `{}` requested {} time states, but only 1 to {} are supported",
                name,
                num_states,
                MAX_FIELD_STATES
            ));
        }

        let num_entities = self.num_entities(rank);
        let states = vec![DMatrix::zeros(num_entities, num_components); num_states];
        self.fields.push(FieldEntry {
            name,
            rank,
            num_components,
            states,
        });
        Ok(FieldHandle(self.fields.len() - 1))
    }

    pub fn num_components(&self, field: FieldHandle) -> usize {
        self.entry(field).num_components
    }

    /// The values of one time state of a field as an `(entities x components)` matrix.
    pub fn field_data(&self, id: FieldId) -> &DMatrix<T> {
        let entry = self.entry(id.field);
        let state = checked_state_index(entry, id.state);
        &entry.states[state]
    }

    pub fn field_data_mut(&mut self, id: FieldId) -> &mut DMatrix<T> {
        let entry = &mut self.fields[id.field.0];
        let state = checked_state_index(entry, id.state);
        &mut entry.states[state]
    }

    /// Shifts the time states of a field by one level at the end of a time step.
    ///
    /// The n-1 state receives the values of n and n receives the values of n+1. The n+1 state
    /// keeps its values, which serve as the initial guess for the next step.
    pub fn advance_states(&mut self, field: FieldHandle) {
        let states = &mut self.fields[field.0].states;
        for i in (1..states.len()).rev() {
            let (newer, older) = states.split_at_mut(i);
            older[0].copy_from(&newer[i - 1]);
        }
    }

    /// Advances the time states of every field.
    pub fn advance_all_states(&mut self) {
        for i in 0..self.fields.len() {
            self.advance_states(FieldHandle(i));
        }
    }

    fn entry(&self, field: FieldHandle) -> &FieldEntry<T> {
        self.fields
            .get(field.0)
            .unwrap_or_else(|| panic!("Field handle {:?} does not belong to this mesh", field))
    }
}

fn checked_state_index<T: Scalar>(entry: &FieldEntry<T>, state: FieldState) -> usize {
    let index = state.index();
    assert!(
        index < entry.states.len(),
        "Field `{}` has {} state(s) and does not store state {}",
        entry.name,
        entry.states.len(),
        state
    );
    index
}

impl<T: Real> FieldRegistry for MeshFields<T> {
    fn get_field(&self, rank: EntityRank, name: &str) -> Option<FieldHandle> {
        self.fields
            .iter()
            .position(|entry| entry.rank == rank && entry.name == name)
            .map(FieldHandle)
    }

    fn number_of_states(&self, field: FieldHandle) -> usize {
        self.entry(field).states.len()
    }

    fn field_of_state(&self, field: FieldHandle, state: FieldState) -> FieldId {
        checked_state_index(self.entry(field), state);
        FieldId::new(field, state)
    }

    fn field_name(&self, field: FieldHandle) -> &str {
        &self.entry(field).name
    }
}

/// The n-1, n and n+1 states of a time-leveled field.
///
/// If the field only stores two states, `nm1` refers to the same storage as `n`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeLeveledField {
    pub nm1: FieldId,
    pub n: FieldId,
    pub np1: FieldId,
}

impl TimeLeveledField {
    /// Resolves the three time levels of the named field.
    ///
    /// Returns an error if the field does not exist or stores fewer than two states.
    pub fn resolve(registry: &(impl ?Sized + FieldRegistry), rank: EntityRank, name: &str) -> eyre::Result<Self> {
        let field = registry
            .get_field(rank, name)
            .ok_or_else(|| eyre!("field `{}` is not registered", name))?;

        let num_states = registry.number_of_states(field);
        if num_states < 2 {
            return Err(eyre!(
                "field `{}` stores {} time state(s), but at least 2 are required",
                name,
                num_states
            ));
        }

        let n = registry.field_of_state(field, FieldState::N);
        let np1 = registry.field_of_state(field, FieldState::Np1);
        let nm1 = if num_states == 2 {
            n
        } else {
            registry.field_of_state(field, FieldState::Nm1)
        };

        Ok(Self { nm1, n, np1 })
    }

    /// Whether the n-1 level is an alias of the n level.
    pub fn is_nm1_aliased(&self) -> bool {
        self.nm1 == self.n
    }
}

/// Resolves the newest state of a named field.
pub fn resolve_field(registry: &(impl ?Sized + FieldRegistry), rank: EntityRank, name: &str) -> eyre::Result<FieldId> {
    let field = registry
        .get_field(rank, name)
        .ok_or_else(|| eyre!("field `{}` is not registered", name))?;
    Ok(registry.field_of_state(field, FieldState::NONE))
}

/// Resolves the nodal coordinate field named by the solver options.
pub fn resolve_coordinates(
    registry: &(impl ?Sized + FieldRegistry),
    options: &(impl ?Sized + SolutionOptions),
) -> eyre::Result<FieldId> {
    resolve_field(registry, EntityRank::Node, options.coordinates_name())
}
