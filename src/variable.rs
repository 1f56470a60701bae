//! Variables and the process-wide variable registry.
//!
//! A variable is identified by a hierarchical name (one or more name
//! components, innermost first) and zero or more indices. The registry
//! assigns each distinct [`VarSpec`] a monotonically increasing [`VarId`]
//! on first request and returns the same id forever after. The diagram
//! variable order is exactly the ascending order of assigned ids, i.e.
//! creation order, and is shared by every diagram built by the same
//! manager. Variables are never removed: reclaiming an id would break
//! canonicity for diagrams built later.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// A variable identifier (1-indexed).
///
/// # Invariants
///
/// - Variable ids are >= 1 (0 is reserved for terminal cells).
/// - Ids increase in creation order and are never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarId(u32);

impl VarId {
    /// Creates a variable id from its raw value.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variable ids are 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable ids must be >= 1");
        VarId(id)
    }

    /// Returns the raw id as a `u32`.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A variable specification: name components (innermost first) plus
/// optional indices.
///
/// Multiple names establish hierarchical namespaces and multiple indices
/// group related variables, e.g. `VarSpec::new(["push", "fifo"], [])`
/// denotes `fifo.push` and `VarSpec::indexed("a", 0)` denotes `a[0]`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarSpec {
    names: Vec<String>,
    indices: Vec<u32>,
}

impl VarSpec {
    /// Creates a spec from name components (innermost first) and indices.
    ///
    /// Fails with [`Error::InvalidVariableSpec`] if the name sequence is
    /// empty or any component is empty.
    pub fn new<N, S>(names: N, indices: impl IntoIterator<Item = u32>) -> Result<Self>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Error::InvalidVariableSpec("empty name sequence".to_string()));
        }
        if let Some(bad) = names.iter().position(|n| n.is_empty()) {
            return Err(Error::InvalidVariableSpec(format!(
                "empty name component at position {}",
                bad
            )));
        }
        Ok(Self {
            names,
            indices: indices.into_iter().collect(),
        })
    }

    /// Creates a spec with a single name and no indices.
    pub fn simple(name: impl Into<String>) -> Result<Self> {
        Self::new([name.into()], [])
    }

    /// Creates a spec with a single name and a single index.
    pub fn indexed(name: impl Into<String>, index: u32) -> Result<Self> {
        Self::new([name.into()], [index])
    }

    /// Name components, innermost first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index components.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Outermost namespace first, indices as suffixes.
        for (i, name) in self.names.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", name)?;
        }
        for &i in self.indices.iter() {
            write!(f, "[{}]", i)?;
        }
        Ok(())
    }
}

/// The variable registry.
///
/// Get-or-create is idempotent: the same spec always resolves to the same
/// id. There is no removal operation.
#[derive(Debug, Default)]
pub(crate) struct VarTable {
    by_spec: HashMap<VarSpec, VarId>,
    specs: Vec<VarSpec>,
}

impl VarTable {
    /// Returns the id for `spec`, allocating the next sequential id if the
    /// spec has not been seen before.
    pub fn get_or_create(&mut self, spec: VarSpec) -> VarId {
        if let Some(&id) = self.by_spec.get(&spec) {
            return id;
        }
        let id = VarId::new(self.specs.len() as u32 + 1);
        self.specs.push(spec.clone());
        self.by_spec.insert(spec, id);
        id
    }

    /// Looks up an already-registered spec.
    pub fn get(&self, spec: &VarSpec) -> Option<VarId> {
        self.by_spec.get(spec).copied()
    }

    /// Returns the spec registered for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never assigned by this registry.
    pub fn spec(&self, id: VarId) -> &VarSpec {
        &self.specs[(id.get() - 1) as usize]
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.specs.len()
    }
}
