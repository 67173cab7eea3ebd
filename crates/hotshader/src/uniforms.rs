//! Uniform locations of a linked program, with inactive-name memoization.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use hotshader_core::ShaderError;
use hotshader_gl::{GlApi, GLint, GLuint};
use tracing::warn;

/// Name-to-location table of one program generation.
///
/// Built wholesale from the driver after a successful link. Lookups of names
/// the program does not expose are warned about once and then remembered, so
/// repeated queries stay quiet until the next rebuild.
#[derive(Debug, Default)]
pub struct UniformTable {
    locations: HashMap<String, GLint>,
    inactive: RefCell<HashSet<String>>,
}

impl UniformTable {
    /// Query every active uniform of `program`.
    ///
    /// Names are kept exactly as reported (array uniforms may or may not carry
    /// a `[0]` suffix).
    pub fn introspect<G: GlApi>(gl: &G, program: GLuint) -> Self {
        let locations = gl
            .active_uniform_names(program)
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|name| {
                let location = gl.uniform_location(program, &name);
                (name, location)
            })
            .collect();

        Self {
            locations,
            inactive: RefCell::default(),
        }
    }

    /// Location of `name`, or `None` if the program has no such active uniform.
    ///
    /// `None` is the inactive sentinel; a driver-reported `-1` comes back as
    /// `Some(-1)`. The first miss for a name is logged against `id`.
    pub fn lookup(&self, name: &str, id: &str) -> Option<GLint> {
        if let Some(&location) = self.locations.get(name) {
            return Some(location);
        }

        let mut inactive = self.inactive.borrow_mut();
        if !inactive.contains(name) {
            let err = ShaderError::UniformNotActive {
                name: name.to_string(),
            };
            warn!(shader = %id, "{err}");
            inactive.insert(name.to_string());
        }

        None
    }

    pub fn get(&self, name: &str) -> Option<GLint> {
        self.locations.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GLint)> {
        self.locations.iter().map(|(name, &loc)| (name.as_str(), loc))
    }

    /// Whether a lookup for `name` already missed during this generation.
    pub fn is_reported_inactive(&self, name: &str) -> bool {
        self.inactive.borrow().contains(name)
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.borrow().len()
    }
}
