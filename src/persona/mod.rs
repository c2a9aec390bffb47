//! Persona registry
//!
//! Static mapping from mode key to display metadata and the instruction block
//! sent to the model. Lookups fail closed to [`DEFAULT_PERSONA`] because
//! persona keys are persisted with every message and may outlive a registry
//! version.

mod presets;

pub use presets::{builtin_personas, STARTER_PROMPTS};

/// Key of the persona used when nothing else applies
pub const DEFAULT_PERSONA: &str = "omni";

/// A named bundle of display metadata and a fixed instruction block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// Accent color as `#RRGGBB`
    pub color: &'static str,
    pub description: &'static str,
    pub instructions: &'static str,
}

impl Persona {
    /// Accent color as an RGB triple, if the hex string is well formed
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Immutable, ordered registry of personas
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
    default_index: usize,
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PersonaRegistry {
    /// Registry holding the built-in personas
    pub fn builtin() -> Self {
        let personas = builtin_personas();
        let default_index = personas
            .iter()
            .position(|p| p.key == DEFAULT_PERSONA)
            .unwrap_or(0);
        Self { personas, default_index }
    }

    /// Lookup that fails closed to the default persona
    pub fn get(&self, key: &str) -> &Persona {
        self.find(key).unwrap_or_else(|| {
            tracing::debug!("Unknown persona '{}', falling back to '{}'", key, self.default_persona().key);
            self.default_persona()
        })
    }

    /// Exact lookup; `None` for unregistered keys
    pub fn find(&self, key: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn default_persona(&self) -> &Persona {
        &self.personas[self.default_index]
    }

    /// Personas in display order
    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.personas.iter().map(|p| p.key).collect()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
