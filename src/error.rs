use thiserror::Error;

use crate::scene::Binding;

/// Errors raised while configuring scene objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The object has no field driven by the requested binding.
    #[error("{object} does not support the {binding:?} binding")]
    UnsupportedBinding {
        binding: Binding,
        object: &'static str,
    },
}
