//! Conf module — configuration model and loading.

pub mod load;
pub mod model;

pub use model::RegistratorConfig;
