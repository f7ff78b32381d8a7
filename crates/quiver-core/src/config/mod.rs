mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{Config, IconsConfig, InputConfig, SourcesConfig, expand_home};
pub use validation::warn_unknown_fields;
