//! Application settings entities.

pub mod model;

pub use model::{CreateSettings, Settings, SettingsPatch};
