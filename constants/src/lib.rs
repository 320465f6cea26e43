pub mod placement_settings;
pub mod surface_settings;
pub mod ui_settings;
