pub mod companion;
pub mod edges;
pub mod nodes;
pub mod plugin;
pub mod setup;
pub mod tween;
pub mod ui;
pub mod utils;
