mod app;
mod host;
pub(crate) mod logging;
mod persistence;
mod vault;
mod view;

pub use app::run_app;
