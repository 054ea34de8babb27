//! Printer core: pure print-mode state machine and settings model.
mod effect;
mod msg;
mod settings;
mod state;
mod strategy;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{DialogEvent, Msg};
pub use settings::{HeadingPalette, HeadingStyle, PrintSettings, DEFAULT_HEADING_SIZES};
pub use state::PrintState;
pub use strategy::{plan_request, PrintOption, PrintPlan, PrintRequest, Strategy};
pub use update::update;
pub use view_model::ConfirmationView;
