use crate::{PrintPlan, PrintSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Present the advanced/standard/cancel decision to the user.
    OpenConfirmation,
    /// Store the settings right away; toggles are saved whether or not the print goes ahead.
    PersistSettings(PrintSettings),
    /// Execute a print with the given plan.
    Run(PrintPlan),
    /// The user declined the confirmation; nothing else happens.
    Cancelled,
}
