use crate::{plan_request, DialogEvent, Effect, Msg, PrintPlan, PrintState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PrintState, msg: Msg) -> (PrintState, Vec<Effect>) {
    let effects = match msg {
        Msg::PrintRequested(request) => {
            // One print job in flight: requests arriving while the dialog is open are dropped.
            if state.is_confirming() {
                return (state, Vec::new());
            }
            match plan_request(&request, state.settings()) {
                Some(plan) => vec![Effect::Run(plan)],
                None => {
                    let file = match request {
                        crate::PrintRequest::Note { file, .. } => file,
                        _ => None,
                    };
                    state.open_confirmation(file);
                    vec![Effect::OpenConfirmation]
                }
            }
        }
        Msg::Dialog(event) => {
            if !state.is_confirming() {
                return (state, Vec::new());
            }
            match event {
                DialogEvent::Toggled { option, enabled } => {
                    if option.get(state.settings()) == enabled {
                        Vec::new()
                    } else {
                        option.set(state.settings_mut(), enabled);
                        vec![Effect::PersistSettings(state.settings().clone())]
                    }
                }
                DialogEvent::Chosen(strategy) => match state.close_confirmation() {
                    Some(pending) => vec![Effect::Run(PrintPlan::Note {
                        file: pending.file,
                        strategy,
                    })],
                    None => Vec::new(),
                },
                DialogEvent::Cancelled => {
                    state.close_confirmation();
                    vec![Effect::Cancelled]
                }
            }
        }
        Msg::SettingsLoaded(settings) => {
            state.replace_settings(settings);
            Vec::new()
        }
    };

    (state, effects)
}
