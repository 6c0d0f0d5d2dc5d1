use crate::{AppState, Effect, Mode, Msg, Submission};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ModeChanged(mode) => {
            // Switching tabs clears the previous result and stops observing any scan.
            state.set_mode(mode);
            state.reset()
        }
        Msg::FileSubmitted { name, bytes } => {
            state.set_mode(Mode::File);
            state.begin(Submission::file(name, bytes))
        }
        Msg::UrlSubmitted(text) => {
            if text.is_empty() {
                return (state, Vec::new());
            }
            state.set_mode(Mode::Url);
            state.begin(Ok(Submission::url(text)))
        }
        Msg::QuerySubmitted(text) => {
            if text.is_empty() {
                return (state, Vec::new());
            }
            state.set_mode(Mode::Search);
            state.begin(Submission::indicator(text))
        }
        Msg::ScanProgress {
            scan_id,
            stage,
            attempt,
        } => {
            state.apply_progress(scan_id, stage, attempt);
            Vec::new()
        }
        Msg::ScanFinished { scan_id, result } => {
            state.apply_finished(scan_id, result);
            Vec::new()
        }
    };

    (state, effects)
}
