//! Input Handler
//!
//! Applies key events to the mode state.

use super::keymap::{editing_action, menu_action, Action};
use super::keys::KeyEvent;
use super::modes::{Conversion, ModeState, Stage};
use super::InputResult;

/// What the driver should do after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Redraw and read the next key
    Continue,
    /// Print the mode menu help, then read the menu key
    ShowMenu,
    /// Input finished; `None` when no bytes were entered
    Commit(Option<Vec<u8>>),
    /// Ctrl-D twice
    EndOfInput,
    /// Ctrl-C
    Interrupted,
}

/// Input handler that processes key events based on current stage
pub struct InputHandler;

impl InputHandler {
    /// Process a key event
    ///
    /// Fails only when committing a buffer that cannot be converted.
    pub fn handle_key_event(key: &KeyEvent, state: &mut ModeState, conversion: &Conversion) -> InputResult<Outcome> {
        let action = match state.stage {
            Stage::Editing => editing_action(key),
            Stage::ModeMenu => menu_action(key),
            Stage::Done | Stage::Aborted => return Ok(Outcome::Continue),
        };

        let outcome = match action {
            Action::InsertChar(c) => {
                state.push_char(c);
                state.resume();
                Outcome::Continue
            }
            Action::InsertText(text) => {
                state.push_str(&text);
                Outcome::Continue
            }
            Action::DeleteChar => {
                state.delete_char();
                Outcome::Continue
            }
            Action::ClearLine => {
                state.clear_buffer();
                state.resume();
                Outcome::Continue
            }
            Action::Submit => {
                let bytes = conversion.convert(state.mode, state.get_buffer())?;
                tracing::debug!(mode = %state.mode, len = bytes.len(), "input committed");
                state.clear_buffer();
                state.stage = Stage::Done;
                Outcome::Commit((!bytes.is_empty()).then_some(bytes))
            }
            Action::OpenMenu => {
                state.open_menu();
                Outcome::ShowMenu
            }
            Action::SetMode(mode) => {
                tracing::debug!(from = %state.mode, to = %mode, "input mode changed");
                state.set_mode(mode);
                Outcome::Continue
            }
            Action::Resume => {
                state.resume();
                Outcome::Continue
            }
            Action::Abort => {
                tracing::debug!("end of input requested");
                state.clear_buffer();
                state.stage = Stage::Aborted;
                Outcome::EndOfInput
            }
            Action::Interrupt => {
                state.stage = Stage::Aborted;
                Outcome::Interrupted
            }
        };

        Ok(outcome)
    }
}
