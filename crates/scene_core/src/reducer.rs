//! The state record, the events widgets produce, and the pure reducer that
//! turns one into the other.

use std::time::Duration;

use crate::domain::{DialogOption, DialogState, LibrarianState, TimerSeq};
use crate::script;

/// Fixed delay before a deferred librarian message lands.
pub const MESSAGE_DELAY: Duration = Duration::from_secs(2);

/// All interactive state in the scene. Mutated only by [`reduce`]; the one
/// exception is `other_input`, which the text widget edits in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub dialog: DialogState,
    pub librarian: LibrarianState,
    pub message: String,
    pub other_input: String,
    pub show_assignment: bool,
    pub show_introduction: bool,
    armed_timer: Option<TimerSeq>,
    next_timer_seq: u64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            dialog: DialogState::Initial,
            librarian: LibrarianState::Visible,
            message: script::DEFAULT_PROMPT.to_string(),
            other_input: String::new(),
            show_assignment: false,
            show_introduction: false,
            armed_timer: None,
            next_timer_seq: 0,
        }
    }

    /// The option menu renders only from the greeting: dialog back at
    /// `Initial` AND the message equal to the default prompt. The message text
    /// is part of the condition on purpose; after e.g. the scolding line the
    /// dialog is `Initial` but no options are offered until the prompt
    /// returns.
    pub fn options_visible(&self) -> bool {
        self.dialog == DialogState::Initial && self.message == script::DEFAULT_PROMPT
    }

    /// A deferred message is scheduled and has not fired (or been superseded).
    pub fn has_pending_message(&self) -> bool {
        self.armed_timer.is_some()
    }

    fn arm_timer(&mut self, message: &str) -> Effect {
        let seq = TimerSeq(self.next_timer_seq);
        self.next_timer_seq += 1;
        self.armed_timer = Some(seq);
        Effect::ScheduleMessage {
            seq,
            delay: MESSAGE_DELAY,
            message: message.to_string(),
        }
    }
}

/// One user interaction or timer fire.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    BackRequested,
    MailClicked,
    OptionChosen(DialogOption),
    OtherSubmitted,
    IntroductionContinued,
    AssignmentClosed,
    MessageTimerElapsed { seq: TimerSeq, message: String },
}

/// Work the shell must perform on the reducer's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ScheduleMessage {
        seq: TimerSeq,
        delay: Duration,
        message: String,
    },
    OpenExternal {
        url: &'static str,
    },
}

/// Apply one event to the state record. Total: no event can fail, and events
/// that make no sense for the current state are ignored.
pub fn reduce(state: &mut SceneState, event: SceneEvent) -> Vec<Effect> {
    let effects = match event {
        SceneEvent::BackRequested => vec![Effect::OpenExternal {
            url: script::BACK_URL,
        }],
        SceneEvent::MailClicked => {
            match state.librarian {
                LibrarianState::Hidden => {
                    state.librarian = LibrarianState::Visible;
                    state.message = script::SCOLDING.to_string();
                    state.dialog = DialogState::Initial;
                }
                LibrarianState::MakingCoffee => {
                    state.show_assignment = true;
                }
                LibrarianState::Visible => {}
            }
            Vec::new()
        }
        SceneEvent::OptionChosen(option) => {
            if state.dialog != DialogState::Initial {
                return Vec::new();
            }
            match option {
                DialogOption::Nothing => {
                    state.librarian = LibrarianState::Hidden;
                    state.dialog = DialogState::Hidden;
                }
                DialogOption::Introduction => {
                    state.show_introduction = true;
                    state.dialog = DialogState::Introduction;
                }
                DialogOption::Other => {
                    state.dialog = DialogState::OtherInput;
                    state.other_input.clear();
                }
            }
            Vec::new()
        }
        SceneEvent::OtherSubmitted => {
            if state.dialog != DialogState::OtherInput {
                return Vec::new();
            }
            state.dialog = DialogState::Initial;
            if script::mentions_coffee(&state.other_input) {
                state.librarian = LibrarianState::MakingCoffee;
                state.message = script::BUSY_MESSAGE.to_string();
                vec![state.arm_timer(script::COFFEE_FOLLOW_UP)]
            } else {
                state.message = script::REJECTION.to_string();
                vec![state.arm_timer(script::DEFAULT_PROMPT)]
            }
        }
        SceneEvent::IntroductionContinued => {
            if state.dialog != DialogState::Introduction {
                return Vec::new();
            }
            state.show_introduction = false;
            state.message = script::DEFAULT_PROMPT.to_string();
            state.dialog = DialogState::Initial;
            Vec::new()
        }
        SceneEvent::AssignmentClosed => {
            state.show_assignment = false;
            Vec::new()
        }
        SceneEvent::MessageTimerElapsed { seq, message } => {
            if state.armed_timer == Some(seq) {
                state.armed_timer = None;
                state.message = message;
            }
            Vec::new()
        }
    };

    tracing::trace!(
        dialog = ?state.dialog,
        librarian = ?state.librarian,
        effects = effects.len(),
        "scene event applied"
    );

    effects
}
