use crate::domain::{DialogOption, DialogState, LibrarianState};
use crate::reducer::{reduce, Effect, SceneEvent, SceneState, MESSAGE_DELAY};
use crate::script;

/// Deliver a scheduled message back into the reducer, as the worker would
/// after the delay.
fn fire(state: &mut SceneState, effect: &Effect) {
    match effect {
        Effect::ScheduleMessage { seq, message, .. } => {
            let follow_ups = reduce(
                state,
                SceneEvent::MessageTimerElapsed {
                    seq: *seq,
                    message: message.clone(),
                },
            );
            assert!(follow_ups.is_empty());
        }
        other => panic!("expected a scheduled message, got {other:?}"),
    }
}

fn submit_other(state: &mut SceneState, text: &str) -> Vec<Effect> {
    let effects = reduce(state, SceneEvent::OptionChosen(DialogOption::Other));
    assert!(effects.is_empty());
    assert!(state.other_input.is_empty());
    state.other_input = text.to_string();
    reduce(state, SceneEvent::OtherSubmitted)
}

#[test]
fn greeting_offers_the_three_options() {
    let state = SceneState::new();
    assert_eq!(state.dialog, DialogState::Initial);
    assert_eq!(state.librarian, LibrarianState::Visible);
    assert_eq!(state.message, script::DEFAULT_PROMPT);
    assert!(state.options_visible());
}

#[test]
fn nothing_dismisses_the_dialog_and_the_librarian() {
    let mut state = SceneState::new();
    let effects = reduce(&mut state, SceneEvent::OptionChosen(DialogOption::Nothing));
    assert!(effects.is_empty());
    assert_eq!(state.dialog, DialogState::Hidden);
    assert_eq!(state.librarian, LibrarianState::Hidden);
}

#[test]
fn introduction_opens_the_introduction_panel() {
    let mut state = SceneState::new();
    reduce(
        &mut state,
        SceneEvent::OptionChosen(DialogOption::Introduction),
    );
    assert_eq!(state.dialog, DialogState::Introduction);
    assert!(state.show_introduction);
}

#[test]
fn other_clears_any_previous_input() {
    let mut state = SceneState::new();
    state.other_input = "stale draft".to_string();
    reduce(&mut state, SceneEvent::OptionChosen(DialogOption::Other));
    assert_eq!(state.dialog, DialogState::OtherInput);
    assert!(state.other_input.is_empty());
}

#[test]
fn options_are_ignored_outside_the_initial_dialog() {
    let mut state = SceneState::new();
    reduce(&mut state, SceneEvent::OptionChosen(DialogOption::Other));
    let before = state.clone();
    reduce(&mut state, SceneEvent::OptionChosen(DialogOption::Nothing));
    assert_eq!(state, before);
}

#[test]
fn coffee_request_brews_then_reveals_the_damaged_database() {
    let mut state = SceneState::new();
    let effects = submit_other(&mut state, "I'd like some coffee please");

    assert_eq!(state.librarian, LibrarianState::MakingCoffee);
    assert_eq!(state.dialog, DialogState::Initial);
    assert_eq!(state.message, script::BUSY_MESSAGE);
    assert!(state.has_pending_message());

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::ScheduleMessage { delay, message, .. } => {
            assert_eq!(*delay, MESSAGE_DELAY);
            assert_eq!(message, script::COFFEE_FOLLOW_UP);
        }
        other => panic!("expected a scheduled message, got {other:?}"),
    }

    fire(&mut state, &effects[0]);
    assert_eq!(state.message, script::COFFEE_FOLLOW_UP);
    assert!(!state.has_pending_message());
}

#[test]
fn other_requests_are_rejected_then_the_prompt_returns() {
    let mut state = SceneState::new();
    let effects = submit_other(&mut state, "dance for me");

    assert_eq!(state.librarian, LibrarianState::Visible);
    assert_eq!(state.dialog, DialogState::Initial);
    assert_eq!(state.message, script::REJECTION);
    assert!(!state.options_visible());

    fire(&mut state, &effects[0]);
    assert_eq!(state.message, script::DEFAULT_PROMPT);
    assert!(state.options_visible());
}

#[test]
fn coffee_matches_case_insensitively_through_the_reducer() {
    let mut state = SceneState::new();
    submit_other(&mut state, "BRING ME COFFEE AT ONCE");
    assert_eq!(state.librarian, LibrarianState::MakingCoffee);
}

#[test]
fn resubmitting_supersedes_the_pending_message() {
    let mut state = SceneState::new();
    let first = submit_other(&mut state, "dance for me");
    let second = submit_other(&mut state, "coffee, actually");
    assert_eq!(state.message, script::BUSY_MESSAGE);

    // The first timer fires late; its seq is no longer armed, so the busy
    // message stays put until the second timer lands.
    fire(&mut state, &first[0]);
    assert_eq!(state.message, script::BUSY_MESSAGE);

    fire(&mut state, &second[0]);
    assert_eq!(state.message, script::COFFEE_FOLLOW_UP);
}

#[test]
fn mail_while_hidden_recalls_the_librarian_with_a_scolding() {
    let mut state = SceneState::new();
    reduce(&mut state, SceneEvent::OptionChosen(DialogOption::Nothing));
    assert_eq!(state.librarian, LibrarianState::Hidden);
    assert_eq!(state.dialog, DialogState::Hidden);

    let effects = reduce(&mut state, SceneEvent::MailClicked);
    assert!(effects.is_empty());
    assert_eq!(state.librarian, LibrarianState::Visible);
    assert_eq!(state.dialog, DialogState::Initial);
    assert_eq!(state.message, script::SCOLDING);
    assert!(!state.options_visible());
}

#[test]
fn mail_while_making_coffee_opens_the_assignment_and_nothing_else() {
    let mut state = SceneState::new();
    submit_other(&mut state, "coffee");

    let mut expected = state.clone();
    expected.show_assignment = true;

    reduce(&mut state, SceneEvent::MailClicked);
    assert_eq!(state, expected);
}

#[test]
fn mail_while_visible_is_ignored() {
    let mut state = SceneState::new();
    let before = state.clone();
    reduce(&mut state, SceneEvent::MailClicked);
    assert_eq!(state, before);
}

#[test]
fn closing_the_assignment_clears_only_that_flag() {
    let mut state = SceneState::new();
    submit_other(&mut state, "coffee");
    reduce(&mut state, SceneEvent::MailClicked);
    assert!(state.show_assignment);

    let mut expected = state.clone();
    expected.show_assignment = false;

    reduce(&mut state, SceneEvent::AssignmentClosed);
    assert_eq!(state, expected);
}

#[test]
fn continuing_the_introduction_resets_to_the_greeting() {
    let mut state = SceneState::new();
    reduce(
        &mut state,
        SceneEvent::OptionChosen(DialogOption::Introduction),
    );
    reduce(&mut state, SceneEvent::IntroductionContinued);

    assert_eq!(state.dialog, DialogState::Initial);
    assert!(!state.show_introduction);
    assert_eq!(state.message, script::DEFAULT_PROMPT);
    assert!(state.options_visible());
}

#[test]
fn back_requests_external_navigation() {
    let mut state = SceneState::new();
    let before = state.clone();
    let effects = reduce(&mut state, SceneEvent::BackRequested);
    assert_eq!(state, before);
    assert_eq!(
        effects,
        vec![Effect::OpenExternal {
            url: script::BACK_URL
        }]
    );
}

#[test]
fn stray_timer_fires_never_change_the_message() {
    let mut state = SceneState::new();
    let before = state.clone();
    reduce(
        &mut state,
        SceneEvent::MessageTimerElapsed {
            seq: crate::domain::TimerSeq(99),
            message: "out of nowhere".to_string(),
        },
    );
    assert_eq!(state, before);
}
