// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{KeyInput, SettingsSnapshot};

/// Letters that address grid slots directly while a modifier is held,
/// in grid order.
pub const SHORTCUT_KEYS: [char; 12] = [
    'A', 'S', 'D', 'F', 'Z', 'X', 'C', 'V', 'Q', 'W', 'E', 'R',
];

pub fn shortcut_index(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let upper = ch.to_ascii_uppercase();
    SHORTCUT_KEYS.iter().position(|k| *k == upper)
}

fn shortcut_index_by_code(code: &str) -> Option<usize> {
    let letter = code.strip_prefix("Key")?;
    shortcut_index(letter)
}

fn mask_flags(input: &KeyInput, mask: crate::model::ModifierFlags) -> KeyInput {
    let mut masked = input.clone();
    masked.flags.ctrl &= !mask.ctrl;
    masked.flags.alt &= !mask.alt;
    masked.flags.shift &= !mask.shift;
    masked.flags.meta &= !mask.meta;
    masked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Semantic output of the tracker, consumed by the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    ToggleRecentlyClosed,
    ToggleForceSearch,
    WebSearchCommit,
    Navigate(NavDirection),
    CloseAtIndex(usize),
    ActivateAtIndex(usize),
    OpenPinned(usize),
    OpenEngine(String),
    CloseHighlighted,
    CommitHighlighted,
    InsertLiteral(char),
    CycleHistory,
    HotPageJump,
    HotPageJumpByLetter(char),
    SuggestionSelect {
        index: usize,
        engine: Option<String>,
    },
    CommitSuggestion {
        index: usize,
        engine: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HoldPhase {
    #[default]
    Idle,
    Held,
    HeldWithCombo,
}

/// Runtime state of one held modifier. Reset on release, never destroyed;
/// `HeldWithCombo` records that another key was pressed during the hold,
/// which suppresses the modifier's tap action.
#[derive(Debug, Clone, Copy, Default)]
struct ModifierHold {
    phase: HoldPhase,
}

impl ModifierHold {
    fn press(&mut self) {
        self.phase = HoldPhase::Held;
    }

    fn is_held(self) -> bool {
        self.phase != HoldPhase::Idle
    }

    fn mark_combo(&mut self) {
        if self.phase == HoldPhase::Held {
            self.phase = HoldPhase::HeldWithCombo;
        }
    }

    /// Returns true when the hold ended without a combo (a tap).
    fn release(&mut self) -> bool {
        let tap = self.phase == HoldPhase::Held;
        self.phase = HoldPhase::Idle;
        tap
    }
}

/// What the tracker needs to know about the current view to classify keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackerContext {
    pub suggestions_visible: bool,
    pub hot_page_matched: bool,
}

/// Tracks the close, target and engine modifiers through their
/// Idle → Held → (tap | combo) lifecycle, plus the parallel
/// suggestion-selection hold, and turns raw key events into `KeyAction`s.
///
/// Coupling between machines is limited to three declared rules: a held
/// close modifier routes a target press into its combo path and vice
/// versa; a target+close combo marks the close key used so its next tap
/// is swallowed; and while close and engine are both held a letter jumps
/// to a hot page instead of an engine.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    close: ModifierHold,
    target: ModifierHold,
    engine: ModifierHold,
    close_used_in_combo: bool,
    suggestion_hold: bool,
    suggestion_index: Option<usize>,
    suggestion_engine: Option<String>,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(
        &mut self,
        settings: &SettingsSnapshot,
        ctx: TrackerContext,
        input: &KeyInput,
    ) -> Vec<KeyAction> {
        // Immediate (non-held) keys first: these fire on keydown and do not
        // disturb any hold in progress.
        if settings.recently_closed_enabled
            && settings.recently_closed_binding.matches_press(input)
        {
            return vec![KeyAction::ToggleRecentlyClosed];
        }
        if settings.force_search_enabled && settings.force_search_binding.matches_press(input) {
            return vec![KeyAction::ToggleForceSearch];
        }

        // While the close modifier is held its own flags ride along on every
        // event, so the engine key is also recognized with those masked out.
        // That is what makes the close+engine+letter chord reachable.
        let engine_pressed = settings.engine_binding.matches_press(input)
            || (self.close.is_held()
                && settings
                    .engine_binding
                    .matches_press(&mask_flags(input, settings.close_binding.flags)));
        if engine_pressed {
            if !self.engine.is_held() && !input.repeat {
                self.engine.press();
            }
            return Vec::new();
        }
        if self.engine.is_held() && !engine_pressed {
            self.engine.mark_combo();
            if self.close.is_held() {
                self.close.mark_combo();
                if let Some(letter) = input.letter() {
                    return vec![KeyAction::HotPageJumpByLetter(letter.to_ascii_lowercase())];
                }
            } else if let Some(engine) = settings.engine_for_input(input) {
                return vec![KeyAction::OpenEngine(engine.id.clone())];
            }
            return Vec::new();
        }

        if settings.close_binding.matches_press(input)
            && !self.close.is_held()
            && !input.repeat
            && !self.target.is_held()
        {
            self.close.press();
            return Vec::new();
        }
        if self.close.is_held() && !settings.close_binding.matches_press(input) {
            self.close.mark_combo();
            if let Some(index) = shortcut_index(&input.key) {
                return vec![KeyAction::CloseAtIndex(index)];
            }
            // Other keys fall through: the web-search key still commits
            // while the close modifier is down.
        }

        if settings.web_search_binding.matches_press(input) {
            return vec![KeyAction::WebSearchCommit];
        }

        if settings.target_binding.matches_press(input)
            && ctx.suggestions_visible
            && !self.suggestion_hold
            && !input.repeat
        {
            self.suggestion_hold = true;
            self.suggestion_index = None;
            self.suggestion_engine = None;
            return Vec::new();
        }
        if settings.target_binding.matches_press(input)
            && !self.target.is_held()
            && !self.suggestion_hold
            && !input.repeat
            && !self.close.is_held()
        {
            self.target.press();
            return Vec::new();
        }
        if self.target.is_held() && !settings.target_binding.matches_press(input) {
            self.target.mark_combo();
            let close = &settings.close_binding;
            if input.code == close.code || input.key == close.key {
                self.close_used_in_combo = true;
                return vec![KeyAction::CloseHighlighted];
            }
            if let Some(digit) = input.digit() {
                if (1..=9).contains(&digit) {
                    return vec![KeyAction::OpenPinned(digit as usize - 1)];
                }
            }
            if let Some(index) = shortcut_index(&input.key) {
                return vec![KeyAction::ActivateAtIndex(index)];
            }
            return Vec::new();
        }

        if self.suggestion_hold && !settings.target_binding.matches_press(input) {
            let matched_engine = settings
                .engine_for_suggestion_input(input)
                .map(|engine| engine.id.clone());
            let shortcut = shortcut_index_by_code(&input.code);
            if let (Some(index), Some(engine)) = (self.suggestion_index, matched_engine.clone()) {
                self.suggestion_engine = Some(engine.clone());
                return vec![KeyAction::SuggestionSelect {
                    index,
                    engine: Some(engine),
                }];
            }
            if let Some(index) = shortcut {
                self.suggestion_index = Some(index);
                self.suggestion_engine = None;
                return vec![KeyAction::SuggestionSelect {
                    index,
                    engine: None,
                }];
            }
            if let Some(engine) = matched_engine {
                self.suggestion_index = Some(0);
                self.suggestion_engine = Some(engine.clone());
                return vec![KeyAction::SuggestionSelect {
                    index: 0,
                    engine: Some(engine),
                }];
            }
            return Vec::new();
        }

        match input.key.as_str() {
            "ArrowDown" => vec![KeyAction::Navigate(NavDirection::Down)],
            "ArrowUp" => vec![KeyAction::Navigate(NavDirection::Up)],
            "ArrowLeft" => vec![KeyAction::Navigate(NavDirection::Left)],
            "ArrowRight" => vec![KeyAction::Navigate(NavDirection::Right)],
            _ => Vec::new(),
        }
    }

    pub fn on_key_up(
        &mut self,
        settings: &SettingsSnapshot,
        ctx: TrackerContext,
        input: &KeyInput,
    ) -> Vec<KeyAction> {
        let mut actions = Vec::new();

        if settings.close_binding.matches_release(input) && self.close.is_held() {
            let was_tap = self.close.release();
            let combo_used = self.close_used_in_combo;
            self.close_used_in_combo = false;
            if was_tap && !combo_used {
                if let Some(ch) = settings.close_binding.literal_char() {
                    actions.push(KeyAction::InsertLiteral(ch));
                } else {
                    actions.push(KeyAction::CycleHistory);
                }
            }
            return actions;
        }

        let target_release = settings.target_binding.matches_release(input);

        if target_release
            && (self.target.is_held() || (self.suggestion_hold && self.suggestion_index.is_none()))
        {
            let was_tap = if self.target.is_held() {
                self.target.release()
            } else {
                true
            };
            if was_tap {
                actions.push(KeyAction::CommitHighlighted);
            }
        }

        if settings.engine_binding.matches_release(input) && self.engine.is_held() {
            let was_tap = self.engine.release();
            if was_tap {
                if ctx.hot_page_matched {
                    actions.push(KeyAction::HotPageJump);
                } else if let Some(ch) = settings.engine_binding.literal_char() {
                    actions.push(KeyAction::InsertLiteral(ch));
                }
            }
        }

        if target_release && self.suggestion_hold {
            if let Some(index) = self.suggestion_index {
                actions.push(KeyAction::CommitSuggestion {
                    index,
                    engine: self.suggestion_engine.take(),
                });
            }
            self.suggestion_hold = false;
            self.suggestion_index = None;
            self.suggestion_engine = None;
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyAction, ModifierTracker, NavDirection, TrackerContext, shortcut_index};
    use crate::model::{KeyInput, ModifierBinding, ModifierFlags, SettingsSnapshot};

    fn settings() -> SettingsSnapshot {
        SettingsSnapshot::default()
    }

    fn ctx() -> TrackerContext {
        TrackerContext::default()
    }

    fn shift_down() -> KeyInput {
        KeyInput::new("ShiftLeft", "Shift", ModifierFlags::SHIFT)
    }

    fn shift_up() -> KeyInput {
        KeyInput::new("ShiftLeft", "Shift", ModifierFlags::NONE)
    }

    fn alt_down() -> KeyInput {
        KeyInput::new("AltLeft", "Alt", ModifierFlags::ALT)
    }

    fn alt_up() -> KeyInput {
        KeyInput::new("AltLeft", "Alt", ModifierFlags::NONE)
    }

    fn engine_down() -> KeyInput {
        KeyInput::new("F21", "F21", ModifierFlags::NONE)
    }

    fn engine_up() -> KeyInput {
        KeyInput::new("F21", "F21", ModifierFlags::NONE)
    }

    fn letter(code: &str, key: &str, flags: ModifierFlags) -> KeyInput {
        KeyInput::new(code, key, flags)
    }

    #[test]
    fn shortcut_letters_map_to_grid_slots() {
        assert_eq!(shortcut_index("A"), Some(0));
        assert_eq!(shortcut_index("a"), Some(0));
        assert_eq!(shortcut_index("R"), Some(11));
        assert_eq!(shortcut_index("B"), None);
        assert_eq!(shortcut_index("Shift"), None);
    }

    #[test]
    fn close_tap_cycles_history() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        assert!(tracker.on_key_down(&settings, ctx(), &shift_down()).is_empty());
        let actions = tracker.on_key_up(&settings, ctx(), &shift_up());
        assert_eq!(actions, vec![KeyAction::CycleHistory]);
    }

    #[test]
    fn repeat_keydown_does_not_restart_hold() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &shift_down());
        let actions = tracker.on_key_down(&settings, ctx(), &shift_down().repeated());
        assert!(actions.is_empty());
        // Still a plain tap on release.
        assert_eq!(
            tracker.on_key_up(&settings, ctx(), &shift_up()),
            vec![KeyAction::CycleHistory]
        );
    }

    #[test]
    fn close_combo_targets_grid_slot_and_suppresses_tap() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &shift_down());
        let combo = tracker.on_key_down(&settings, ctx(), &letter("KeyS", "S", ModifierFlags::SHIFT));
        assert_eq!(combo, vec![KeyAction::CloseAtIndex(1)]);
        assert!(tracker.on_key_up(&settings, ctx(), &shift_up()).is_empty());
    }

    #[test]
    fn target_tap_commits_highlighted() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &alt_down());
        assert_eq!(
            tracker.on_key_up(&settings, ctx(), &alt_up()),
            vec![KeyAction::CommitHighlighted]
        );
    }

    #[test]
    fn target_combo_activates_grid_slot() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &alt_down());
        let combo = tracker.on_key_down(&settings, ctx(), &letter("KeyF", "f", ModifierFlags::ALT));
        assert_eq!(combo, vec![KeyAction::ActivateAtIndex(3)]);
        assert!(tracker.on_key_up(&settings, ctx(), &alt_up()).is_empty());
    }

    #[test]
    fn target_digit_opens_pinned_site() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &alt_down());
        let combo = tracker.on_key_down(&settings, ctx(), &letter("Digit3", "3", ModifierFlags::ALT));
        assert_eq!(combo, vec![KeyAction::OpenPinned(2)]);
    }

    #[test]
    fn target_plus_close_closes_highlighted_and_swallows_next_close_tap() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &alt_down());
        let combo = tracker.on_key_down(
            &settings,
            ctx(),
            &KeyInput::new(
                "ShiftLeft",
                "Shift",
                ModifierFlags {
                    alt: true,
                    shift: true,
                    ..ModifierFlags::NONE
                },
            ),
        );
        assert_eq!(combo, vec![KeyAction::CloseHighlighted]);
        assert!(tracker.on_key_up(&settings, ctx(), &alt_up()).is_empty());

        // The close key was consumed by the combo: its next solo tap is a
        // no-op instead of a history cycle.
        tracker.on_key_down(&settings, ctx(), &shift_down());
        assert!(tracker.on_key_up(&settings, ctx(), &shift_up()).is_empty());
        // And the one after behaves normally again.
        tracker.on_key_down(&settings, ctx(), &shift_down());
        assert_eq!(
            tracker.on_key_up(&settings, ctx(), &shift_up()),
            vec![KeyAction::CycleHistory]
        );
    }

    #[test]
    fn held_close_blocks_target_hold() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &shift_down());
        let pressed = tracker.on_key_down(
            &settings,
            ctx(),
            &KeyInput::new(
                "AltLeft",
                "Alt",
                ModifierFlags {
                    alt: true,
                    shift: true,
                    ..ModifierFlags::NONE
                },
            ),
        );
        assert!(pressed.is_empty());
        // Target never entered Held, so its release commits nothing.
        assert!(tracker.on_key_up(&settings, ctx(), &alt_up()).is_empty());
        // And the close hold became a combo, so its tap action is gone too.
        assert!(tracker.on_key_up(&settings, ctx(), &shift_up()).is_empty());
    }

    #[test]
    fn engine_combo_opens_engine() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &engine_down());
        let combo = tracker.on_key_down(&settings, ctx(), &letter("KeyY", "y", ModifierFlags::NONE));
        assert_eq!(combo, vec![KeyAction::OpenEngine("youtube".to_owned())]);
        assert!(tracker.on_key_up(&settings, ctx(), &engine_up()).is_empty());
    }

    #[test]
    fn engine_combo_with_wrong_flags_matches_nothing() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &engine_down());
        let combo =
            tracker.on_key_down(&settings, ctx(), &letter("KeyY", "Y", ModifierFlags::SHIFT));
        assert!(combo.is_empty());
    }

    #[test]
    fn engine_tap_jumps_to_matched_hot_page() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        let ctx = TrackerContext {
            hot_page_matched: true,
            ..TrackerContext::default()
        };
        tracker.on_key_down(&settings, ctx, &engine_down());
        assert_eq!(
            tracker.on_key_up(&settings, ctx, &engine_up()),
            vec![KeyAction::HotPageJump]
        );
    }

    #[test]
    fn engine_tap_inserts_literal_for_character_binding() {
        let mut settings = settings();
        settings.engine_binding = ModifierBinding::new("ö", "Semicolon", "ö", ModifierFlags::NONE);
        let mut tracker = ModifierTracker::new();
        let down = KeyInput::new("Semicolon", "ö", ModifierFlags::NONE);
        tracker.on_key_down(&settings, ctx(), &down);
        assert_eq!(
            tracker.on_key_up(&settings, ctx(), &down),
            vec![KeyAction::InsertLiteral('ö')]
        );
    }

    #[test]
    fn close_engine_letter_jumps_hot_page_by_letter() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        tracker.on_key_down(&settings, ctx(), &shift_down());
        tracker.on_key_down(
            &settings,
            ctx(),
            &KeyInput::new("F21", "F21", ModifierFlags::SHIFT),
        );
        let combo = tracker.on_key_down(&settings, ctx(), &letter("KeyG", "G", ModifierFlags::SHIFT));
        assert_eq!(combo, vec![KeyAction::HotPageJumpByLetter('g')]);
        // Both holds were combos: no tap actions on release.
        assert!(tracker.on_key_up(&settings, ctx(), &engine_up()).is_empty());
        assert!(tracker.on_key_up(&settings, ctx(), &shift_up()).is_empty());
    }

    #[test]
    fn web_search_key_commits_on_keydown() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        let enter = KeyInput::new("Enter", "Enter", ModifierFlags::NONE);
        assert_eq!(
            tracker.on_key_down(&settings, ctx(), &enter),
            vec![KeyAction::WebSearchCommit]
        );
    }

    #[test]
    fn recently_closed_and_force_search_honor_enable_flags() {
        let mut settings = settings();
        let mut tracker = ModifierTracker::new();
        let tab = KeyInput::new("Tab", "Tab", ModifierFlags::NONE);
        let ctrl = KeyInput::new("ControlLeft", "Control", ModifierFlags::CTRL);
        assert_eq!(
            tracker.on_key_down(&settings, ctx(), &tab),
            vec![KeyAction::ToggleRecentlyClosed]
        );
        assert_eq!(
            tracker.on_key_down(&settings, ctx(), &ctrl),
            vec![KeyAction::ToggleForceSearch]
        );

        settings.recently_closed_enabled = false;
        settings.force_search_enabled = false;
        assert!(tracker.on_key_down(&settings, ctx(), &tab).is_empty());
        assert!(tracker.on_key_down(&settings, ctx(), &ctrl).is_empty());
    }

    #[test]
    fn arrows_navigate() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        let down = KeyInput::new("ArrowDown", "ArrowDown", ModifierFlags::NONE);
        assert_eq!(
            tracker.on_key_down(&settings, ctx(), &down),
            vec![KeyAction::Navigate(NavDirection::Down)]
        );
    }

    #[test]
    fn suggestion_hold_selects_and_commits() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        let ctx = TrackerContext {
            suggestions_visible: true,
            ..TrackerContext::default()
        };
        assert!(tracker.on_key_down(&settings, ctx, &alt_down()).is_empty());
        let select =
            tracker.on_key_down(&settings, ctx, &letter("KeyD", "d", ModifierFlags::ALT));
        assert_eq!(
            select,
            vec![KeyAction::SuggestionSelect {
                index: 2,
                engine: None
            }]
        );
        // Engine pick applies to the already-selected suggestion.
        let engine =
            tracker.on_key_down(&settings, ctx, &letter("KeyY", "y", ModifierFlags::ALT));
        assert_eq!(
            engine,
            vec![KeyAction::SuggestionSelect {
                index: 2,
                engine: Some("youtube".to_owned())
            }]
        );
        assert_eq!(
            tracker.on_key_up(&settings, ctx, &alt_up()),
            vec![KeyAction::CommitSuggestion {
                index: 2,
                engine: Some("youtube".to_owned())
            }]
        );
    }

    #[test]
    fn suggestion_engine_first_selects_first_suggestion() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        let ctx = TrackerContext {
            suggestions_visible: true,
            ..TrackerContext::default()
        };
        tracker.on_key_down(&settings, ctx, &alt_down());
        let select =
            tracker.on_key_down(&settings, ctx, &letter("KeyY", "y", ModifierFlags::ALT));
        assert_eq!(
            select,
            vec![KeyAction::SuggestionSelect {
                index: 0,
                engine: Some("youtube".to_owned())
            }]
        );
    }

    #[test]
    fn suggestion_hold_release_without_selection_commits_highlighted() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        let ctx = TrackerContext {
            suggestions_visible: true,
            ..TrackerContext::default()
        };
        tracker.on_key_down(&settings, ctx, &alt_down());
        assert_eq!(
            tracker.on_key_up(&settings, ctx, &alt_up()),
            vec![KeyAction::CommitHighlighted]
        );
    }

    #[test]
    fn out_of_order_releases_are_harmless() {
        let settings = settings();
        let mut tracker = ModifierTracker::new();
        // Releases with no hold in progress do nothing and corrupt nothing.
        assert!(tracker.on_key_up(&settings, ctx(), &shift_up()).is_empty());
        assert!(tracker.on_key_up(&settings, ctx(), &alt_up()).is_empty());
        assert!(tracker.on_key_up(&settings, ctx(), &engine_up()).is_empty());
        // A normal hold afterwards still works.
        tracker.on_key_down(&settings, ctx(), &shift_down());
        assert_eq!(
            tracker.on_key_up(&settings, ctx(), &shift_up()),
            vec![KeyAction::CycleHistory]
        );
    }
}
