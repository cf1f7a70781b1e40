//! Input state tracking and the per-tick snapshot the simulation consumes.
//!
//! [`InputState`] accumulates window events between frames with both
//! level-triggered (`is_held`) and edge-triggered (`is_just_pressed`) queries.
//! Edge state is cleared by `end_frame()`, which the host calls only after a
//! frame that ran at least one fixed step — otherwise a key press landing on
//! a zero-step frame would be silently lost.
//!
//! [`TickInput`] is the immutable slice of that state a single simulation
//! tick sees: discrete key-down booleans plus pointer position and the
//! primary mouse button, all sampled once so every decision inside the tick
//! agrees on what was pressed.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Space,
    Escape,
    F3,
    F11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,

    /// Pointer position in window physical pixels; the host converts to
    /// logical game pixels when building a [`TickInput`].
    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one simulation tick reads. Keys the game does not use are not
/// part of the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Pointer in logical game pixels.
    pub pointer: (f32, f32),
    pub primary_down: bool,
}

impl TickInput {
    /// Sample the live input state. `pointer` is pre-converted by the host
    /// because only it knows the window-to-game scale.
    pub fn sample(input: &InputState, pointer: (f32, f32)) -> Self {
        Self {
            left: input.is_held(Key::Left) || input.is_held(Key::A),
            right: input.is_held(Key::Right) || input.is_held(Key::D),
            jump: input.is_held(Key::Space),
            pointer,
            primary_down: input.is_mouse_held(MouseBtn::Left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.is_held(Key::Space));
        assert!(input.is_just_pressed(Key::Space));
    }

    #[test]
    fn os_key_repeat_does_not_retrigger_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        // A repeated key_down while still held must not re-edge.
        input.key_down(Key::Space);
        assert!(input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn end_frame_clears_edges_but_keeps_held() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        input.mouse_down(MouseBtn::Left);
        input.end_frame();
        assert!(input.is_held(Key::D));
        assert!(input.is_mouse_held(MouseBtn::Left));
        assert!(!input.is_just_pressed(Key::D));
    }

    #[test]
    fn key_up_without_down_is_a_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::A);
        assert!(!input.is_just_released(Key::A));
    }

    #[test]
    fn snapshot_merges_wasd_and_arrow_movement() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        let snap = TickInput::sample(&input, (0.0, 0.0));
        assert!(snap.left);
        assert!(!snap.right);

        input.key_up(Key::A);
        input.key_down(Key::Right);
        let snap = TickInput::sample(&input, (0.0, 0.0));
        assert!(snap.right);
        assert!(!snap.left);
    }

    #[test]
    fn snapshot_carries_pointer_and_primary_button() {
        let mut input = InputState::new();
        input.mouse_down(MouseBtn::Left);
        let snap = TickInput::sample(&input, (512.0, 600.0));
        assert!(snap.primary_down);
        assert_eq!(snap.pointer, (512.0, 600.0));
    }
}
