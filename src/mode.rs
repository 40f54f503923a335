//! Display mode state machine.
//!
//! The display cycles `Home -> Exploded -> Text -> Home` on every activation.
//! The current mode is a plain register that the animation polls each frame;
//! nothing is queued, so a late read simply sees the newest mode.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Which arrangement the particles are moving towards.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// The cone ("tree") arrangement.
    #[default]
    Home = 0,
    /// The sphere-shell burst.
    Exploded = 1,
    /// The rasterized text silhouette.
    Text = 2,
}

impl DisplayMode {
    /// All modes in cycle order.
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Home, DisplayMode::Exploded, DisplayMode::Text];

    /// The mode an activation moves to.
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Home => DisplayMode::Exploded,
            DisplayMode::Exploded => DisplayMode::Text,
            DisplayMode::Text => DisplayMode::Home,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => DisplayMode::Exploded,
            2 => DisplayMode::Text,
            _ => DisplayMode::Home,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Home => "home",
            DisplayMode::Exploded => "exploded",
            DisplayMode::Text => "text",
        };
        f.write_str(name)
    }
}

/// Shared current-mode register.
///
/// Wrap it in an `Arc` to hand the input side a handle while the scene keeps
/// reading it every frame.
#[derive(Debug, Default)]
pub struct ModeRegister {
    raw: AtomicU8,
}

impl ModeRegister {
    /// A register starting in [`DisplayMode::Home`].
    pub fn new() -> Self {
        Self::with_mode(DisplayMode::Home)
    }

    /// A register starting in `mode`.
    pub fn with_mode(mode: DisplayMode) -> Self {
        Self {
            raw: AtomicU8::new(mode as u8),
        }
    }

    /// The current mode.
    #[inline]
    pub fn current(&self) -> DisplayMode {
        DisplayMode::from_raw(self.raw.load(Ordering::Acquire))
    }

    /// Advance to the next mode and return it.
    pub fn activate(&self) -> DisplayMode {
        let previous = self
            .raw
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(DisplayMode::from_raw(raw).next() as u8)
            })
            .unwrap_or_else(|raw| raw);
        DisplayMode::from_raw(previous).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_initial_mode_is_home() {
        assert_eq!(ModeRegister::new().current(), DisplayMode::Home);
        assert_eq!(DisplayMode::default(), DisplayMode::Home);
    }

    #[test]
    fn test_cycle_order() {
        let register = ModeRegister::new();
        assert_eq!(register.activate(), DisplayMode::Exploded);
        assert_eq!(register.current(), DisplayMode::Exploded);
        assert_eq!(register.activate(), DisplayMode::Text);
        assert_eq!(register.activate(), DisplayMode::Home);
        assert_eq!(register.current(), DisplayMode::Home);
    }

    #[test]
    fn test_three_activations_return_to_start() {
        for start in DisplayMode::ALL {
            let register = ModeRegister::with_mode(start);
            for _ in 0..3 {
                register.activate();
            }
            assert_eq!(register.current(), start);
        }
    }

    #[test]
    fn test_concurrent_activations_are_not_lost() {
        let register = Arc::new(ModeRegister::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let register = Arc::clone(&register);
                thread::spawn(move || {
                    for _ in 0..30 {
                        register.activate();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // 120 activations is a multiple of 3
        assert_eq!(register.current(), DisplayMode::Home);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DisplayMode::Text.to_string(), "text");
    }
}
