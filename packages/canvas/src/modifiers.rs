//! Modifier-key state carried by every input event.

use serde::{Deserialize, Serialize};

/// The four modifier flags captured with each pointer or key event. `cmd` is
/// the platform command modifier (meta on macOS, ctrl-as-command elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub alt: bool,
    pub cmd: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        cmd: false,
        ctrl: false,
        shift: false,
    };

    pub const fn none() -> Self {
        Self::NONE
    }

    pub const fn cmd() -> Self {
        Modifiers {
            cmd: true,
            ..Self::NONE
        }
    }

    pub const fn shift() -> Self {
        Modifiers {
            shift: true,
            ..Self::NONE
        }
    }

    pub const fn alt() -> Self {
        Modifiers {
            alt: true,
            ..Self::NONE
        }
    }

    pub const fn ctrl() -> Self {
        Modifiers {
            ctrl: true,
            ..Self::NONE
        }
    }
}
