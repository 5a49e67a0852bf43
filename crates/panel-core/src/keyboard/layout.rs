//! The on-screen keyboard layout table.
//!
//! The keyboard is a single wrapped row of keys, rendered in table order:
//!
//! ```text
//! 1 2 3 4 5 6 7 8 9 0 ⌫
//! q w e r t y u i o p
//! ⇪ a s d f g h j k l ENTER
//! SHIFT z x c v b n m , . ? @
//! SPACE ✕
//! ```
//!
//! Every key is identified by its lowercase logical label (`"q"`,
//! `"backspace"`, `"dismiss"`, ...).  The widget tags each rendered key target
//! with that identity and resolves it back through [`KeyDescriptor::find`]
//! when the key is activated.

/// What a key does when it is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Types its own label into the active field.
    Character,
    /// Removes the last character of the active field.
    Backspace,
    /// Flips caps-lock.
    CapsToggle,
    /// Reserved.  Present in the layout but intentionally does nothing.
    ShiftToggle,
    /// Types a single space.
    Space,
    /// Closes the keyboard.  Nothing is submitted.
    Enter,
    /// Closes the keyboard through its own dedicated listener.
    Dismiss,
}

/// What is drawn on a key's face in the static table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Plain text, e.g. `"q"` or `"SPACE"`.
    Text(&'static str),
    /// An icon-font class name, e.g. `"bi-backspace-fill"`.
    Icon(&'static str),
}

/// What a rendered key currently shows, after caps-lock has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFace {
    Text(String),
    Icon(&'static str),
}

/// Visual treatment of a key target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTone {
    /// Neutral outline, used by all typing keys.
    Outline,
    /// Backspace.
    Warning,
    /// Caps, Enter and Shift.
    Info,
    /// Dismiss.
    Danger,
}

/// Horizontal size of a key target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWidth {
    /// 70 px square.
    Standard,
    /// 100 px, for Enter and Shift.
    Wide,
    /// Grows to fill the remaining row (Space).
    Stretch,
}

impl KeyWidth {
    /// Fixed width in CSS pixels, or `None` for a stretching key.
    pub fn pixels(self) -> Option<u32> {
        match self {
            KeyWidth::Standard => Some(70),
            KeyWidth::Wide => Some(100),
            KeyWidth::Stretch => None,
        }
    }
}

/// Identity of the Dismiss key.  The widget attaches a dedicated listener to it.
pub const DISMISS_KEY: &str = "dismiss";

/// One entry of the fixed layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptor {
    /// Logical label, always lowercase.  Doubles as the key's identity.
    pub label: &'static str,
    /// What the key shows when caps-lock is off.
    pub glyph: Glyph,
    pub role: KeyRole,
}

impl KeyDescriptor {
    const fn character(label: &'static str) -> Self {
        Self {
            label,
            glyph: Glyph::Text(label),
            role: KeyRole::Character,
        }
    }

    const fn control(label: &'static str, glyph: Glyph, role: KeyRole) -> Self {
        Self { label, glyph, role }
    }

    /// The identity used to tag the rendered key target.
    pub fn id(&self) -> &'static str {
        self.label
    }

    /// Resolves a key identity back to its table entry.
    ///
    /// Returns `None` for identities that are not in [`KEY_LAYOUT`].
    pub fn find(id: &str) -> Option<&'static KeyDescriptor> {
        KEY_LAYOUT.iter().find(|key| key.label == id)
    }

    /// Visual treatment for this key's role.
    pub fn tone(&self) -> KeyTone {
        match self.role {
            KeyRole::Character | KeyRole::Space => KeyTone::Outline,
            KeyRole::Backspace => KeyTone::Warning,
            KeyRole::CapsToggle | KeyRole::Enter | KeyRole::ShiftToggle => KeyTone::Info,
            KeyRole::Dismiss => KeyTone::Danger,
        }
    }

    /// Target width for this key's role.
    pub fn width(&self) -> KeyWidth {
        match self.role {
            KeyRole::Space => KeyWidth::Stretch,
            KeyRole::Enter | KeyRole::ShiftToggle => KeyWidth::Wide,
            _ => KeyWidth::Standard,
        }
    }

    /// `true` when the label is exactly one character.
    ///
    /// Only these keys change their face when caps-lock flips; this includes
    /// digits and punctuation, whose upper case is themselves.
    pub fn is_single_char(&self) -> bool {
        self.label.chars().count() == 1
    }

    /// The face to draw for the given caps-lock state.
    pub fn face(&self, caps_lock: bool) -> KeyFace {
        match self.glyph {
            Glyph::Icon(icon) => KeyFace::Icon(icon),
            Glyph::Text(text) if self.is_single_char() => KeyFace::Text(case_fold(text, caps_lock)),
            Glyph::Text(text) => KeyFace::Text(text.to_string()),
        }
    }

    /// The text a `Character` key appends to the active field.
    ///
    /// Returns `None` for every other role.
    pub fn typed_text(&self, caps_lock: bool) -> Option<String> {
        match self.role {
            KeyRole::Character => Some(case_fold(self.label, caps_lock)),
            _ => None,
        }
    }
}

fn case_fold(text: &str, caps_lock: bool) -> String {
    if caps_lock {
        text.to_uppercase()
    } else {
        text.to_lowercase()
    }
}

/// The fixed keyboard layout, in rendering order.
pub static KEY_LAYOUT: [KeyDescriptor; 46] = [
    // Digit row
    KeyDescriptor::character("1"),
    KeyDescriptor::character("2"),
    KeyDescriptor::character("3"),
    KeyDescriptor::character("4"),
    KeyDescriptor::character("5"),
    KeyDescriptor::character("6"),
    KeyDescriptor::character("7"),
    KeyDescriptor::character("8"),
    KeyDescriptor::character("9"),
    KeyDescriptor::character("0"),
    KeyDescriptor::control("backspace", Glyph::Icon("bi-backspace-fill"), KeyRole::Backspace),
    // Top letter row
    KeyDescriptor::character("q"),
    KeyDescriptor::character("w"),
    KeyDescriptor::character("e"),
    KeyDescriptor::character("r"),
    KeyDescriptor::character("t"),
    KeyDescriptor::character("y"),
    KeyDescriptor::character("u"),
    KeyDescriptor::character("i"),
    KeyDescriptor::character("o"),
    KeyDescriptor::character("p"),
    // Home row
    KeyDescriptor::control("caps", Glyph::Icon("bi-capslock-fill"), KeyRole::CapsToggle),
    KeyDescriptor::character("a"),
    KeyDescriptor::character("s"),
    KeyDescriptor::character("d"),
    KeyDescriptor::character("f"),
    KeyDescriptor::character("g"),
    KeyDescriptor::character("h"),
    KeyDescriptor::character("j"),
    KeyDescriptor::character("k"),
    KeyDescriptor::character("l"),
    KeyDescriptor::control("enter", Glyph::Text("ENTER"), KeyRole::Enter),
    // Bottom row
    KeyDescriptor::control("shift", Glyph::Text("SHIFT"), KeyRole::ShiftToggle),
    KeyDescriptor::character("z"),
    KeyDescriptor::character("x"),
    KeyDescriptor::character("c"),
    KeyDescriptor::character("v"),
    KeyDescriptor::character("b"),
    KeyDescriptor::character("n"),
    KeyDescriptor::character("m"),
    KeyDescriptor::character(","),
    KeyDescriptor::character("."),
    KeyDescriptor::character("?"),
    KeyDescriptor::character("@"),
    // Space bar and dismiss
    KeyDescriptor::control("space", Glyph::Text("SPACE"), KeyRole::Space),
    KeyDescriptor::control(DISMISS_KEY, Glyph::Icon("bi-x-circle-fill"), KeyRole::Dismiss),
];

// ── Tests ─────────────────────────────────────────────────────────────────────
