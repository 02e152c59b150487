// Keyboard -> text field.
// Keys edit the field when pressed; the full field value is handed to the
// particle field when a key is released, unless that key was a bare Space.
// Visual: type "Rust" and the letters rebuild as you type; pressing Space alone changes nothing yet.

use minifb::Key;

/// What a key does to the text field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
    Other, // modifiers, arrows, ... : no edit, but releasing still re-submits
}

impl Keystroke {
    /// US layout mapping for the keys the window reports.
    pub fn from_key(key: Key, shift: bool) -> Self {
        let ch = match key {
            Key::Backspace => return Keystroke::Backspace,
            Key::Space => ' ',
            Key::A => 'a', Key::B => 'b', Key::C => 'c', Key::D => 'd', Key::E => 'e',
            Key::F => 'f', Key::G => 'g', Key::H => 'h', Key::I => 'i', Key::J => 'j',
            Key::K => 'k', Key::L => 'l', Key::M => 'm', Key::N => 'n', Key::O => 'o',
            Key::P => 'p', Key::Q => 'q', Key::R => 'r', Key::S => 's', Key::T => 't',
            Key::U => 'u', Key::V => 'v', Key::W => 'w', Key::X => 'x', Key::Y => 'y',
            Key::Z => 'z',
            Key::Key0 => if shift { ')' } else { '0' },
            Key::Key1 => if shift { '!' } else { '1' },
            Key::Key2 => if shift { '@' } else { '2' },
            Key::Key3 => if shift { '#' } else { '3' },
            Key::Key4 => if shift { '$' } else { '4' },
            Key::Key5 => if shift { '%' } else { '5' },
            Key::Key6 => if shift { '^' } else { '6' },
            Key::Key7 => if shift { '&' } else { '7' },
            Key::Key8 => if shift { '*' } else { '8' },
            Key::Key9 => if shift { '(' } else { '9' },
            Key::Period => if shift { '>' } else { '.' },
            Key::Comma => if shift { '<' } else { ',' },
            Key::Minus => if shift { '_' } else { '-' },
            Key::Equal => if shift { '+' } else { '=' },
            Key::Slash => if shift { '?' } else { '/' },
            Key::Semicolon => if shift { ':' } else { ';' },
            Key::Apostrophe => if shift { '"' } else { '\'' },
            Key::Backslash => if shift { '|' } else { '\\' },
            _ => return Keystroke::Other,
        };
        if shift { Keystroke::Char(ch.to_ascii_uppercase()) } else { Keystroke::Char(ch) }
    }
}

#[derive(Debug, Default)]
pub struct TextField {
    value: String,
}

impl TextField {
    pub fn new(initial: &str) -> Self {
        Self { value: initial.to_string() }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Key down: edit the value.
    pub fn press(&mut self, stroke: Keystroke) {
        match stroke {
            Keystroke::Char(c) => self.value.push(c),
            Keystroke::Backspace => {
                self.value.pop();
            }
            Keystroke::Other => {}
        }
    }

    /// Key up: the text to re-rasterize, or None for a bare Space.
    pub fn release(&self, stroke: Keystroke) -> Option<String> {
        match stroke {
            Keystroke::Char(' ') => None,
            _ => Some(self.value.clone()),
        }
    }
}
