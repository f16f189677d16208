//! Kommandos und Token-Dekodierung
//!
//! Serielle Kommandos sind feste Tokens ohne Terminator, z.B.
//! `leader_red_task`. Bytes werden gesammelt, bis ein Token exakt passt
//! oder kein Token mehr mit dem Puffer beginnt.

use heapless::Vec;

use crate::types::SignalColor;

/// Maximale Token-Länge im Zeilenpuffer
pub const MAX_TOKEN_LEN: usize = 32;

/// Zeilenpuffer für unvollständige oder verworfene Tokens
pub type TokenBuffer = Vec<u8, MAX_TOKEN_LEN>;

/// Logisches Kommando nach der Dekodierung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Weckt den Signal-Task dieser Farbe
    Wake(SignalColor),
    /// Weiterleitung an den Follower im Mesh-Netz
    ToggleFollower,
}

/// Eintrag der Token-Tabelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandToken {
    pub token: &'static str,
    pub command: Command,
}

/// Zuordnung Taster-GPIO → Farbe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub pin: u8,
    pub color: SignalColor,
}

const fn token(token: &'static str, command: Command) -> CommandToken {
    CommandToken { token, command }
}

/// Standard-Tokens
///
/// Die einstelligen Tokens stammen aus der älteren UART-Variante
/// (`0` = Grün, `1` = Gelb, `2` = Rot).
pub const DEFAULT_COMMANDS: [CommandToken; 8] = [
    token("leader_red_task", Command::Wake(SignalColor::Red)),
    token("leader_yellow_task", Command::Wake(SignalColor::Yellow)),
    token("leader_green_task", Command::Wake(SignalColor::Green)),
    token("leader_blue_task", Command::Wake(SignalColor::Blue)),
    token("follower_toggle_led", Command::ToggleFollower),
    token("0", Command::Wake(SignalColor::Green)),
    token("1", Command::Wake(SignalColor::Yellow)),
    token("2", Command::Wake(SignalColor::Red)),
];

/// Standard-Taster: GPIO6 Rot, GPIO5 Gelb, GPIO4 Grün
pub const DEFAULT_BUTTONS: [ButtonBinding; 3] = [
    ButtonBinding {
        pin: 6,
        color: SignalColor::Red,
    },
    ButtonBinding {
        pin: 5,
        color: SignalColor::Yellow,
    },
    ButtonBinding {
        pin: 4,
        color: SignalColor::Green,
    },
];

/// Ergebnis der Token-Dekodierung
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Command(Command),
    /// Verworfene Bytes, die zu keinem Token passen
    Unrecognized(TokenBuffer),
}

/// Ergebnisse eines einzelnen Bytes
///
/// Höchstens zwei: zuerst ein verworfener Rest, danach das Ergebnis des
/// Bytes, das ein neues Token begonnen hat.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decodes {
    discarded: Option<TokenBuffer>,
    decoded: Option<Decoded>,
}

impl Decodes {
    fn single(decoded: Option<Decoded>) -> Self {
        Self {
            discarded: None,
            decoded,
        }
    }

    fn after_discard(discarded: TokenBuffer, decoded: Option<Decoded>) -> Self {
        Self {
            discarded: Some(discarded),
            decoded,
        }
    }
}

impl Iterator for Decodes {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        self.discarded
            .take()
            .map(Decoded::Unrecognized)
            .or_else(|| self.decoded.take())
    }
}

/// Sammelt serielle Bytes zu Tokens
pub struct LineDecoder<'a> {
    commands: &'a [CommandToken],
    buffer: TokenBuffer,
}

impl<'a> LineDecoder<'a> {
    pub fn new(commands: &'a [CommandToken]) -> Self {
        Self {
            commands,
            buffer: Vec::new(),
        }
    }

    /// Verarbeitet ein Byte
    ///
    /// Ein exakter Treffer gewinnt sofort, auch wenn ein längeres Token
    /// mit denselben Bytes beginnt. `\r`, `\n` und `\0` beenden ein
    /// angefangenes Token.
    ///
    /// Passt der Puffer zu keinem Token mehr, wird er einmal als unbekannt
    /// gemeldet. Kann das letzte Byte selbst ein Token beginnen, bleibt es
    /// stehen und nur der Rest davor wird verworfen.
    ///
    /// ```
    /// # use signal_core::{Command, Decoded, DEFAULT_COMMANDS, LineDecoder, SignalColor};
    /// let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
    /// let mut last = None;
    /// for b in b"xleader_green_task" {
    ///     last = decoder.push(*b).last().or(last);
    /// }
    /// assert_eq!(last, Some(Decoded::Command(Command::Wake(SignalColor::Green))));
    /// ```
    pub fn push(&mut self, byte: u8) -> Decodes {
        if matches!(byte, b'\r' | b'\n' | 0) {
            return Decodes::single(self.flush());
        }

        if self.buffer.push(byte).is_err() {
            let discarded = self.take();
            return Decodes::after_discard(discarded, self.restart(byte));
        }

        if let Some(command) = self.lookup(&self.buffer) {
            self.buffer.clear();
            return Decodes::single(Some(Decoded::Command(command)));
        }

        if self.is_prefix(&self.buffer) {
            return Decodes::default();
        }

        if self.buffer.len() > 1 && self.is_prefix(&[byte]) {
            self.buffer.pop();
            let discarded = self.take();
            return Decodes::after_discard(discarded, self.restart(byte));
        }

        Decodes::single(Some(Decoded::Unrecognized(self.take())))
    }

    /// Meldet ein angefangenes Token als unbekannt und leert den Puffer
    pub fn flush(&mut self) -> Option<Decoded> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(Decoded::Unrecognized(self.take()))
        }
    }

    /// Bytes, die auf ein Token warten
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    // Beginnt mit `byte` ein neues Token; der Puffer ist leer
    fn restart(&mut self, byte: u8) -> Option<Decoded> {
        if let Some(command) = self.lookup(&[byte]) {
            return Some(Decoded::Command(command));
        }
        self.buffer.extend([byte]);
        if self.is_prefix(&self.buffer) {
            None
        } else {
            Some(Decoded::Unrecognized(self.take()))
        }
    }

    fn lookup(&self, bytes: &[u8]) -> Option<Command> {
        self.commands
            .iter()
            .find(|c| c.token.as_bytes() == bytes)
            .map(|c| c.command)
    }

    fn is_prefix(&self, bytes: &[u8]) -> bool {
        self.commands
            .iter()
            .any(|c| c.token.as_bytes().starts_with(bytes))
    }

    fn take(&mut self) -> TokenBuffer {
        core::mem::take(&mut self.buffer)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::Wake(color) => defmt::write!(fmt, "Wake({})", color),
            Command::ToggleFollower => defmt::write!(fmt, "ToggleFollower"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut LineDecoder, bytes: &[u8]) -> Option<Decoded> {
        let mut last = None;
        for b in bytes {
            last = decoder.push(*b).last().or(last);
        }
        last
    }

    #[test]
    fn test_every_default_token_decodes() {
        for entry in DEFAULT_COMMANDS {
            let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
            assert_eq!(
                feed(&mut decoder, entry.token.as_bytes()),
                Some(Decoded::Command(entry.command))
            );
            assert!(decoder.pending().is_empty());
        }
    }

    #[test]
    fn test_garbage_is_rejected_immediately() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        let mut result = decoder.push(b'x');
        assert_eq!(
            result.next(),
            Some(Decoded::Unrecognized(Vec::from_slice(b"x").unwrap()))
        );
        assert_eq!(result.next(), None);
    }

    #[test]
    fn test_resync_after_garbage() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        assert!(matches!(
            decoder.push(b'?').next(),
            Some(Decoded::Unrecognized(_))
        ));
        assert_eq!(
            feed(&mut decoder, b"leader_red_task"),
            Some(Decoded::Command(Command::Wake(SignalColor::Red)))
        );
    }

    #[test]
    fn test_newline_flushes_partial_token() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        assert_eq!(feed(&mut decoder, b"leader_re"), None);
        assert_eq!(
            decoder.push(b'\n').next(),
            Some(Decoded::Unrecognized(Vec::from_slice(b"leader_re").unwrap()))
        );
        assert_eq!(decoder.push(b'\n').next(), None);
    }

    #[test]
    fn test_diverging_token_is_rejected() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        assert_eq!(
            feed(&mut decoder, b"leader_p"),
            Some(Decoded::Unrecognized(Vec::from_slice(b"leader_p").unwrap()))
        );
    }

    #[test]
    fn test_stray_byte_before_token_is_reported_once() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        let mut reports = 0;
        let mut commands = 0;
        for b in b"lleader_red_task" {
            for decoded in decoder.push(*b) {
                match decoded {
                    Decoded::Unrecognized(bytes) => {
                        assert_eq!(bytes.as_slice(), b"l");
                        reports += 1;
                    }
                    Decoded::Command(command) => {
                        assert_eq!(command, Command::Wake(SignalColor::Red));
                        commands += 1;
                    }
                }
            }
        }
        assert_eq!((reports, commands), (1, 1));
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_diverging_byte_restarts_next_token() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        assert_eq!(feed(&mut decoder, b"follower_"), None);

        let mut result = decoder.push(b'l');
        assert_eq!(
            result.next(),
            Some(Decoded::Unrecognized(Vec::from_slice(b"follower_").unwrap()))
        );
        assert_eq!(result.next(), None);
        assert_eq!(decoder.pending(), b"l");
    }

    #[test]
    fn test_single_byte_token_after_garbage_still_decodes() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        assert_eq!(feed(&mut decoder, b"leader_r"), None);

        let mut result = decoder.push(b'2');
        assert_eq!(
            result.next(),
            Some(Decoded::Unrecognized(Vec::from_slice(b"leader_r").unwrap()))
        );
        assert_eq!(
            result.next(),
            Some(Decoded::Command(Command::Wake(SignalColor::Red)))
        );
        assert_eq!(result.next(), None);
    }

    #[test]
    fn test_non_starting_byte_is_reported_with_its_prefix() {
        let mut decoder = LineDecoder::new(&DEFAULT_COMMANDS);
        assert_eq!(
            feed(&mut decoder, b"leader_rx"),
            Some(Decoded::Unrecognized(Vec::from_slice(b"leader_rx").unwrap()))
        );
        assert!(decoder.pending().is_empty());
    }
}
