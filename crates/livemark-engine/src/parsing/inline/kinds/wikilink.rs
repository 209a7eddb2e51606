/// `[[target]]`, `[[target|alias]]` and the `!` embed forms.
pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const ALIAS: u8 = b'|';
    pub const EMBED: u8 = b'!';

    /// Bytes allowed in a target: anything but brackets, newline and `|`.
    pub fn is_target_byte(b: u8) -> bool {
        !matches!(b, b'[' | b']' | b'\n') && b != Self::ALIAS
    }

    /// Bytes allowed in an alias. `|` is permitted.
    pub fn is_alias_byte(b: u8) -> bool {
        !matches!(b, b'[' | b']' | b'\n')
    }
}
