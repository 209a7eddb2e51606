/// `**strong**` and `__strong__`.
pub struct Strong;

impl Strong {
    pub const MARKERS: [&'static [u8; 2]; 2] = [b"**", b"__"];
}

/// `*emphasis*` and `_emphasis_`.
pub struct Emphasis;

impl Emphasis {
    pub const MARKERS: [u8; 2] = [b'*', b'_'];
}
