//! Glyph Table
//!
//! Fixed bijection between byte values and Braille cells.
//!
//! Low values come first: the least significant bit is the bottom-right
//! dot and the most significant bit the top-left one, reading in columns.
//! The layout is not a plain offset into the Unicode block, so the forward
//! table is spelled out and the inverse is derived from it at compile time.

/// First codepoint of the Unicode Braille Patterns block
pub const BRAILLE_BASE: u32 = 0x2800;

/// Printable ASCII range shown as-is when requested
pub const PRINTABLE_ASCII: std::ops::RangeInclusive<u8> = 0x20..=0x7e;

#[rustfmt::skip]
static BYTE_TO_GLYPH: [char; 256] = [
    '⠀', '⢀', '⠠', '⢠', '⠐', '⢐', '⠰', '⢰', '⠈', '⢈', '⠨', '⢨', '⠘', '⢘', '⠸', '⢸', // 0x00
    '⡀', '⣀', '⡠', '⣠', '⡐', '⣐', '⡰', '⣰', '⡈', '⣈', '⡨', '⣨', '⡘', '⡸', '⣘', '⣸', // 0x10
    '⠄', '⢄', '⠤', '⢤', '⠔', '⢔', '⠴', '⢴', '⠌', '⢌', '⠬', '⢬', '⠜', '⢜', '⠼', '⢼', // 0x20
    '⡄', '⣄', '⡤', '⣤', '⡔', '⣔', '⡴', '⣴', '⡌', '⣌', '⡬', '⣬', '⡜', '⣜', '⡼', '⣼', // 0x30
    '⠂', '⢂', '⠢', '⢢', '⠒', '⢒', '⠲', '⢲', '⠊', '⢊', '⠪', '⢪', '⠚', '⢚', '⠺', '⢺', // 0x40
    '⡂', '⣂', '⡢', '⣢', '⡒', '⣒', '⡲', '⣲', '⡊', '⣊', '⡪', '⣪', '⡚', '⣚', '⡺', '⣺', // 0x50
    '⠆', '⢆', '⠦', '⢦', '⠖', '⢖', '⠶', '⢶', '⠎', '⢎', '⠮', '⢮', '⠞', '⢞', '⠾', '⢾', // 0x60
    '⡆', '⣆', '⡦', '⣦', '⡖', '⣖', '⡶', '⣶', '⡎', '⣎', '⡮', '⣮', '⡞', '⣞', '⡾', '⣾', // 0x70
    '⠁', '⢁', '⠡', '⢡', '⠑', '⢑', '⠱', '⠉', '⢉', '⠩', '⢩', '⠙', '⢙', '⠹', '⢱', '⢹', // 0x80
    '⡁', '⣁', '⡡', '⣡', '⡑', '⣑', '⡱', '⣱', '⡉', '⣉', '⡩', '⣩', '⡙', '⣙', '⡹', '⣹', // 0x90
    '⠅', '⢅', '⠥', '⢥', '⠕', '⢕', '⠵', '⢵', '⠍', '⢍', '⠭', '⢭', '⠝', '⢝', '⠽', '⢽', // 0xa0
    '⡅', '⣅', '⡥', '⣥', '⡕', '⣕', '⡵', '⣵', '⡍', '⣍', '⡭', '⣭', '⡝', '⣝', '⡽', '⣽', // 0xb0
    '⠃', '⢃', '⠣', '⢣', '⠓', '⢓', '⠳', '⢳', '⠋', '⢋', '⠫', '⢫', '⠛', '⢛', '⠻', '⢻', // 0xc0
    '⡃', '⣃', '⡣', '⣣', '⡓', '⣓', '⡳', '⣳', '⡋', '⣋', '⡫', '⣫', '⡛', '⣛', '⡻', '⣻', // 0xd0
    '⠇', '⢇', '⠧', '⢧', '⠗', '⢗', '⠷', '⢷', '⠏', '⢏', '⠯', '⢯', '⠟', '⢟', '⠿', '⢿', // 0xe0
    '⡇', '⣇', '⡧', '⣧', '⡗', '⣗', '⡷', '⣷', '⡏', '⣏', '⡯', '⣯', '⡟', '⣟', '⡿', '⣿', // 0xf0
];

static GLYPH_TO_BYTE: [u8; 256] = invert(&BYTE_TO_GLYPH);

const fn invert(table: &[char; 256]) -> [u8; 256] {
    let mut inverse = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let offset = table[i] as u32 - BRAILLE_BASE;
        inverse[offset as usize] = i as u8;
        i += 1;
    }
    inverse
}

/// Glyph for a byte value
pub fn byte_to_glyph(b: u8) -> char {
    BYTE_TO_GLYPH[b as usize]
}

/// Byte value for a Braille glyph or a printable ASCII character
pub fn glyph_to_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if (BRAILLE_BASE..BRAILLE_BASE + 256).contains(&code) {
        return Some(GLYPH_TO_BYTE[(code - BRAILLE_BASE) as usize]);
    }
    u8::try_from(c).ok().filter(|b| PRINTABLE_ASCII.contains(b))
}

/// Whether `c` is one of the 256 Braille glyphs
pub fn is_glyph(c: char) -> bool {
    (BRAILLE_BASE..BRAILLE_BASE + 256).contains(&(c as u32))
}
