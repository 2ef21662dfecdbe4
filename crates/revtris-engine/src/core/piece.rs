use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Enum representing the type of piece.
///
/// Each kind carries a base shape (rotation 0) and a display color. Both are
/// static tables and never change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds, in piece-selector order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the shape of this piece in its spawn orientation.
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        BASE_SHAPES[self as usize]
    }

    /// Returns the display color of this piece.
    #[must_use]
    pub const fn color(self) -> Rgb {
        COLORS[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use revtris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use revtris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece kind: {input:?} (expected one of I, O, T, S, Z, J, L)")]
pub struct ParsePieceKindError {
    input: String,
}

impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                PieceKind::from_char(c.to_ascii_uppercase()).ok_or_else(|| ParsePieceKindError {
                    input: s.to_owned(),
                })
            }
            _ => Err(ParsePieceKindError {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece {found:?} at position {position} in piece sequence")]
pub struct PieceSequenceError {
    position: usize,
    found: char,
}

/// Parses a compact piece sequence such as `"IOTSZ"`.
///
/// Whitespace and commas are ignored, and letters are case-insensitive.
///
/// # Examples
///
/// ```
/// use revtris_engine::{PieceKind, parse_piece_sequence};
///
/// let kinds = parse_piece_sequence("I, o T").unwrap();
/// assert_eq!(kinds, [PieceKind::I, PieceKind::O, PieceKind::T]);
/// ```
pub fn parse_piece_sequence(s: &str) -> Result<Vec<PieceKind>, PieceSequenceError> {
    s.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace() && *c != ',')
        .map(|(position, c)| {
            PieceKind::from_char(c.to_ascii_uppercase())
                .ok_or(PieceSequenceError { position, found: c })
        })
        .collect()
}

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const BASE_SHAPES: [Shape; PieceKind::LEN] = [
    // I-piece
    Shape::from_rows(&[&[1, 1, 1, 1]]),
    // O-piece
    Shape::from_rows(&[&[1, 1], &[1, 1]]),
    // S-piece
    Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
    // Z-piece
    Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
    // J-piece
    Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
    // L-piece
    Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
    // T-piece
    Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
];

const COLORS: [Rgb; PieceKind::LEN] = [
    Rgb::new(0x60, 0xa5, 0xfa),
    Rgb::new(0xfb, 0xbf, 0x24),
    Rgb::new(0x34, 0xd3, 0x99),
    Rgb::new(0xf8, 0x71, 0x71),
    Rgb::new(0x38, 0xbd, 0xf8),
    Rgb::new(0xfb, 0x92, 0x3c),
    Rgb::new(0xc0, 0x84, 0xfc),
];
