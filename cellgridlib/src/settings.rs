//! View settings shared by the codec, the stores, and the grid shape.

/// Number of bytes that make up one logical cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementWidth {
    Byte,
    #[default]
    Word,
    Three,
    Long,
}

impl ElementWidth {
    pub const ALL: [Self; 4] = [Self::Byte, Self::Word, Self::Three, Self::Long];

    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Three => 3,
            Self::Long => 4,
        }
    }

    /// Width from a byte count, `None` if not in 1..=4
    #[must_use]
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::Byte),
            2 => Some(Self::Word),
            3 => Some(Self::Three),
            4 => Some(Self::Long),
            _ => None,
        }
    }

    /// Index into per-width lookup tables
    pub(crate) const fn index(self) -> usize {
        self.bytes() - 1
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Byte => "Byte",
            Self::Word => "Word",
            Self::Three => "Three",
            Self::Long => "Long",
        }
    }
}

/// Numeric base of displayed and typed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Base {
    Octal,
    Decimal,
    #[default]
    Hex,
}

impl Base {
    pub const ALL: [Self; 3] = [Self::Octal, Self::Decimal, Self::Hex];

    #[must_use]
    pub const fn radix(self) -> u32 {
        match self {
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }

    #[must_use]
    pub const fn from_radix(radix: u32) -> Option<Self> {
        match radix {
            8 => Some(Self::Octal),
            10 => Some(Self::Decimal),
            16 => Some(Self::Hex),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Octal => "Octal",
            Self::Decimal => "Decimal",
            Self::Hex => "Hex",
        }
    }
}

/// Byte order used to slice multi-byte cells from the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// How cells are interpreted and displayed.
///
/// Passed explicitly into the codec and the stores, never held as global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewSettings {
    pub width: ElementWidth,
    pub signed: bool,
    pub base: Base,
    pub endianness: Endianness,
}

impl ViewSettings {
    /// Settings the hex editor starts with: unsigned 16-bit words in hex
    #[must_use]
    pub const fn hex_default() -> Self {
        Self {
            width: ElementWidth::Word,
            signed: false,
            base: Base::Hex,
            endianness: Endianness::Little,
        }
    }

    /// Settings the spreadsheet starts with: signed 32-bit integers in decimal
    #[must_use]
    pub const fn sheet_default() -> Self {
        Self {
            width: ElementWidth::Long,
            signed: true,
            base: Base::Decimal,
            endianness: Endianness::Little,
        }
    }

    #[must_use]
    pub const fn with_width(mut self, width: ElementWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn with_base(mut self, base: Base) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub const fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    #[must_use]
    pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }
}
