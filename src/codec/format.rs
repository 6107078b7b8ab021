//! Element formats, byte orders, and the decode kernel
//!
//! A [`Codec`] is always a complete, validated (format, byte order) pair
//! built from closed enums. Nothing here parses free-form format strings;
//! selection happens through [`CodecRegistry`](super::CodecRegistry)
//! indices, so an unsupported combination cannot reach the decode path.

use std::fmt;

/// Numeric interpretation of one payload element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFormat {
    /// Unsigned 8-bit
    UInt8,
    /// Signed 8-bit
    Int8,
    /// Unsigned 16-bit
    UInt16,
    /// Signed 16-bit
    Int16,
    /// Unsigned 32-bit
    UInt32,
    /// Signed 32-bit
    Int32,
}

impl ElementFormat {
    /// All supported formats, in stable menu order
    pub const ALL: [ElementFormat; 6] = [
        ElementFormat::UInt8,
        ElementFormat::Int8,
        ElementFormat::UInt16,
        ElementFormat::Int16,
        ElementFormat::UInt32,
        ElementFormat::Int32,
    ];

    /// Element width in bytes
    pub fn width(&self) -> usize {
        match self {
            ElementFormat::UInt8 | ElementFormat::Int8 => 1,
            ElementFormat::UInt16 | ElementFormat::Int16 => 2,
            ElementFormat::UInt32 | ElementFormat::Int32 => 4,
        }
    }

    /// Whether decoded values are sign-extended
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            ElementFormat::Int8 | ElementFormat::Int16 | ElementFormat::Int32
        )
    }

    /// Human-readable name, stable across releases (external menus index it)
    pub fn label(&self) -> &'static str {
        match self {
            ElementFormat::UInt8 => "uint8",
            ElementFormat::Int8 => "int8",
            ElementFormat::UInt16 => "uint16",
            ElementFormat::Int16 => "int16",
            ElementFormat::UInt32 => "uint32",
            ElementFormat::Int32 => "int32",
        }
    }

    /// Position of this format in [`ElementFormat::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ElementFormat::UInt8 => 0,
            ElementFormat::Int8 => 1,
            ElementFormat::UInt16 => 2,
            ElementFormat::Int16 => 3,
            ElementFormat::UInt32 => 4,
            ElementFormat::Int32 => 5,
        }
    }
}

impl fmt::Display for ElementFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            ElementFormat::UInt8 => "u8",
            ElementFormat::Int8 => "i8",
            ElementFormat::UInt16 => "u16",
            ElementFormat::Int16 => "i16",
            ElementFormat::UInt32 => "u32",
            ElementFormat::Int32 => "i32",
        };
        write!(f, "{}", tag)
    }
}

/// Byte order of multi-byte elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl ByteOrder {
    /// All supported byte orders, in stable menu order
    pub const ALL: [ByteOrder; 2] = [ByteOrder::Little, ByteOrder::Big];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            ByteOrder::Little => "little-endian",
            ByteOrder::Big => "big-endian",
        }
    }

    /// Position of this order in [`ByteOrder::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ByteOrder::Little => 0,
            ByteOrder::Big => 1,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            ByteOrder::Little => "le",
            ByteOrder::Big => "be",
        };
        write!(f, "{}", tag)
    }
}

/// How a frame payload's bytes map to numeric samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    /// Element width and signedness
    pub format: ElementFormat,
    /// Byte order of multi-byte elements
    pub order: ByteOrder,
}

impl Codec {
    /// Create a codec from a format and byte order
    pub fn new(format: ElementFormat, order: ByteOrder) -> Self {
        Self { format, order }
    }

    /// Element width in bytes
    pub fn element_width(&self) -> usize {
        self.format.width()
    }

    /// Decode a payload into samples, widened to `i64` so every supported
    /// format fits losslessly.
    ///
    /// Decodes `floor(len / width)` elements in payload order. Trailing
    /// bytes that do not fill a complete element are discarded; a short or
    /// empty payload is never an error.
    pub fn decode(&self, payload: &[u8]) -> Vec<i64> {
        let width = self.element_width();
        let mut samples = Vec::with_capacity(payload.len() / width);
        for chunk in payload.chunks_exact(width) {
            samples.push(self.decode_element(chunk));
        }
        samples
    }

    /// Decode one element. `bytes` has exactly `element_width()` bytes
    /// (guaranteed by `chunks_exact`).
    fn decode_element(&self, bytes: &[u8]) -> i64 {
        match (self.format, self.order) {
            (ElementFormat::UInt8, _) => i64::from(bytes[0]),
            (ElementFormat::Int8, _) => i64::from(bytes[0] as i8),
            (ElementFormat::UInt16, ByteOrder::Little) => {
                i64::from(u16::from_le_bytes([bytes[0], bytes[1]]))
            }
            (ElementFormat::UInt16, ByteOrder::Big) => {
                i64::from(u16::from_be_bytes([bytes[0], bytes[1]]))
            }
            (ElementFormat::Int16, ByteOrder::Little) => {
                i64::from(i16::from_le_bytes([bytes[0], bytes[1]]))
            }
            (ElementFormat::Int16, ByteOrder::Big) => {
                i64::from(i16::from_be_bytes([bytes[0], bytes[1]]))
            }
            (ElementFormat::UInt32, ByteOrder::Little) => {
                i64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            (ElementFormat::UInt32, ByteOrder::Big) => {
                i64::from(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            (ElementFormat::Int32, ByteOrder::Little) => {
                i64::from(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            (ElementFormat::Int32, ByteOrder::Big) => {
                i64::from(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        }
    }
}

impl Default for Codec {
    /// Signed 16-bit, little-endian — the conventional ADC stream format
    fn default() -> Self {
        Codec::new(ElementFormat::Int16, ByteOrder::Little)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.order, self.format)
    }
}
