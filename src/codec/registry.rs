//! Indexed codec selection shared between the control path and the frame path
//!
//! External control surfaces (a PV server, an RPC layer) see the codec as a
//! pair of integer selectors backed by the stable listings in
//! [`ElementFormat::ALL`] and [`ByteOrder::ALL`]. The active selection is a
//! single [`Codec`] behind one lock, so the frame path never observes a
//! half-updated (format, order) pair.

use std::sync::Mutex;

use tracing::{debug, warn};

use super::format::{ByteOrder, Codec, ElementFormat};

/// Runtime codec selection with integer-indexed readback
pub struct CodecRegistry {
    active: Mutex<Codec>,
}

impl CodecRegistry {
    /// Create a registry with an initial selection
    pub fn new(initial: Codec) -> Self {
        Self {
            active: Mutex::new(initial),
        }
    }

    /// Human-readable element format names, in selector order
    pub fn element_format_labels() -> Vec<&'static str> {
        ElementFormat::ALL.iter().map(|f| f.label()).collect()
    }

    /// Human-readable byte order names, in selector order
    pub fn byte_order_labels() -> Vec<&'static str> {
        ByteOrder::ALL.iter().map(|o| o.label()).collect()
    }

    /// Select the element format at `index`.
    ///
    /// An out-of-range index keeps the prior selection, logs the rejection,
    /// and returns `false`. No error reaches the caller; a control surface
    /// poking a bad selector must not disturb a running acquisition.
    pub fn select_element_format(&self, index: usize) -> bool {
        let Some(&format) = ElementFormat::ALL.get(index) else {
            warn!(
                index,
                count = ElementFormat::ALL.len(),
                "element format index out of range, keeping current selection"
            );
            return false;
        };
        let mut active = self.active.lock().unwrap();
        active.format = format;
        debug!(codec = %*active, "element format selected");
        true
    }

    /// Select the byte order at `index`. Same out-of-range contract as
    /// [`select_element_format`](Self::select_element_format).
    pub fn select_byte_order(&self, index: usize) -> bool {
        let Some(&order) = ByteOrder::ALL.get(index) else {
            warn!(
                index,
                count = ByteOrder::ALL.len(),
                "byte order index out of range, keeping current selection"
            );
            return false;
        };
        let mut active = self.active.lock().unwrap();
        active.order = order;
        debug!(codec = %*active, "byte order selected");
        true
    }

    /// Index of the active element format in the label listing
    pub fn current_format_index(&self) -> usize {
        self.active.lock().unwrap().format.index()
    }

    /// Index of the active byte order in the label listing
    pub fn current_byte_order_index(&self) -> usize {
        self.active.lock().unwrap().order.index()
    }

    /// The active codec pair
    pub fn current_codec(&self) -> Codec {
        *self.active.lock().unwrap()
    }

    /// Replace the whole selection at once
    pub fn set_codec(&self, codec: Codec) {
        let mut active = self.active.lock().unwrap();
        *active = codec;
        debug!(codec = %*active, "codec replaced");
    }

    /// Diagnostic tag for the active codec, e.g. `le:i16`
    pub fn describe(&self) -> String {
        self.current_codec().to_string()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new(Codec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_listings() {
        assert_eq!(
            CodecRegistry::element_format_labels(),
            vec!["uint8", "int8", "uint16", "int16", "uint32", "int32"]
        );
        assert_eq!(
            CodecRegistry::byte_order_labels(),
            vec!["little-endian", "big-endian"]
        );
    }

    #[test]
    fn test_select_by_index() {
        let registry = CodecRegistry::default();
        assert_eq!(registry.current_format_index(), 3); // int16
        assert_eq!(registry.current_byte_order_index(), 0); // little-endian

        assert!(registry.select_element_format(4)); // uint32
        assert!(registry.select_byte_order(1)); // big-endian
        assert_eq!(registry.current_format_index(), 4);
        assert_eq!(registry.current_byte_order_index(), 1);
        assert_eq!(
            registry.current_codec(),
            Codec::new(ElementFormat::UInt32, ByteOrder::Big)
        );
    }

    #[test]
    fn test_out_of_range_keeps_selection() {
        let registry = CodecRegistry::default();
        assert!(!registry.select_element_format(6));
        assert!(!registry.select_byte_order(2));
        assert_eq!(registry.current_format_index(), 3);
        assert_eq!(registry.current_byte_order_index(), 0);
    }

    #[test]
    fn test_describe() {
        let registry = CodecRegistry::default();
        assert_eq!(registry.describe(), "le:i16");
        registry.set_codec(Codec::new(ElementFormat::UInt16, ByteOrder::Big));
        assert_eq!(registry.describe(), "be:u16");
    }
}
