//! Common types shared across edge source implementations.

use serde::{Deserialize, Serialize};

/// Information about an edge source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source name (e.g., "Mock GPIO").
    pub name: String,

    /// Driver identifier.
    pub driver: String,

    /// Pins currently reporting edges, ascending.
    pub watched_pins: Vec<u8>,
}

impl SourceInfo {
    /// Create a new SourceInfo with no watched pins.
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: driver.into(),
            watched_pins: Vec::new(),
        }
    }

    /// Set the watched pins.
    pub fn with_watched_pins(mut self, mut pins: Vec<u8>) -> Self {
        pins.sort_unstable();
        self.watched_pins = pins;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_info_builder() {
        let info = SourceInfo::new("Mock GPIO", "mock").with_watched_pins(vec![18, 17]);
        assert_eq!(info.name, "Mock GPIO");
        assert_eq!(info.driver, "mock");
        assert_eq!(info.watched_pins, vec![17, 18]);
    }
}
