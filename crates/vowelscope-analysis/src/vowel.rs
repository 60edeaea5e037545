//! Vowel classification by nearest IPA reference point in the F1/F2 plane.

/// Distance in Hz below which a reference vowel matches.
pub const MAX_MATCH_DISTANCE: f32 = 400.0;

/// A reference vowel: IPA symbol with typical F1/F2 in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VowelReference {
    /// IPA symbol.
    pub symbol: &'static str,
    /// First formant in Hz.
    pub f1: f32,
    /// Second formant in Hz.
    pub f2: f32,
}

const fn vowel(symbol: &'static str, f1: f32, f2: f32) -> VowelReference {
    VowelReference { symbol, f1, f2 }
}

/// Reference F1/F2 values for IPA vowels.
pub static IPA_VOWELS: [VowelReference; 37] = [
    // Close
    vowel("i", 270.0, 2290.0),
    vowel("y", 235.0, 2100.0),
    vowel("ɨ", 320.0, 1650.0),
    vowel("ʉ", 320.0, 1500.0),
    vowel("ɯ", 300.0, 1390.0),
    vowel("u", 300.0, 870.0),
    // Near-close
    vowel("ɪ", 390.0, 1990.0),
    vowel("ʏ", 360.0, 1800.0),
    vowel("ʊ", 440.0, 1020.0),
    // Close-mid
    vowel("e", 390.0, 2300.0),
    vowel("ø", 370.0, 1900.0),
    vowel("ɘ", 420.0, 1750.0),
    vowel("ɵ", 420.0, 1550.0),
    vowel("ɤ", 460.0, 1310.0),
    vowel("o", 360.0, 640.0),
    // Mid
    vowel("ə", 500.0, 1500.0),
    // Open-mid
    vowel("ɛ", 530.0, 1840.0),
    vowel("œ", 585.0, 1710.0),
    vowel("ɜ", 560.0, 1480.0),
    vowel("ɞ", 560.0, 1350.0),
    vowel("ʌ", 640.0, 1190.0),
    vowel("ɔ", 570.0, 840.0),
    // Near-open
    vowel("æ", 660.0, 1720.0),
    vowel("ɐ", 700.0, 1350.0),
    // Open
    vowel("a", 850.0, 1610.0),
    vowel("ɶ", 820.0, 1530.0),
    vowel("ɑ", 730.0, 1090.0),
    vowel("ɒ", 700.0, 760.0),
    // Rhotic
    vowel("ɝ", 490.0, 1350.0),
    vowel("ɚ", 470.0, 1400.0),
    // Nasal
    vowel("ɛ̃", 600.0, 1650.0),
    vowel("ɑ̃", 650.0, 1000.0),
    vowel("ɔ̃", 500.0, 800.0),
    vowel("œ̃", 560.0, 1600.0),
    // Centralized
    vowel("ä", 780.0, 1400.0),
    vowel("ë", 450.0, 2000.0),
    vowel("ɪ̈", 400.0, 1650.0),
];

/// Result of a vowel lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VowelMatch {
    /// IPA symbol of the nearest reference.
    pub symbol: &'static str,
    /// Reference F1 in Hz.
    pub f1: f32,
    /// Reference F2 in Hz.
    pub f2: f32,
    /// Euclidean distance from the query in Hz.
    pub distance: f32,
}

/// Read-only table of reference vowels.
#[derive(Debug, Clone, Copy)]
pub struct VowelTable {
    entries: &'static [VowelReference],
}

impl Default for VowelTable {
    fn default() -> Self {
        Self::ipa()
    }
}

impl VowelTable {
    /// The built-in IPA table.
    pub fn ipa() -> Self {
        Self::new(&IPA_VOWELS)
    }

    /// Table over custom references.
    pub fn new(entries: &'static [VowelReference]) -> Self {
        Self { entries }
    }

    /// All references.
    pub fn entries(&self) -> &'static [VowelReference] {
        self.entries
    }

    /// Reference with the given symbol.
    pub fn get(&self, symbol: &str) -> Option<&'static VowelReference> {
        self.entries.iter().find(|v| v.symbol == symbol)
    }

    /// Nearest reference regardless of distance (first one on ties).
    pub fn nearest(&self, f1: f32, f2: f32) -> Option<VowelMatch> {
        let mut best: Option<VowelMatch> = None;
        for reference in self.entries {
            let distance = (f1 - reference.f1).hypot(f2 - reference.f2);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(VowelMatch {
                    symbol: reference.symbol,
                    f1: reference.f1,
                    f2: reference.f2,
                    distance,
                });
            }
        }
        best
    }

    /// Nearest reference strictly closer than `max_distance`.
    pub fn nearest_within(&self, f1: f32, f2: f32, max_distance: f32) -> Option<VowelMatch> {
        self.nearest(f1, f2).filter(|m| m.distance < max_distance)
    }
}

/// Classify an F1/F2 pair against the IPA table.
pub fn detect_vowel(f1: f32, f2: f32) -> Option<VowelMatch> {
    VowelTable::ipa().nearest_within(f1, f2, MAX_MATCH_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_point_matches_itself() {
        let m = detect_vowel(270.0, 2290.0).unwrap();
        assert_eq!(m.symbol, "i");
        assert_eq!(m.distance, 0.0);
    }

    #[test]
    fn far_point_has_no_match() {
        assert_eq!(detect_vowel(2000.0, 2000.0), None);
        assert!(VowelTable::ipa().nearest(2000.0, 2000.0).is_some());
    }

    #[test]
    fn threshold_is_strict() {
        let table = VowelTable::ipa();
        let exact = table.nearest(300.0, 870.0).unwrap();
        assert_eq!(exact.symbol, "u");
        assert!(table.nearest_within(300.0, 870.0, 0.0).is_none());
    }

    #[test]
    fn table_has_unique_symbols() {
        let table = VowelTable::ipa();
        assert_eq!(table.entries().len(), 37);
        for v in table.entries() {
            assert_eq!(table.get(v.symbol), Some(v));
        }
    }

    #[test]
    fn schwa_region() {
        let m = detect_vowel(510.0, 1490.0).unwrap();
        assert_eq!(m.symbol, "ə");
        assert!(m.distance < 20.0);
    }
}
