//! IUPAC nucleotide ambiguity codes
//!
//! Expansion of ambiguity codes to concrete base sets, and the pairwise
//! compatibility test used by IUPAC-aware matching.

const A: u8 = 0b0001;
const C: u8 = 0b0010;
const G: u8 = 0b0100;
const T: u8 = 0b1000;

/// Codes that stand for more than one concrete base
pub const AMBIGUITY_CODES: &[u8] = b"RYSWKMBDHVN";

/// Expand a nucleotide code to the concrete bases it represents.
///
/// Lowercase codes are accepted. `U` expands like `T`. Characters outside
/// the IUPAC alphabet expand to the empty set.
pub fn expand_ambiguous(base: u8) -> &'static [u8] {
    match base.to_ascii_uppercase() {
        b'A' => b"A",
        b'C' => b"C",
        b'G' => b"G",
        b'T' | b'U' => b"T",
        b'R' => b"AG",
        b'Y' => b"CT",
        b'S' => b"CG",
        b'W' => b"AT",
        b'K' => b"GT",
        b'M' => b"AC",
        b'B' => b"CGT",
        b'D' => b"AGT",
        b'H' => b"ACT",
        b'V' => b"ACG",
        b'N' => b"ACGT",
        _ => b"",
    }
}

/// 4-bit base set for a code; 0 for characters outside the alphabet
#[inline]
fn base_mask(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => A,
        b'C' => C,
        b'G' => G,
        b'T' | b'U' => T,
        b'R' => A | G,
        b'Y' => C | T,
        b'S' => C | G,
        b'W' => A | T,
        b'K' => G | T,
        b'M' => A | C,
        b'B' => C | G | T,
        b'D' => A | G | T,
        b'H' => A | C | T,
        b'V' => A | C | G,
        b'N' => A | C | G | T,
        _ => 0,
    }
}

/// Whether `base` is an ambiguity code (not a single concrete base)
#[inline]
pub fn is_ambiguous(base: u8) -> bool {
    AMBIGUITY_CODES.contains(&base.to_ascii_uppercase())
}

/// Whether any position of `pattern` holds an ambiguity code
pub fn contains_ambiguity(pattern: &[u8]) -> bool {
    pattern.iter().any(|&b| is_ambiguous(b))
}

/// Whether a text base and a pattern base can denote the same nucleotide.
///
/// `N` on either side is always compatible. Otherwise the expanded base sets
/// must intersect. Characters outside the IUPAC alphabet only match
/// themselves.
#[inline]
pub fn bases_compatible(text_base: u8, pattern_base: u8) -> bool {
    if text_base == b'N' || pattern_base == b'N' {
        return true;
    }
    let (text_mask, pattern_mask) = (base_mask(text_base), base_mask(pattern_base));
    if text_mask == 0 || pattern_mask == 0 {
        return text_base == pattern_base;
    }
    text_mask & pattern_mask != 0
}

/// [`bases_compatible`] for case-sensitive matching: a lowercase base only
/// pairs with a lowercase code and vice versa.
#[inline]
pub fn bases_compatible_exact_case(text_base: u8, pattern_base: u8) -> bool {
    text_base.is_ascii_lowercase() == pattern_base.is_ascii_lowercase()
        && bases_compatible(text_base, pattern_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_concrete_and_ambiguous() {
        assert_eq!(expand_ambiguous(b'A'), b"A");
        assert_eq!(expand_ambiguous(b'U'), b"T");
        assert_eq!(expand_ambiguous(b'R'), b"AG");
        assert_eq!(expand_ambiguous(b'n'), b"ACGT");
        assert!(expand_ambiguous(b'X').is_empty());
    }

    #[test]
    fn test_expansion_agrees_with_masks() {
        for &code in b"ACGTURYSWKMBDHVN" {
            let from_expansion = expand_ambiguous(code).iter().fold(0u8, |acc, &b| acc | base_mask(b));
            assert_eq!(from_expansion, base_mask(code), "code {}", code as char);
        }
    }

    #[test]
    fn test_ambiguity_detection() {
        assert!(is_ambiguous(b'N'));
        assert!(is_ambiguous(b'y'));
        assert!(!is_ambiguous(b'A'));
        assert!(contains_ambiguity(b"GATNAC"));
        assert!(!contains_ambiguity(b"GATCAC"));
    }

    #[test]
    fn test_compatibility() {
        assert!(bases_compatible(b'C', b'N'));
        assert!(bases_compatible(b'N', b'G'));
        assert!(bases_compatible(b'A', b'R'));
        assert!(!bases_compatible(b'C', b'R'));
        assert!(bases_compatible(b'Y', b'S')); // share C
        assert!(!bases_compatible(b'A', b'T'));
        assert!(bases_compatible(b'-', b'-'));
        assert!(!bases_compatible(b'-', b'A'));
    }

    #[test]
    fn test_exact_case_compatibility() {
        assert!(bases_compatible_exact_case(b'C', b'N'));
        assert!(bases_compatible_exact_case(b'c', b'n'));
        assert!(bases_compatible_exact_case(b'g', b'r'));
        assert!(!bases_compatible_exact_case(b'c', b'N'));
        assert!(!bases_compatible_exact_case(b'C', b'n'));
        assert!(!bases_compatible_exact_case(b'a', b'A'));
        assert!(bases_compatible_exact_case(b'-', b'-'));
    }
}
