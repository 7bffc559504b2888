//! Hangul syllable algebra
//!
//! Composition and decomposition of precomposed Hangul syllables
//! (U+AC00 ..= U+D7A3) into onset / nucleus / coda indices, plus the index
//! constants the phonemizer and the romanizers share.
//!
//! Index order follows the Unicode composition formula:
//! `syllable = 0xAC00 + (onset * 21 + nucleus) * 28 + coda`.

/// First precomposed syllable (가)
const SYLLABLE_BASE: u32 = 0xAC00;
/// Last precomposed syllable (힣)
const SYLLABLE_LAST: u32 = 0xD7A3;

pub const ONSET_COUNT: u32 = 19;
pub const NUCLEUS_COUNT: u32 = 21;
/// Coda count including "no coda"
pub const CODA_COUNT: u32 = 28;

/// Onset (초성) indices
pub mod onset {
    pub const G: u32 = 0;
    pub const KK: u32 = 1;
    pub const N: u32 = 2;
    pub const D: u32 = 3;
    pub const TT: u32 = 4;
    pub const R: u32 = 5;
    pub const M: u32 = 6;
    pub const B: u32 = 7;
    pub const PP: u32 = 8;
    pub const S: u32 = 9;
    pub const SS: u32 = 10;
    /// Silent ㅇ
    pub const IEUNG: u32 = 11;
    pub const J: u32 = 12;
    pub const JJ: u32 = 13;
    pub const CH: u32 = 14;
    pub const K: u32 = 15;
    pub const T: u32 = 16;
    pub const P: u32 = 17;
    pub const H: u32 = 18;
}

/// Nucleus (중성) indices used by the rules
pub mod nucleus {
    pub const I: u32 = 20;
}

/// Coda (종성) indices, 0 = no coda
pub mod coda {
    pub const NONE: u32 = 0;
    pub const G: u32 = 1;
    pub const KK: u32 = 2;
    pub const GS: u32 = 3;
    pub const N: u32 = 4;
    pub const NJ: u32 = 5;
    pub const NH: u32 = 6;
    pub const D: u32 = 7;
    pub const L: u32 = 8;
    pub const LG: u32 = 9;
    pub const LM: u32 = 10;
    pub const LB: u32 = 11;
    pub const LS: u32 = 12;
    pub const LT: u32 = 13;
    pub const LP: u32 = 14;
    pub const LH: u32 = 15;
    pub const M: u32 = 16;
    pub const B: u32 = 17;
    pub const BS: u32 = 18;
    pub const S: u32 = 19;
    pub const SS: u32 = 20;
    pub const NG: u32 = 21;
    pub const J: u32 = 22;
    pub const CH: u32 = 23;
    pub const K: u32 = 24;
    pub const T: u32 = 25;
    pub const P: u32 = 26;
    pub const H: u32 = 27;
}

/// A decomposed Hangul syllable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syllable {
    pub onset: u32,
    pub nucleus: u32,
    pub coda: u32,
}

impl Syllable {
    /// Build a syllable from indices; `None` if any index is out of range
    pub fn new(onset: u32, nucleus: u32, coda: u32) -> Option<Self> {
        if onset >= ONSET_COUNT || nucleus >= NUCLEUS_COUNT || coda >= CODA_COUNT {
            return None;
        }
        Some(Self {
            onset,
            nucleus,
            coda,
        })
    }

    /// Decompose a precomposed syllable
    pub fn from_char(c: char) -> Option<Self> {
        let code = c as u32;
        if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
            return None;
        }
        let offset = code - SYLLABLE_BASE;
        Some(Self {
            onset: offset / (NUCLEUS_COUNT * CODA_COUNT),
            nucleus: (offset / CODA_COUNT) % NUCLEUS_COUNT,
            coda: offset % CODA_COUNT,
        })
    }

    /// Recompose into a precomposed syllable
    pub fn to_char(self) -> char {
        let code =
            SYLLABLE_BASE + (self.onset * NUCLEUS_COUNT + self.nucleus) * CODA_COUNT + self.coda;
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }

    pub fn has_coda(self) -> bool {
        self.coda != coda::NONE
    }

    /// Onset is the silent ㅇ, i.e. the syllable starts with a vowel sound
    pub fn starts_with_vowel(self) -> bool {
        self.onset == onset::IEUNG
    }
}

/// True for precomposed Hangul syllables
pub fn is_syllable(c: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(c as u32))
}

/// Onset index a single coda becomes when it moves to the next syllable.
/// Clusters return `None`; use [`split_coda`] for those. ㅇ never moves.
pub fn coda_to_onset(c: u32) -> Option<u32> {
    match c {
        coda::G => Some(onset::G),
        coda::KK => Some(onset::KK),
        coda::N => Some(onset::N),
        coda::D => Some(onset::D),
        coda::L => Some(onset::R),
        coda::M => Some(onset::M),
        coda::B => Some(onset::B),
        coda::S => Some(onset::S),
        coda::SS => Some(onset::SS),
        coda::J => Some(onset::J),
        coda::CH => Some(onset::CH),
        coda::K => Some(onset::K),
        coda::T => Some(onset::T),
        coda::P => Some(onset::P),
        coda::H => Some(onset::H),
        _ => None,
    }
}

/// Split a cluster coda into (remaining coda, onset of the next syllable)
pub fn split_coda(c: u32) -> Option<(u32, u32)> {
    match c {
        coda::GS => Some((coda::G, onset::S)),
        coda::NJ => Some((coda::N, onset::J)),
        coda::NH => Some((coda::N, onset::H)),
        coda::LG => Some((coda::L, onset::G)),
        coda::LM => Some((coda::L, onset::M)),
        coda::LB => Some((coda::L, onset::B)),
        coda::LS => Some((coda::L, onset::S)),
        coda::LT => Some((coda::L, onset::T)),
        coda::LP => Some((coda::L, onset::P)),
        coda::LH => Some((coda::L, onset::H)),
        coda::BS => Some((coda::B, onset::S)),
        _ => None,
    }
}

/// Coda that a syllable-final consonant cluster is pronounced as
pub fn simplify_cluster(c: u32) -> u32 {
    match c {
        coda::GS | coda::LG => coda::G,
        coda::NJ | coda::NH => coda::N,
        coda::LM => coda::M,
        coda::LB | coda::LS | coda::LT | coda::LH => coda::L,
        coda::LP | coda::BS => coda::B,
        other => other,
    }
}

/// Representative sound of a coda at a syllable boundary (음절의 끝소리 규칙):
/// every coda is pronounced as one of ㄱ ㄴ ㄷ ㄹ ㅁ ㅂ ㅇ.
pub fn neutralize_coda(c: u32) -> u32 {
    match simplify_cluster(c) {
        coda::KK | coda::K => coda::G,
        coda::S | coda::SS | coda::J | coda::CH | coda::T | coda::H => coda::D,
        coda::P => coda::B,
        other => other,
    }
}
