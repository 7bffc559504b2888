//! Academic (letter-per-jamo) transliteration.
//!
//! Each syllable is romanized on its own: onset, nucleus and coda letters are
//! looked up independently and concatenated. Onset ㄹ is `r`, coda ㄹ is `l`,
//! obstruent codas keep their voiced letters (`g`, `d`, `b`) and the silent
//! onset ㅇ is dropped. Because no neighbour context is consulted, the same
//! output is produced whether a string is transliterated whole or one
//! character at a time.

use super::{Result, Transliterator};
use crate::hangul::Syllable;

#[rustfmt::skip]
const ONSETS: [&str; 19] = [
    "g", "kk", "n", "d", "tt", "r", "m", "b", "pp", "s",
    "ss", "", "j", "jj", "ch", "k", "t", "p", "h",
];

#[rustfmt::skip]
const NUCLEI: [&str; 21] = [
    "a", "ae", "ya", "yae", "eo", "e", "yeo", "ye", "o", "wa",
    "wae", "oe", "yo", "u", "wo", "we", "wi", "yu", "eu", "ui",
    "i",
];

#[rustfmt::skip]
const CODAS: [&str; 28] = [
    "", "g", "kk", "gs", "n", "nj", "nh", "d", "l", "lg",
    "lm", "lb", "ls", "lt", "lp", "lh", "m", "b", "bs", "s",
    "ss", "ng", "j", "ch", "k", "t", "p", "h",
];

/// Stateless academic transliterator
#[derive(Debug, Clone, Copy, Default)]
pub struct AcademicTransliterator;

impl AcademicTransliterator {
    pub fn new() -> Self {
        Self
    }
}

impl Transliterator for AcademicTransliterator {
    fn transliterate(&self, text: &str) -> Result<String> {
        Ok(transliterate(text))
    }
}

pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        match Syllable::from_char(c) {
            Some(s) => push_syllable(&mut out, s),
            None => out.push(c),
        }
    }
    out
}

fn push_syllable(out: &mut String, s: Syllable) {
    out.push_str(ONSETS[s.onset as usize]);
    out.push_str(NUCLEI[s.nucleus as usize]);
    out.push_str(CODAS[s.coda as usize]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_syllables() {
        assert_eq!(transliterate("안"), "an");
        assert_eq!(transliterate("녕"), "nyeong");
        assert_eq!(transliterate("라"), "ra");
        assert_eq!(transliterate("물"), "mul");
        assert_eq!(transliterate("꾜"), "kkyo");
        assert_eq!(transliterate("학"), "hag");
        assert_eq!(transliterate("의"), "ui");
    }

    #[test]
    fn test_whole_string() {
        assert_eq!(transliterate("안녕하세요"), "annyeonghaseyo");
        assert_eq!(transliterate("한글 로마자"), "hangeul romaja");
        assert_eq!(transliterate("입니다"), "ibnida");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(transliterate(""), "");
        assert_eq!(transliterate("   "), "   ");
        assert_eq!(transliterate("abc 123!"), "abc 123!");
        assert_eq!(transliterate("ㄱ"), "ㄱ");
        assert_eq!(transliterate("K-pop 노래"), "K-pop norae");
    }

    #[test]
    fn test_context_free() {
        let whole = transliterate("국물");
        let per_char: String = "국물"
            .chars()
            .map(|c| transliterate(&c.to_string()))
            .collect();
        assert_eq!(whole, per_char);
    }
}
