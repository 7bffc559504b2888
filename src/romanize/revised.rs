//! Context-aware Revised Romanization
//!
//! Used for the easy-Korean rewrite. Unlike the academic transliterator it
//! looks at the neighbouring syllable when spelling a coda:
//!
//! - before a silent onset the coda is carried over (한국어 → hangugeo)
//! - ㄹㄹ, ㄴㄹ and ㄹㄴ are written `ll` (신라 → silla, 설날 → seollal)
//! - ㄹ after other consonants is written `n` (종로 → jongno)
//! - ㄱ ㄷ ㅂ before ㄴ ㅁ nasalize (국물 → gungmul)
//! - ㅎ merges with a following ㄱ ㄷ ㅈ (좋다 → jota)
//! - remaining codas use their representative sound: `k t p l n m ng`
//!
//! Output is continuous, without syllable separators.

use crate::hangul::{coda, neutralize_coda, onset, split_coda, Syllable};

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

/// Romanizer with its own pronunciation-aware spelling rules
#[derive(Debug, Clone, Copy, Default)]
pub struct RevisedRomanizer;

impl RevisedRomanizer {
    pub fn new() -> Self {
        Self
    }

    pub fn romanize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        let mut run: Vec<Syllable> = Vec::new();

        for c in text.chars() {
            match Syllable::from_char(c) {
                Some(s) => run.push(s),
                None => {
                    romanize_run(&run, &mut out);
                    run.clear();
                    out.push(c);
                }
            }
        }
        romanize_run(&run, &mut out);

        out
    }
}

/// Spelling of one syllable boundary: what the coda is written as and, when
/// the boundary changes it, how the next onset is written.
struct Boundary {
    coda: &'static str,
    next_onset: Option<&'static str>,
}

fn romanize_run(run: &[Syllable], out: &mut String) {
    let mut onset_override: Option<&'static str> = None;

    for (i, s) in run.iter().enumerate() {
        let initial = onset_override
            .take()
            .unwrap_or(ONSETS[s.onset as usize]);
        out.push_str(initial);
        out.push_str(NUCLEI[s.nucleus as usize]);

        let boundary = match run.get(i + 1) {
            Some(next) => spell_boundary(s.coda, *next),
            None => Boundary {
                coda: final_coda(s.coda),
                next_onset: None,
            },
        };
        out.push_str(boundary.coda);
        onset_override = boundary.next_onset;
    }
}

fn spell_boundary(c: u32, next: Syllable) -> Boundary {
    let keep = |letter| Boundary {
        coda: letter,
        next_onset: None,
    };

    if c == coda::NONE {
        return keep("");
    }

    if next.onset == onset::IEUNG && c != coda::NG {
        return carry_over(c);
    }

    if matches!(c, coda::H | coda::NH | coda::LH) {
        let rest = match c {
            coda::NH => "n",
            coda::LH => "l",
            _ => "",
        };
        let next_onset = match next.onset {
            onset::G => Some("k"),
            onset::D => Some("t"),
            onset::J => Some("ch"),
            onset::S => Some("ss"),
            _ => None,
        };
        if next_onset.is_some() {
            return Boundary {
                coda: rest,
                next_onset,
            };
        }
    }

    let sound = neutralize_coda(c);
    match next.onset {
        onset::R => match sound {
            coda::L | coda::N => Boundary {
                coda: "l",
                next_onset: Some("l"),
            },
            _ => Boundary {
                coda: nasal(sound),
                next_onset: Some("n"),
            },
        },
        onset::N if sound == coda::L => Boundary {
            coda: "l",
            next_onset: Some("l"),
        },
        onset::N | onset::M => keep(nasal(sound)),
        _ => keep(final_coda(c)),
    }
}

/// Coda moved onto a following vowel; clusters keep their first consonant
fn carry_over(c: u32) -> Boundary {
    if let Some((rest, moved)) = split_coda(c) {
        let next_onset = if moved == onset::H {
            ""
        } else {
            ONSETS[moved as usize]
        };
        return Boundary {
            coda: final_coda(rest),
            next_onset: Some(next_onset),
        };
    }
    let moved = match c {
        coda::G => "g",
        coda::KK => "kk",
        coda::D => "d",
        coda::L => "r",
        coda::B => "b",
        coda::S => "s",
        coda::SS => "ss",
        coda::J => "j",
        coda::CH => "ch",
        coda::K => "k",
        coda::T => "t",
        coda::P => "p",
        coda::N => "n",
        coda::M => "m",
        _ => "",
    };
    Boundary {
        coda: "",
        next_onset: Some(moved),
    }
}

fn nasal(sound: u32) -> &'static str {
    match sound {
        coda::G => "ng",
        coda::D => "n",
        coda::B => "m",
        other => final_letter(other),
    }
}

fn final_coda(c: u32) -> &'static str {
    final_letter(neutralize_coda(c))
}

fn final_letter(sound: u32) -> &'static str {
    match sound {
        coda::G => "k",
        coda::N => "n",
        coda::D => "t",
        coda::L => "l",
        coda::M => "m",
        coda::B => "p",
        coda::NG => "ng",
        _ => "",
    }
}
