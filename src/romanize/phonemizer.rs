//! Rule-based Korean phonemizer
//!
//! Rewrites every run of Hangul syllables into its standard pronunciation.
//! Rules are applied in passes over adjacent syllable pairs, in this order:
//!
//! 1. ㅎ aspiration and deletion (놓고 → 노코, 좋아 → 조아, 입학 → 이팍)
//! 2. liaison and palatalization (먹어 → 머거, 같이 → 가치)
//! 3. coda neutralization (꽃 → 꼳, 읽 → 익)
//! 4. ㄹ nasalization (종로 → 종노, 국립 → 국닙)
//! 5. obstruent nasalization (국물 → 궁물, 밥물 → 밤물)
//! 6. tensification (학교 → 학꾜, 앉다 → 안따)
//! 7. lateralization (신라 → 실라, 설날 → 설랄)
//!
//! Anything that is not a precomposed syllable (spaces, Latin letters,
//! digits, punctuation, bare jamo) is copied through untouched and ends the
//! current run, so the word layout of the input is preserved.

use super::{Phonemizer, Result};
use crate::hangul::{
    coda, coda_to_onset, neutralize_coda, nucleus, onset, split_coda, Syllable,
};

/// Stateless phonemizer backed by fixed rule tables
#[derive(Debug, Clone, Copy, Default)]
pub struct RulePhonemizer;

impl RulePhonemizer {
    pub fn new() -> Self {
        Self
    }
}

impl Phonemizer for RulePhonemizer {
    fn pronounce(&self, text: &str) -> Result<String> {
        Ok(pronounce(text))
    }
}

/// Pronunciation of `text`, one output character per input character
pub fn pronounce(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Vec<Syllable> = Vec::new();

    for c in text.chars() {
        match Syllable::from_char(c) {
            Some(syllable) => run.push(syllable),
            None => {
                flush_run(&mut run, &mut out);
                out.push(c);
            }
        }
    }
    flush_run(&mut run, &mut out);

    out
}

fn flush_run(run: &mut Vec<Syllable>, out: &mut String) {
    if run.is_empty() {
        return;
    }
    apply_rules(run);
    out.extend(run.drain(..).map(Syllable::to_char));
}

fn apply_rules(run: &mut [Syllable]) {
    for_each_boundary(run, h_rules);
    for_each_boundary(run, liaison);
    // Cluster codas still tense the next onset after they are reduced
    let tensing_clusters: Vec<bool> = run
        .iter()
        .map(|s| matches!(s.coda, coda::NJ | coda::LM | coda::LB | coda::LT))
        .collect();
    for syllable in run.iter_mut() {
        syllable.coda = neutralize_coda(syllable.coda);
    }
    for_each_boundary(run, rieul_nasalization);
    for_each_boundary(run, nasalization);
    let mut after_cluster = tensing_clusters.into_iter();
    for_each_boundary(run, |prev, next| {
        tensification(prev, next, after_cluster.next().unwrap_or(false))
    });
    for_each_boundary(run, lateralization);
}

/// Call `rule` on every (previous, next) pair, left to right
fn for_each_boundary(run: &mut [Syllable], mut rule: impl FnMut(&mut Syllable, &mut Syllable)) {
    for i in 1..run.len() {
        let (head, tail) = run.split_at_mut(i);
        rule(&mut head[i - 1], &mut tail[0]);
    }
}

fn is_h_coda(c: u32) -> bool {
    matches!(c, coda::H | coda::NH | coda::LH)
}

fn drop_h(c: u32) -> u32 {
    match c {
        coda::NH => coda::N,
        coda::LH => coda::L,
        _ => coda::NONE,
    }
}

fn aspirate(o: u32) -> Option<u32> {
    match o {
        onset::G => Some(onset::K),
        onset::D => Some(onset::T),
        onset::B => Some(onset::P),
        onset::J => Some(onset::CH),
        _ => None,
    }
}

fn h_rules(prev: &mut Syllable, next: &mut Syllable) {
    if is_h_coda(prev.coda) {
        if let Some(aspirated) = aspirate(next.onset) {
            next.onset = aspirated;
            prev.coda = drop_h(prev.coda);
        } else if next.onset == onset::S {
            next.onset = onset::SS;
            prev.coda = drop_h(prev.coda);
        } else if next.onset == onset::IEUNG {
            prev.coda = drop_h(prev.coda);
        } else if next.onset == onset::N {
            prev.coda = match prev.coda {
                coda::H => coda::N,
                other => drop_h(other),
            };
        }
        return;
    }

    if next.onset != onset::H {
        return;
    }
    // 닫히다 → 다치다
    if next.nucleus == nucleus::I && matches!(prev.coda, coda::D | coda::T) {
        prev.coda = coda::NONE;
        next.onset = onset::CH;
        return;
    }
    let merged = match prev.coda {
        coda::G | coda::KK | coda::K => Some((coda::NONE, onset::K)),
        coda::D | coda::S | coda::SS | coda::CH | coda::T => Some((coda::NONE, onset::T)),
        coda::B | coda::P => Some((coda::NONE, onset::P)),
        coda::J => Some((coda::NONE, onset::CH)),
        coda::LG => Some((coda::L, onset::K)),
        coda::LB => Some((coda::L, onset::P)),
        coda::NJ => Some((coda::N, onset::CH)),
        _ => None,
    };
    if let Some((rest, aspirated)) = merged {
        prev.coda = rest;
        next.onset = aspirated;
    }
}

fn liaison(prev: &mut Syllable, next: &mut Syllable) {
    if !next.starts_with_vowel() || !prev.has_coda() || prev.coda == coda::NG {
        return;
    }

    if next.nucleus == nucleus::I {
        let palatal = match prev.coda {
            coda::D => Some((coda::NONE, onset::J)),
            coda::T => Some((coda::NONE, onset::CH)),
            coda::LT => Some((coda::L, onset::CH)),
            _ => None,
        };
        if let Some((rest, moved)) = palatal {
            prev.coda = rest;
            next.onset = moved;
            return;
        }
    }

    if let Some((rest, moved)) = split_coda(prev.coda) {
        prev.coda = rest;
        next.onset = moved;
    } else if let Some(moved) = coda_to_onset(prev.coda) {
        prev.coda = coda::NONE;
        next.onset = moved;
    }
}

fn rieul_nasalization(prev: &mut Syllable, next: &mut Syllable) {
    if next.onset == onset::R
        && matches!(prev.coda, coda::G | coda::D | coda::B | coda::M | coda::NG)
    {
        next.onset = onset::N;
    }
}

fn nasalization(prev: &mut Syllable, next: &mut Syllable) {
    if !matches!(next.onset, onset::N | onset::M) {
        return;
    }
    prev.coda = match prev.coda {
        coda::G => coda::NG,
        coda::D => coda::N,
        coda::B => coda::M,
        other => other,
    };
}

/// `after_cluster` marks a previous coda that was ㄵ ㄻ ㄼ or ㄾ before
/// neutralization. Those tense ㄱ ㄷ ㅅ ㅈ but leave ㅂ alone.
fn tensification(prev: &mut Syllable, next: &mut Syllable, after_cluster: bool) {
    let obstruent = matches!(prev.coda, coda::G | coda::D | coda::B);
    if !obstruent && !(after_cluster && next.onset != onset::B) {
        return;
    }
    next.onset = match next.onset {
        onset::G => onset::KK,
        onset::D => onset::TT,
        onset::B => onset::PP,
        onset::S => onset::SS,
        onset::J => onset::JJ,
        other => other,
    };
}

fn lateralization(prev: &mut Syllable, next: &mut Syllable) {
    if prev.coda == coda::N && next.onset == onset::R {
        prev.coda = coda::L;
    } else if prev.coda == coda::L && next.onset == onset::N {
        next.onset = onset::R;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::unchanged("안녕", "안녕")]
    #[case::unchanged_sentence("안녕하세요", "안녕하세요")]
    #[case::h_aspiration("놓고", "노코")]
    #[case::h_before_s("닿소", "다쏘")]
    #[case::h_deletion("좋아", "조아")]
    #[case::h_cluster_deletion("않아", "아나")]
    #[case::h_before_n("놓는", "논는")]
    #[case::h_onset_aspiration("입학", "이팍")]
    #[case::h_onset_after_cluster("밝히다", "발키다")]
    #[case::h_onset_after_s("못하다", "모타다")]
    #[case::liaison("먹어", "머거")]
    #[case::liaison_sentence("한국어", "한구거")]
    #[case::cluster_liaison("닭이", "달기")]
    #[case::cluster_liaison_tensed("없어", "업써")]
    #[case::palatalization_t("같이", "가치")]
    #[case::palatalization_d("굳이", "구지")]
    #[case::neutralization("꽃", "꼳")]
    #[case::neutralization_front("앞", "압")]
    #[case::cluster_simplification("읽다", "익따")]
    #[case::rieul_after_ng("종로", "종노")]
    #[case::rieul_after_m("침략", "침냑")]
    #[case::rieul_then_nasal("국립", "궁닙")]
    #[case::nasalization_g("국물", "궁물")]
    #[case::nasalization_b("밥물", "밤물")]
    #[case::nasalization_polite("감사합니다", "감사함니다")]
    #[case::tensification("학교", "학꾜")]
    #[case::tensification_after_nj("앉다", "안따")]
    #[case::tensification_after_lb("넓다", "널따")]
    #[case::tensification_after_lt("핥다", "할따")]
    #[case::tensification_after_lm("젊고", "점꼬")]
    #[case::cluster_before_vowel_not_tensed("앉아", "안자")]
    #[case::palatalization_d_before_hi("닫히다", "다치다")]
    #[case::palatalization_d_before_hi_stem("굳히다", "구치다")]
    #[case::lateralization_nl("신라", "실라")]
    #[case::lateralization_ln("설날", "설랄")]
    #[case::lateralization_after_h("뚫는", "뚤른")]
    #[case::stacked_rules("맛있다", "마싣따")]
    fn test_pronounce(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pronounce(input), expected);
    }

    #[test]
    fn test_word_boundaries_preserved() {
        assert_eq!(pronounce("국 물"), "국 물");
        assert_eq!(pronounce("  좋아  요 "), "  조아  요 ");
    }

    #[test]
    fn test_non_hangul_passthrough() {
        assert_eq!(pronounce("abc 123!"), "abc 123!");
        assert_eq!(pronounce("ㄱㄴㄷ"), "ㄱㄴㄷ");
        // A Latin letter breaks the run, so no liaison across it
        assert_eq!(pronounce("먹x어"), "먹x어");
    }

    #[test]
    fn test_empty() {
        assert_eq!(pronounce(""), "");
    }

    #[test]
    fn test_trait_never_fails() {
        let phonemizer = RulePhonemizer::new();
        assert_eq!(phonemizer.pronounce("같이").unwrap(), "가치");
    }

    proptest! {
        #[test]
        fn prop_char_count_preserved(text in "\\PC{0,48}") {
            prop_assert_eq!(pronounce(&text).chars().count(), text.chars().count());
        }

        #[test]
        fn prop_non_hangul_untouched(text in "[가-힣a-z0-9 .,!?]{0,48}") {
            let out = pronounce(&text);
            for (a, b) in text.chars().zip(out.chars()) {
                if !crate::hangul::is_syllable(a) {
                    prop_assert_eq!(a, b);
                } else {
                    prop_assert!(crate::hangul::is_syllable(b));
                }
            }
        }
    }
}
