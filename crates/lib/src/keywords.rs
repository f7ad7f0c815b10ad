//! # Keyword Extraction
//!
//! A deterministic keyword extractor for short emergency descriptions. Thai is
//! written without spaces between words, so each whitespace-delimited chunk is
//! segmented by longest matching against a built-in Thai word list. Runs of text
//! the word list does not cover are kept whole as unknown words (usually names
//! such as `อโศก`). Emergency terms are reported first, then the remaining words
//! that are not stop words.

use std::collections::HashSet;

/// The cap applied by the `/extract_keywords` endpoint.
pub const DEFAULT_MAX_KEYWORDS: usize = 15;

/// Emergency terms, reported ahead of every other word.
const EMERGENCY_LEXICON: &[&str] = &[
    "อุบัติเหตุ",
    "รถชน",
    "ไฟไหม้",
    "ควัน",
    "หมดสติ",
    "ไม่หายใจ",
    "หายใจไม่ออก",
    "อาหารติดคอ",
    "ชัก",
    "เลือดออก",
    "บาดเจ็บ",
    "คนเจ็บ",
    "ตึกถล่ม",
    "ติดอยู่",
    "จมน้ำ",
    "ไฟดูด",
    "แพ้",
    "หัวใจ",
    "กระดูกหัก",
    "แผลไฟไหม้",
    "งูกัด",
    "ตกจากที่สูง",
    "ช่วยด้วย",
    "ด่วน",
];

/// Thai words that segment the text but are never reported.
const THAI_STOP_WORDS: &[&str] = &[
    "มี", "ที่", "และ", "ของ", "ให้", "ได้", "ไป", "อยู่", "แล้ว", "ครับ", "ค่ะ", "คะ", "นะ",
    "กัน", "ใกล้", "ต้องการ", "มาก", "เยอะ", "ตอนนี้", "กำลัง", "เป็น", "คือ", "จะ", "ว่า",
    "ใน", "กับ", "จาก", "แต่", "หรือ", "ไม่", "ฉัน", "ผม", "เขา",
];

/// Ordinary Thai words, used only to find word boundaries.
const THAI_VOCABULARY: &[&str] = &[
    "คำแนะนำ", "บ้าน", "คน", "รถ", "ถนน", "แขน", "ขา", "เด็ก", "ผู้สูงอายุ", "ห้าง", "ตลาด",
    "โรงเรียน", "ตึก", "น้ำ", "ไฟ", "หน้าอก", "ท้อง", "หัว", "ปวด", "เจ็บ", "แผล", "สระ",
    "ทะเล", "สถานี", "ลิฟต์", "ถูก", "ล้ม",
];

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "at", "in", "on", "of", "to", "and", "or", "my", "i",
];

/// Extracts up to `max_keywords` keywords from `text`.
///
/// Emergency terms come first in order of appearance, followed by the other
/// words in order of appearance. Each keyword is reported once; non-Thai words
/// are lowercased.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    let words: Vec<String> = text
        .split(|c: char| c.is_whitespace() || is_punctuation(c))
        .filter(|chunk| !chunk.is_empty())
        .flat_map(segment)
        .map(|word| word.to_lowercase())
        .collect();

    let (emergency, other): (Vec<String>, Vec<String>) = words
        .into_iter()
        .filter(|w| w.chars().count() >= 2 && !is_stop_word(w))
        .partition(|w| EMERGENCY_LEXICON.contains(&w.as_str()));

    let mut seen = HashSet::new();
    let mut keywords: Vec<String> = emergency
        .into_iter()
        .chain(other)
        .filter(|w| seen.insert(w.clone()))
        .collect();
    keywords.truncate(max_keywords);
    keywords
}

/// Splits one whitespace-free chunk into words by greedy longest match.
pub fn segment(chunk: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut unknown_start: Option<usize> = None;
    let mut pos = 0;

    while pos < chunk.len() {
        match longest_word_at(&chunk[pos..]) {
            Some(len) => {
                if let Some(start) = unknown_start.take() {
                    words.push(&chunk[start..pos]);
                }
                words.push(&chunk[pos..pos + len]);
                pos += len;
            }
            None => {
                unknown_start.get_or_insert(pos);
                pos += chunk[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    if let Some(start) = unknown_start {
        words.push(&chunk[start..]);
    }
    words
}

/// Byte length of the longest known Thai word at the start of `text`.
fn longest_word_at(text: &str) -> Option<usize> {
    EMERGENCY_LEXICON
        .iter()
        .chain(THAI_STOP_WORDS)
        .chain(THAI_VOCABULARY)
        .filter(|word| text.starts_with(**word))
        .map(|word| word.len())
        .max()
}

fn is_stop_word(word: &str) -> bool {
    THAI_STOP_WORDS.contains(&word) || ENGLISH_STOP_WORDS.contains(&word)
}

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | '!' | '?' | ';' | ':' | '"' | '\'' | '(' | ')' | '[' | ']' | '“' | '”'
    )
}
