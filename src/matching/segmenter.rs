//! Text segmentation into embedding-comparison chunks
//!
//! Splits free-form input on structural delimiters, then greedily re-packs
//! oversized parts word-by-word. The result is a deduplicated set of short
//! phrases; a full sentence would dilute a single skill mention, a bare word
//! carries too little context. Order is insertion order and only meaningful
//! for debug display.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const DEFAULT_MAX_CHUNK_SIZE: usize = 100;

/// Chunks shorter than this carry no usable signal.
const MIN_CHUNK_LEN: usize = 3;

/// Structural delimiters: list separators, newlines, pipes, bullets, hyphens.
const DELIMITERS: &[char] = &[',', ';', '\n', '|', '•', '\t', '-'];

/// Split `text` into a deduplicated set of candidate phrases no longer than
/// `max_chunk_size` characters (except single words that exceed it on their
/// own).
///
/// Whitespace-only input yields an empty set. Any other input yields at
/// least one chunk: when every part is dropped as too short, the whole
/// trimmed input is returned as a single chunk rather than discarding all
/// signal.
pub fn segment(text: &str, max_chunk_size: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut seen = HashSet::new();

    for part in trimmed.split(DELIMITERS) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if part.chars().count() > max_chunk_size {
            for sub in repack_words(part, max_chunk_size) {
                push_unique(&mut chunks, &mut seen, sub);
            }
        } else {
            push_unique(&mut chunks, &mut seen, part.to_string());
        }
    }

    if chunks.is_empty() {
        chunks.push(trimmed.to_string());
    }

    chunks
}

fn push_unique(chunks: &mut Vec<String>, seen: &mut HashSet<String>, chunk: String) {
    if chunk.chars().count() < MIN_CHUNK_LEN {
        return;
    }
    if seen.insert(chunk.clone()) {
        chunks.push(chunk);
    }
}

/// Greedy word packing: append a word only while the running chunk stays at
/// or under the limit, otherwise flush and start a new chunk with that word.
/// A single word longer than the limit becomes its own chunk.
fn repack_words(part: &str, max_chunk_size: usize) -> Vec<String> {
    let mut sub_chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in part.split_whitespace() {
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chunk_size {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            sub_chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        sub_chunks.push(current);
    }

    sub_chunks
}

/// Normalize raw extracted text before segmentation: fold CR/LF variants,
/// collapse runs of blank lines and horizontal whitespace.
pub fn clean_text(text: &str) -> String {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();

    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t]+").expect("valid regex"));

    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = blank_lines.replace_all(&unified, "\n\n");
    spaces.replace_all(&collapsed, " ").trim().to_string()
}
