//! Text chunking for request-size-limited speech endpoints
//!
//! Splits on sentence terminators first, then packs whole words up to the
//! limit. Lengths are counted in grapheme clusters so Indic combining marks
//! never split from their base character.

use unicode_segmentation::UnicodeSegmentation;

/// Sentence terminators across the supported scripts
const TERMINATORS: &[char] = &['.', '?', '!', '।', '॥'];

fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Split `text` into chunks of at most `max_graphemes` grapheme clusters.
///
/// Each sentence starts a new chunk; words longer than the limit are cut at
/// grapheme boundaries.
pub fn split_for_speech(text: &str, max_graphemes: usize) -> Vec<String> {
    let max = max_graphemes.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    let flush = |current: &mut String, current_len: &mut usize, chunks: &mut Vec<String>| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        current.clear();
        *current_len = 0;
    };

    for word in text.split_whitespace() {
        let word_len = grapheme_len(word);

        if word_len > max {
            flush(&mut current, &mut current_len, &mut chunks);
            let graphemes: Vec<&str> = word.graphemes(true).collect();
            for piece in graphemes.chunks(max) {
                chunks.push(piece.concat());
            }
            continue;
        }

        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
        if needed > max {
            flush(&mut current, &mut current_len, &mut chunks);
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;

        if word.ends_with(TERMINATORS) {
            flush(&mut current, &mut current_len, &mut chunks);
        }
    }

    flush(&mut current, &mut current_len, &mut chunks);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(split_for_speech("Water the seedlings", 100), vec!["Water the seedlings"]);
    }

    #[test]
    fn test_sentences_split() {
        let chunks = split_for_speech("Rain is coming. Delay irrigation! Check drains।", 100);
        assert_eq!(chunks, vec!["Rain is coming.", "Delay irrigation!", "Check drains।"]);
    }

    #[test]
    fn test_respects_limit() {
        let text = "mulch the beds to keep moisture in the soil during the hot afternoon hours";
        let chunks = split_for_speech(text, 20);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(grapheme_len(chunk) <= 20, "{:?}", chunk);
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_long_word_cut_on_graphemes() {
        let chunks = split_for_speech("किसानकिसानकिसान", 4);
        for chunk in &chunks {
            assert!(grapheme_len(chunk) <= 4);
        }
        assert_eq!(chunks.concat(), "किसानकिसानकिसान");
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        assert!(split_for_speech("   \n ", 100).is_empty());
    }
}
