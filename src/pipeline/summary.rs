//! Extractive letter excerpt: leading whole sentences up to a word budget.
//! Backs the UI excerpt without any generative dependency.

/// Greedily take leading sentences until `max_words` is reached. When no
/// sentence boundary exists, fall back to a character bound proportional
/// to the word budget. Empty input yields an empty excerpt.
pub fn extractive_summary(text: &str, max_words: usize) -> String {
    let clean = crate::pipeline::chunker::normalize_whitespace(text);
    if clean.is_empty() || max_words == 0 {
        return String::new();
    }

    let sentences = split_sentences(&clean);
    if sentences.is_empty() {
        return clean.chars().take(max_words * 6).collect();
    }

    let mut taken: Vec<&str> = Vec::new();
    let mut word_count = 0;
    for sentence in &sentences {
        let words = sentence.split_whitespace().count();
        if word_count + words > max_words {
            break;
        }
        taken.push(sentence);
        word_count += words;
    }

    if taken.is_empty() {
        return clean.chars().take(max_words * 6).collect();
    }
    taken.join(" ")
}

/// Split on `.`, `?`, `!` followed by whitespace, keeping the punctuation
/// with its sentence. Fragments of three characters or fewer are dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        let is_terminal = matches!(b, b'.' | b'?' | b'!');
        let at_break = is_terminal && bytes.get(i + 1).map_or(true, |&next| next == b' ');
        if at_break {
            let sentence = text[start..=i].trim();
            if sentence.len() > 3 {
                sentences.push(sentence);
            }
            start = i + 1;
        }
    }

    let tail = text[start..].trim();
    if tail.len() > 3 {
        sentences.push(tail);
    }
    sentences
}
