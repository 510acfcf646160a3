//! Structured text used for unstructured header values such as `Subject`

use std::fmt::{self, Display, Formatter, Write};

use email_encoding::headers::writer::EmailWriter;

/// A fragment of a [`Text`]
///
/// Words are displayed back to back, so any spacing between them belongs
/// to the words themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    force_encoding: bool,
}

impl Word {
    /// A word written verbatim when it is printable ASCII
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            force_encoding: false,
        }
    }

    /// A word always written as RFC 2047 encoded words
    pub fn encoded<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            force_encoding: true,
        }
    }

    /// The decoded text of the word
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the word must be encoded when written in a header
    pub fn needs_encoding(&self) -> bool {
        self.force_encoding || !self.text.chars().all(|c| matches!(c, ' '..='~'))
    }
}

/// Text made of one or more [`Word`]s
///
/// ```
/// use missive::message::{Text, Word};
///
/// let mut subject = Text::from("Quarterly report: ");
/// subject.push(Word::new("Zürich"));
/// assert_eq!(subject.to_string(), "Quarterly report: Zürich");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    words: Vec<Word>,
}

impl Text {
    /// Empty text
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Append a word
    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    /// The words, in order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Whether there is no text at all
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| word.text.is_empty())
    }

    /// Write the text as a header value
    ///
    /// Runs of words that need encoding are written as encoded words.
    /// A plain word touching such a run without whitespace in between is
    /// pulled into the run, since whitespace separating an encoded word
    /// from its neighbours is mandatory. Plain runs are folded at spaces.
    pub(crate) fn encode(&self, w: &mut EmailWriter<'_>) -> fmt::Result {
        let mut encode: Vec<bool> = self.words.iter().map(Word::needs_encoding).collect();

        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.words.len() {
                if encode[i] {
                    continue;
                }

                let text = &self.words[i].text;
                let glued_before = i > 0 && encode[i - 1] && !text.starts_with(' ');
                let glued_after =
                    i + 1 < self.words.len() && encode[i + 1] && !text.ends_with(' ');
                if glued_before || glued_after {
                    encode[i] = true;
                    changed = true;
                }
            }
        }

        let mut i = 0;
        while i < self.words.len() {
            let run_encoded = encode[i];
            let mut run = String::new();
            while i < self.words.len() && encode[i] == run_encoded {
                run.push_str(&self.words[i].text);
                i += 1;
            }

            if run_encoded {
                email_encoding::headers::rfc2047::encode(&run, w)?;
            } else {
                w.folding().write_str(&run)?;
            }
        }

        Ok(())
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            f.write_str(&word.text)?;
        }

        Ok(())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self {
            words: vec![Word::new(text)],
        }
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

impl From<Word> for Text {
    fn from(word: Word) -> Self {
        Self { words: vec![word] }
    }
}

impl FromIterator<Word> for Text {
    fn from_iter<T: IntoIterator<Item = Word>>(iter: T) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}
