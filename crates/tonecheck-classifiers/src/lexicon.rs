//! Reference sentiment lexicon
//!
//! Words are stored in tokenizer-normalized form: lower-case with punctuation removed, so
//! contractions such as "don't" appear as `dont`. The three word classes are disjoint.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Sentiment words grouped into integer intensity tiers
const SENTIMENT_TIERS: &[(f64, &[&str])] = &[
    (
        5.0,
        &[
            "amazing", "awesome", "excellent", "fantastic", "outstanding", "wonderful",
            "incredible", "brilliant", "superb", "perfect", "exceptional", "magnificent",
            "phenomenal", "spectacular",
        ],
    ),
    (
        4.0,
        &[
            "love", "loved", "loves", "great", "beautiful", "delighted", "thrilled", "joy",
            "joyful", "impressive", "terrific", "fabulous", "adore", "ecstatic",
        ],
    ),
    (
        3.0,
        &[
            "good", "happy", "glad", "enjoy", "enjoyed", "pleased", "nice", "lovely",
            "satisfied", "recommend", "helpful", "pleasant", "friendly", "excited",
        ],
    ),
    (
        2.0,
        &[
            "like", "liked", "cool", "fun", "better", "positive", "comfortable",
            "interesting", "solid", "useful", "smooth", "worth",
        ],
    ),
    (
        1.0,
        &[
            "okay", "ok", "fine", "fair", "alright", "acceptable", "adequate", "decent",
        ],
    ),
    (
        -1.0,
        &[
            "meh", "mediocre", "bland", "dull", "lacking", "average", "unclear",
        ],
    ),
    (
        -2.0,
        &[
            "boring", "dislike", "annoying", "confusing", "slow", "problem", "wrong",
            "difficult", "inconvenient", "negative", "tired", "expensive",
        ],
    ),
    (
        -3.0,
        &[
            "bad", "sad", "poor", "unhappy", "disappointed", "disappointing", "frustrating",
            "frustrated", "upset", "angry", "broken", "fail", "failed",
        ],
    ),
    (
        -4.0,
        &[
            "awful", "horrible", "worse", "useless", "hated", "dreadful", "miserable",
            "furious", "nasty",
        ],
    ),
    (
        -5.0,
        &[
            "terrible", "hate", "worst", "disgusting", "atrocious", "abysmal", "horrendous",
            "appalling", "unbearable",
        ],
    ),
];

/// Multiplicative modifiers for the next sentiment word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.6),
    ("absolutely", 2.2),
    ("extremely", 2.0),
    ("incredibly", 2.0),
    ("totally", 1.8),
    ("highly", 1.7),
    ("truly", 1.6),
    ("really", 1.5),
    ("super", 1.5),
    ("so", 1.4),
    ("quite", 1.3),
    ("pretty", 1.2),
];

/// Polarity flips for the next sentiment word. Only membership matters to the scorer.
const NEGATORS: &[(&str, f64)] = &[
    ("not", -1.0),
    ("no", -1.0),
    ("never", -1.0),
    ("neither", -1.0),
    ("nor", -1.0),
    ("none", -1.0),
    ("nobody", -1.0),
    ("dont", -1.0),
    ("doesnt", -1.0),
    ("didnt", -1.0),
    ("isnt", -1.0),
    ("arent", -1.0),
    ("wasnt", -1.0),
    ("werent", -1.0),
    ("cant", -1.0),
    ("cannot", -1.0),
    ("couldnt", -1.0),
    ("wont", -1.0),
    ("wouldnt", -1.0),
    ("shouldnt", -1.0),
    ("hardly", -0.9),
    ("barely", -0.9),
    ("without", -0.9),
];

/// Role a word plays during scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Sentiment,
    Intensifier,
    Negator,
}

/// A single lexicon entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LexiconEntry {
    pub word: &'static str,
    pub weight: f64,
    pub class: WordClass,
}

/// Immutable word tables, built once per process
pub struct Lexicon {
    sentiment: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negators: HashMap<&'static str, f64>,
}

static LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::build);

impl Lexicon {
    /// The process-wide reference lexicon
    pub fn global() -> &'static Lexicon {
        &LEXICON
    }

    fn build() -> Self {
        let sentiment = SENTIMENT_TIERS
            .iter()
            .flat_map(|(weight, words)| words.iter().map(move |w| (*w, *weight)))
            .collect();

        Self {
            sentiment,
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
        }
    }

    /// Base sentiment weight, 0 for unknown words
    pub fn weight(&self, token: &str) -> f64 {
        self.sentiment.get(token).copied().unwrap_or(0.0)
    }

    /// Multiplier if the token is an intensifier
    pub fn intensifier(&self, token: &str) -> Option<f64> {
        self.intensifiers.get(token).copied()
    }

    pub fn is_negator(&self, token: &str) -> bool {
        self.negators.contains_key(token)
    }

    /// Look up a token in all three tables
    pub fn entry(&self, token: &str) -> Option<LexiconEntry> {
        let lookup = |table: &HashMap<&'static str, f64>, class| {
            table.get_key_value(token).map(|(word, weight)| LexiconEntry {
                word: *word,
                weight: *weight,
                class,
            })
        };

        lookup(&self.intensifiers, WordClass::Intensifier)
            .or_else(|| lookup(&self.negators, WordClass::Negator))
            .or_else(|| lookup(&self.sentiment, WordClass::Sentiment))
    }

    /// Sentiment words with their base weights, in no particular order
    pub fn sentiment_entries(&self) -> impl Iterator<Item = LexiconEntry> + '_ {
        self.sentiment.iter().map(|(word, weight)| LexiconEntry {
            word: *word,
            weight: *weight,
            class: WordClass::Sentiment,
        })
    }

    /// Number of sentiment-bearing words
    pub fn len(&self) -> usize {
        self.sentiment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentiment.is_empty()
    }
}
