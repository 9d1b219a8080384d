use crate::dataset::QaPair;

/// Sentences shorter than this carry no standalone claim.
const MIN_SENTENCE_CHARS: usize = 20;
/// Procedural questions are only built from sentences longer than this.
const PROCEDURAL_MIN_CHARS: usize = 30;
const FRAGMENT_MAX_CHARS: usize = 30;

/// Keyword tables and answer templates for one working language.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vocabulary {
    /// Lower-cased subject language keyword, also counted as a topic keyword.
    pub language: &'static str,
    pub topic_keywords: &'static [&'static str],
    /// Phrases that mark a sentence as asking what something is or does.
    pub definitional_triggers: &'static [&'static str],
    pub referral_answer: &'static str,
    pub procedural_prefix: &'static str,
    pub procedural_suffix: &'static str,
}

impl Vocabulary {
    pub const TURKISH: Vocabulary = Vocabulary {
        language: "python",
        topic_keywords: &["python", "kod", "program", "fonksiyon", "değişken"],
        definitional_triggers: &["nedir", "ne işe yarar"],
        referral_answer: "Bu konuda detaylı bilgi için Kodla Dev kanalındaki ilgili videoları izleyebilirsiniz.",
        procedural_prefix: "Python'da ",
        procedural_suffix: "... nasıl yapılır?",
    };

    pub const ENGLISH: Vocabulary = Vocabulary {
        language: "python",
        topic_keywords: &["python", "code", "program", "function", "variable"],
        definitional_triggers: &["what is", "what's", "used for"],
        referral_answer: "For more detail on this topic, watch the related videos on the channel.",
        procedural_prefix: "In Python, how is ",
        procedural_suffix: "... done?",
    };

    fn procedural_question(&self, fragment: &str) -> String {
        format!("{}{}{}", self.procedural_prefix, fragment, self.procedural_suffix)
    }
}

/// Outcome of running the heuristic over a single sentence.
#[derive(Debug, Clone, PartialEq)]
pub enum SentenceClass {
    NoMatch,
    Definitional,
    Procedural { fragment: String },
}

pub struct Extractor {
    vocabulary: Vocabulary,
}

impl Extractor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Scans `text` sentence by sentence, in order, and returns every pair
    /// the heuristic produces. Duplicates are kept.
    pub fn extract(&self, text: &str) -> Vec<QaPair> {
        sentences(text)
            .filter_map(|sentence| self.pair_for(sentence, self.classify(sentence)))
            .collect()
    }

    pub fn classify(&self, sentence: &str) -> SentenceClass {
        let vocab = &self.vocabulary;
        let length = sentence.chars().count();
        if length < MIN_SENTENCE_CHARS {
            return SentenceClass::NoMatch;
        }

        let lowered = sentence.to_lowercase();
        if !vocab.topic_keywords.iter().any(|k| lowered.contains(k)) {
            return SentenceClass::NoMatch;
        }

        if vocab.definitional_triggers.iter().any(|t| lowered.contains(t)) {
            return SentenceClass::Definitional;
        }

        if length > PROCEDURAL_MIN_CHARS {
            if let Some(fragment) = fragment_after(&lowered, vocab.language) {
                return SentenceClass::Procedural { fragment };
            }
        }
        SentenceClass::NoMatch
    }

    fn pair_for(&self, sentence: &str, class: SentenceClass) -> Option<QaPair> {
        match class {
            SentenceClass::NoMatch => None,
            SentenceClass::Definitional => Some(QaPair::new(
                format!("{}?", sentence),
                self.vocabulary.referral_answer,
            )),
            SentenceClass::Procedural { fragment } => Some(QaPair::new(
                self.vocabulary.procedural_question(&fragment),
                sentence,
            )),
        }
    }
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split('.').map(str::trim).filter(|s| !s.is_empty())
}

/// The trimmed text following the first occurrence of `keyword`, cut to
/// `FRAGMENT_MAX_CHARS`. `None` when the keyword is absent or nothing but
/// whitespace follows it.
fn fragment_after(lowered: &str, keyword: &str) -> Option<String> {
    let start = lowered.find(keyword)? + keyword.len();
    let rest = lowered.get(start..)?.trim();
    if rest.is_empty() {
        return None;
    }
    Some(rest.chars().take(FRAGMENT_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turkish() -> Extractor {
        Extractor::new(Vocabulary::TURKISH)
    }

    macro_rules! test_classify {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(turkish().classify(input), expected);
            }
        )*
        }
    }

    test_classify! {
        test_classify_too_short: ("Python nedir", SentenceClass::NoMatch),
        test_classify_no_topic: ("Bugün hava gerçekten çok güzel görünüyor", SentenceClass::NoMatch),
        test_classify_definitional: ("Python'da fonksiyon nedir diye soralım", SentenceClass::Definitional),
        test_classify_definitional_usage: ("Bu değişken ne işe yarar acaba", SentenceClass::Definitional),
        test_classify_procedural: (
            "Python ile listeleri sıralamak oldukça kolaydır",
            SentenceClass::Procedural { fragment: "ile listeleri sıralamak oldukç".to_string() },
        ),
        test_classify_procedural_upper: (
            "Şimdi PYTHON içinde sözlük tanımlayacağız",
            SentenceClass::Procedural { fragment: "içinde sözlük tanımlayacağız".to_string() },
        ),
        test_classify_topic_without_language: ("Bu programı yazarken dikkat etmemiz gereken", SentenceClass::NoMatch),
        test_classify_keyword_suffix: ("Bugün öğreneceğimiz dilin adı python", SentenceClass::NoMatch),
        test_classify_keyword_then_space: ("Bugün öğreneceğimiz dilin adı python   ", SentenceClass::NoMatch),
        test_classify_not_long_enough: ("Python ile küçük bir örnek", SentenceClass::NoMatch),
    }

    #[test]
    fn test_length_guard_counts_chars() {
        // 19 characters, most of them multi-byte.
        let sentence = "değişken ğüşıöç çığ";
        assert_eq!(sentence.chars().count(), 19);
        assert_eq!(turkish().classify(sentence), SentenceClass::NoMatch);
    }

    #[test]
    fn test_extract_builds_pairs_in_order() {
        let text = "Python'da fonksiyon nedir diye soralım. Kısa. \
                    Python ile listeleri sıralamak oldukça kolaydır. Hava güzel ama konu dışı bir cümle.";

        let pairs = turkish().extract(text);

        assert_eq!(
            pairs,
            vec![
                QaPair::new(
                    "Python'da fonksiyon nedir diye soralım?",
                    Vocabulary::TURKISH.referral_answer,
                ),
                QaPair::new(
                    "Python'da ile listeleri sıralamak oldukç... nasıl yapılır?",
                    "Python ile listeleri sıralamak oldukça kolaydır",
                ),
            ]
        );
    }

    #[test]
    fn test_extract_keeps_original_casing_in_answer() {
        let pairs = turkish().extract("PYTHON ile Dosya Okuma İşlemleri Çok Basittir.");

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "PYTHON ile Dosya Okuma İşlemleri Çok Basittir");
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let sentence = "Python'da değişken nedir, bunu konuşalım";
        let text = format!("{}. {}.", sentence, sentence);

        assert_eq!(turkish().extract(&text).len(), 2);
    }

    #[test]
    fn test_extract_empty() {
        assert!(turkish().extract("").is_empty());
        assert!(turkish().extract("...").is_empty());
    }

    #[test]
    fn test_english_vocabulary() {
        let extractor = Extractor::new(Vocabulary::ENGLISH);
        let pairs = extractor.extract(
            "So what is a variable in this language. In Python the loop walks every item of the list.",
        );

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "So what is a variable in this language?");
        assert_eq!(pairs[1].question, "In Python, how is the loop walks every item of t... done?");
    }
}
