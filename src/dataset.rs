/// One question with its answer, authored or synthesised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub(crate) question: String,
    pub(crate) answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Seed pairs first, then extracted pairs, each in their original order.
pub fn assemble(seed: &[QaPair], extracted: Vec<QaPair>) -> Vec<QaPair> {
    let mut pairs = Vec::with_capacity(seed.len() + extracted.len());
    pairs.extend_from_slice(seed);
    pairs.extend(extracted);
    pairs
}
