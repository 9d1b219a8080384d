use crate::dataset::QaPair;

/// Hand-authored pairs giving baseline coverage of the channel. Edit the
/// content here; nothing derives it at runtime.
const SEED_PAIRS: &[(&str, &str)] = &[
    (
        "Kodla Dev kanalında hangi konular işleniyor?",
        "Kodla Dev kanalında Python programlama, yapay zeka, oyun geliştirme, web geliştirme ve yazılım mühendisliği konuları işlenmektedir.",
    ),
    (
        "Python öğrenmeye nereden başlamalıyım?",
        "Python öğrenmeye temel syntax ve veri tipleri ile başlamalısınız. Değişkenler, listeler, döngüler ve fonksiyonları öğrendikten sonra daha ileri konulara geçebilirsiniz.",
    ),
    (
        "Yapay zeka projelerinde hangi kütüphaneler kullanılır?",
        "Yapay zeka projelerinde genellikle TensorFlow, PyTorch, scikit-learn, pandas ve numpy gibi kütüphaneler kullanılır.",
    ),
];

pub fn seed_pairs() -> Vec<QaPair> {
    SEED_PAIRS
        .iter()
        .map(|(question, answer)| QaPair::new(*question, *answer))
        .collect()
}
