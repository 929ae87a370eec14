//! Keyword-based mode detection for the opening message of a conversation.

use rprovider::Mode;

const SEARCH_KEYWORDS: &[&str] = &[
    "berita terbaru",
    "berita hari ini",
    "harga sekarang",
    "update terbaru",
    "kabar terbaru",
    "news today",
    "current price",
    "latest news",
    "stock price",
    "kurs dollar",
    "hasil pertandingan",
    "jadwal hari ini",
    "siapa yang menang",
    "skor pertandingan",
];

// trailing spaces keep "hitung" from matching inside "hitungan"
const REASONING_KEYWORDS: &[&str] = &[
    "jelaskan step by step",
    "langkah demi langkah",
    "hitung ",
    "analisis ",
    "buktikan ",
    "solve ",
    "calculate ",
    "analyze ",
    "tulis kode",
    "write code",
    "debug ",
    "buatkan program",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDetector {
    search: Vec<String>,
    reasoning: Vec<String>,
}

impl Default for ModeDetector {
    fn default() -> Self {
        Self::new(SEARCH_KEYWORDS, REASONING_KEYWORDS)
    }
}

impl ModeDetector {
    pub fn new(search: &[&str], reasoning: &[&str]) -> Self {
        let lower = |keywords: &[&str]| keywords.iter().map(|kw| kw.to_lowercase()).collect();
        Self {
            search: lower(search),
            reasoning: lower(reasoning),
        }
    }

    /// Search keywords win over reasoning keywords; no match means [`Mode::Normal`].
    pub fn detect(&self, text: &str) -> Mode {
        let text = text.to_lowercase();
        if self.search.iter().any(|kw| text.contains(kw.as_str())) {
            Mode::Search
        } else if self.reasoning.iter().any(|kw| text.contains(kw.as_str())) {
            Mode::Reasoning
        } else {
            Mode::Normal
        }
    }
}
