use serde::{Deserialize, Serialize};

use crate::models::domain::Question;

/// Built-in subject areas a test can be generated for without an upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    CurrentAffairs,
    GeneralKnowledge,
}

pub struct CatalogEntry {
    pub title: &'static str,
    pub description: &'static str,
    pub subject: &'static str,
    pub questions: &'static [(&'static str, [&'static str; 4], u32)],
}

const CURRENT_AFFAIRS: CatalogEntry = CatalogEntry {
    title: "Current Affairs Test",
    description: "Test your knowledge of recent events and current affairs",
    subject: "knowledge of recent national and international current affairs",
    questions: &[
        (
            "Who is the current Prime Minister of India?",
            ["Narendra Modi", "Rahul Gandhi", "Arvind Kejriwal", "Mamata Banerjee"],
            0,
        ),
        (
            "Which country hosted the 2023 G20 Summit?",
            ["India", "China", "USA", "Japan"],
            0,
        ),
        (
            "What is the name of India's first space station?",
            [
                "Bharatiya Space Station",
                "Aryabhata Station",
                "Gaganyaan Station",
                "None of the above",
            ],
            0,
        ),
        (
            "Which country recently launched its first lunar rover?",
            ["India", "Japan", "Russia", "China"],
            0,
        ),
    ],
};

const GENERAL_KNOWLEDGE: CatalogEntry = CatalogEntry {
    title: "General Knowledge Test",
    description: "Test your general knowledge across various subjects",
    subject: "general knowledge across history, geography, science and the arts",
    questions: &[
        (
            "What is the capital of France?",
            ["London", "Berlin", "Paris", "Madrid"],
            2,
        ),
        (
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
        ),
        (
            "Who painted the Mona Lisa?",
            ["Vincent van Gogh", "Leonardo da Vinci", "Pablo Picasso", "Michelangelo"],
            1,
        ),
        (
            "What is the largest mammal in the world?",
            ["African Elephant", "Blue Whale", "Giraffe", "Polar Bear"],
            1,
        ),
    ],
};

impl CatalogKind {
    pub fn entry(self) -> &'static CatalogEntry {
        match self {
            CatalogKind::CurrentAffairs => &CURRENT_AFFAIRS,
            CatalogKind::GeneralKnowledge => &GENERAL_KNOWLEDGE,
        }
    }
}

impl CatalogEntry {
    pub fn to_questions(&self) -> Vec<Question> {
        self.questions
            .iter()
            .map(|(text, options, correct)| Question::new(text, options, *correct))
            .collect()
    }
}
