//! Built-in exercises served when neither local content nor the model
//! produced anything usable.

use std::collections::BTreeMap;

use rand::Rng;

use crate::content::DialogueTurn;
use crate::practice::exercise::{DialoguePractice, ListeningExercise, Question, Quiz};
use crate::practice::Difficulty;

pub const QUIZ_TITLE: &str = "Hindi Vocabulary Quiz";

pub fn dialogue_title(difficulty: Difficulty) -> String {
    format!("Hindi Dialogue Practice ({})", difficulty.title())
}

pub fn listening_title(difficulty: Difficulty) -> String {
    format!("Hindi Listening Exercise ({})", difficulty.title())
}

/// A two-line greeting exchange, titled for `difficulty`.
pub fn greeting_dialogue(difficulty: Difficulty) -> DialoguePractice {
    const LINES: [(&str, &str); 2] = [
        ("नमस्ते, आप कैसे हैं?", "Hello, how are you?"),
        ("मैं ठीक हूँ, धन्यवाद।", "I am fine, thank you."),
    ];

    let mut dialogue = Vec::with_capacity(LINES.len() * 2);
    let mut translations = BTreeMap::new();
    for (i, (hindi, english)) in LINES.iter().enumerate() {
        let position = (i * 10) as f64;
        dialogue.push(DialogueTurn::new(*hindi, true, position));
        dialogue.push(DialogueTurn::new(*english, false, position));
        translations.insert(english.to_string(), hindi.to_string());
    }

    DialoguePractice {
        title: dialogue_title(difficulty),
        difficulty,
        scenario: "Practice basic Hindi conversation".into(),
        dialogue,
        cues: LINES.iter().map(|(_, english)| english.to_string()).collect(),
        translations,
    }
}

/// Up to five questions on everyday words, options shuffled.
pub fn basic_quiz<R: Rng + ?Sized>(num_questions: usize, rng: &mut R) -> Quiz {
    let items: [(&str, [&str; 4]); 5] = [
        ("नमस्ते", ["Hello", "Goodbye", "Thank you", "Please"]),
        ("धन्यवाद", ["Thank you", "Please", "Welcome", "Sorry"]),
        ("हाँ", ["Yes", "No", "Maybe", "Hello"]),
        ("पानी", ["Water", "Food", "Bread", "Tea"]),
        ("अच्छा", ["Good", "Bad", "Big", "Small"]),
    ];

    Quiz {
        title: QUIZ_TITLE.into(),
        // Answer listed first, then shuffled.
        questions: items
            .iter()
            .take(num_questions)
            .map(|(word, options)| {
                Question::new(format!("What is the meaning of '{word}'?"), *options, options[0])
                    .shuffled(rng)
            })
            .collect(),
    }
}

/// A short passage with three questions for `difficulty`.
pub fn basic_listening<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> ListeningExercise {
    let (passage, translation, questions) = match difficulty {
        Difficulty::Beginner => (
            "नमस्ते! मेरा नाम राहुल है। मैं दिल्ली से हूँ। मुझे हिंदी सीखना पसंद है।",
            "Hello! My name is Rahul. I am from Delhi. I like learning Hindi.",
            vec![
                Question::new(
                    "What is the speaker's name?",
                    ["Rahul", "Amit", "Priya", "Neha"],
                    "Rahul",
                ),
                Question::new(
                    "Where is the speaker from?",
                    ["Delhi", "Mumbai", "Kolkata", "Chennai"],
                    "Delhi",
                ),
                Question::new(
                    "What does the speaker like?",
                    ["Learning Hindi", "Eating food", "Playing cricket", "Reading books"],
                    "Learning Hindi",
                ),
            ],
        ),
        Difficulty::Intermediate => (
            "मैं पिछले पांच साल से भारत में रह रहा हूँ। मुझे यहाँ का खाना बहुत पसंद है, \
             विशेष रूप से दक्षिण भारतीय व्यंजन। मैंने थोड़ी हिंदी सीखी है, लेकिन अभी भी सीख रहा हूँ।",
            "I have been living in India for the past five years. I really like the food here, \
             especially South Indian cuisine. I have learned some Hindi, but I am still learning.",
            vec![
                Question::new(
                    "How long has the speaker been living in India?",
                    ["5 years", "2 years", "10 years", "6 months"],
                    "5 years",
                ),
                Question::new(
                    "What kind of food does the speaker prefer?",
                    [
                        "South Indian cuisine",
                        "North Indian cuisine",
                        "Chinese food",
                        "Italian food",
                    ],
                    "South Indian cuisine",
                ),
                Question::new(
                    "What is the speaker's current status with Hindi?",
                    ["Still learning", "Fluent", "Just started", "Not interested"],
                    "Still learning",
                ),
            ],
        ),
        Difficulty::Advanced => (
            "आधुनिक भारत में भाषाई विविधता एक महत्वपूर्ण मुद्दा है। हालांकि हिंदी भारत की सबसे \
             अधिक बोली जाने वाली भाषा है, देश में 22 आधिकारिक भाषाएँ हैं। यह विविधता भारतीय \
             संस्कृति की समृद्धि का प्रतीक है, लेकिन कभी-कभी संचार में चुनौतियां भी पैदा करती है।",
            "Linguistic diversity is an important issue in modern India. Although Hindi is the \
             most widely spoken language in India, there are 22 official languages in the \
             country. This diversity is a symbol of the richness of Indian culture, but \
             sometimes also creates challenges in communication.",
            vec![
                Question::new(
                    "What is described as an important issue in modern India?",
                    [
                        "Linguistic diversity",
                        "Economic growth",
                        "Political stability",
                        "Environmental concerns",
                    ],
                    "Linguistic diversity",
                ),
                Question::new(
                    "How many official languages are there in India according to the text?",
                    ["22", "10", "15", "30"],
                    "22",
                ),
                Question::new(
                    "According to the text, what challenge can linguistic diversity create?",
                    [
                        "Communication difficulties",
                        "Economic inequality",
                        "Political conflicts",
                        "Cultural homogeneity",
                    ],
                    "Communication difficulties",
                ),
            ],
        ),
    };

    ListeningExercise {
        title: listening_title(difficulty),
        difficulty,
        passage: passage.into(),
        translation: translation.into(),
        questions: questions.into_iter().map(|q| q.shuffled(rng)).collect(),
    }
}
