//! Prompt builder for transcript extraction and exercise generation.
//!
//! Every prompt asks the model for a fenced ```json block so the
//! [`extract`](crate::extract) stage can take its first, cheapest path.
//! Transcript prompts embed at most [`TRANSCRIPT_CHAR_LIMIT`] characters.

use crate::practice::Difficulty;

/// Number of transcript characters embedded into extraction prompts.
pub const TRANSCRIPT_CHAR_LIMIT: usize = 3000;

// ---------------------------------------------------------------------------
// Output format templates
// ---------------------------------------------------------------------------

const PAIRS_FORMAT: &str = r#"```json
[
  {"hindi": "Hindi phrase 1", "english": "English translation 1"},
  {"hindi": "Hindi phrase 2", "english": "English translation 2"}
]
```"#;

const DIALOGUES_FORMAT: &str = r#"```json
[
  {
    "dialogue": [
      {"text": "Hindi line 1", "is_hindi": true},
      {"text": "English translation 1", "is_hindi": false},
      {"text": "Hindi line 2", "is_hindi": true},
      {"text": "English translation 2", "is_hindi": false}
    ]
  }
]
```"#;

const VOCABULARY_FORMAT: &str = r#"```json
{
  "नमस्ते": "Hello",
  "धन्यवाद": "Thank you",
  "आप": "You"
}
```"#;

const QUESTIONS_FORMAT: &str = r#""questions": [
    {
      "question": "What is being discussed?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "answer": "Option A"
    }
  ]"#;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds every prompt the content pipeline sends to the model.
///
/// # Example
/// ```rust
/// use hindi_learn::llm::PromptBuilder;
///
/// let prompt = PromptBuilder::new().vocabulary("नमस्ते दोस्तों");
/// assert!(prompt.contains("```json"));
/// assert!(prompt.contains("नमस्ते दोस्तों"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    transcript_limit: usize,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            transcript_limit: TRANSCRIPT_CHAR_LIMIT,
        }
    }

    /// Override the number of transcript characters embedded in prompts.
    pub fn with_transcript_limit(mut self, limit: usize) -> Self {
        self.transcript_limit = limit;
        self
    }

    // -----------------------------------------------------------------------
    // Transcript extraction
    // -----------------------------------------------------------------------

    /// Ask for Hindi → English phrase pairs found in `transcript`.
    pub fn language_pairs(&self, transcript: &str) -> String {
        format!(
            "Please analyze this Hindi language transcript and extract language pairs.\n\
             For each significant Hindi phrase, provide its English translation.\n\
             Format each pair as a separate JSON object in an array.\n\n\
             Transcript:\n{}\n\n\
             Format your response as:\n{PAIRS_FORMAT}\n\n\
             Identify at least 10 important Hindi phrases and their translations.\n\
             Only include Hindi phrases actually present in the transcript.\n",
            self.excerpt(transcript)
        )
    }

    /// Ask for short bilingual dialogues built from `transcript`.
    pub fn dialogues(&self, transcript: &str) -> String {
        format!(
            "Please create structured dialogues from this Hindi language transcript.\n\
             Extract or create realistic conversations with Hindi phrases and their English translations.\n\n\
             Transcript:\n{}\n\n\
             Format your response as:\n{DIALOGUES_FORMAT}\n\n\
             Create at least 3 separate dialogues, each with 4-6 lines.\n\
             Each dialogue should represent a natural conversation in Hindi with English translations.\n",
            self.excerpt(transcript)
        )
    }

    /// Ask for a Hindi word → English meaning map.
    pub fn vocabulary(&self, transcript: &str) -> String {
        format!(
            "Please create a vocabulary list from this Hindi language transcript.\n\
             Extract individual Hindi words and provide their English translations.\n\n\
             Transcript:\n{}\n\n\
             Format your response as:\n{VOCABULARY_FORMAT}\n\n\
             Provide at least 20 unique Hindi words with their accurate English translations.\n\
             Focus on common words that would be useful for a Hindi language learner.\n\
             Ensure the words actually appear in the transcript.\n",
            self.excerpt(transcript)
        )
    }

    // -----------------------------------------------------------------------
    // Exercises
    // -----------------------------------------------------------------------

    /// Ask for a dialogue practice scenario at `difficulty`.
    pub fn dialogue_practice(&self, difficulty: Difficulty) -> String {
        format!(
            "Create a natural Hindi dialogue practice scenario for {level} level learners.\n\
             Include 4-6 conversation exchanges between two people.\n\
             The scenario should incorporate these themes: {themes}\n\n\
             Format your response as:\n```json\n{{\n  \
             \"title\": \"Hindi Dialogue Practice ({title})\",\n  \
             \"difficulty\": \"{level}\",\n  \
             \"scenario\": \"A brief description of the scenario\",\n  \
             \"dialogue\": [\n    \
             {{\"text\": \"Hindi line 1\", \"is_hindi\": true}},\n    \
             {{\"text\": \"English translation 1\", \"is_hindi\": false}}\n  ],\n  \
             \"cues\": [\"English cue 1\", \"English cue 2\"],\n  \
             \"translations\": {{\"English cue 1\": \"Hindi translation 1\"}}\n}}\n```\n\n\
             {guidance}\n",
            level = difficulty.as_str(),
            title = difficulty.title(),
            themes = difficulty.keywords().join(", "),
            guidance = difficulty.guidance(),
        )
    }

    /// Ask for a multiple-choice vocabulary quiz.
    pub fn vocabulary_quiz(&self, num_questions: usize) -> String {
        format!(
            "Create a Hindi vocabulary quiz with {num_questions} multiple-choice questions.\n\
             Each question should ask for the English translation of a Hindi word.\n\n\
             Format your response as:\n```json\n{{\n  \
             \"title\": \"Hindi Vocabulary Quiz\",\n  \
             \"questions\": [\n    {{\n      \
             \"question\": \"What is the meaning of 'नमस्ते'?\",\n      \
             \"options\": [\"Hello\", \"Goodbye\", \"Thank you\", \"Please\"],\n      \
             \"answer\": \"Hello\"\n    }}\n  ]\n}}\n```\n\n\
             Make sure each question has exactly 4 distinct options with 1 correct answer.\n\
             Include a variety of Hindi words covering different topics.\n\
             Ensure the Hindi words used are common and useful for language learners.\n"
        )
    }

    /// Ask for comprehension questions about an existing passage.
    pub fn comprehension_questions(
        &self,
        passage: &str,
        translation: &str,
        difficulty: Difficulty,
    ) -> String {
        format!(
            "Create comprehension questions for a Hindi listening exercise.\n\n\
             Hindi text: {passage}\n\
             English translation: {translation}\n\
             Difficulty level: {level}\n\n\
             Create 3 multiple-choice questions that test understanding of this text.\n\
             {guidance}\n\n\
             Format your response as:\n```json\n{{\n  {QUESTIONS_FORMAT}\n}}\n```\n",
            level = difficulty.as_str(),
            guidance = difficulty.guidance(),
        )
    }

    /// Ask for a complete listening exercise at `difficulty`.
    pub fn listening_exercise(&self, difficulty: Difficulty) -> String {
        format!(
            "Create a Hindi listening exercise for {level} level learners.\n\
             Include a Hindi passage, its English translation, and comprehension questions.\n\
             The passage should touch on these themes: {themes}\n\n\
             Format your response as:\n```json\n{{\n  \
             \"title\": \"Hindi Listening Exercise ({title})\",\n  \
             \"difficulty\": \"{level}\",\n  \
             \"audio_text\": \"Hindi passage here (5-8 sentences)\",\n  \
             \"translation\": \"English translation of the Hindi passage\",\n  \
             {QUESTIONS_FORMAT}\n}}\n```\n\n\
             Provide 3 questions. {guidance}\n",
            level = difficulty.as_str(),
            title = difficulty.title(),
            themes = difficulty.keywords().join(", "),
            guidance = difficulty.guidance(),
        )
    }

    // -----------------------------------------------------------------------
    // Free-form
    // -----------------------------------------------------------------------

    /// Ask for a short learning hint for `phrase`.
    pub fn hint(&self, phrase: &str) -> String {
        format!(
            "Provide a helpful hint for learning this Hindi phrase: \"{phrase}\"\n\
             Focus on pronunciation tips, word meanings, or cultural context.\n\
             Keep it brief and beginner-friendly.\n"
        )
    }

    /// Ground a learner's question in retrieved context.
    ///
    /// An empty `context` yields a plain question prompt.
    pub fn grounded_answer(&self, context: &str, question: &str) -> String {
        if context.trim().is_empty() {
            return format!(
                "Please answer the following question about Hindi language learning:\n\n\
                 Question: {question}\n"
            );
        }
        format!(
            "{context}\n\
             Using the context information provided above, please answer the following question\n\
             about Hindi language learning:\n\n\
             Question: {question}\n"
        )
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// First `transcript_limit` characters, cut on a char boundary.
    fn excerpt<'a>(&self, transcript: &'a str) -> &'a str {
        match transcript.char_indices().nth(self.transcript_limit) {
            Some((idx, _)) => &transcript[..idx],
            None => transcript,
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
