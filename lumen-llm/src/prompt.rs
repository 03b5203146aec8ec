use std::{fmt, fs, path::Path, str::FromStr};

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a world-class AI educator. Your goal is to make ML joyful, clear, and inspiring.";

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 1024;

pub fn system_prompt() -> String {
    load_system_prompt(Path::new("SYSTEM_PROMPT.md"))
}

fn load_system_prompt(prompt_file: &Path) -> String {
    match fs::read_to_string(prompt_file) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_SYSTEM_PROMPT.to_owned(),
    }
}

/// Explanation style requested for a roadmap topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    Eli5,
    Theory,
    Code,
    Visual,
    Audio,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 5] = [
        GenerationMode::Eli5,
        GenerationMode::Theory,
        GenerationMode::Code,
        GenerationMode::Visual,
        GenerationMode::Audio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::Eli5 => "eli5",
            GenerationMode::Theory => "theory",
            GenerationMode::Code => "code",
            GenerationMode::Visual => "visual",
            GenerationMode::Audio => "audio",
        }
    }

    /// Build the user prompt for `topic`. The topic is embedded verbatim.
    pub fn user_prompt(self, topic: &str) -> String {
        match self {
            GenerationMode::Eli5 => format!(
                "Explain the Machine Learning concept '{topic}' to a 12-year-old. \
                 Use fun analogies (like cooking, sports, or video games). \
                 Keep it short, engaging, and inspiring."
            ),
            GenerationMode::Theory => format!(
                "Explain the deep mathematical theory behind '{topic}'. \
                 Include key algorithms, assumptions, and formulas \
                 (use LaTeX formatting where possible, e.g., $y = mx + b$). \
                 Be rigorous but clear."
            ),
            GenerationMode::Code => format!(
                "Generate a Python code snippet using scikit-learn or PyTorch/TensorFlow \
                 to demonstrate '{topic}'. Include comments explaining each step. \
                 The code should be self-contained and runnable."
            ),
            GenerationMode::Visual => format!(
                "Describe a visual analogy or diagram that explains '{topic}'. \
                 Be descriptive so a user can visualize it. \
                 Also, suggest a prompt for an image generator."
            ),
            GenerationMode::Audio => format!(
                "Write a short, conversational script (like a podcast host) explaining '{topic}'. \
                 Keep it under 2 minutes of reading time. Make it sound enthusiastic."
            ),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown generation mode `{0}`")]
pub struct ParseModeError(pub String);

impl FromStr for GenerationMode {
    type Err = ParseModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        GenerationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == raw)
            .ok_or_else(|| ParseModeError(raw.to_owned()))
    }
}
