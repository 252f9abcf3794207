//! Summarize pattern — one-shot document summary.
//!
//! The whole document goes out as a single user message with a format
//! instruction; no history and no system message.

use crate::patterns::model::ChatModel;
use docchat_core::error::Error;
use docchat_core::message::Message;
use docchat_core::provider::Usage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Summary shapes offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    HundredWords,
    TwoParagraphs,
    FiveBullets,
}

impl SummaryFormat {
    pub const ALL: [SummaryFormat; 3] = [Self::HundredWords, Self::TwoParagraphs, Self::FiveBullets];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HundredWords => "100-words",
            Self::TwoParagraphs => "2-paragraphs",
            Self::FiveBullets => "5-bullets",
        }
    }

    /// The instruction placed before the document.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::HundredWords => "Summarize the following document in 100 words:",
            Self::TwoParagraphs => "Summarize the following document in 2 connecting paragraphs:",
            Self::FiveBullets => "Summarize the following document in 5 bullet points:",
        }
    }

    pub fn prompt(&self, document: &str) -> String {
        format!("{}\n\n{document}", self.instruction())
    }
}

impl FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "100-words" => Ok(Self::HundredWords),
            "2-paragraphs" => Ok(Self::TwoParagraphs),
            "5-bullets" => Ok(Self::FiveBullets),
            other => Err(format!(
                "unknown summary format '{other}' (expected 100-words, 2-paragraphs or 5-bullets)"
            )),
        }
    }
}

impl std::fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    pub format: SummaryFormat,
    pub usage: Option<Usage>,
}

pub struct Summarizer {
    model: ChatModel,
}

impl Summarizer {
    pub fn new(model: ChatModel) -> Self {
        Self { model }
    }

    pub async fn summarize(&self, document: &str, format: SummaryFormat) -> Result<Summary, Error> {
        info!(model = %self.model.model(), format = %format, chars = document.len(), "Summarizing document");

        let response = self
            .model
            .complete(vec![Message::user(format.prompt(document))])
            .await?;

        Ok(Summary {
            text: response.message.content,
            format,
            usage: response.usage,
        })
    }
}
