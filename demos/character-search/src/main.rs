//! Character Search Example
//!
//! Fetches a DuckDuckGo topic listing, turns it into characters and filters
//! them by a search term.
//!
//! ```text
//! character-search [search] [data-url]
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use courier::prelude::*;

const DEFAULT_DATA_URL: &str = "https://api.duckduckgo.com/?q=simpsons+characters&format=json";

// ============================================================================
// Data Types
// ============================================================================

/// Listing returned by the topic API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicListing {
    #[serde(default)]
    pub related_topics: Vec<RelatedTopic>,
}

/// Grouped entries carry no text of their own; they decode with empty fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RelatedTopic {
    #[serde(rename = "FirstURL")]
    pub first_url: String,
    pub icon: Icon,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Icon {
    #[serde(rename = "URL")]
    pub url: String,
}

/// A character parsed from a topic text like `"Homer Simpson - The father"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl From<&RelatedTopic> for Character {
    fn from(topic: &RelatedTopic) -> Self {
        let (name, description) = topic
            .text
            .split_once(" - ")
            .unwrap_or(("Unknown", ""));

        Self {
            name: name.to_string(),
            description: description.to_string(),
            image_url: format!("https://duckduckgo.com{}", topic.icon.url),
        }
    }
}

impl Character {
    /// Case-insensitive match on name or description; an empty term matches all.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

// ============================================================================
// Service
// ============================================================================

fn character_service(data_url: &str) -> Service {
    Service::builder(Method::Get, data_url)
        .accept(AcceptType::Json)
        .build()
}

/// Fetch the listing and return the characters matching `term`.
pub async fn search_characters(
    courier: &Courier,
    data_url: &str,
    term: &str,
) -> courier::Result<Vec<Character>> {
    let listing: TopicListing = courier
        .invoke(&character_service(data_url))
        .await?
        .json()?;

    Ok(listing
        .related_topics
        .iter()
        .filter(|topic| !topic.text.is_empty())
        .map(Character::from)
        .filter(|character| character.matches(term))
        .collect())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> courier::Result<()> {
    let mut args = std::env::args().skip(1);
    let term = args.next().unwrap_or_default();
    let data_url = args.next().unwrap_or_else(|| DEFAULT_DATA_URL.to_string());

    let courier = Courier::builder().with_logging().build();

    let characters = search_characters(&courier, &data_url, &term).await?;

    println!("{} character(s) matching {term:?}", characters.len());
    for character in &characters {
        println!("- {}: {}", character.name, character.description);
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
