// Message entity
// Read-only view of a chat message as delivered by the gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Embed {
    /// Text lines of this embed in render order: title, description, fields,
    /// footer, author. Empty parts are skipped.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        push_non_empty(&mut lines, self.title.as_deref());
        push_non_empty(&mut lines, self.description.as_deref());
        for field in &self.fields {
            if field.name.is_empty() && field.value.is_empty() {
                continue;
            }
            lines.push(format!("{}: {}", field.name, field.value));
        }
        push_non_empty(&mut lines, self.footer.as_deref());
        push_non_empty(&mut lines, self.author.as_deref());
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    pub created_at: DateTime<Utc>,
}

fn push_non_empty(lines: &mut Vec<String>, value: Option<&str>) {
    if let Some(text) = value.filter(|text| !text.is_empty()) {
        lines.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_lines_follow_fixed_order() {
        let embed = Embed {
            title: Some("Death".to_string()),
            description: Some("body".to_string()),
            fields: vec![EmbedField {
                name: "Weapon".to_string(),
                value: "knife".to_string(),
            }],
            footer: Some("footer".to_string()),
            author: Some("logger".to_string()),
        };
        assert_eq!(
            embed.text_lines(),
            vec!["Death", "body", "Weapon: knife", "footer", "logger"]
        );
    }

    #[test]
    fn embed_lines_skip_empty_parts() {
        let embed = Embed {
            title: Some(String::new()),
            description: None,
            fields: vec![
                EmbedField::default(),
                EmbedField {
                    name: "Zone".to_string(),
                    value: String::new(),
                },
            ],
            footer: None,
            author: Some(String::new()),
        };
        assert_eq!(embed.text_lines(), vec!["Zone: "]);
    }
}
