use chrono::{DateTime, Utc};

pub type NoteId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, content: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title,
            content,
            tags: normalize_tags(tags),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|existing| *existing == tag)
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_normalizes_tags() {
        let note = Note::new(
            "ideas".to_string(),
            "content".to_string(),
            vec!["Work".to_string(), " work ".to_string(), "".to_string()],
        );

        assert_eq!(note.tags, vec!["work".to_string()]);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn edit_updates_only_given_fields() {
        let mut note = Note::new("title".to_string(), "body".to_string(), Vec::new());

        note.edit(None, Some("new body".to_string()));

        assert_eq!(note.title, "title");
        assert_eq!(note.content, "new body");
        assert!(note.updated_at >= note.created_at);
    }

    #[test]
    fn has_tag_is_case_insensitive() {
        let note = Note::new("t".to_string(), "c".to_string(), vec!["deep".to_string()]);

        assert!(note.has_tag("Deep"));
        assert!(!note.has_tag("shallow"));
    }
}
