//! Grouping a user's notes for display.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::portal::{Note, UserNotesResponse};

pub const GENERAL_NOTES_TITLE: &str = "General Notes";
pub const UNLABELED_ASSESSMENT: &str = "Unlabeled Assessment";

const UNKNOWN_ASSESSMENT_KEY: &str = "unknown";

/// Where a note was filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSource {
    General,
    Assessment {
        key: String,
        name: String,
        date: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub note: Note,
    pub source: NoteSource,
}

/// Notes shown under one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteGroup {
    pub key: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub is_general: bool,
    pub notes: Vec<Note>,
}

impl NoteGroup {
    /// Heading text; assessment groups carry their date.
    pub fn heading(&self) -> String {
        match self.date {
            Some(date) if !self.is_general => {
                format!("{} ({})", self.title, date.format("%Y-%m-%d"))
            }
            _ => self.title.clone(),
        }
    }
}

/// Assessment notes first, in response order, then general notes.
pub fn flatten(response: &UserNotesResponse) -> Vec<NoteEntry> {
    let assessment_notes = response.assessments.iter().flat_map(|assessment| {
        let key = assessment
            .user_product_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_ASSESSMENT_KEY.to_owned());
        let name = assessment
            .product_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNLABELED_ASSESSMENT.to_owned());
        assessment.notes.iter().map(move |note| NoteEntry {
            note: note.clone(),
            source: NoteSource::Assessment {
                key: key.clone(),
                name: name.clone(),
                date: assessment.created,
            },
        })
    });
    let general_notes = response.general_notes.iter().map(|note| NoteEntry {
        note: note.clone(),
        source: NoteSource::General,
    });
    assessment_notes.chain(general_notes).collect()
}

/// General notes first, then assessments in first-seen order; newest note
/// first inside each group.
pub fn group(entries: Vec<NoteEntry>) -> Vec<NoteGroup> {
    let mut general: Option<NoteGroup> = None;
    let mut assessments: Vec<NoteGroup> = Vec::new();

    for NoteEntry { note, source } in entries {
        match source {
            NoteSource::General => general
                .get_or_insert_with(|| NoteGroup {
                    key: "user-level".to_owned(),
                    title: GENERAL_NOTES_TITLE.to_owned(),
                    date: None,
                    is_general: true,
                    notes: Vec::new(),
                })
                .notes
                .push(note),
            NoteSource::Assessment { key, name, date } => {
                match assessments.iter_mut().find(|group| group.key == key) {
                    Some(group) => group.notes.push(note),
                    None => assessments.push(NoteGroup {
                        key,
                        title: name,
                        date,
                        is_general: false,
                        notes: vec![note],
                    }),
                }
            }
        }
    }

    let mut groups: Vec<NoteGroup> = general.into_iter().chain(assessments).collect();
    for group in &mut groups {
        // Stable: undated notes sink to the end in their original order.
        group
            .notes
            .sort_by_key(|note| (note.created_at.is_none(), Reverse(note.created_at)));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> UserNotesResponse {
        serde_json::from_value(json!({
            "assessments": [
                {
                    "_id": "a1",
                    "userProductId": "up1",
                    "productName": "Hearing",
                    "created": "2024-01-02T00:00:00Z",
                    "notes": [
                        { "_id": "n1", "content": "old", "createdAt": "2024-01-03T00:00:00Z" },
                        { "_id": "n2", "content": "new", "createdAt": "2024-02-03T00:00:00Z" }
                    ]
                },
                {
                    "_id": "a2",
                    "notes": [{ "_id": "n3", "content": "unlabeled" }]
                },
                { "_id": "a3", "userProductId": "up3", "notes": [] }
            ],
            "generalNotes": [
                { "_id": "g1", "content": "call back", "createdAt": "2024-01-01T00:00:00Z" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn flatten_tags_assessment_notes() {
        let entries = flatten(&response());

        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[2].source,
            NoteSource::Assessment {
                key: "unknown".to_owned(),
                name: UNLABELED_ASSESSMENT.to_owned(),
                date: None,
            }
        );
        assert_eq!(entries[3].source, NoteSource::General);
    }

    #[test]
    fn general_group_comes_first() {
        let groups = group(flatten(&response()));
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();

        assert_eq!(titles, vec![GENERAL_NOTES_TITLE, "Hearing", UNLABELED_ASSESSMENT]);
        assert_eq!(groups[1].heading(), "Hearing (2024-01-02)");
        assert_eq!(groups[0].heading(), GENERAL_NOTES_TITLE);
    }

    #[test]
    fn newest_note_first_within_group() {
        let groups = group(flatten(&response()));
        let ids: Vec<&str> = groups[1].notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n1"]);
    }

    #[test]
    fn empty_response_has_no_groups() {
        assert!(group(flatten(&UserNotesResponse::default())).is_empty());
    }
}
