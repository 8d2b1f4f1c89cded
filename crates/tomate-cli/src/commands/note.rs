use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use tomate_adapters::SqliteNoteRepository;
use tomate_core::{Note, NoteId, NoteRepository, NoteRepositoryError, Translator};

use super::{database_path, translator};

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Write a note
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        /// Comma separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List notes, most recently edited first
    List {
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Print a note
    Show { id: NoteId },
    /// Delete a note
    Delete { id: NoteId },
}

pub fn execute(command: NoteCommand) -> Result<()> {
    let translator = translator();
    let repository = SqliteNoteRepository::new(&database_path()?)
        .map_err(|error| anyhow!("database access error: {}", error))?;

    match command {
        NoteCommand::Add {
            title,
            content,
            tags,
        } => {
            let mut note = Note::new(title, content, tags);
            let id = repository.save(&mut note)?;
            println!("{}", translator.format("note.added", &[("id", &id.to_string())]));
        }
        NoteCommand::List { tag } => {
            let notes: Vec<Note> = repository
                .find_all()?
                .into_iter()
                .filter(|note| tag.as_deref().map_or(true, |tag| note.has_tag(tag)))
                .collect();
            print_notes(&notes, &translator);
        }
        NoteCommand::Show { id } => {
            let note = find(&repository, id, &translator)?;
            println!("{}", format_note(&note));
        }
        NoteCommand::Delete { id } => {
            find(&repository, id, &translator)?;
            repository.delete(id)?;
            println!("{}", translator.format("note.deleted", &[("id", &id.to_string())]));
        }
    }

    Ok(())
}

fn find(repository: &SqliteNoteRepository, id: NoteId, translator: &Translator) -> Result<Note> {
    match repository.find_by_id(id) {
        Ok(note) => Ok(note),
        Err(NoteRepositoryError::NotFound { .. }) => {
            bail!("{}", translator.format("note.not_found", &[("id", &id.to_string())]))
        }
        Err(error) => Err(error.into()),
    }
}

fn print_notes(notes: &[Note], translator: &Translator) {
    if notes.is_empty() {
        println!("{}", translator.get("note.list_empty"));
        return;
    }

    println!("{}\n", translator.get("note.list_header"));
    for note in notes {
        println!(
            "   #{:<4} {} {}",
            note.id.unwrap_or_default(),
            note.title,
            format_tags(&note.tags)
        );
    }
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_note(note: &Note) -> String {
    let mut output = format!(
        "{}\n{}\n",
        note.title,
        note.updated_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );

    if !note.tags.is_empty() {
        output.push_str(&format_tags(&note.tags));
        output.push('\n');
    }

    if !note.content.is_empty() {
        output.push('\n');
        output.push_str(&note.content);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tags_prefixes_each_tag() {
        let tags = vec!["deep".to_string(), "work".to_string()];

        assert_eq!(format_tags(&tags), "#deep #work");
        assert_eq!(format_tags(&[]), "");
    }

    #[test]
    fn format_note_includes_content_after_header() {
        let note = Note::new(
            "standup".to_string(),
            "ship the release".to_string(),
            vec!["team".to_string()],
        );

        let output = format_note(&note);

        assert!(output.starts_with("standup\n"));
        assert!(output.contains("#team\n"));
        assert!(output.ends_with("\nship the release"));
    }
}
