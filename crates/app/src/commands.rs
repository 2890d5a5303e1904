use std::error::Error;

use fusha_core::audio::AudioKey;
use fusha_core::model::{LessonId, PhraseId};
use services::{AppServices, AudioLoad, LessonSummary};
use tracing::info;

use crate::config::{AudioKind, Command};

pub async fn dispatch(app: &AppServices, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Levels => levels(app).await,
        Command::Lesson { id } => lesson(app, &id).await,
        Command::Complete { id } => complete(app, &id).await,
        Command::Grammar => {
            grammar(app).await;
            Ok(())
        }
        Command::Audio {
            kind,
            id,
            voice,
            out,
        } => {
            let key = match kind {
                AudioKind::Lesson => AudioKey::lesson(LessonId::new(id), voice),
                AudioKind::Phrase => AudioKey::phrase(PhraseId::new(id), voice),
            };
            match app.audio().load(&key).await {
                AudioLoad::Ready(clip) => {
                    std::fs::write(&out, &clip.bytes)?;
                    println!(
                        "saved {} ({} bytes) to {}",
                        clip.object_key,
                        clip.bytes.len(),
                        out.display()
                    );
                }
                AudioLoad::Unavailable(err) => println!("audio unavailable: {err}"),
                AudioLoad::Superseded => {}
            }
            Ok(())
        }
        Command::Reset => {
            app.progress().reset().await;
            println!("all local progress cleared");
            Ok(())
        }
        Command::Whoami => {
            println!("{}", app.user_id());
            Ok(())
        }
        Command::Export => {
            println!("{}", app.progress().export_json().await?);
            Ok(())
        }
    }
}

async fn levels(app: &AppServices) -> Result<(), Box<dyn Error>> {
    let curriculum = app.curriculum();
    let levels = curriculum.levels().await?;
    let progress = curriculum.level_progress().await?;

    for (level, lp) in levels.iter().zip(&progress) {
        let mark = if lp.is_complete { "✓" } else { " " };
        println!("[{mark}] {} {}", level.code, level.title);
        for (module, mp) in level.modules.iter().zip(&lp.modules) {
            println!(
                "      {:>3}%  {}. {}  ({}/{})",
                mp.percentage, module.number, module.title, mp.completed_count, mp.total_count
            );
        }
    }

    let stats = curriculum.overall_stats().await?;
    println!();
    println!(
        "levels {}/{}  modules {}/{}  lessons {}/{}",
        stats.completed_levels,
        stats.total_levels,
        stats.completed_modules,
        stats.total_modules,
        stats.completed_lessons,
        stats.total_lessons
    );
    Ok(())
}

async fn lesson(app: &AppServices, id: &LessonId) -> Result<(), Box<dyn Error>> {
    let Some(view) = app.curriculum().lesson(id).await? else {
        println!("no such lesson: {id}");
        return Ok(());
    };
    let lesson = &view.entry.lesson;

    println!("{} · {} · {}", view.entry.level_code, view.entry.module_title, lesson.title);
    if view.state.is_completed() {
        println!("(completed)");
    }
    for objective in &lesson.objectives {
        println!("  - {objective}");
    }
    if !lesson.grammar.is_empty() {
        println!();
        println!("{}", lesson.grammar);
    }
    if !lesson.vocabulary.is_empty() {
        println!();
        for item in &lesson.vocabulary {
            println!("  {}  {}  {}", item.arabic, item.transliteration, item.meaning);
        }
    }
    for example in &lesson.examples {
        println!("  {}  ({})  {}", example.arabic, example.transliteration, example.translation);
    }

    println!();
    println!("previous: {}", describe(view.neighbours.previous.as_ref()));
    println!("next:     {}", describe(view.neighbours.next.as_ref()));
    Ok(())
}

fn describe(summary: Option<&LessonSummary>) -> String {
    summary.map_or_else(
        || "-".to_string(),
        |s| format!("{} ({})", s.title, s.id),
    )
}

async fn complete(app: &AppServices, id: &LessonId) -> Result<(), Box<dyn Error>> {
    let record = app.progress().complete_lesson(id).await?;
    info!(lesson_id = %record.lesson_id, "completion recorded");
    println!("{} completed at {}", record.lesson_id, record.completed_at.to_rfc3339());
    Ok(())
}

async fn grammar(app: &AppServices) {
    for view in app.grammar().tables().await {
        let state = if view.access.is_locked() { "locked" } else { "available" };
        println!("{:<28} {state}", view.table.title());
    }
}
