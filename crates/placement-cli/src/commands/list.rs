//! The `placement list` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::Table;

use placement_client::ApiClient;
use placement_core::content::{
    ListeningAudio, PlacementTest, Question, ReadingPassage, SpeakingVideo, WritingPrompt,
};
use placement_core::curriculum::{Lesson, Level, Unit};
use placement_core::traits::{ListFilter, Resource};

use super::{connect, explain};

/// Collections that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Tests,
    Questions,
    Passages,
    Audios,
    Videos,
    WritingPrompts,
    Levels,
    Units,
    Lessons,
}

fn id_cell(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

pub async fn execute(
    kind: ResourceKind,
    filter: ListFilter,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, client) = connect(config_path.as_deref())?;
    let json = format == "json";

    match kind {
        ResourceKind::Tests => {
            let header = ["ID", "Title", "Level", "Minutes", "Active"];
            show::<PlacementTest>(&client, &filter, json, &header, |t| {
                vec![
                    id_cell(t.id),
                    t.title.clone(),
                    opt_cell(t.level.as_ref()),
                    t.duration_minutes.to_string(),
                    t.is_active.to_string(),
                ]
            })
            .await
        }
        ResourceKind::Questions => {
            let header = ["ID", "Test", "Category", "Text", "Options"];
            show::<Question>(&client, &filter, json, &header, |q| {
                vec![
                    id_cell(q.id),
                    opt_cell(q.test),
                    q.category.to_string(),
                    q.text.clone(),
                    q.options.len().to_string(),
                ]
            })
            .await
        }
        ResourceKind::Passages => {
            let header = ["ID", "Test", "Title", "Words"];
            show::<ReadingPassage>(&client, &filter, json, &header, |p| {
                vec![
                    id_cell(p.id),
                    opt_cell(p.test),
                    p.title.clone(),
                    p.word_count().to_string(),
                ]
            })
            .await
        }
        ResourceKind::Audios => {
            let header = ["ID", "Test", "Title", "Seconds", "URL"];
            show::<ListeningAudio>(&client, &filter, json, &header, |a| {
                vec![
                    id_cell(a.id),
                    opt_cell(a.test),
                    a.title.clone(),
                    opt_cell(a.duration_secs.map(|s| format!("{s:.1}"))),
                    a.audio_url.clone(),
                ]
            })
            .await
        }
        ResourceKind::Videos => {
            let header = ["ID", "Test", "Title", "Seconds", "URL"];
            show::<SpeakingVideo>(&client, &filter, json, &header, |v| {
                vec![
                    id_cell(v.id),
                    opt_cell(v.test),
                    v.title.clone(),
                    opt_cell(v.duration_secs.map(|s| format!("{s:.1}"))),
                    v.video_url.clone(),
                ]
            })
            .await
        }
        ResourceKind::WritingPrompts => {
            let header = ["ID", "Test", "Title", "Words"];
            show::<WritingPrompt>(&client, &filter, json, &header, |w| {
                vec![
                    id_cell(w.id),
                    opt_cell(w.test),
                    w.title.clone(),
                    format!("{}-{}", w.min_words, w.max_words),
                ]
            })
            .await
        }
        ResourceKind::Levels => {
            let header = ["ID", "Code", "Name", "Order"];
            show::<Level>(&client, &filter, json, &header, |l| {
                vec![
                    id_cell(l.id),
                    l.code.clone(),
                    l.name.clone(),
                    l.order.to_string(),
                ]
            })
            .await
        }
        ResourceKind::Units => {
            let header = ["ID", "Level", "Title", "Order"];
            show::<Unit>(&client, &filter, json, &header, |u| {
                vec![
                    id_cell(u.id),
                    u.level.to_string(),
                    u.title.clone(),
                    u.order.to_string(),
                ]
            })
            .await
        }
        ResourceKind::Lessons => {
            let header = ["ID", "Unit", "Title", "Order"];
            show::<Lesson>(&client, &filter, json, &header, |l| {
                vec![
                    id_cell(l.id),
                    l.unit.to_string(),
                    l.title.clone(),
                    l.order.to_string(),
                ]
            })
            .await
        }
    }
}

async fn show<R: Resource>(
    client: &ApiClient,
    filter: &ListFilter,
    json: bool,
    header: &[&str],
    row: impl Fn(&R) -> Vec<String>,
) -> Result<()> {
    let items: Vec<R> = client.list(filter).await.map_err(explain)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No {} found.", R::COLLECTION);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(header.to_vec());
    for item in &items {
        table.add_row(row(item));
    }
    println!("{table}");
    println!("{} {}(s)", items.len(), R::LABEL);
    Ok(())
}
