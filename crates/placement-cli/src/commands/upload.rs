//! The `placement upload` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use placement_client::create_uploader;
use placement_core::content::{ListeningAudio, SpeakingVideo};
use placement_core::model::Id;
use placement_core::traits::{MediaKind, MediaUploader, UploadRequest};

use super::{connect, explain};

pub async fn execute(
    file: PathBuf,
    kind: Option<MediaKind>,
    title: Option<String>,
    test: Option<Id>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let kind = match kind {
        Some(kind) => kind,
        None => MediaKind::from_path(&file).with_context(|| {
            format!(
                "cannot tell the media kind of {}; pass --kind image|audio|video",
                file.display()
            )
        })?,
    };

    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid file name: {}", file.display()))?
        .to_string();
    let bytes =
        std::fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;

    let (config, client) = connect(config_path.as_deref())?;
    let uploader = create_uploader(&config)?;

    eprintln!("Uploading {file_name} ({} bytes) as {kind}...", bytes.len());
    let media = uploader
        .upload(&UploadRequest {
            kind,
            file_name,
            bytes,
        })
        .await?;

    println!("URL: {}", media.url);
    println!("Public id: {}", media.public_id);
    if let Some(duration) = media.duration_secs {
        println!("Duration: {duration:.1}s");
    }
    if let Some(thumbnail) = &media.thumbnail_url {
        println!("Thumbnail: {thumbnail}");
    }

    let Some(test) = test else {
        return Ok(());
    };
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string()
    });

    match kind {
        MediaKind::Audio => {
            let mut draft = ListeningAudio::from_upload(&title, &media);
            draft.test = Some(test);
            let created = client.create(&draft).await.map_err(explain)?;
            println!("Created listening audio {} in test {test}", id_text(created.id));
        }
        MediaKind::Video => {
            let mut draft = SpeakingVideo::from_upload(&title, &media);
            draft.test = Some(test);
            let created = client.create(&draft).await.map_err(explain)?;
            println!("Created speaking video {} in test {test}", id_text(created.id));
        }
        MediaKind::Image => {
            anyhow::bail!("images are not attached to tests; upload succeeded at {}", media.url)
        }
    }

    Ok(())
}

fn id_text(id: Option<Id>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "(no id)".into())
}
