//! Cover embedding into audio file tags

use crate::error::{CoverError, Result};
use crate::types::CoverMode;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Tag, TagExt};
use std::path::Path;
use tracing::debug;

/// Description stored with every embedded cover
pub const COVER_DESCRIPTION: &str = "Cover (front)";

/// Embeds cover images as front-cover pictures
#[derive(Debug, Clone, Copy, Default)]
pub struct TagWriter {
    mode: CoverMode,
}

impl TagWriter {
    pub fn new(mode: CoverMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CoverMode {
        self.mode
    }

    /// Attach the image at `image_path` to `audio_path` and save it in place
    ///
    /// In `Append` mode other pictures are kept, including front covers with a
    /// different description; a previous `"Cover (front)"` picture is replaced,
    /// so re-running leaves one copy. `Replace` removes every front cover first.
    pub fn embed(&self, audio_path: &Path, image_path: &Path) -> Result<()> {
        let data = std::fs::read(image_path).map_err(|e| {
            CoverError::write(
                audio_path,
                format!("cannot read image {}: {}", image_path.display(), e),
            )
        })?;

        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            guess_mime_type(image_path),
            Some(COVER_DESCRIPTION.to_string()),
            data,
        );

        let mut tagged_file = Probe::open(audio_path)
            .and_then(|probe| Ok(probe.guess_file_type()?))
            .and_then(|probe| probe.read())
            .map_err(|e| CoverError::write(audio_path, e))?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            debug!("Creating {:?} tag for {}", tag_type, audio_path.display());
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file.tag_mut(tag_type).ok_or_else(|| {
            CoverError::write(audio_path, format!("file does not support {:?} tags", tag_type))
        })?;

        match self.mode {
            CoverMode::Replace => tag.remove_picture_type(PictureType::CoverFront),
            CoverMode::Append => remove_own_covers(tag),
        }
        tag.push_picture(picture);

        tag.save_to_path(audio_path, WriteOptions::default())
            .map_err(|e| CoverError::write(audio_path, e))?;

        Ok(())
    }
}

/// Drop front covers carrying `COVER_DESCRIPTION`; ID3v2 allows one picture
/// per description
fn remove_own_covers(tag: &mut Tag) {
    let own: Vec<usize> = tag
        .pictures()
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.pic_type() == PictureType::CoverFront && p.description() == Some(COVER_DESCRIPTION)
        })
        .map(|(i, _)| i)
        .collect();
    for index in own.into_iter().rev() {
        tag.remove_picture(index);
    }
}

/// Guess the picture MIME type from the image file extension
pub fn guess_mime_type(path: &Path) -> Option<MimeType> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => Some(MimeType::Jpeg),
        "png" => Some(MimeType::Png),
        "gif" => Some(MimeType::Gif),
        "bmp" => Some(MimeType::Bmp),
        "tif" | "tiff" => Some(MimeType::Tiff),
        "webp" => Some(MimeType::Unknown("image/webp".to_string())),
        _ => None,
    }
}
