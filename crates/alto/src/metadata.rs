//! Variables describing one source file: tags read with lofty plus values
//! derived from the path.

use std::collections::HashMap;
use std::path::Path;

use lofty::error::LoftyError;
use lofty::file::TaggedFileExt;
use lofty::probe::read_from_path;
use lofty::tag::{ItemKey, Tag};

/// Tag-derived variables and the keys they are read from, in lookup order.
const TEXT_KEYS: [(&str, ItemKey); 7] = [
    ("comment", ItemKey::Comment),
    ("composer", ItemKey::Composer),
    ("genre", ItemKey::Genre),
    ("albumartist", ItemKey::AlbumArtist),
    ("album", ItemKey::AlbumTitle),
    ("artist", ItemKey::TrackArtist),
    ("title", ItemKey::TrackTitle),
];

/// Read the tags of `path` and turn them into variables.
///
/// The primary tag is preferred; otherwise the first tag found is used. A
/// file without any tag yields no variables.
pub fn read_tag_variables(path: &Path) -> Result<HashMap<String, String>, LoftyError> {
    let tagged_file = read_from_path(path)?;
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());
    Ok(tag.map(tag_variables).unwrap_or_default())
}

/// Variables for the values present in `tag`. Absent or blank values are
/// left out so that format groups fall back past them.
pub fn tag_variables(tag: &Tag) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    let mut insert = |name: &str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            vars.insert(name.to_string(), value);
        }
    };

    let (track, track_total) = position(tag, &ItemKey::TrackNumber, &ItemKey::TrackTotal);
    insert("trackcurrent", track);
    insert("tracktotal", track_total);
    let (disc, disc_total) = position(tag, &ItemKey::DiscNumber, &ItemKey::DiscTotal);
    insert("disccurrent", disc);
    insert("disctotal", disc_total);
    insert("year", year(tag));
    insert("format", Some(format!("{:?}", tag.tag_type())));

    for (name, key) in &TEXT_KEYS {
        insert(*name, tag.get_string(key).map(str::to_string));
    }

    vars
}

/// Variables derived from the path alone: `filename` (the name without its
/// last extension) and `filetype` (the lowercase extension).
pub fn path_variables(path: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    if let Some(stem) = path.file_stem() {
        vars.insert("filename".to_string(), stem.to_string_lossy().into_owned());
    }
    if let Some(ext) = path.extension() {
        vars.insert(
            "filetype".to_string(),
            ext.to_string_lossy().to_lowercase(),
        );
    }
    vars
}

/// Number and total for a track or disc. Some tag formats store both in the
/// number field as `n/total`.
fn position(tag: &Tag, number: &ItemKey, total: &ItemKey) -> (Option<String>, Option<String>) {
    let (current, packed_total) = match tag.get_string(number) {
        Some(value) => match value.split_once('/') {
            Some((current, total)) => (integer(current), integer(total)),
            None => (integer(value), None),
        },
        None => (None, None),
    };
    let total = tag.get_string(total).and_then(integer).or(packed_total);
    (current, total)
}

fn year(tag: &Tag) -> Option<String> {
    tag.get_string(&ItemKey::Year)
        .or_else(|| tag.get_string(&ItemKey::RecordingDate))
        .and_then(|date| integer(date.get(..4).unwrap_or(date)))
}

fn integer(s: &str) -> Option<String> {
    s.trim().parse::<u32>().ok().map(|n| n.to_string())
}
