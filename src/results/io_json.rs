// Reading and writing the run documents.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::results::*;

pub fn read_runs(path: &str) -> BResult<RunDocument> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let doc: RunDocument =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_runs: {}: {} runs", path, doc.runs.len());
    Ok(doc)
}

/// The textual form of a document: keys sorted, 4 spaces of indentation and no
/// final newline. Files written by earlier tools have this exact layout.
pub fn to_pretty_json(doc: &RunDocument) -> BResult<String> {
    // Going through a Value sorts the keys.
    let value = serde_json::to_value(doc).context(SerializingJsonSnafu)?;
    let mut buf: Vec<u8> = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).context(SerializingJsonSnafu)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_runs(path: &str, doc: &RunDocument) -> BResult<()> {
    let js = to_pretty_json(doc)?;
    info!("write_runs: {}: {} runs", path, doc.runs.len());
    write_atomically(path, &js)
}

/// Writes to a temporary file next to the destination, then renames it. A
/// failure leaves the previous content of the destination untouched and no
/// temporary file behind.
pub fn write_atomically(path: &str, content: &str) -> BResult<()> {
    let dir = match Path::new(path).parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    // Dropped (and removed) on every early return.
    let mut tmp = NamedTempFile::new_in(dir).context(WritingFileSnafu { path })?;
    tmp.write_all(content.as_bytes())
        .context(WritingFileSnafu { path })?;
    debug!("write_atomically: {}: via {}", path, tmp.path().display());
    tmp.persist(path)
        .map_err(|e| e.error)
        .context(WritingFileSnafu { path })?;
    Ok(())
}
