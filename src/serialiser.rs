use crate::dataset::QaPair;
use crate::pipeline::Transcript;

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
    Assistant,
}

#[derive(Serialize)]
struct Message<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Serialize)]
struct DatasetRecord<'a> {
    messages: [Message<'a>; 2],
}

impl<'a> From<&'a QaPair> for DatasetRecord<'a> {
    fn from(pair: &'a QaPair) -> Self {
        DatasetRecord {
            messages: [
                Message {
                    role: Role::User,
                    content: &pair.question,
                },
                Message {
                    role: Role::Assistant,
                    content: &pair.answer,
                },
            ],
        }
    }
}

/// Writes one chat record per pair to `output`, replacing any existing file.
pub fn serialise<P: AsRef<Path>>(pairs: &[QaPair], output: P) -> Result<()> {
    let output = output.as_ref();
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create dataset file '{}'", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, pairs).context("Failed to write dataset file.")?;
    writer.flush().context("Failed to write dataset file.")?;
    Ok(())
}

fn write_records<W: Write>(buf: &mut W, pairs: &[QaPair]) -> Result<()> {
    for pair in pairs {
        write_record(buf, pair)?;
    }
    Ok(())
}

fn write_record<W: Write>(buf: &mut W, pair: &QaPair) -> Result<()> {
    serde_json::to_writer(&mut *buf, &DatasetRecord::from(pair))?;
    writeln!(buf)?;
    Ok(())
}

/// Writes every collected transcript, with a title banner, to `output`.
pub fn serialise_transcripts<P: AsRef<Path>>(transcripts: &[Transcript], output: P) -> Result<()> {
    let output = output.as_ref();
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create transcript file '{}'", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_transcripts(&mut writer, transcripts).context("Failed to write transcript file.")?;
    writer.flush().context("Failed to write transcript file.")?;
    Ok(())
}

fn write_transcripts<W: Write>(buf: &mut W, transcripts: &[Transcript]) -> Result<()> {
    let rule = "=".repeat(80);
    for transcript in transcripts {
        writeln!(buf)?;
        writeln!(buf, "{}", rule)?;
        writeln!(buf, "VİDEO: {}", transcript.title)?;
        writeln!(buf, "{}", rule)?;
        writeln!(buf)?;
        writeln!(buf, "{}", transcript.text)?;
        writeln!(buf)?;
    }
    Ok(())
}
