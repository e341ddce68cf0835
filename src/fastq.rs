use needletail::{parse_fastx_file, FastxReader};

use flate2::{write::GzEncoder, Compression};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::*;

/// One sequencing record: identifier, bases, and quality scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl SeqRecord {
    /// Splices a classification tag into the identifier so rejected reads
    /// stay traceable in the filtered output.
    pub fn tag_id(&mut self, tag: &str) {
        let mut id = Vec::with_capacity(tag.len() + 2 + self.id.len());
        id.extend_from_slice(tag.as_bytes());
        id.extend_from_slice(b"__");
        id.extend_from_slice(&self.id);
        self.id = id;
    }
}

/// Streaming fastq reader over one input file (plain or gzip).
pub struct FastqSource {
    reader: Box<dyn FastxReader>,
    path: String,
}

impl FastqSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().display().to_string();
        let reader = parse_fastx_file(&path).map_err(|e| Error::FileIo {
            file: path.clone(),
            source: Box::new(e),
        })?;
        Ok(Self { reader, path })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        let Some(record) = self.reader.next() else {
            return Ok(None);
        };
        let record = record.map_err(|e| Error::ParseRecord {
            file: self.path.clone(),
            source: Box::new(e),
        })?;
        Ok(Some(SeqRecord {
            id: record.id().to_vec(),
            seq: record.seq().into_owned(),
            qual: record.qual().map(|q| q.to_vec()).unwrap_or_default(),
        }))
    }
}

/// Buffered fastq writer for one output stream, gzip-compressed when the
/// target path ends in `.gz`.
pub struct FastqSink {
    writer: Box<dyn Write + Send>,
    path: String,
}

impl FastqSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().display().to_string();
        let file = File::create(&path).map_err(|e| Error::FileIo {
            file: path.clone(),
            source: Box::new(e),
        })?;

        let writer: Box<dyn Write + Send> = if path.ends_with(".gz") {
            Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(Self { writer, path })
    }

    pub fn write(&mut self, record: &SeqRecord) -> Result<()> {
        write_fastq_record(&mut self.writer, record).map_err(|e| Error::FileIo {
            file: self.path.clone(),
            source: Box::new(e),
        })
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::FileIo {
            file: self.path.clone(),
            source: Box::new(e),
        })
    }
}

/// Writes one record in 4-line fastq format, echoing the identifier on the
/// `+` line.
pub fn write_fastq_record(
    writer: &mut (dyn Write + std::marker::Send),
    record: &SeqRecord,
) -> std::io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(&record.id)?;
    writer.write_all(b"\n")?;
    writer.write_all(&record.seq)?;
    writer.write_all(b"\n+")?;
    writer.write_all(&record.id)?;
    writer.write_all(b"\n")?;
    writer.write_all(&record.qual)?;
    writer.write_all(b"\n")
}
