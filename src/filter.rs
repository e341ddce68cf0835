use std::path::{Path, PathBuf};

use crate::classify::Classifier;
use crate::errors::*;
use crate::fastq::*;
use crate::stats::*;

/// Filters one single-end source: kept reads go to `ok`, rejected reads are
/// tagged with their classification and go to `filtered`.
pub fn filter_single(
    source: &mut FastqSource,
    classifier: &Classifier,
    names: &ClassNames,
    stats: &mut Stats,
    ok: &mut FastqSink,
    filtered: &mut FastqSink,
) -> Result<()> {
    while let Some(mut record) = source.next_record()? {
        let class = classifier.classify(&record.seq);
        stats.update(class, false);
        if class.is_kept() {
            ok.write(&record)?;
        } else {
            record.tag_id(names.name(class));
            filtered.write(&record)?;
        }
    }
    ok.finish()?;
    filtered.finish()
}

/// Output streams for one paired run.
pub struct PairedSinks {
    pub ok1: FastqSink,
    pub ok2: FastqSink,
    pub se1: FastqSink,
    pub se2: FastqSink,
    pub filtered1: FastqSink,
    pub filtered2: FastqSink,
}

/// Filters two mate files in lockstep. Mates are classified independently:
/// pairs where both pass go to the `ok` streams, a lone passing mate is
/// rescued to its `se` stream, and rejected reads are tagged and written to
/// their `filtered` stream.
pub fn filter_paired(
    source1: &mut FastqSource,
    source2: &mut FastqSource,
    classifier: &Classifier,
    names: &ClassNames,
    stats1: &mut Stats,
    stats2: &mut Stats,
    sinks: &mut PairedSinks,
) -> Result<()> {
    loop {
        let (mut record1, mut record2) = match (source1.next_record()?, source2.next_record()?) {
            (Some(r1), Some(r2)) => (r1, r2),
            (None, None) => break,
            (Some(_), None) => return Err(Error::UnpairedRead(source1.path().to_owned())),
            (None, Some(_)) => return Err(Error::UnpairedRead(source2.path().to_owned())),
        };

        let class1 = classifier.classify(&record1.seq);
        let class2 = classifier.classify(&record2.seq);
        let both = class1.is_kept() && class2.is_kept();
        stats1.update(class1, both);
        stats2.update(class2, both);

        if both {
            sinks.ok1.write(&record1)?;
            sinks.ok2.write(&record2)?;
        } else if class1.is_kept() {
            sinks.se1.write(&record1)?;
            record2.tag_id(names.name(class2));
            sinks.filtered2.write(&record2)?;
        } else if class2.is_kept() {
            record1.tag_id(names.name(class1));
            sinks.filtered1.write(&record1)?;
            sinks.se2.write(&record2)?;
        } else {
            record1.tag_id(names.name(class1));
            record2.tag_id(names.name(class2));
            sinks.filtered1.write(&record1)?;
            sinks.filtered2.write(&record2)?;
        }
    }

    sinks.ok1.finish()?;
    sinks.ok2.finish()?;
    sinks.se1.finish()?;
    sinks.se2.finish()?;
    sinks.filtered1.finish()?;
    sinks.filtered2.finish()
}

/// Input file name truncated at its first `.`, used to derive output names.
pub fn source_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    match name.find('.') {
        Some(dot) => name[..dot].to_owned(),
        None => name,
    }
}

pub fn output_path(out_dir: &Path, stem: &str, kind: &str) -> PathBuf {
    out_dir.join(format!("{}.{}.fastq", stem, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_truncates_at_first_dot() {
        assert_eq!(source_stem(Path::new("data/sample.fastq.gz")), "sample");
        assert_eq!(source_stem(Path::new("reads_1.fastq")), "reads_1");
        assert_eq!(source_stem(Path::new("reads")), "reads");
    }

    #[test]
    fn output_paths_join_stem_and_kind() {
        assert_eq!(
            output_path(Path::new("out"), "sample", "filtered"),
            PathBuf::from("out/sample.filtered.fastq")
        );
    }
}
