use std::collections::BTreeMap;
use std::fmt;

use crate::patterns::ReadClass;

/// Display names for classifications, carrying the active cutoff values so
/// tags like `polyG13` or `length50` identify the configuration that
/// rejected a read.
#[derive(Debug, Clone)]
pub struct ClassNames {
    names: BTreeMap<ReadClass, String>,
}

impl ClassNames {
    pub fn new(min_length: usize, poly_len: usize, dust_cutoff: f64) -> Self {
        let mut names = BTreeMap::new();
        names.insert(ReadClass::Ok, "ok".to_owned());
        names.insert(ReadClass::Adapter, "adapter".to_owned());
        names.insert(ReadClass::AmbiguousBase, "n".to_owned());
        names.insert(ReadClass::PolyG, format!("polyG{}", poly_len));
        names.insert(ReadClass::PolyC, format!("polyC{}", poly_len));
        names.insert(ReadClass::TooShort, format!("length{}", min_length));
        names.insert(ReadClass::LowComplexity, format!("dust{}", dust_cutoff));
        Self { names }
    }

    pub fn name(&self, class: ReadClass) -> &str {
        &self.names[&class]
    }
}

/// Classification tallies for one input source.
#[derive(Debug, Clone)]
pub struct Stats {
    source: String,
    names: ClassNames,
    counts: BTreeMap<ReadClass, u64>,
    complete: u64,
    pe: u64,
    se: u64,
}

impl Stats {
    pub fn new(source: impl Into<String>, names: ClassNames) -> Self {
        Self {
            source: source.into(),
            names,
            counts: BTreeMap::new(),
            complete: 0,
            pe: 0,
            se: 0,
        }
    }

    /// Records one classified read. `paired` marks reads kept together with
    /// their mate; kept reads without a kept mate count as single-end.
    pub fn update(&mut self, class: ReadClass, paired: bool) {
        *self.counts.entry(class).or_insert(0) += 1;
        self.complete += 1;
        if class == ReadClass::Ok {
            if paired {
                self.pe += 1;
            } else {
                self.se += 1;
            }
        }
    }

    pub fn count(&self, class: ReadClass) -> u64 {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.complete
    }

    pub fn kept_fraction(&self) -> f64 {
        if self.complete == 0 {
            return 0.0;
        }
        let rejected: u64 = self
            .counts
            .iter()
            .filter(|&(&class, _)| class != ReadClass::Ok)
            .map(|(_, count)| count)
            .sum();
        (self.complete - rejected) as f64 / self.complete as f64
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.source)?;
        for (&class, count) in &self.counts {
            writeln!(f, "\t{}\t{}", self.names.name(class), count)?;
        }
        writeln!(f, "\tfraction\t{:.6}", self.kept_fraction())?;
        if self.pe > 0 {
            writeln!(f, "\tse\t{}", self.se)?;
            writeln!(f, "\tpe\t{}", self.pe)?;
        }
        Ok(())
    }
}
