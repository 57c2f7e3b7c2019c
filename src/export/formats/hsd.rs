use crate::error::Result;
use crate::haplogroup::{HaplogroupAssignment, Mutation};
use crate::types::MT_LENGTH;
use std::io::Write;

/// One HSD line: sample, range, haplogroup, then every polymorphism of the profile.
pub struct HsdRow<'a> {
    pub sample_id: &'a str,
    pub assignment: &'a HaplogroupAssignment,
}

impl HsdRow<'_> {
    fn polymorphisms(&self) -> Vec<Mutation> {
        let mut all: Vec<Mutation> = self
            .assignment
            .matched
            .iter()
            .chain(&self.assignment.unexplained)
            .copied()
            .collect();
        all.sort();
        all.dedup();
        all
    }
}

pub fn write_hsd<'a, W, I>(mut writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = HsdRow<'a>>,
{
    writeln!(writer, "SampleID\tRange\tHaplogroup\tPolymorphisms")?;
    for row in rows {
        write!(
            writer,
            "{}\t1-{}\t{}",
            row.sample_id, MT_LENGTH, row.assignment.haplogroup
        )?;
        for mutation in row.polymorphisms() {
            write!(writer, "\t{}", mutation)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
