//! CSV reports of benchmark results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::harness::stats::Summary;
use crate::kernels::Tier;

/// Column layout of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    /// `name,size,mean,stddev,error`
    #[default]
    Full,
    /// `name,size,mean,stddev`
    Legacy,
}

impl Schema {
    pub const fn header(self) -> &'static [&'static str] {
        match self {
            Schema::Full => &["name", "size", "mean", "stddev", "error"],
            Schema::Legacy => &["name", "size", "mean", "stddev"],
        }
    }

    pub const fn columns(self) -> usize {
        self.header().len()
    }
}

/// One (kernel, size) result. Locked tiers carry no summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub tag: &'static str,
    pub size: usize,
    pub summary: Option<Summary>,
}

impl Record {
    pub fn measured(tier: Tier, size: usize, summary: Summary) -> Self {
        Self {
            tag: tier.tag(),
            size,
            summary: Some(summary),
        }
    }

    /// Row for a tier the execution mode does not unlock.
    pub fn placeholder(tier: Tier, size: usize) -> Self {
        Self {
            tag: tier.tag(),
            size,
            summary: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.summary.is_none()
    }

    /// Placeholders keep only the tag; size and statistics are left empty.
    fn fields(&self, schema: Schema) -> Vec<String> {
        let size = match self.summary {
            Some(_) => self.size.to_string(),
            None => String::new(),
        };
        let mut fields = vec![self.tag.to_string(), size];
        let stats = self.summary.map(|s| [s.mean, s.stddev, s.std_error]);
        for i in 0..schema.columns() - 2 {
            fields.push(stats.map(|v| v[i].to_string()).unwrap_or_default());
        }
        fields
    }
}

/// Ordered records plus the header they are written under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    schema: Schema,
    records: Vec<Record>,
}

impl Report {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the header then one line per record, in insertion order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.schema.header())?;
        for record in &self.records {
            wtr.write_record(record.fields(self.schema))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}
