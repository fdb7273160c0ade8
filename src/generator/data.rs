use std::{fmt, path::PathBuf};

use chrono::NaiveDate;

/// One note, parsed and rendered. Built once per source file and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub title: String,
    /// Last-modified day of the source file; displays as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Rendered body, without the title heading.
    pub content: String,
    /// Source file stem; output file is `<slug>.html`.
    pub slug: String,
}

impl Post {
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub posts: usize,
    pub out_dir: PathBuf,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Blog generated successfully!")?;
        writeln!(f, "Total posts: {}", self.posts)?;
        write!(f, "Output directory: {}/", self.out_dir.display())
    }
}
