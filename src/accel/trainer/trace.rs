// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Objective values recorded over a training run.
use std::{fmt::Write, fs, path::Path};

use log::*;

use crate::errors::Result;

const CSV_HEADER: &str = "iter, obj_value";

/// Objective value per iteration; iteration 0 is the initial snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveTrace {
    rows: Vec<(usize, f64)>,
}

impl ObjectiveTrace {
    pub fn new() -> ObjectiveTrace {
        ObjectiveTrace::default()
    }

    pub fn push(&mut self, iter: usize, value: f64) {
        self.rows.push((iter, value));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[(usize, f64)] {
        &self.rows
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|(_, v)| *v).collect()
    }

    pub fn last(&self) -> Option<f64> {
        self.rows.last().map(|(_, v)| *v)
    }

    /// Render as comma-separated `iter,value` rows under a header line.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(16 * (self.rows.len() + 1));
        out.push_str(CSV_HEADER);
        out.push('\n');
        for (iter, value) in &self.rows {
            // writing to a String cannot fail
            let _ = writeln!(out, "{},{}", iter, value);
        }
        out
    }

    /// Write the CSV rendering to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("saving {} objective values to {}", self.rows.len(), path.display());
        fs::write(path, self.to_csv())?;
        Ok(())
    }
}

#[test]
fn test_csv_format() {
    let mut trace = ObjectiveTrace::new();
    trace.push(0, 2.5);
    trace.push(1, 1.25);
    assert_eq!(trace.to_csv(), "iter, obj_value\n0,2.5\n1,1.25\n");
    assert_eq!(trace.last(), Some(1.25));
    assert_eq!(trace.values(), vec![2.5, 1.25]);
}

#[test]
fn test_save_writes_file() {
    let mut trace = ObjectiveTrace::new();
    trace.push(0, 3.0);
    let path = std::env::temp_dir().join(format!("socbit-trace-{}.csv", std::process::id()));
    trace.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(text, "iter, obj_value\n0,3\n");
}
