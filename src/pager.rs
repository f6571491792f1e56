use std::io::{BufRead, Write};

use csv::StringRecord;
use serde_json::{Map, Number, Value};

use crate::models::Dataset;
use crate::prompt::Console;

pub const BATCH_SIZE: usize = 5;

/// Walks the original-column view of a dataset in fixed-size batches.
pub struct Pager<'a> {
    dataset: &'a Dataset,
    offset: usize,
}

impl<'a> Pager<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset, offset: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.dataset.len()
    }

    pub fn next_batch(&mut self) -> Option<Vec<Value>> {
        if self.is_exhausted() {
            return None;
        }

        let batch: Vec<Value> = self
            .dataset
            .raw_rows()
            .skip(self.offset)
            .take(BATCH_SIZE)
            .map(|row| row_to_json(&self.dataset.headers, row))
            .collect();
        self.offset += batch.len();
        Some(batch)
    }
}

pub fn show_raw_data<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    dataset: &Dataset,
) -> anyhow::Result<()> {
    if !console.confirm("\nWould you like to view the raw data? (y/n)")? {
        return Ok(());
    }

    let mut pager = Pager::new(dataset);
    loop {
        let Some(batch) = pager.next_batch() else {
            console.say("No more records.")?;
            return Ok(());
        };
        for row in batch {
            console.say(&serde_json::to_string(&row)?)?;
        }
        if pager.is_exhausted() {
            console.say("No more records.")?;
            return Ok(());
        }
        if !console.confirm("\nWould you like to view five more records? (y/n)")? {
            return Ok(());
        }
    }
}

pub fn row_to_json(headers: &StringRecord, row: &StringRecord) -> Value {
    let mut object = Map::new();
    for (index, (header, field)) in headers.iter().zip(row.iter()).enumerate() {
        let key = if header.is_empty() {
            format!("Unnamed: {index}")
        } else {
            header.to_string()
        };
        object.insert(key, field_value(field));
    }
    Value::Object(object)
}

fn field_value(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = field.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Some(number) = field.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(field.to_string())
}
