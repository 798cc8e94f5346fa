//! CSV export
//!
//! One writer serves both the REST export endpoints and the page
//! downloads. Every field is quoted, with embedded quotes doubled, so
//! free-text titles and descriptions cannot corrupt the row structure.

use csv::{QuoteStyle, WriterBuilder};

use crate::error::Error;
use crate::task::{Task, TaskStatistics, UNCATEGORIZED};
use crate::Result;

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b';';

const TASK_HEADER: [&str; 8] = [
    "ID",
    "Title",
    "Description",
    "Status",
    "Due Date",
    "Category",
    "Created At",
    "Updated At",
];

/// Serializes tasks and statistics into delimited text.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl CsvExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn writer(&self) -> csv::Writer<Vec<u8>> {
        WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Always)
            .from_writer(Vec::new())
    }

    /// Render the full task list, one row per task.
    pub fn tasks(&self, tasks: &[Task]) -> Result<Vec<u8>> {
        let mut writer = self.writer();
        writer.write_record(TASK_HEADER)?;
        for task in tasks {
            writer.write_record([
                task.id.to_string(),
                task.title.clone(),
                task.description.clone().unwrap_or_default(),
                task.status.as_str().to_string(),
                task.due_date.map(|d| d.to_string()).unwrap_or_default(),
                task.category_name
                    .clone()
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ])?;
        }
        finish(writer)
    }

    /// Render the statistics summary as metric/value rows.
    ///
    /// Row order is fixed: total, one row per status, then one row per
    /// category that has tasks.
    pub fn statistics(&self, stats: &TaskStatistics) -> Result<Vec<u8>> {
        let mut writer = self.writer();
        writer.write_record(["Metric", "Value"])?;

        let total = stats.total.to_string();
        writer.write_record(["Total tasks", total.as_str()])?;

        for bucket in &stats.by_status {
            let count = bucket.count.to_string();
            writer.write_record([bucket.status.as_str(), count.as_str()])?;
        }
        for bucket in &stats.by_category {
            let label = format!("Category: {}", bucket.name);
            let count = bucket.count.to_string();
            writer.write_record([label.as_str(), count.as_str()])?;
        }
        finish(writer)
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| Error::Storage(format!("finishing csv output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{CategoryCount, StatusCount, TaskStatus};
    use chrono::{TimeZone, Utc};

    fn sample_task(id: i64, title: &str) -> Task {
        let stamp = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        Task {
            id,
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            category_id: None,
            category_name: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn render(exporter: &CsvExporter, tasks: &[Task]) -> String {
        String::from_utf8(exporter.tasks(tasks).unwrap()).unwrap()
    }

    #[test]
    fn every_field_is_quoted() {
        let out = render(&CsvExporter::default(), &[sample_task(7, "Water plants")]);
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"ID\";\"Title\";\"Description\";\"Status\";\"Due Date\";\"Category\";\"Created At\";\"Updated At\""
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"7\";\"Water plants\";\"\";\"TODO\";\"\";\"Uncategorized\";\"2026-03-01T08:30:00+00:00\";\"2026-03-01T08:30:00+00:00\""
        );
    }

    #[test]
    fn delimiters_and_newlines_survive_inside_quotes() {
        let mut task = sample_task(1, "Title;With;Semicolons");
        task.description = Some("line one\nline two".to_string());

        let out = render(&CsvExporter::default(), &[task]);
        assert!(out.contains("\"Title;With;Semicolons\""));
        assert!(out.contains("\"line one\nline two\""));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let task = sample_task(1, "He said \"stop\"");
        let out = render(&CsvExporter::default(), &[task]);
        assert!(out.contains("\"He said \"\"stop\"\"\""));
    }

    #[test]
    fn category_and_due_date_are_rendered_when_present() {
        let mut task = sample_task(3, "Ship release");
        task.category_name = Some("Work".to_string());
        task.due_date = chrono::NaiveDate::from_ymd_opt(2026, 4, 1);

        let out = render(&CsvExporter::default(), &[task]);
        assert!(out.contains("\"Work\""));
        assert!(out.contains("\"2026-04-01\""));
    }

    #[test]
    fn statistics_rows_follow_fixed_order() {
        let stats = TaskStatistics {
            total: 3,
            by_status: vec![
                StatusCount {
                    status: TaskStatus::Todo,
                    count: 2,
                },
                StatusCount {
                    status: TaskStatus::InProgress,
                    count: 0,
                },
                StatusCount {
                    status: TaskStatus::Done,
                    count: 1,
                },
            ],
            by_category: vec![
                CategoryCount {
                    name: "Work".to_string(),
                    count: 2,
                },
                CategoryCount {
                    name: UNCATEGORIZED.to_string(),
                    count: 1,
                },
            ],
        };

        let out = String::from_utf8(CsvExporter::default().statistics(&stats).unwrap()).unwrap();
        let expected = "\"Metric\";\"Value\"\n\
                        \"Total tasks\";\"3\"\n\
                        \"TODO\";\"2\"\n\
                        \"IN_PROGRESS\";\"0\"\n\
                        \"DONE\";\"1\"\n\
                        \"Category: Work\";\"2\"\n\
                        \"Category: Uncategorized\";\"1\"\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn statistics_with_zero_tasks_report_zero_total() {
        let stats = TaskStatistics {
            total: 0,
            by_status: TaskStatus::ALL
                .iter()
                .map(|&status| StatusCount { status, count: 0 })
                .collect(),
            by_category: Vec::new(),
        };

        let out = String::from_utf8(CsvExporter::default().statistics(&stats).unwrap()).unwrap();
        let expected = "\"Metric\";\"Value\"\n\
                        \"Total tasks\";\"0\"\n\
                        \"TODO\";\"0\"\n\
                        \"IN_PROGRESS\";\"0\"\n\
                        \"DONE\";\"0\"\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn delimiter_is_configurable() {
        let out = render(&CsvExporter::new(b','), &[sample_task(1, "Comma mode")]);
        assert!(out.starts_with("\"ID\",\"Title\""));
        assert!(out.contains("\"Comma mode\""));
    }
}
