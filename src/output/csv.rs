//! CSV timeline writer.

use crate::error::{Error, Result};
use crate::timeline::TimelineEntry;
use std::path::Path;

/// Write timeline entries as flat CSV rows.
///
/// One row per prediction; windows with no events produce no rows, so
/// the `time` column can skip forward over failed windows.
pub fn write_csv(path: &Path, source_file: &str, timeline: &[TimelineEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let write = |w: &mut csv::Writer<std::fs::File>, record: &[String]| {
        w.write_record(record).map_err(|e| Error::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        })
    };

    write(
        &mut writer,
        &[
            "time_s".to_string(),
            "rank".to_string(),
            "label".to_string(),
            "score".to_string(),
            "file".to_string(),
        ],
    )?;

    for entry in timeline {
        for (rank, event) in entry.events.iter().enumerate() {
            write(
                &mut writer,
                &[
                    format!("{:.1}", entry.time),
                    (rank + 1).to_string(),
                    event.label.clone(),
                    format!("{:.4}", event.score),
                    source_file.to_string(),
                ],
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::timeline::Prediction;
    use tempfile::tempdir;

    fn entry(time: f32, events: Vec<(&str, f32)>) -> TimelineEntry {
        TimelineEntry {
            time,
            events: events
                .into_iter()
                .map(|(label, score)| Prediction {
                    label: label.to_string(),
                    score,
                })
                .collect(),
        }
    }

    #[test]
    fn writes_one_row_per_event() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.timeline.csv");

        let timeline = vec![
            entry(0.0, vec![("Speech", 0.9123), ("Music", 0.05)]),
            entry(0.5, vec![]),
            entry(1.0, vec![("Music", 0.8)]),
        ];

        write_csv(&path, "clip.wav", &timeline).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time_s,rank,label,score,file");
        assert_eq!(lines[1], "0.0,1,Speech,0.9123,clip.wav");
        assert_eq!(lines[2], "0.0,2,Music,0.0500,clip.wav");
        assert_eq!(lines[3], "1.0,1,Music,0.8000,clip.wav");
    }

    #[test]
    fn labels_with_commas_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.timeline.csv");

        let timeline = vec![entry(0.0, vec![("Inside, small room", 0.7)])];
        write_csv(&path, "clip.wav", &timeline).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"Inside, small room\""));
    }
}
