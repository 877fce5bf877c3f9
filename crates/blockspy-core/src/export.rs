//! History export to CSV

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{format_number, HistoryPoint};

pub const CSV_HEADERS: [&str; 5] = [
    "timestamp_utc",
    "jogadores_online",
    "ping",
    "lotacao_percentual",
    "variacao_jogadores",
];

/// Quote a value when it contains a quote, comma or newline.
pub fn escape_field(value: &str) -> String {
    let doubled = value.replace('"', "\"\"");
    if doubled.contains(['"', ',', '\n']) {
        format!("\"{doubled}\"")
    } else {
        doubled
    }
}

fn write_row(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Render the history as CSV text, header row first.
pub fn history_to_csv(history: &[HistoryPoint]) -> String {
    let mut out = String::new();
    let headers: Vec<String> = CSV_HEADERS.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &headers);

    for point in history {
        write_row(
            &mut out,
            &[
                point.timestamp.clone(),
                point.players.map(|p| p.to_string()).unwrap_or_default(),
                point.ping.map(format_number).unwrap_or_default(),
                format_number(point.occupancy_percent),
                point.player_delta.to_string(),
            ],
        );
    }
    out
}

/// `historico_<name>_<date>.csv`, with every non-alphanumeric ASCII char of
/// the name replaced by `_`.
pub fn export_file_name(server_name: &str, date: NaiveDate) -> String {
    let safe: String = server_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("historico_{}_{}.csv", safe, date.format("%Y-%m-%d"))
}

/// Write the CSV into `dir` and return the full path.
pub fn write_history_csv(
    dir: &Path,
    server_name: &str,
    date: NaiveDate,
    history: &[HistoryPoint],
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(server_name, date));
    std::fs::write(&path, history_to_csv(history))?;
    tracing::info!("Exported {} history rows to {:?}", history.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: &str, players: Option<i64>, ping: Option<f64>) -> HistoryPoint {
        HistoryPoint {
            timestamp: ts.to_string(),
            players,
            ping,
            occupancy_percent: 25.0,
            player_delta: -2,
        }
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_layout() {
        let csv = history_to_csv(&[
            point("2024-06-01T12:00:00+00:00", Some(5), Some(42.0)),
            point("2024-06-01T12:05:00+00:00", None, None),
        ]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "timestamp_utc,jogadores_online,ping,lotacao_percentual,variacao_jogadores"
        );
        assert_eq!(lines[1], "2024-06-01T12:00:00+00:00,5,42,25,-2");
        assert_eq!(lines[2], "2024-06-01T12:05:00+00:00,,,25,-2");
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            export_file_name("mc.example.net:25565", date),
            "historico_mc_example_net_25565_2024-06-01.csv"
        );
    }

    #[test]
    fn test_write_history_csv() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let path = write_history_csv(
            dir.path(),
            "Hub",
            date,
            &[point("t", Some(1), Some(10.5))],
        )
        .unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.ends_with("t,1,10.5,25,-2\n"));
    }
}
