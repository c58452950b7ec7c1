//! CSV file ledger store: one header row, then one row per player.
//!
//! Column order on write:
//! `player_id, name, team, skill, initial_buyin, rebuy_total, rebuy_count,
//! rebuy_history, final_stack, created_at, updated_at`.
//!
//! Columns are looked up by header name on read, so sheets exported by older
//! versions (`rebuy_times` instead of `rebuy_count`, no `rebuy_history`) still load.
//! Re-buy totals are reconciled with the history on every read.
//! Every write goes to a sibling temp file that is then renamed over the
//! ledger, so a failed write leaves the previous file intact.

use crate::models::{LedgerError, PlayerId, PlayerRecord, Skill, Team};
use crate::store::{apply_updates, sort_by_registration, FieldUpdate, LedgerStore};
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use uuid::Uuid;

const HEADER: [&str; 11] = [
    "player_id",
    "name",
    "team",
    "skill",
    "initial_buyin",
    "rebuy_total",
    "rebuy_count",
    "rebuy_history",
    "final_stack",
    "created_at",
    "updated_at",
];

/// Ledger persisted to a single CSV file.
#[derive(Debug)]
pub struct CsvLedgerStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles on the file.
    io: Mutex<()>,
}

impl CsvLedgerStore {
    /// Open the ledger at `path`, creating a header-only file if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let store = Self {
            path: path.into(),
            io: Mutex::new(()),
        };
        if !store.path.exists() {
            log::info!("Creating empty ledger at {}", store.path.display());
            store.write_rows(&[])?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows in file order.
    fn read_rows(&self) -> Result<Vec<PlayerRecord>, LedgerError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        let columns = Columns::from_headers(reader.headers()?)?;
        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = result?;
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            // +2: 1-based, after the header.
            rows.push(columns.decode(&row, i + 2)?);
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[PlayerRecord]) -> Result<(), LedgerError> {
        let tmp = self.tmp_path();
        let mut writer = csv::Writer::from_path(&tmp)?;
        writer.write_record(HEADER)?;
        for r in rows {
            writer.write_record(encode(r))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| LedgerError::StoreUnavailable(e.to_string()))?;
        file.sync_all()?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read, let `f` edit the rows, write back.
    fn modify<T>(
        &self,
        f: impl FnOnce(&mut Vec<PlayerRecord>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let _guard = self
            .io
            .lock()
            .map_err(|_| LedgerError::StoreUnavailable("lock error".to_string()))?;
        let mut rows = self.read_rows()?;
        let out = f(&mut rows)?;
        self.write_rows(&rows)?;
        Ok(out)
    }
}

impl LedgerStore for CsvLedgerStore {
    fn list(&self) -> Result<Vec<PlayerRecord>, LedgerError> {
        let _guard = self
            .io
            .lock()
            .map_err(|_| LedgerError::StoreUnavailable("lock error".to_string()))?;
        let mut rows = self.read_rows()?;
        sort_by_registration(&mut rows);
        Ok(rows)
    }

    fn append(&self, record: PlayerRecord) -> Result<(), LedgerError> {
        self.modify(|rows| {
            rows.push(record);
            Ok(())
        })
    }

    fn update_fields(&self, id: PlayerId, updates: &[FieldUpdate]) -> Result<(), LedgerError> {
        self.modify(|rows| {
            let row = rows
                .iter_mut()
                .find(|r| r.player_id == id)
                .ok_or(LedgerError::NotFound(id))?;
            apply_updates(row, updates, Utc::now());
            Ok(())
        })
    }

    fn delete(&self, id: PlayerId) -> Result<(), LedgerError> {
        self.modify(|rows| {
            let idx = rows
                .iter()
                .position(|r| r.player_id == id)
                .ok_or(LedgerError::NotFound(id))?;
            rows.remove(idx);
            Ok(())
        })
    }

    fn reset_all(&self) -> Result<(), LedgerError> {
        self.modify(|rows| {
            rows.clear();
            Ok(())
        })
    }
}

fn encode(r: &PlayerRecord) -> [String; 11] {
    [
        r.player_id.to_string(),
        r.name.clone(),
        r.team.to_string(),
        r.skill.to_string(),
        r.initial_buyin.to_string(),
        r.rebuy_total.to_string(),
        r.rebuy_count.to_string(),
        r.rebuy_history
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(","),
        r.final_stack.map(|s| s.to_string()).unwrap_or_default(),
        r.created_at.to_rfc3339(),
        r.updated_at.to_rfc3339(),
    ]
}

/// Header positions of each known column.
struct Columns {
    player_id: usize,
    name: usize,
    team: usize,
    skill: usize,
    initial_buyin: Option<usize>,
    rebuy_total: Option<usize>,
    rebuy_count: Option<usize>,
    rebuy_history: Option<usize>,
    final_stack: Option<usize>,
    created_at: Option<usize>,
    updated_at: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, LedgerError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                LedgerError::StoreUnavailable(format!("ledger header is missing column {name:?}"))
            })
        };
        Ok(Self {
            player_id: require("player_id")?,
            name: require("name")?,
            team: require("team")?,
            skill: require("skill")?,
            initial_buyin: find("initial_buyin"),
            rebuy_total: find("rebuy_total"),
            rebuy_count: find("rebuy_count").or_else(|| find("rebuy_times")),
            rebuy_history: find("rebuy_history"),
            final_stack: find("final_stack"),
            created_at: find("created_at"),
            updated_at: find("updated_at"),
        })
    }

    fn decode(&self, row: &StringRecord, line: usize) -> Result<PlayerRecord, LedgerError> {
        let corrupt = |what: String| LedgerError::StoreUnavailable(format!("line {line}: {what}"));

        let player_id = Uuid::parse_str(cell(row, Some(self.player_id)))
            .map_err(|e| corrupt(format!("bad player_id: {e}")))?;
        let team = Team::from_str(cell(row, Some(self.team))).map_err(corrupt)?;
        let skill = Skill::from_str(cell(row, Some(self.skill))).map_err(corrupt)?;

        let created_at = timestamp_or_epoch(cell(row, self.created_at), "created_at", line);
        let updated_at = match cell(row, self.updated_at) {
            "" => created_at,
            raw => timestamp_or_epoch(raw, "updated_at", line),
        };

        let mut record = PlayerRecord {
            player_id,
            name: cell(row, Some(self.name)).to_string(),
            team,
            skill,
            initial_buyin: number_or_zero(cell(row, self.initial_buyin), "initial_buyin", line),
            rebuy_total: number_or_zero(cell(row, self.rebuy_total), "rebuy_total", line),
            rebuy_count: number_or_zero(cell(row, self.rebuy_count), "rebuy_count", line),
            rebuy_history: history(cell(row, self.rebuy_history), line),
            final_stack: final_stack(cell(row, self.final_stack), line),
            created_at,
            updated_at,
        };
        reconcile_rebuys(&mut record, self.rebuy_history.is_some(), line);
        Ok(record)
    }
}

/// Bring `rebuy_total` / `rebuy_count` back in line with the history.
///
/// Sheets without a `rebuy_history` column only know the total, so it becomes
/// a single history entry (one undo removes all of it). Otherwise the history
/// wins and the totals are rebuilt from it.
fn reconcile_rebuys(record: &mut PlayerRecord, has_history_column: bool, line: usize) {
    let sum = record
        .rebuy_history
        .iter()
        .fold(0u64, |acc, a| acc.saturating_add(*a));
    let len = u32::try_from(record.rebuy_history.len()).unwrap_or(u32::MAX);
    if sum == record.rebuy_total && len == record.rebuy_count {
        return;
    }

    if !has_history_column {
        log::warn!(
            "line {line}: no rebuy_history column; seeding history with total {} (was {} re-buys)",
            record.rebuy_total,
            record.rebuy_count
        );
        record.rebuy_history = if record.rebuy_total > 0 {
            vec![record.rebuy_total]
        } else {
            Vec::new()
        };
        record.rebuy_count = record.rebuy_history.len() as u32;
        return;
    }

    log::error!(
        "line {line}: invariant violation for player {}: rebuy_total {} / rebuy_count {} disagree with history {:?}; rebuilding from history",
        record.player_id,
        record.rebuy_total,
        record.rebuy_count,
        record.rebuy_history
    );
    record.rebuy_total = sum;
    record.rebuy_count = len;
}

fn cell(row: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).unwrap_or("").trim()
}

/// Empty or unparsable numeric cells count as zero.
fn number_or_zero<T: FromStr + Default>(raw: &str, column: &str, line: usize) -> T {
    if raw.is_empty() {
        return T::default();
    }
    raw.parse().unwrap_or_else(|_| {
        log::warn!("line {line}: non-numeric {column} {raw:?}, using 0");
        T::default()
    })
}

fn final_stack(raw: &str, line: usize) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("line {line}: non-numeric final_stack {raw:?}, treating as not entered");
            None
        }
    }
}

fn history(raw: &str, line: usize) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(v) if v > 0 => Some(v),
            _ => {
                log::warn!("line {line}: dropping bad rebuy_history entry {s:?}");
                None
            }
        })
        .collect()
}

/// RFC 3339, or a naive ISO timestamp read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

fn timestamp_or_epoch(raw: &str, column: &str, line: usize) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| {
        log::warn!("line {line}: unreadable {column} {raw:?}, using epoch");
        DateTime::<Utc>::default()
    })
}
