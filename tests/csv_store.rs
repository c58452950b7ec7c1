//! Integration tests for the CSV file ledger store.

use chrono::{TimeZone, Utc};
use poker_ledger_web::{
    add_rebuy, CsvLedgerStore, FieldUpdate, Ledger, LedgerError, LedgerStore, PlayerRecord, Skill,
    Team,
};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn record(name: &str, team: Team, skill: Skill, minute: u32) -> PlayerRecord {
    PlayerRecord::new(
        name,
        team,
        skill,
        5000,
        Utc.with_ymd_and_hms(2024, 11, 2, 18, minute, 0).unwrap(),
    )
}

fn open(dir: &TempDir) -> CsvLedgerStore {
    CsvLedgerStore::open(dir.path().join("players.csv")).unwrap()
}

#[test]
fn open_creates_header_only_file() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let contents = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        contents.trim_end(),
        "player_id,name,team,skill,initial_buyin,rebuy_total,rebuy_count,rebuy_history,final_stack,created_at,updated_at"
    );
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let mut p = record("Tanaka, Jr.", Team::Cse, Skill::Novice, 0);
    add_rebuy(&mut p, 2000).unwrap();
    add_rebuy(&mut p, 1000).unwrap();
    p.final_stack = Some(-300);
    let q = record("Sato", Team::Rc, Skill::Expert, 5);

    {
        let store = open(&dir);
        store.append(p.clone()).unwrap();
        store.append(q.clone()).unwrap();
    }

    let store = open(&dir);
    assert_eq!(store.list().unwrap(), vec![p, q]);
}

#[test]
fn list_is_in_registration_order() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.append(record("Later", Team::Cse, Skill::Novice, 30)).unwrap();
    store.append(record("Earlier", Team::Rc, Skill::Novice, 10)).unwrap();
    let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Earlier", "Later"]);
}

#[test]
fn update_delete_and_reset() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let p = record("A", Team::Cse, Skill::Novice, 0);
    let q = record("B", Team::Rc, Skill::Expert, 1);
    store.append(p.clone()).unwrap();
    store.append(q.clone()).unwrap();

    store
        .update_fields(
            p.player_id,
            &[
                FieldUpdate::RebuyTotal(3000),
                FieldUpdate::RebuyCount(2),
                FieldUpdate::RebuyHistory(vec![1000, 2000]),
                FieldUpdate::FinalStack(Some(12000)),
            ],
        )
        .unwrap();
    let updated = store.get(p.player_id).unwrap();
    assert_eq!(updated.rebuy_history, vec![1000, 2000]);
    assert_eq!(updated.final_stack, Some(12000));
    assert!(updated.updated_at > p.updated_at);

    store.delete(q.player_id).unwrap();
    assert_eq!(store.get(q.player_id), Err(LedgerError::NotFound(q.player_id)));
    assert_eq!(store.delete(q.player_id), Err(LedgerError::NotFound(q.player_id)));

    store.reset_all().unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(!dir.path().join("players.csv.tmp").exists());
}

#[test]
fn reads_legacy_sheet_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("players.csv");
    fs::write(
        &path,
        "player_id,name,team,skill,initial_buyin,rebuy_total,rebuy_times,final_stack,created_at,updated_at\n\
         7b0f2f0e-8e0c-4b4e-9a55-0c6f3f1d2a11,Tanaka,CSE,初心者,5000,3000,2,,2024-11-02T18:00:00.000001,2024-11-02T19:00:00\n\
         1c9e4a8e-2b1d-4f7a-8c3e-5d6f7a8b9c0d,Sato,RC,経験者,5000,0,0,8000,2024-11-02T18:05:00,\n",
    )
    .unwrap();

    let store = CsvLedgerStore::open(&path).unwrap();
    let rows = store.list().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].skill, Skill::Novice);
    assert_eq!(rows[0].rebuy_total, 3000);
    assert_eq!(rows[0].rebuy_count, 1);
    assert_eq!(rows[0].rebuy_history, vec![3000]);
    assert_eq!(rows[0].final_stack, None);

    assert_eq!(rows[1].team, Team::Rc);
    assert_eq!(rows[1].skill, Skill::Expert);
    assert_eq!(rows[1].final_stack, Some(8000));
    assert_eq!(rows[1].updated_at, rows[1].created_at);
}

#[test]
fn bad_numeric_cells_degrade_to_zero() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("players.csv");
    fs::write(
        &path,
        "player_id,name,team,skill,initial_buyin,rebuy_total,rebuy_count,rebuy_history,final_stack,created_at,updated_at\n\
         7b0f2f0e-8e0c-4b4e-9a55-0c6f3f1d2a11,Tanaka,CSE,novice,abc,,x,,n/a,2024-11-02T18:00:00Z,2024-11-02T18:00:00Z\n",
    )
    .unwrap();

    let rows = CsvLedgerStore::open(&path).unwrap().list().unwrap();
    assert_eq!(rows[0].initial_buyin, 0);
    assert_eq!(rows[0].rebuy_total, 0);
    assert_eq!(rows[0].rebuy_count, 0);
    assert_eq!(rows[0].final_stack, None);
}

#[test]
fn unknown_team_is_a_store_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("players.csv");
    fs::write(
        &path,
        "player_id,name,team,skill\n7b0f2f0e-8e0c-4b4e-9a55-0c6f3f1d2a11,Tanaka,XYZ,novice\n",
    )
    .unwrap();

    let err = CsvLedgerStore::open(&path).unwrap().list().unwrap_err();
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));
}

fn assert_consistent(p: &PlayerRecord) {
    assert_eq!(p.rebuy_total, p.rebuy_history.iter().sum::<u64>());
    assert_eq!(p.rebuy_count as usize, p.rebuy_history.len());
}

#[test]
fn legacy_rebuys_stay_consistent_through_add_and_undo() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("players.csv");
    fs::write(
        &path,
        "player_id,name,team,skill,initial_buyin,rebuy_total,rebuy_times,final_stack,created_at,updated_at\n\
         7b0f2f0e-8e0c-4b4e-9a55-0c6f3f1d2a11,Tanaka,CSE,novice,5000,3000,2,,2024-11-02T18:00:00,\n",
    )
    .unwrap();
    let ledger = Ledger::new(
        Arc::new(CsvLedgerStore::open(&path).unwrap()),
        Duration::from_secs(5),
    );
    let id = ledger.players().unwrap()[0].player_id;

    let p = ledger.add_rebuy(id, 1000).unwrap();
    assert_consistent(&p);
    assert_eq!(p.rebuy_total, 4000);
    assert_eq!(p.rebuy_history, vec![3000, 1000]);

    assert_eq!(ledger.undo_rebuy(id).unwrap().rebuy_total, 3000);
    let p = ledger.undo_rebuy(id).unwrap();
    assert_consistent(&p);
    assert_eq!(p.rebuy_total, 0);
    assert_eq!(ledger.undo_rebuy(id), Err(LedgerError::NothingToUndo));
}

#[test]
fn totals_disagreeing_with_history_are_rebuilt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("players.csv");
    fs::write(
        &path,
        "player_id,name,team,skill,initial_buyin,rebuy_total,rebuy_count,rebuy_history,final_stack,created_at,updated_at\n\
         7b0f2f0e-8e0c-4b4e-9a55-0c6f3f1d2a11,Tanaka,CSE,novice,5000,9999,7,\"2000,1000\",,2024-11-02T18:00:00Z,2024-11-02T18:00:00Z\n",
    )
    .unwrap();

    let rows = CsvLedgerStore::open(&path).unwrap().list().unwrap();
    assert_consistent(&rows[0]);
    assert_eq!(rows[0].rebuy_total, 3000);
    assert_eq!(rows[0].rebuy_count, 2);
}
