use mapty::{
    Coords, EditIdentity, EditSession, Ledger, LedgerConfig, SqliteStore, Store, WorkoutInput,
};

const KEY: &str = "workouts";

fn run(distance: f64, duration: f64, cadence: f64) -> WorkoutInput {
    WorkoutInput::Running {
        distance,
        duration,
        cadence,
    }
}

#[test]
fn workouts_survive_a_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("mapty.db");

    let (ids, before) = {
        let store = SqliteStore::open(&path, KEY).unwrap();
        let mut ledger = Ledger::open(store, LedgerConfig::default());
        assert!(ledger.list().is_empty());

        let a = ledger
            .create(run(5.0, 25.0, 178.0), Coords(10.0, 10.0))
            .unwrap()
            .id
            .clone();
        let b = ledger
            .create(
                WorkoutInput::Cycling {
                    distance: 10.0,
                    duration: 30.0,
                    elevation_gain: 150.0,
                },
                Coords(-33.86, 151.21),
            )
            .unwrap()
            .id
            .clone();

        ledger.begin_edit(&a);
        ledger.commit(run(6.0, 30.0, 180.0)).unwrap();
        (vec![a, b], ledger.list().to_vec())
    };

    let store = SqliteStore::open(&path, KEY).unwrap();
    let ledger = Ledger::open(store, LedgerConfig::default());
    assert_eq!(ledger.list(), before.as_slice());
    assert_eq!(ledger.session(), &EditSession::Idle);

    let got: Vec<_> = ledger.list().iter().map(|w| w.id.clone()).collect();
    assert_eq!(got, ids);
    assert_eq!(ledger.list()[0].distance, 6.0);
    assert_eq!(ledger.list()[0].pace(), Some(5.0));
    assert_eq!(ledger.list()[1].speed(), Some(20.0));
}

#[test]
fn regenerated_id_is_what_gets_stored() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("mapty.db");
    let config = LedgerConfig {
        edit_identity: EditIdentity::Regenerate,
    };

    let mut ledger = Ledger::open(SqliteStore::open(&path, KEY).unwrap(), config);
    let old = ledger
        .create(run(5.0, 25.0, 178.0), Coords(10.0, 10.0))
        .unwrap()
        .id
        .clone();
    ledger.begin_edit(&old);
    let new = ledger.commit(run(6.0, 30.0, 180.0)).unwrap().id.clone();
    assert_ne!(old, new);
    drop(ledger);

    let reopened = Ledger::open(SqliteStore::open(&path, KEY).unwrap(), config);
    assert!(reopened.get(&old).is_none());
    assert_eq!(reopened.get(&new).map(|w| w.distance), Some(6.0));
}

#[test]
fn corrupt_store_opens_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("mapty.db");

    let mut store = SqliteStore::open(&path, KEY).unwrap();
    store.write_all("{ definitely not workouts").unwrap();

    let mut ledger = Ledger::open(store, LedgerConfig::default());
    assert!(ledger.list().is_empty());

    ledger
        .create(run(5.0, 25.0, 178.0), Coords(10.0, 10.0))
        .unwrap();
    let reopened = Ledger::open(SqliteStore::open(&path, KEY).unwrap(), LedgerConfig::default());
    assert_eq!(reopened.list().len(), 1);
}

#[test]
fn clear_persists_an_empty_list() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("mapty.db");

    let mut ledger = Ledger::open(SqliteStore::open(&path, KEY).unwrap(), LedgerConfig::default());
    ledger
        .create(run(5.0, 25.0, 178.0), Coords(10.0, 10.0))
        .unwrap();
    ledger.delete_all().unwrap();
    drop(ledger);

    let store = SqliteStore::open(&path, KEY).unwrap();
    assert_eq!(store.read_all().unwrap().as_deref(), Some("[]"));
}
