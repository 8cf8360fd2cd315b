mod common;

use common::daemon::StubDaemon;
use common::fixtures::{self, HOME};
use hq_format::FormatConfig;
use hq_mirror::{Context, Driver, Error};
use serde_json::{json, Value};

fn driver() -> Driver<StubDaemon> {
    let daemon = StubDaemon::new(
        fixtures::session(),
        vec![fixtures::torrent(1, "alpha"), fixtures::torrent(2, "beta"), fixtures::torrent(3, "gamma")],
    );
    Driver::new(daemon, Context::transmission(FormatConfig::default().with_home_dir(HOME))).unwrap()
}

#[test]
fn session_change_survives_refetch() {
    let mut d = driver();
    d.session().unwrap().set("peer-limit-global", 10000).unwrap();
    assert!(d.push_session().unwrap());
    assert_eq!(d.collaborator().session["peer-limit-global"], json!(10000));

    let session = d.session().unwrap();
    assert_eq!(session.leaf("peer-limit-global").unwrap().value(), &json!(10000));

    // An edit that is never pushed is overwritten by the next fetch.
    session.set("peer-limit-global", 10).unwrap();
    let session = d.session().unwrap();
    assert_eq!(session.leaf("peer-limit-global").unwrap().value(), &json!(10000));
    assert!(!session.is_dirty());
}

#[test]
fn entity_fetch_always_requests_identifier() {
    let mut d = driver();
    let torrents = d.entities(Some(&[2][..]), &["name"]).unwrap();
    assert_eq!(torrents.len(), 1);
    assert_eq!(torrents[0].id(), Some(&json!(2)));
    assert_eq!(torrents[0].leaf("name").unwrap().human(), "beta");
    assert_eq!(torrents[0].len(), 2);

    let (ids, fields) = d.collaborator().entity_fetches[0].clone();
    assert_eq!(ids, Some(vec![2]));
    assert_eq!(fields, vec!["id".to_string(), "name".to_string()]);
}

#[test]
fn entity_fetch_merges_into_cached_mirror() {
    let mut d = driver();
    d.entities(None, &[]).unwrap();
    assert_eq!(d.cache().ids().collect::<Vec<_>>(), vec![1, 2, 3]);

    d.entity_mut(1).unwrap().set("peer-limit", 80).unwrap();
    d.collaborator_mut().torrent_mut(1).unwrap().insert("status".into(), json!(6));
    let fetched = d.entities(Some(&[1][..]), &["status"]).unwrap();
    assert_eq!(fetched[0].leaf("status").unwrap().value(), &json!("seeding"));

    let alpha = d.entity(1).unwrap();
    assert_eq!(alpha.leaf("name").unwrap().value(), &json!("alpha"));
    assert!(alpha.leaf("peer-limit").unwrap().is_dirty());
    assert_eq!(d.cache().len(), 3);
}

#[test]
fn entity_push_injects_identifier_and_converts_units() {
    let mut d = driver();
    d.entities(Some(&[3][..]), &["uploadLimit", "eta"]).unwrap();
    let torrent = d.entity_mut(3).unwrap();
    assert_eq!(torrent.leaf("uploadLimit").unwrap().value(), &json!(100_000));

    torrent.set("uploadLimit", 123).unwrap();
    assert_eq!(torrent.leaf("uploadLimit").unwrap().human(), "123 B/s");
    assert_eq!(
        torrent.set("eta", 10),
        Err(Error::Immutable { path: "torrent:eta".into() })
    );

    assert!(d.push_entity(3).unwrap());
    let patch = Value::Object(d.collaborator().entity_commits[0].clone());
    assert_eq!(patch, json!({"uploadLimit": 0, "id": 3}));
    assert!(!d.entity(3).unwrap().is_dirty());
}

#[test]
fn rejected_commit_keeps_edits_for_retry() {
    let mut d = driver();
    d.entities(Some(&[1][..]), &["peer-limit"]).unwrap();
    d.entity_mut(1).unwrap().set("peer-limit", 75).unwrap();

    d.collaborator_mut().reject_next = Some("invalid argument".into());
    assert_eq!(
        d.push_entity(1),
        Err(Error::CollaboratorRejected("invalid argument".into()))
    );
    assert!(d.entity(1).unwrap().is_dirty());
    assert!(d.collaborator().entity_commits.is_empty());

    assert!(d.push_entity(1).unwrap());
    assert_eq!(d.collaborator().entity_commits[0]["peer-limit"], json!(75));
    assert!(!d.push_entity(1).unwrap());
}

#[test]
fn offline_daemon_changes_nothing() {
    let mut d = driver();
    d.entities(None, &["name"]).unwrap();
    d.entity_mut(2).unwrap().set("queuePosition", 0).unwrap();
    d.collaborator_mut().offline = true;

    assert!(matches!(d.entities(None, &["name"]), Err(Error::CollaboratorUnavailable(_))));
    assert!(matches!(d.push_entity(2), Err(Error::CollaboratorUnavailable(_))));
    assert!(matches!(d.session(), Err(Error::CollaboratorUnavailable(_))));
    assert!(d.entity(2).unwrap().is_dirty());
    assert!(d.cached_session().is_empty());
}

#[test]
fn evicted_entities_are_forgotten() {
    let mut d = driver();
    d.entities(None, &["name"]).unwrap();
    d.collaborator_mut().torrents.retain(|t| t["id"] != json!(2));

    let evicted = d.evict(2).unwrap();
    assert_eq!(evicted.leaf("name").unwrap().value(), &json!("beta"));
    assert!(d.entity(2).is_none());
    assert_eq!(d.push_entity(2), Err(Error::NotFound { path: "torrent:2".into() }));

    let remaining = d.entities(None, &["name"]).unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(d.cache().len(), 2);
}

#[test]
fn nested_entity_fields_render() {
    let mut d = driver();
    let torrents = d.entities(Some(&[1][..]), &[]).unwrap();
    let alpha = torrents[0];

    let human = |key: &str| alpha.leaf(key).unwrap().human().to_string();
    assert_eq!(human("status"), "downloading");
    assert_eq!(human("eta"), "1h 2m");
    assert_eq!(human("percentDone"), "25 %");
    assert_eq!(human("rateDownload"), "2.00 KiB/s");
    assert_eq!(human("downloadDir"), "~/Downloads/");

    let files = alpha.tree("files").unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files.tree(0usize).unwrap().leaf("length").unwrap().human(), "1.00 GiB");
    assert_eq!(files.tree(1usize).unwrap().leaf("name").unwrap().human(), "alpha/README");
    assert_eq!(alpha.tree("peersFrom").unwrap().leaf("fromTracker").unwrap().value(), &json!(12));
    assert_eq!(alpha.tree("wanted").unwrap().leaf(1usize).unwrap().human(), "false");
}
