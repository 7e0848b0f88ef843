//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use badge_core::{
  Error as CoreError,
  citation::NewCitation,
  enums::{Ethnicity, Gender, State},
  ids::{
    AllegationId, InvestigationId, LitigationId, OfficerUid, SourceId,
    StateIdKey, UnitId,
  },
  officer::{Attribute, NewOfficer},
  relation::{EdgeLabel, Link},
  state_id::NewStateId,
  store::OfficerStore,
};
use chrono::NaiveDate;
use serde_json::json;

use crate::{Error, SqliteStore, encode::encode_uuid};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn core(err: Error) -> CoreError {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a model error, got {other:?}"),
  }
}

fn tax_id(owner: OfficerUid) -> NewStateId {
  NewStateId {
    owner,
    id_name: Some("Tax ID Number".into()),
    state: State::NewYork,
    value: Some("958938".into()),
  }
}

/// Run raw SQL behind the store's back.
async fn raw_exec(s: &SqliteStore, sql: String) {
  s.conn
    .call(move |conn| {
      conn.execute_batch(&sql)?;
      Ok(())
    })
    .await
    .expect("raw sql");
}

async fn count(s: &SqliteStore, sql: &'static str) -> i64 {
  s.conn
    .call(move |conn| Ok(conn.query_row(sql, [], |r| r.get(0))?))
    .await
    .expect("count")
}

// ─── Officers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_officer() {
  let s = store().await;

  let officer = s
    .add_officer(NewOfficer {
      first_name: Some("Jane".into()),
      last_name: Some("Doe".into()),
      gender: Some(Gender::Female),
      ethnicity: Some(Ethnicity::Asian),
      date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 17),
      ..Default::default()
    })
    .await
    .unwrap();

  let fetched = s.get_officer(officer.uid).await.unwrap().unwrap();
  assert_eq!(fetched, officer);
}

#[tokio::test]
async fn get_officer_missing_returns_none() {
  let s = store().await;
  assert!(s.get_officer(OfficerUid::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn uids_are_unique_across_the_population() {
  let s = store().await;
  for _ in 0..50 {
    s.add_officer(NewOfficer::default()).await.unwrap();
  }

  let all = s.list_officers().await.unwrap();
  assert_eq!(all.len(), 50);
  let uids: HashSet<_> = all.iter().map(|o| o.uid).collect();
  assert_eq!(uids.len(), 50);
}

#[tokio::test]
async fn duplicate_uid_is_rejected() {
  let s = store().await;
  let first = s
    .add_officer(NewOfficer::with_last_name("Doe"))
    .await
    .unwrap();

  let err = s
    .add_officer_with_uid(first.uid, NewOfficer::with_last_name("Roe"))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::DuplicateUid(uid) if uid == first.uid));

  let kept = s.get_officer(first.uid).await.unwrap().unwrap();
  assert_eq!(kept.last_name.as_deref(), Some("Doe"));
}

#[tokio::test]
async fn add_officer_with_uid_keeps_the_uid() {
  let s = store().await;
  let uid = OfficerUid::new();
  let officer = s
    .add_officer_with_uid(uid, NewOfficer::default())
    .await
    .unwrap();
  assert_eq!(officer.uid, uid);
  assert!(s.get_officer(uid).await.unwrap().is_some());
}

#[tokio::test]
async fn set_attribute_persists() {
  let s = store().await;
  let officer = s
    .add_officer(NewOfficer::with_last_name("Doe"))
    .await
    .unwrap();

  s.set_attribute(officer.uid, Attribute::Gender, Some("M".into()))
    .await
    .unwrap();
  s.set_attribute(officer.uid, Attribute::DateOfBirth, Some("1971-02-03".into()))
    .await
    .unwrap();
  let updated = s
    .set_attribute(officer.uid, Attribute::FirstName, Some("John".into()))
    .await
    .unwrap();

  let fetched = s.get_officer(officer.uid).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
  assert_eq!(fetched.gender, Some(Gender::Male));
  assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1971, 2, 3));
  assert_eq!(fetched.uid, officer.uid);
}

#[tokio::test]
async fn unknown_gender_code_changes_nothing() {
  let s = store().await;
  let officer = s
    .add_officer(NewOfficer::with_last_name("Doe"))
    .await
    .unwrap();

  let err = s
    .set_attribute(officer.uid, Attribute::Gender, Some("unknown-code".into()))
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::InvalidEnumValue { field: "gender", .. }
  ));

  let fetched = s.get_officer(officer.uid).await.unwrap().unwrap();
  assert_eq!(fetched, officer);
}

#[tokio::test]
async fn rejected_write_keeps_previous_value() {
  let s = store().await;
  let officer = s.add_officer(NewOfficer::default()).await.unwrap();
  s.set_attribute(officer.uid, Attribute::Ethnicity, Some("White".into()))
    .await
    .unwrap();

  assert!(
    s.set_attribute(officer.uid, Attribute::Ethnicity, Some("Klingon".into()))
      .await
      .is_err()
  );

  let fetched = s.get_officer(officer.uid).await.unwrap().unwrap();
  assert_eq!(fetched.ethnicity, Some(Ethnicity::White));
}

#[tokio::test]
async fn uid_cannot_be_rewritten() {
  let s = store().await;
  let officer = s.add_officer(NewOfficer::default()).await.unwrap();

  let err = s
    .set_attribute(
      officer.uid,
      Attribute::Uid,
      Some(OfficerUid::new().to_string()),
    )
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::ImmutableAttribute("uid")));
  assert!(s.get_officer(officer.uid).await.unwrap().is_some());
}

#[tokio::test]
async fn set_attribute_on_missing_officer() {
  let s = store().await;
  let err = s
    .set_attribute(OfficerUid::new(), Attribute::LastName, Some("Doe".into()))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::OfficerNotFound(_)));
}

#[tokio::test]
async fn invalid_persisted_code_is_rejected_on_read() {
  let s = store().await;
  let officer = s.add_officer(NewOfficer::default()).await.unwrap();
  raw_exec(
    &s,
    format!(
      "UPDATE officers SET gender = 'X' WHERE uid = '{}'",
      encode_uuid(officer.uid)
    ),
  )
  .await;

  let err = s.get_officer(officer.uid).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::InvalidEnumValue { field: "gender", .. }
  ));
}

// ─── State IDs ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn state_id_belongs_to_exactly_one_officer() {
  let s = store().await;
  let doe = s
    .add_officer(NewOfficer::with_last_name("Doe"))
    .await
    .unwrap();

  let state_id = s.add_state_id(tax_id(doe.uid)).await.unwrap();
  assert_eq!(state_id.state, State::NewYork);
  assert_eq!(state_id.id_name.as_deref(), Some("Tax ID Number"));
  assert_eq!(state_id.value.as_deref(), Some("958938"));

  let held = s.state_ids_of(doe.uid).await.unwrap();
  assert_eq!(held, vec![state_id.clone()]);
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM edges WHERE label = 'HAS_STATE_ID'").await,
    1
  );

  let owned = s.get_state_id(state_id.key).await.unwrap().unwrap();
  assert_eq!(owned.owner, doe.uid);

  // A second officer cannot take the same node.
  let roe = s
    .add_officer(NewOfficer::with_last_name("Roe"))
    .await
    .unwrap();
  let err = s.attach_state_id(state_id.key, roe.uid).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::CardinalityViolation { found: 2, state_id } if state_id == owned.state_id.key
  ));

  let owned = s.get_state_id(state_id.key).await.unwrap().unwrap();
  assert_eq!(owned.owner, doe.uid);
  assert!(s.state_ids_of(roe.uid).await.unwrap().is_empty());
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM edges WHERE label = 'HAS_STATE_ID'").await,
    1
  );
}

#[tokio::test]
async fn state_id_without_owner_is_rejected() {
  let s = store().await;

  let err = s.add_state_id(tax_id(OfficerUid::new())).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::CardinalityViolation { found: 0, .. }
  ));

  // Nothing partial was committed.
  assert_eq!(count(&s, "SELECT COUNT(*) FROM state_ids").await, 0);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM edges").await, 0);
}

#[tokio::test]
async fn attach_to_current_owner_is_a_no_op() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();
  let state_id = s.add_state_id(tax_id(doe.uid)).await.unwrap();

  let owned = s.attach_state_id(state_id.key, doe.uid).await.unwrap();
  assert_eq!(owned.owner, doe.uid);
  assert_eq!(owned.state_id, state_id);
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM edges WHERE label = 'HAS_STATE_ID'").await,
    1
  );
}

#[tokio::test]
async fn attach_unknown_nodes() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();
  let state_id = s.add_state_id(tax_id(doe.uid)).await.unwrap();

  let err = s
    .attach_state_id(StateIdKey::new(), doe.uid)
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::StateIdNotFound(_)));

  let err = s
    .attach_state_id(state_id.key, OfficerUid::new())
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::OfficerNotFound(_)));
}

#[tokio::test]
async fn officer_may_hold_many_state_ids() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();

  let ny = s.add_state_id(tax_id(doe.uid)).await.unwrap();
  let nj = s
    .add_state_id(NewStateId::new(doe.uid, State::NewJersey))
    .await
    .unwrap();
  let ct = s
    .add_state_id(NewStateId::new(doe.uid, State::Connecticut))
    .await
    .unwrap();

  let held = s.state_ids_of(doe.uid).await.unwrap();
  assert_eq!(held, vec![ny, nj, ct]);
}

#[tokio::test]
async fn reassign_moves_ownership() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();
  let roe = s.add_officer(NewOfficer::default()).await.unwrap();
  let state_id = s.add_state_id(tax_id(doe.uid)).await.unwrap();

  let owned = s.reassign_state_id(state_id.key, roe.uid).await.unwrap();
  assert_eq!(owned.owner, roe.uid);

  assert!(s.state_ids_of(doe.uid).await.unwrap().is_empty());
  assert_eq!(s.state_ids_of(roe.uid).await.unwrap(), vec![state_id.clone()]);
  assert_eq!(
    s.get_state_id(state_id.key).await.unwrap().unwrap().owner,
    roe.uid
  );
  assert!(s.audit_state_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn reassign_to_missing_officer_keeps_owner() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();
  let state_id = s.add_state_id(tax_id(doe.uid)).await.unwrap();

  let err = s
    .reassign_state_id(state_id.key, OfficerUid::new())
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::OfficerNotFound(_)));
  assert_eq!(
    s.get_state_id(state_id.key).await.unwrap().unwrap().owner,
    doe.uid
  );
}

#[tokio::test]
async fn orphaned_state_id_is_reported_not_hidden() {
  let s = store().await;
  let key = StateIdKey::new();
  raw_exec(
    &s,
    format!(
      "INSERT INTO state_ids (state_id, state, created_at)
       VALUES ('{}', 'NY', '2024-01-01T00:00:00+00:00')",
      encode_uuid(key)
    ),
  )
  .await;

  let err = s.get_state_id(key).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::CardinalityViolation { found: 0, .. }
  ));

  let violations = s.audit_state_ids().await.unwrap();
  assert_eq!(violations.len(), 1);
  assert_eq!(violations[0].state_id, key);
  assert!(violations[0].owners.is_empty());
}

#[tokio::test]
async fn concurrent_attach_admits_a_single_owner() {
  let s = store().await;
  let key = StateIdKey::new();
  raw_exec(
    &s,
    format!(
      "INSERT INTO state_ids (state_id, state, created_at)
       VALUES ('{}', 'CA', '2024-01-01T00:00:00+00:00')",
      encode_uuid(key)
    ),
  )
  .await;

  let mut officers = Vec::new();
  for _ in 0..8 {
    officers.push(s.add_officer(NewOfficer::default()).await.unwrap().uid);
  }

  let handles: Vec<_> = officers
    .iter()
    .map(|&uid| {
      let s = s.clone();
      tokio::spawn(async move { s.attach_state_id(key, uid).await })
    })
    .collect();

  let mut winners = Vec::new();
  for handle in handles {
    match handle.await.unwrap() {
      Ok(owned) => winners.push(owned.owner),
      Err(e) => assert!(matches!(
        core(e),
        CoreError::CardinalityViolation { found: 2, .. }
      )),
    }
  }

  assert_eq!(winners.len(), 1);
  assert_eq!(s.get_state_id(key).await.unwrap().unwrap().owner, winners[0]);
}

// ─── Plain edges ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn edges_accumulate_without_displacing() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();

  let precinct = UnitId::new();
  let task_force = UnitId::new();
  let links = [
    Link::MemberOfUnit(precinct),
    Link::MemberOfUnit(task_force),
    Link::Commands(task_force),
    Link::NamedIn(LitigationId::new()),
    Link::NamedIn(LitigationId::new()),
    Link::AccusedOf(AllegationId::new()),
    Link::LeadBy(InvestigationId::new()),
  ];
  for link in links {
    s.link(doe.uid, link).await.unwrap();
  }

  let all = s.edges_of(doe.uid, None).await.unwrap();
  assert_eq!(
    all.iter().map(|e| e.link).collect::<Vec<_>>(),
    links.to_vec()
  );

  let units = s
    .edges_of(doe.uid, Some(EdgeLabel::MemberOfUnit))
    .await
    .unwrap();
  assert_eq!(
    units.iter().map(|e| e.link).collect::<Vec<_>>(),
    vec![Link::MemberOfUnit(precinct), Link::MemberOfUnit(task_force)]
  );

  let lawsuits = s.edges_of(doe.uid, Some(EdgeLabel::NamedIn)).await.unwrap();
  assert_eq!(lawsuits.len(), 2);
}

#[tokio::test]
async fn ownership_edges_are_not_plain_edges() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();
  s.add_state_id(tax_id(doe.uid)).await.unwrap();

  assert!(s.edges_of(doe.uid, None).await.unwrap().is_empty());
  assert!(
    s.edges_of(doe.uid, Some(EdgeLabel::HasStateId))
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn link_missing_officer_errors() {
  let s = store().await;
  let err = s
    .link(OfficerUid::new(), Link::MemberOfUnit(UnitId::new()))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::OfficerNotFound(_)));
  assert_eq!(count(&s, "SELECT COUNT(*) FROM edges").await, 0);
}

#[tokio::test]
async fn many_officers_share_a_unit() {
  let s = store().await;
  let unit = UnitId::new();
  let a = s.add_officer(NewOfficer::default()).await.unwrap();
  let b = s.add_officer(NewOfficer::default()).await.unwrap();

  s.link(a.uid, Link::MemberOfUnit(unit)).await.unwrap();
  s.link(b.uid, Link::MemberOfUnit(unit)).await.unwrap();

  assert_eq!(s.edges_of(a.uid, None).await.unwrap().len(), 1);
  assert_eq!(s.edges_of(b.uid, None).await.unwrap().len(), 1);
}

// ─── Citations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn citations_round_trip_and_repeat() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();
  let roster = SourceId::new();

  let mut first = NewCitation::new(doe.uid, roster)
    .with(Attribute::LastName, "Doe")
    .with(Attribute::Gender, "M");
  first.url = Some("https://example.org/roster-2021.pdf".into());
  first.as_of = NaiveDate::from_ymd_opt(2021, 6, 30);
  let first = s.cite(first).await.unwrap();

  // Same source again, disagreeing with itself: both are kept.
  let second = s
    .cite(NewCitation::new(doe.uid, roster).with(Attribute::Gender, "F"))
    .await
    .unwrap();

  let citations = s.citations_of(doe.uid).await.unwrap();
  assert_eq!(citations, vec![first, second]);
  assert_eq!(citations[0].diff["gender"], json!("M"));
  assert_eq!(citations[1].diff["gender"], json!("F"));
}

#[tokio::test]
async fn citation_with_unknown_attribute_is_rejected() {
  let s = store().await;
  let doe = s.add_officer(NewOfficer::default()).await.unwrap();

  let bad = NewCitation::new(doe.uid, SourceId::new())
    .with_diff_json(json!({ "badge_color": "blue" }))
    .unwrap();
  let err = s.cite(bad).await.unwrap_err();
  assert!(matches!(core(err), CoreError::InvalidCitationDiff(_)));
  assert!(s.citations_of(doe.uid).await.unwrap().is_empty());
}

#[tokio::test]
async fn citation_for_missing_officer_errors() {
  let s = store().await;
  let err = s
    .cite(NewCitation::new(OfficerUid::new(), SourceId::new()))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::OfficerNotFound(_)));
}

// ─── Materialize ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn materialize_returns_none_for_unknown_officer() {
  let s = store().await;
  assert!(s.materialize(OfficerUid::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn materialize_collects_everything() {
  let s = store().await;
  let doe = s
    .add_officer(NewOfficer::with_last_name("Doe"))
    .await
    .unwrap();
  let unit = UnitId::new();

  let state_id = s.add_state_id(tax_id(doe.uid)).await.unwrap();
  s.link(doe.uid, Link::MemberOfUnit(unit)).await.unwrap();
  s.link(doe.uid, Link::Commands(unit)).await.unwrap();
  s.cite(NewCitation::new(doe.uid, SourceId::new()).with(Attribute::LastName, "Doe"))
    .await
    .unwrap();

  let view = s.materialize(doe.uid).await.unwrap().unwrap();
  assert_eq!(view.officer, doe);
  assert_eq!(view.state_ids, vec![state_id]);
  assert_eq!(view.edges.len(), 2);
  assert_eq!(view.citations.len(), 1);
  assert_eq!(
    view.links(EdgeLabel::Commands).collect::<Vec<_>>(),
    vec![&Link::Commands(unit)]
  );
}
