//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, NaiveDate, TimeZone as _, Utc};
use tigerwatch_core::{
  geo::{self, GeoPoint, Radius},
  sighting::Sighting,
  store::{SightingQuery, SightingStore, TigerStore, UserStore},
  tiger::{NewTiger, TigerId},
  user::NewUser,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ts(hours: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
}

fn new_tiger(name: &str, last_seen_hours: i64) -> NewTiger {
  NewTiger {
    name:          name.into(),
    date_of_birth: NaiveDate::from_ymd_opt(2018, 5, 17).unwrap(),
    last_seen_at:  ts(last_seen_hours),
    last_seen_lat: 1.2,
    last_seen_lon: 2.2,
  }
}

async fn user(s: &SqliteStore, username: &str) -> Uuid {
  let user = s
    .create_user(NewUser {
      user_id:       Uuid::new_v4(),
      username:      username.into(),
      email:         format!("{username}@example.com"),
      password_hash: "$argon2id$stub".into(),
    })
    .await
    .unwrap();
  user.user_id
}

fn sighting(tiger_id: TigerId, reporter: Uuid, lat: f64, lon: f64, hours: i64) -> Sighting {
  Sighting {
    id: Uuid::new_v4(),
    tiger_id,
    reported_by_user_id: reporter,
    lat,
    lon,
    sighted_at: ts(hours),
    image_url: None,
    recorded_at: ts(hours),
  }
}

// ─── Tigers ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_tiger() {
  let s = store().await;

  let tiger = s.create_tiger(new_tiger("Shere Khan", 0)).await.unwrap();
  assert!(tiger.id > 0);

  let fetched = s.get_tiger(tiger.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Shere Khan");
  assert_eq!(fetched.date_of_birth, tiger.date_of_birth);
  assert_eq!(fetched.last_seen_at, ts(0));
}

#[tokio::test]
async fn get_tiger_missing_returns_none() {
  let s = store().await;
  assert!(s.get_tiger(42).await.unwrap().is_none());
}

#[tokio::test]
async fn tiger_with_empty_name_is_still_found() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("", 0)).await.unwrap();
  assert!(s.get_tiger(tiger.id).await.unwrap().is_some());
}

#[tokio::test]
async fn create_tiger_rejects_bad_coordinates() {
  let s = store().await;
  let mut input = new_tiger("Rajah", 0);
  input.last_seen_lat = 123.0;
  assert!(s.create_tiger(input).await.is_err());
}

#[tokio::test]
async fn list_tigers_most_recently_seen_first() {
  let s = store().await;
  s.create_tiger(new_tiger("old", 1)).await.unwrap();
  s.create_tiger(new_tiger("newest", 9)).await.unwrap();
  s.create_tiger(new_tiger("middle", 5)).await.unwrap();

  let names: Vec<_> = s
    .list_tigers(None, 0)
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect();
  assert_eq!(names, ["newest", "middle", "old"]);

  let page: Vec<_> = s
    .list_tigers(Some(1), 1)
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect();
  assert_eq!(page, ["middle"]);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn users_are_found_by_username_or_email() {
  let s = store().await;
  let id = user(&s, "alice").await;

  let by_name = s.find_user_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_name.user_id, id);

  let by_email = s
    .find_user_by_username_or_email("nobody", "alice@example.com")
    .await
    .unwrap();
  assert_eq!(by_email.map(|u| u.user_id), Some(id));

  assert!(s.find_user_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_constraint_violation() {
  let s = store().await;
  user(&s, "alice").await;

  let err = s
    .create_user(NewUser {
      user_id:       Uuid::new_v4(),
      username:      "alice".into(),
      email:         "other@example.com".into(),
      password_hash: "x".into(),
    })
    .await
    .unwrap_err();
  assert!(err.is_constraint_violation(), "got {err}");
}

// ─── Sightings ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_newest_first() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("Rajah", 0)).await.unwrap();
  let alice = user(&s, "alice").await;

  let older = sighting(tiger.id, alice, 1.2, 2.2, 1);
  let newer = sighting(tiger.id, alice, 3.0, 4.0, 5);
  s.insert_sighting(&older).await.unwrap();
  s.insert_sighting(&newer).await.unwrap();

  let all = s
    .query_sightings(&SightingQuery::for_tiger(tiger.id))
    .await
    .unwrap();
  assert_eq!(all, vec![newer.clone(), older.clone()]);
}

#[tokio::test]
async fn image_url_roundtrip() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("Rajah", 0)).await.unwrap();
  let alice = user(&s, "alice").await;

  let mut with_image = sighting(tiger.id, alice, 1.2, 2.2, 1);
  with_image.image_url = Some("https://img.example.com/t.jpg".into());
  s.insert_sighting(&with_image).await.unwrap();

  let all = s
    .query_sightings(&SightingQuery::for_tiger(tiger.id))
    .await
    .unwrap();
  assert_eq!(all[0].image_url.as_deref(), Some("https://img.example.com/t.jpg"));
}

#[tokio::test]
async fn insert_for_unknown_tiger_fails() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let err = s
    .insert_sighting(&sighting(999, alice, 1.2, 2.2, 0))
    .await
    .unwrap_err();
  assert!(err.is_constraint_violation(), "got {err}");
}

#[tokio::test]
async fn zero_limit_returns_nothing_and_no_limit_returns_everything() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("Rajah", 0)).await.unwrap();
  let alice = user(&s, "alice").await;
  for h in 0..5 {
    s.insert_sighting(&sighting(tiger.id, alice, h as f64, 0.0, h))
      .await
      .unwrap();
  }

  let unlimited = s
    .query_sightings(&SightingQuery::for_tiger(tiger.id))
    .await
    .unwrap();
  assert_eq!(unlimited.len(), 5);

  let none = s
    .query_sightings(&SightingQuery::for_tiger(tiger.id).paginate(0, 0))
    .await
    .unwrap();
  assert!(none.is_empty());

  let page = s
    .query_sightings(&SightingQuery::for_tiger(tiger.id).paginate(2, 2))
    .await
    .unwrap();
  let hours: Vec<_> = page.iter().map(|s| s.sighted_at).collect();
  assert_eq!(hours, [ts(2), ts(1)]);
}

#[tokio::test]
async fn sightings_are_scoped_to_their_tiger() {
  let s = store().await;
  let a = s.create_tiger(new_tiger("a", 0)).await.unwrap();
  let b = s.create_tiger(new_tiger("b", 0)).await.unwrap();
  let alice = user(&s, "alice").await;
  s.insert_sighting(&sighting(a.id, alice, 1.2, 2.2, 0)).await.unwrap();

  let for_b = s.query_sightings(&SightingQuery::for_tiger(b.id)).await.unwrap();
  assert!(for_b.is_empty());
}

#[tokio::test]
async fn radius_filter_uses_great_circle_distance() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("Rajah", 0)).await.unwrap();
  let alice = user(&s, "alice").await;

  // At 60°N one degree of longitude is ~55.6 km: 0.06° is ~3.3 km away,
  // while a planar reading of the degrees would call it ~6.7 km.
  let close = sighting(tiger.id, alice, 60.0, 10.06, 1);
  let far = sighting(tiger.id, alice, 60.1, 10.0, 2);
  s.insert_sighting(&close).await.unwrap();
  s.insert_sighting(&far).await.unwrap();

  let center = GeoPoint::new(60.0, 10.0).unwrap();
  let nearby = geo::find_nearby_sightings(&s, tiger.id, center, Radius::default())
    .await
    .unwrap();
  assert_eq!(nearby, vec![close]);
}

#[tokio::test]
async fn radius_boundary_is_exclusive() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("Rajah", 0)).await.unwrap();
  let alice = user(&s, "alice").await;
  let existing = sighting(tiger.id, alice, 1.2, 2.2, 0);
  s.insert_sighting(&existing).await.unwrap();

  let candidate = GeoPoint::new(1.23, 2.2).unwrap();
  let exact = candidate.distance_to(&existing.point());

  let at_edge = geo::find_nearby_sightings(&s, tiger.id, candidate, Radius::new(exact).unwrap())
    .await
    .unwrap();
  assert!(at_edge.is_empty());

  let past_edge =
    geo::find_nearby_sightings(&s, tiger.id, candidate, Radius::new(exact + 1e-6).unwrap())
      .await
      .unwrap();
  assert_eq!(past_edge.len(), 1);
}

#[tokio::test]
async fn exclude_user_drops_their_sightings() {
  let s = store().await;
  let tiger = s.create_tiger(new_tiger("Rajah", 0)).await.unwrap();
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  s.insert_sighting(&sighting(tiger.id, alice, 1.0, 1.0, 0)).await.unwrap();
  s.insert_sighting(&sighting(tiger.id, bob, 2.0, 2.0, 1)).await.unwrap();

  let others = s
    .query_sightings(&SightingQuery::for_tiger(tiger.id).excluding_user(alice))
    .await
    .unwrap();
  assert_eq!(others.len(), 1);
  assert_eq!(others[0].reported_by_user_id, bob);
}
