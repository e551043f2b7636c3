//! Demo data for the in-memory backend.

use chrono::{Duration, Utc};
use mercato_core::{Coordinates, GeocodeResult, Listing, ListingId, ProfileInfo, UserId, UserRecord};
use mercato_repository::InMemoryMarketplace;
use tracing::info;

struct SeedUser {
    username: &'static str,
    display_name: &'static str,
    location: &'static str,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        username: "alice",
        display_name: "Alice Moreira",
        location: "Porto",
    },
    SeedUser {
        username: "bruno",
        display_name: "Bruno Lima",
        location: "Lisbon",
    },
];

const LISTINGS: &[(&str, &str, i64)] = &[
    ("Road bike, 56cm frame", "sale", 45_000),
    ("Two-bedroom flat near the river", "rental", 120_000),
    ("Guitar lessons for beginners", "service", 2_500),
    ("Vintage record player", "sale", 18_000),
];

const PLACES: &[(&str, f64, f64, &str)] = &[
    ("Porto, Portugal", 41.149_6, -8.611_0, "pt"),
    ("Lisbon, Portugal", 38.722_3, -9.139_3, "pt"),
    ("Porto Alegre, Brazil", -30.034_6, -51.217_7, "br"),
];

/// Fills the backend with a small marketplace.
///
/// Listings are spread over both users and created a day apart, so paging
/// newest-first has a stable order.
pub fn seed_demo_data(backend: &InMemoryMarketplace) {
    let now = Utc::now();

    let owners: Vec<UserId> = USERS
        .iter()
        .map(|seed| {
            let id = UserId::new();
            backend.insert_user(UserRecord {
                id,
                username: seed.username.to_string(),
                email: format!("{}@example.com", seed.username),
                display_name: Some(seed.display_name.to_string()),
                created_at: now,
            });
            backend.insert_profile(ProfileInfo {
                user_id: id,
                display_name: seed.display_name.to_string(),
                bio: None,
                avatar_url: None,
                location: Some(seed.location.to_string()),
                phone: None,
                updated_at: now,
            });
            id
        })
        .collect();

    for (i, (title, listing_type, price_cents)) in LISTINGS.iter().enumerate() {
        let created_at = now - Duration::days(i64::try_from(LISTINGS.len() - i).unwrap_or_default());
        backend.insert_listing(Listing {
            id: ListingId::new(),
            owner_id: owners[i % owners.len()],
            title: (*title).to_string(),
            description: String::new(),
            listing_type: (*listing_type).to_string(),
            price_cents: *price_cents,
            currency: "EUR".to_string(),
            location: Some(USERS[i % USERS.len()].location.to_string()),
            coordinates: None,
            created_at,
            updated_at: created_at,
        });
    }

    for (name, lat, lon, country) in PLACES {
        backend.insert_place(GeocodeResult {
            display_name: (*name).to_string(),
            coordinates: Coordinates::new(*lat, *lon),
            country_code: Some((*country).to_string()),
        });
    }

    info!(
        "Seeded {} users, {} listings and {} places",
        USERS.len(),
        LISTINGS.len(),
        PLACES.len()
    );
}
