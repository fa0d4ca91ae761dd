//! Seeded in-memory store for offline browsing.

use bizboard_lib::model::Record;
use bizboard_lib::store::MemoryStore;

const BUSINESSES: [&str; 12] = [
    "Acme Plumbing",
    "Bluebonnet Bakery",
    "Cedar Ridge Auto",
    "Delta Lawn Care",
    "Evergreen Cleaners",
    "Falcon Electric",
    "Golden Gate Florist",
    "Harbor Light Cafe",
    "Ironwood Welding",
    "Juniper Salon",
    "Keystone Roofing",
    "Lakeside Realty",
];

const OWNERS: [&str; 8] = [
    "Maria Garcia",
    "James Smith",
    "Wei Chen",
    "Aisha Johnson",
    "Liam O'Brien",
    "Priya Patel",
    "Carlos Rivera",
    "Emma Wilson",
];

const CITIES: [(&str, &str); 10] = [
    ("Austin", "TX"),
    ("Houston", "TX"),
    ("Dallas", "TX"),
    ("Los Angeles", "CA"),
    ("San Diego", "CA"),
    ("Miami", "FL"),
    ("Orlando", "FL"),
    ("Seattle", "WA"),
    ("Spokane", "WA"),
    ("Albany", "NY"),
];

/// Builds a store of sample business records.
///
/// The data is deterministic so repeated demo sessions paginate
/// identically; roughly a quarter of the records have no phone number.
pub fn store() -> MemoryStore {
    let mut records = Vec::new();
    for i in 0..57usize {
        let business = BUSINESSES[i % BUSINESSES.len()];
        let (city, state) = CITIES[i * 3 % CITIES.len()];
        let mut record = Record::new()
            .set(
                "Business Name",
                if i < BUSINESSES.len() {
                    business.to_string()
                } else {
                    format!("{business} #{}", i / BUSINESSES.len() + 1)
                },
            )
            .set("Owner Name", OWNERS[i * 5 % OWNERS.len()])
            .set("City", city)
            .set("State", state);
        if i % 4 != 0 {
            record.insert("Mobile Number", format!("555-{:04}", 1000 + i * 7));
        }
        records.push(record);
    }
    MemoryStore::new(records)
}
