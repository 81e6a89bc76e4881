//! Penalty catalog for missed days.

use rand::Rng;

/// Penalties used when the configuration does not name any.
pub const DEFAULT_PENALTIES: [&str; 4] = [
    "No phone for 1 day",
    "100 burpees",
    "Squat hold for 3 mins",
    "Plank hold for 3 mins",
];

pub fn default_catalog() -> Vec<String> {
    DEFAULT_PENALTIES.iter().map(|p| p.to_string()).collect()
}

/// Pick one penalty uniformly at random. `None` for an empty catalog.
pub fn pick<'a, R: Rng + ?Sized>(catalog: &'a [String], rng: &mut R) -> Option<&'a str> {
    if catalog.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..catalog.len());
    Some(catalog[idx].as_str())
}
