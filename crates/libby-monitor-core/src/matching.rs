// Title matching between watchlist entries and catalogue results

use libby_monitor_models::CatalogueItem;

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Case-insensitive substring match in either direction.
///
/// "Dune" matches "Dune Messiah" and "The Hobbit" matches "hobbit". Very short
/// watched titles can match unrelated results; that trade-off is accepted.
pub fn title_matches(watched: &str, result: &str) -> bool {
    let a = normalize(watched);
    let b = normalize(result);
    a.contains(&b) || b.contains(&a)
}

/// A result counts as found only when the title matches and the library owns
/// it. Availability does not matter here.
pub fn is_genuine_match(watched: &str, item: &CatalogueItem) -> bool {
    item.is_owned && title_matches(watched, &item.title)
}

/// First genuine match in catalogue order
pub fn find_genuine_match<'a>(watched: &str, items: &'a [CatalogueItem]) -> Option<&'a CatalogueItem> {
    items.iter().find(|item| is_genuine_match(watched, item))
}
