use rand::seq::SliceRandom;

const GENERIC: &[&str] = &[
    "Just dust bunnies.",
    "Nothing useful here.",
    "Looks insignificant.",
    "Just clutter.",
    "This is not the clue you are looking for.",
    "Just a normal object. Suspiciously normal.",
    "A spider scuttles away.",
    "Red herring.",
    "I wonder who dusted this last?",
    "Keep searching!",
];

const POOLS: &[(&str, &[&str])] = &[
    (
        "lunchbox",
        &[
            "Smells like old egg salad...",
            "An empty juice box and a note from Mom.",
            "Thermos is empty. Tragedy.",
        ],
    ),
    (
        "trash",
        &[
            "Just wadded up drafts of bad poetry.",
            "Candy wrappers and regret.",
            "A receipt for a 'Time Machine'. It's expired.",
        ],
    ),
    (
        "mug",
        &[
            "Stained with years of black coffee.",
            "World's Okayest Archivist.",
            "Cold tea dregs.",
        ],
    ),
    (
        "plant",
        &[
            "It's plastic. Very convincing.",
            "I think it's judging me.",
            "It's seen things.",
        ],
    ),
    (
        "computer",
        &[
            "Blue Screen of Death.",
            "Just a screensaver of flying toasters.",
            "Keyboard is missing the 'Esc' key.",
        ],
    ),
    (
        "filing_cabinet",
        &[
            "Tax returns from 1982.",
            "A file on 'UFO sightings in Duluth'.",
            "Recipes for hotdish.",
        ],
    ),
    (
        "book_cluster",
        &[
            "'History of Lint'. Fascinating.",
            "A hollowed out book! ...Wait, no, just a book.",
            "Dusty old tomes.",
        ],
    ),
    (
        "lamp",
        &["I love lamp.", "Flickering ominously.", "Just a lightbulb moment."],
    ),
    (
        "clock",
        &["Time is ticking.", "Tick... tock...", "Time flies when you're escaping."],
    ),
    (
        "radio",
        &["Playing static.", "It's stuck on the polka station.", "Breaking news: You're still trapped."],
    ),
    (
        "globe",
        &["I can see my house from here!", "Where in the world is Carmen Sandiego?"],
    ),
];

/// A throwaway line for an object with no clue in it. Numbered objects
/// (`filing_cabinet_2`) and lamp variants share a pool.
pub fn flavor_text(location: &str) -> &'static str {
    let pool = POOLS
        .iter()
        .find(|(prefix, _)| location.starts_with(prefix) || location.ends_with(prefix))
        .map(|(_, lines)| *lines)
        .unwrap_or(GENERIC);
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or("Nothing here.")
}

/// `filing_cabinet_2` -> `FILING CABINET 2`
pub fn display_name(location: &str) -> String {
    location.replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_objects_share_a_pool() {
        let line = flavor_text("filing_cabinet_3");
        assert!(POOLS[5].1.contains(&line));
        let line = flavor_text("desk_lamp");
        assert!(POOLS[7].1.contains(&line));
    }

    #[test]
    fn unknown_objects_get_generic_lines() {
        assert!(GENERIC.contains(&flavor_text("fire_extinguisher")));
    }

    #[test]
    fn display_names_are_shouted() {
        assert_eq!(display_name("book_cluster_1"), "BOOK CLUSTER 1");
    }
}
