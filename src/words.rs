use rand::seq::IndexedRandom;
use rand::Rng;

/// Secret words handed to civilians
pub const WORDS: &[&str] = &[
    "airport",
    "bakery",
    "beach",
    "castle",
    "cinema",
    "circus",
    "dentist",
    "desert",
    "embassy",
    "farm",
    "fire station",
    "garage",
    "gym",
    "hospital",
    "hotel",
    "jungle",
    "library",
    "lighthouse",
    "museum",
    "night club",
    "office",
    "pirate ship",
    "police station",
    "restaurant",
    "school",
    "space station",
    "stadium",
    "submarine",
    "supermarket",
    "theater",
    "train",
    "university",
    "vineyard",
    "zoo",
];

/// Pick a secret word uniformly at random
pub fn pick_word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("airport")
}
