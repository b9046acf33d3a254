//! Static entity definition tables
//!
//! Tables are immutable and process-wide. Picking by index wraps around the
//! table length, so an unbounded spawn count maps onto a finite type set.

/// A collectible type: what it's worth and how far it moves the goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectibleDef {
    pub key: &'static str,
    pub label: &'static str,
    pub score: u32,
    /// Progress gained on pickup (0 where progress is distance-based)
    pub progress: f32,
}

/// A hazard (contaminant) type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardDef {
    pub key: &'static str,
    /// Progress change on contact with the player (<= 0)
    pub progress: f32,
    /// Horizontal drift speed (px/s); 0 for falling hazards
    pub speed: f32,
    pub hit_points: u8,
    /// Score awarded for a kill (stomp or projectile)
    pub bonus: u32,
}

/// Falling good items in the catcher variant
pub static CATCHER_GOOD: [CollectibleDef; 8] = [
    CollectibleDef { key: "water-drop", label: "Water drop", score: 5, progress: 4.0 },
    CollectibleDef { key: "water-bottle", label: "Clean water", score: 10, progress: 6.0 },
    CollectibleDef { key: "glass-water", label: "Drinking water", score: 8, progress: 5.0 },
    CollectibleDef { key: "fish", label: "Marine life", score: 12, progress: 7.0 },
    CollectibleDef { key: "tree", label: "Ecosystem", score: 10, progress: 6.0 },
    CollectibleDef { key: "recycle", label: "Recycling", score: 15, progress: 8.0 },
    CollectibleDef { key: "shower", label: "Sanitation", score: 8, progress: 5.0 },
    CollectibleDef { key: "herb", label: "Nature", score: 6, progress: 4.0 },
];

/// Falling bad items in the catcher variant
pub static CATCHER_BAD: [HazardDef; 5] = [
    HazardDef { key: "bacteria1", progress: -3.0, speed: 0.0, hit_points: 1, bonus: 0 },
    HazardDef { key: "bacteria2", progress: -3.0, speed: 0.0, hit_points: 1, bonus: 0 },
    HazardDef { key: "skull", progress: -5.0, speed: 0.0, hit_points: 1, bonus: 0 },
    HazardDef { key: "poop", progress: -4.0, speed: 0.0, hit_points: 1, bonus: 0 },
    HazardDef { key: "factory", progress: -6.0, speed: 0.0, hit_points: 1, bonus: 0 },
];

/// Collectibles placed along the side-scrolling levels
pub static LEVEL_COLLECTIBLES: [CollectibleDef; 10] = [
    CollectibleDef { key: "water-bottle", label: "Clean water", score: 15, progress: 0.0 },
    CollectibleDef { key: "water-drop", label: "Water drop", score: 10, progress: 0.0 },
    CollectibleDef { key: "glass-water", label: "Drinking water", score: 10, progress: 0.0 },
    CollectibleDef { key: "fish", label: "Marine life", score: 20, progress: 0.0 },
    CollectibleDef { key: "tree", label: "Ecosystem", score: 15, progress: 0.0 },
    CollectibleDef { key: "globe", label: "Planet", score: 25, progress: 0.0 },
    CollectibleDef { key: "recycle", label: "Recycling", score: 20, progress: 0.0 },
    CollectibleDef { key: "shower", label: "Sanitation", score: 10, progress: 0.0 },
    CollectibleDef { key: "herb", label: "Nature", score: 10, progress: 0.0 },
    CollectibleDef { key: "whale", label: "Biodiversity", score: 30, progress: 0.0 },
];

/// Contaminants roaming the side-scrolling levels
pub static CONTAMINANTS: [HazardDef; 5] = [
    HazardDef { key: "bacteria1", progress: 0.0, speed: 60.0, hit_points: 1, bonus: 10 },
    HazardDef { key: "bacteria2", progress: 0.0, speed: 40.0, hit_points: 2, bonus: 20 },
    HazardDef { key: "skull", progress: 0.0, speed: 80.0, hit_points: 1, bonus: 15 },
    HazardDef { key: "poop", progress: 0.0, speed: 50.0, hit_points: 1, bonus: 10 },
    HazardDef { key: "factory", progress: 0.0, speed: 30.0, hit_points: 3, bonus: 30 },
];

/// Cyclic lookup: `table[index mod len]`
///
/// Panics on an empty table; every table in this module is non-empty.
pub fn cyclic<T>(table: &'static [T], index: usize) -> &'static T {
    &table[index % table.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_wraps() {
        assert_eq!(cyclic(&CONTAMINANTS, 0).key, "bacteria1");
        assert_eq!(cyclic(&CONTAMINANTS, 5).key, "bacteria1");
        assert_eq!(cyclic(&CONTAMINANTS, 9).key, "factory");
        assert_eq!(cyclic(&LEVEL_COLLECTIBLES, 19).key, "whale");
    }

    #[test]
    fn test_table_invariants() {
        assert!(CATCHER_GOOD.iter().all(|d| d.score > 0 && d.progress > 0.0));
        assert!(CATCHER_BAD.iter().all(|d| d.progress < 0.0 && d.hit_points == 1));
        assert!(CONTAMINANTS.iter().all(|d| d.hit_points >= 1 && d.speed > 0.0));
    }
}
