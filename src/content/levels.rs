//! Level layouts: enemy paths and build slots on the 800x400 plane.

use serde::Serialize;

use crate::geom::Vec2;

/// Definition of one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelDef {
    /// Level number, starting at 1.
    pub id: u32,
    /// Display name.
    pub name: &'static str,
    /// Number of waves that make up the level's content.
    pub waves: u32,
    /// Money at match start.
    pub start_money: u32,
    /// Enemy paths; every path has at least two points.
    pub paths: &'static [&'static [Vec2]],
    /// Fixed coordinates where towers may be built.
    pub build_slots: &'static [Vec2],
}

impl LevelDef {
    /// Where the hero spawns and respawns: the end of the first path.
    #[must_use]
    pub fn hero_return_point(&self) -> Vec2 {
        self.paths
            .first()
            .and_then(|path| path.last())
            .copied()
            .unwrap_or_default()
    }

    /// The build slot at `pos`, if any.
    #[must_use]
    pub fn slot_at(&self, pos: Vec2, tolerance: f64) -> Option<Vec2> {
        self.build_slots
            .iter()
            .copied()
            .find(|slot| slot.distance(pos) <= tolerance)
    }
}

const fn p(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Endless mode: no level ends before wave 9999.
const ENDLESS: u32 = 9999;

/// All levels in order.
pub const LEVELS: [LevelDef; 8] = [
    LevelDef {
        id: 1,
        name: "South Outpost",
        waves: ENDLESS,
        start_money: 750,
        paths: &[
            &[
                p(0.0, 150.0),
                p(100.0, 150.0),
                p(150.0, 100.0),
                p(250.0, 100.0),
                p(300.0, 180.0),
                p(250.0, 300.0),
                p(400.0, 320.0),
                p(500.0, 250.0),
                p(600.0, 250.0),
                p(650.0, 150.0),
                p(800.0, 150.0),
            ],
            &[
                p(0.0, 350.0),
                p(200.0, 350.0),
                p(250.0, 300.0),
                p(400.0, 320.0),
                p(500.0, 250.0),
                p(600.0, 250.0),
                p(650.0, 150.0),
                p(800.0, 150.0),
            ],
        ],
        build_slots: &[
            p(100.0, 220.0),
            p(180.0, 50.0),
            p(300.0, 50.0),
            p(350.0, 250.0),
            p(200.0, 250.0),
            p(450.0, 360.0),
            p(550.0, 180.0),
            p(550.0, 320.0),
            p(650.0, 80.0),
            p(700.0, 220.0),
            p(750.0, 80.0),
            p(50.0, 80.0),
            p(420.0, 150.0),
            p(250.0, 150.0),
            p(350.0, 150.0),
            p(150.0, 300.0),
        ],
    },
    LevelDef {
        id: 2,
        name: "Dustwind Canyon",
        waves: ENDLESS,
        start_money: 900,
        paths: &[
            &[
                p(0.0, 80.0),
                p(200.0, 80.0),
                p(300.0, 130.0),
                p(450.0, 130.0),
                p(550.0, 80.0),
                p(800.0, 80.0),
            ],
            &[
                p(0.0, 320.0),
                p(200.0, 320.0),
                p(300.0, 270.0),
                p(450.0, 270.0),
                p(550.0, 320.0),
                p(800.0, 320.0),
            ],
            &[
                p(0.0, 200.0),
                p(150.0, 200.0),
                p(250.0, 100.0),
                p(450.0, 130.0),
                p(550.0, 250.0),
                p(700.0, 320.0),
                p(800.0, 320.0),
            ],
        ],
        build_slots: &[
            p(100.0, 40.0),
            p(100.0, 150.0),
            p(250.0, 60.0),
            p(250.0, 180.0),
            p(400.0, 60.0),
            p(400.0, 340.0),
            p(550.0, 40.0),
            p(550.0, 150.0),
            p(700.0, 40.0),
            p(700.0, 150.0),
            p(100.0, 250.0),
            p(100.0, 370.0),
            p(250.0, 350.0),
            p(550.0, 250.0),
            p(550.0, 370.0),
            p(700.0, 250.0),
            p(700.0, 370.0),
            p(350.0, 200.0),
        ],
    },
    LevelDef {
        id: 3,
        name: "Frosthold Keep",
        waves: ENDLESS,
        start_money: 850,
        paths: &[
            &[p(0.0, 100.0), p(300.0, 100.0), p(400.0, 200.0), p(800.0, 200.0)],
            &[p(0.0, 300.0), p(300.0, 300.0), p(400.0, 200.0), p(800.0, 200.0)],
            &[
                p(0.0, 50.0),
                p(200.0, 50.0),
                p(500.0, 50.0),
                p(600.0, 150.0),
                p(600.0, 250.0),
                p(800.0, 200.0),
            ],
        ],
        build_slots: &[
            p(150.0, 50.0),
            p(150.0, 150.0),
            p(150.0, 250.0),
            p(150.0, 350.0),
            p(350.0, 150.0),
            p(350.0, 250.0),
            p(500.0, 150.0),
            p(500.0, 250.0),
            p(650.0, 150.0),
            p(650.0, 250.0),
            p(300.0, 50.0),
            p(550.0, 80.0),
        ],
    },
    LevelDef {
        id: 4,
        name: "Inferno Crater",
        waves: ENDLESS,
        start_money: 1000,
        paths: &[
            &[
                p(0.0, 50.0),
                p(150.0, 50.0),
                p(150.0, 350.0),
                p(650.0, 350.0),
                p(650.0, 50.0),
                p(800.0, 50.0),
            ],
            &[
                p(0.0, 150.0),
                p(100.0, 200.0),
                p(400.0, 200.0),
                p(700.0, 200.0),
                p(800.0, 150.0),
            ],
        ],
        build_slots: &[
            p(50.0, 120.0),
            p(250.0, 120.0),
            p(250.0, 280.0),
            p(400.0, 280.0),
            p(550.0, 280.0),
            p(550.0, 120.0),
            p(400.0, 200.0),
            p(400.0, 120.0),
        ],
    },
    LevelDef {
        id: 5,
        name: "Void Nexus",
        waves: ENDLESS,
        start_money: 1200,
        paths: &[
            &[
                p(0.0, 50.0),
                p(200.0, 50.0),
                p(400.0, 200.0),
                p(600.0, 350.0),
                p(800.0, 350.0),
            ],
            &[p(0.0, 100.0), p(300.0, 100.0), p(500.0, 300.0), p(800.0, 300.0)],
            &[p(0.0, 300.0), p(300.0, 300.0), p(500.0, 100.0), p(800.0, 100.0)],
        ],
        build_slots: &[
            p(100.0, 50.0),
            p(300.0, 50.0),
            p(500.0, 50.0),
            p(700.0, 50.0),
            p(100.0, 300.0),
            p(300.0, 300.0),
            p(500.0, 300.0),
            p(700.0, 300.0),
            p(200.0, 200.0),
            p(400.0, 200.0),
            p(600.0, 200.0),
            p(400.0, 100.0),
            p(400.0, 300.0),
        ],
    },
    LevelDef {
        id: 6,
        name: "Toxic Swamp",
        waves: ENDLESS,
        start_money: 1100,
        paths: &[&[
            p(0.0, 200.0),
            p(100.0, 100.0),
            p(200.0, 300.0),
            p(300.0, 100.0),
            p(400.0, 300.0),
            p(500.0, 100.0),
            p(600.0, 300.0),
            p(700.0, 100.0),
            p(800.0, 200.0),
        ]],
        build_slots: &[
            p(100.0, 200.0),
            p(200.0, 200.0),
            p(300.0, 200.0),
            p(400.0, 200.0),
            p(500.0, 200.0),
            p(600.0, 200.0),
            p(700.0, 200.0),
            p(150.0, 50.0),
            p(350.0, 50.0),
            p(550.0, 50.0),
            p(250.0, 350.0),
            p(450.0, 350.0),
            p(650.0, 350.0),
        ],
    },
    LevelDef {
        id: 7,
        name: "Golden Ruins",
        waves: ENDLESS,
        start_money: 1300,
        paths: &[
            &[
                p(0.0, 100.0),
                p(200.0, 100.0),
                p(400.0, 200.0),
                p(600.0, 300.0),
                p(800.0, 300.0),
            ],
            &[
                p(0.0, 300.0),
                p(200.0, 300.0),
                p(400.0, 200.0),
                p(600.0, 100.0),
                p(800.0, 100.0),
            ],
        ],
        build_slots: &[
            p(400.0, 100.0),
            p(400.0, 300.0),
            p(200.0, 200.0),
            p(600.0, 200.0),
            p(100.0, 50.0),
            p(100.0, 350.0),
            p(700.0, 50.0),
            p(700.0, 350.0),
            p(300.0, 150.0),
            p(500.0, 150.0),
            p(300.0, 250.0),
            p(500.0, 250.0),
        ],
    },
    LevelDef {
        id: 8,
        name: "Storm Summit",
        waves: ENDLESS,
        start_money: 1500,
        paths: &[
            &[p(0.0, 50.0), p(400.0, 50.0), p(600.0, 200.0), p(800.0, 200.0)],
            &[p(0.0, 200.0), p(300.0, 200.0), p(600.0, 200.0), p(800.0, 200.0)],
            &[p(0.0, 350.0), p(400.0, 350.0), p(600.0, 200.0), p(800.0, 200.0)],
        ],
        build_slots: &[
            p(200.0, 125.0),
            p(400.0, 125.0),
            p(200.0, 275.0),
            p(400.0, 275.0),
            p(500.0, 100.0),
            p(500.0, 300.0),
            p(650.0, 100.0),
            p(650.0, 300.0),
            p(100.0, 100.0),
            p(100.0, 300.0),
            p(700.0, 200.0),
        ],
    },
];

/// Look up a level by its id.
#[must_use]
pub fn level(id: u32) -> Option<&'static LevelDef> {
    LEVELS.iter().find(|l| l.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_path_has_a_segment() {
        for level in &LEVELS {
            assert!(!level.paths.is_empty(), "level {} has no paths", level.id);
            for path in level.paths {
                assert!(path.len() >= 2, "level {} has a degenerate path", level.id);
            }
            assert!(!level.build_slots.is_empty());
        }
    }

    #[test]
    fn test_hero_return_point_is_end_of_first_path() {
        let l1 = level(1).unwrap();
        assert_eq!(l1.hero_return_point(), Vec2::new(800.0, 150.0));
        let l4 = level(4).unwrap();
        assert_eq!(l4.hero_return_point(), Vec2::new(800.0, 50.0));
    }

    #[test]
    fn test_slot_lookup() {
        let l1 = level(1).unwrap();
        assert_eq!(l1.slot_at(Vec2::new(101.0, 221.0), 5.0), Some(Vec2::new(100.0, 220.0)));
        assert_eq!(l1.slot_at(Vec2::new(0.0, 0.0), 5.0), None);
    }

    #[test]
    fn test_unknown_level() {
        assert!(level(0).is_none());
        assert!(level(9).is_none());
        assert_eq!(level(8).unwrap().start_money, 1500);
    }
}
