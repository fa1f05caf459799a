//! Level-definition loading
//!
//! A level file is a list of `Kind,x,y` rows. `TopLeft` and `BottomRight`
//! rows give the playfield boundary; every other row places one entity.
//! Malformed rows are skipped with a warning. Demon speed, direction and
//! facing are rolled from a seeded RNG so the same seed gives the same level.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Boundary, Direction, EntityKind};
use crate::tuning::Tuning;

/// Fatal level problems
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no boundary (both TopLeft and BottomRight rows are required)")]
    MissingBoundary,
    #[error("level has no player row")]
    MissingPlayer,
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single row was skipped
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),
    #[error("unknown kind {0:?}")]
    UnknownKind(String),
    #[error("bad coordinate {0:?}")]
    BadCoordinate(String),
}

/// Randomized enemy movement parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolParams {
    /// Zero for passive demons
    pub speed: f32,
    pub direction: Direction,
    pub facing_left: bool,
}

impl Default for PatrolParams {
    fn default() -> Self {
        Self {
            speed: 0.0,
            direction: Direction::Right,
            facing_left: false,
        }
    }
}

/// One entity placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Present for demons and Navec
    pub patrol: Option<PatrolParams>,
}

/// A parsed level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub boundary: Boundary,
    /// Player start (first player row)
    pub player: Vec2,
    /// Non-player entities in file order
    pub entities: Vec<EntityDescriptor>,
    pub skipped_rows: usize,
}

enum Row {
    Entity(EntityKind, Vec2),
    TopLeft(Vec2),
    BottomRight(Vec2),
}

fn parse_row(line: &str) -> Result<Row, RowError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [kind, x, y] = fields.as_slice() else {
        return Err(RowError::FieldCount(fields.len()));
    };
    let coord = |s: &str| {
        s.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RowError::BadCoordinate(s.to_string()))
    };
    let pos = Vec2::new(coord(*x)?, coord(*y)?);

    let row = match *kind {
        "Fae" | "Player" => Row::Entity(EntityKind::Player, pos),
        "Wall" => Row::Entity(EntityKind::Wall, pos),
        "Tree" => Row::Entity(EntityKind::Tree, pos),
        "Sinkhole" => Row::Entity(EntityKind::Sinkhole, pos),
        "Demon" => Row::Entity(EntityKind::Demon, pos),
        "Navec" => Row::Entity(EntityKind::Navec, pos),
        "TopLeft" => Row::TopLeft(pos),
        "BottomRight" => Row::BottomRight(pos),
        other => return Err(RowError::UnknownKind(other.to_string())),
    };
    Ok(row)
}

/// Parses level files, rolling enemy parameters from a seeded RNG
#[derive(Debug, Clone)]
pub struct LevelLoader {
    rng: Pcg32,
    speed_min: f32,
    speed_max: f32,
}

impl LevelLoader {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let (lo, hi) = (
            tuning.demon_speed_min.min(tuning.demon_speed_max),
            tuning.demon_speed_min.max(tuning.demon_speed_max),
        );
        Self {
            rng: Pcg32::seed_from_u64(seed),
            speed_min: lo,
            speed_max: hi,
        }
    }

    /// Read and parse a level file
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LevelData, LevelError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading level {}", path.as_ref().display());
        self.parse(&source)
    }

    /// Parse level text
    pub fn parse(&mut self, source: &str) -> Result<LevelData, LevelError> {
        let mut top_left = None;
        let mut bottom_right = None;
        let mut player = None;
        let mut entities = Vec::new();
        let mut skipped_rows = 0;

        for (lineno, line) in source.lines().enumerate() {
            let line = line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() {
                continue;
            }
            let row = match parse_row(line) {
                Ok(row) => row,
                Err(err) => {
                    log::warn!("Skipping level row {}: {} ({:?})", lineno + 1, err, line);
                    skipped_rows += 1;
                    continue;
                }
            };
            match row {
                Row::TopLeft(pos) => top_left = Some(pos),
                Row::BottomRight(pos) => bottom_right = Some(pos),
                Row::Entity(EntityKind::Player, pos) => {
                    if player.is_none() {
                        player = Some(pos);
                    } else {
                        log::warn!("Ignoring extra player row {}", lineno + 1);
                    }
                }
                Row::Entity(kind, pos) => {
                    let patrol = matches!(kind, EntityKind::Demon | EntityKind::Navec)
                        .then(|| self.roll_patrol());
                    entities.push(EntityDescriptor { kind, pos, patrol });
                }
            }
        }

        let (Some(top_left), Some(bottom_right)) = (top_left, bottom_right) else {
            return Err(LevelError::MissingBoundary);
        };
        let player = player.ok_or(LevelError::MissingPlayer)?;

        log::info!(
            "Parsed level: {} entities, {} rows skipped",
            entities.len(),
            skipped_rows
        );
        Ok(LevelData {
            boundary: Boundary::new(top_left, bottom_right),
            player,
            entities,
            skipped_rows,
        })
    }

    /// Half the enemies are aggressive (moving), the rest stand still
    fn roll_patrol(&mut self) -> PatrolParams {
        let aggressive = self.rng.random_bool(0.5);
        let speed = if aggressive {
            self.rng.random_range(self.speed_min..=self.speed_max)
        } else {
            0.0
        };
        let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
        let facing_left = self.rng.random_bool(0.5);
        PatrolParams {
            speed,
            direction,
            facing_left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
Fae,20,380
Wall,100,200
Tree,300,200
Sinkhole,400,400
Demon,600,300
Navec,800,500
TopLeft,0,0
BottomRight,1000,700
";

    fn loader(seed: u64) -> LevelLoader {
        LevelLoader::new(seed, &Tuning::default())
    }

    #[test]
    fn test_parse_full_level() {
        let level = loader(1).parse(LEVEL).unwrap();
        assert_eq!(level.player, Vec2::new(20.0, 380.0));
        assert_eq!(level.boundary.bottom_right, Vec2::new(1000.0, 700.0));
        assert_eq!(level.entities.len(), 5);
        assert_eq!(level.skipped_rows, 0);
        assert_eq!(level.entities[0].kind, EntityKind::Wall);
        assert!(level.entities[0].patrol.is_none());
        assert!(level.entities[3].patrol.is_some());
        assert!(level.entities[4].patrol.is_some());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let source = format!("{LEVEL}Dragon,1,1\nWall,abc,2\nWall,1\n\nTree,5,5\n");
        let level = loader(1).parse(&source).unwrap();
        assert_eq!(level.skipped_rows, 3);
        assert_eq!(level.entities.len(), 6);
        assert_eq!(level.entities[5].kind, EntityKind::Tree);
    }

    #[test]
    fn test_missing_boundary_is_fatal() {
        let err = loader(1).parse("Fae,1,1\nTopLeft,0,0\n").unwrap_err();
        assert!(matches!(err, LevelError::MissingBoundary));
    }

    #[test]
    fn test_missing_player_is_fatal() {
        let err = loader(1)
            .parse("TopLeft,0,0\nBottomRight,10,10\n")
            .unwrap_err();
        assert!(matches!(err, LevelError::MissingPlayer));
    }

    #[test]
    fn test_row_errors() {
        assert_eq!(parse_row("Wall,1").err(), Some(RowError::FieldCount(2)));
        assert_eq!(
            parse_row("Ghost,1,2").err(),
            Some(RowError::UnknownKind("Ghost".to_string()))
        );
        assert_eq!(
            parse_row("Wall,1,NaN").err(),
            Some(RowError::BadCoordinate("NaN".to_string()))
        );
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = loader(42).parse(LEVEL).unwrap();
        let b = loader(42).parse(LEVEL).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_enemy_speeds_in_range() {
        let tuning = Tuning::default();
        let source: String = (0..200).map(|i| format!("Demon,{i},10\n")).collect();
        let source = format!("Fae,0,0\nTopLeft,0,0\nBottomRight,500,500\n{source}");
        let level = LevelLoader::new(7, &tuning).parse(&source).unwrap();

        let speeds: Vec<f32> = level.entities.iter().map(|e| e.patrol.unwrap().speed).collect();
        assert!(speeds.iter().all(|&s| s == 0.0
            || (tuning.demon_speed_min..=tuning.demon_speed_max).contains(&s)));
        // With 200 rolls both passive and aggressive demons show up
        assert!(speeds.iter().any(|&s| s == 0.0));
        assert!(speeds.iter().any(|&s| s > 0.0));
    }
}
