//! Candidate grid provider boundary.
//!
//! External generators (a text-completion service, a level editor, a test
//! fixture) propose a level as loosely structured JSON. This module is
//! the strict parse step between that data and the grid model: raw
//! payloads either decode into the closed [`CellKind`] enumeration with
//! the exact requested dimensions, or they are rejected whole. Nothing is
//! coerced, so the healer and pathfinder only ever see well-typed grids.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::generation::GenConstraints;
use crate::grid::{CellKind, EntityKind, EntityPlacement, LevelResult, Room, TileGrid};

/// What the orchestrator asks a provider for
#[derive(Debug, Clone)]
pub struct CandidateRequest {
    pub theme: String,
    pub depth: i32,
    pub constraints: GenConstraints,
}

/// An external source of candidate grids
///
/// Implementations own their transport, prompting, and auth. The one
/// contract: return a parsed [`CandidateLevel`] or a [`ProviderError`];
/// the orchestrator treats any error as "use the procedural fallback".
pub trait CandidateProvider {
    fn propose(&mut self, request: &CandidateRequest) -> Result<CandidateLevel, ProviderError>;
}

/// A structurally valid candidate, ready for healing
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLevel {
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub entities: Vec<EntityPlacement>,
}

impl From<CandidateLevel> for LevelResult {
    fn from(candidate: CandidateLevel) -> Self {
        LevelResult {
            grid: candidate.grid,
            rooms: candidate.rooms,
            entities: candidate.entities,
        }
    }
}

/// Wire shape of a candidate payload
#[derive(Debug, Deserialize)]
struct RawCandidate {
    grid: Vec<Vec<u8>>,
    #[serde(default)]
    rooms: Vec<RawRoom>,
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawRoom {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    kind: EntityKind,
    x: usize,
    y: usize,
    count: u32,
}

impl CandidateLevel {
    /// Parse and validate a raw JSON payload against the constraints
    ///
    /// Rejects wrong outer dimensions, ragged rows, cell codes outside
    /// the enumeration, out-of-bounds or overlapping rooms, and
    /// out-of-bounds entities.
    pub fn from_json(payload: &str, constraints: &GenConstraints) -> Result<Self, ProviderError> {
        let raw: RawCandidate =
            serde_json::from_str(payload).map_err(|e| ProviderError::Schema(e.to_string()))?;
        Self::from_raw(raw, constraints)
    }

    fn from_raw(raw: RawCandidate, constraints: &GenConstraints) -> Result<Self, ProviderError> {
        let want_width = constraints.width;
        let want_height = constraints.height;

        let got_height = raw.grid.len();
        let got_width = raw.grid.first().map_or(0, Vec::len);
        if got_height != want_height
            || got_width != want_width
            || raw.grid.iter().any(|row| row.len() != want_width)
        {
            return Err(ProviderError::Dimensions {
                got_width,
                got_height,
                want_width,
                want_height,
            });
        }

        let mut cells = Vec::with_capacity(want_width * want_height);
        for (y, row) in raw.grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let kind = CellKind::from_code(code)
                    .ok_or(ProviderError::InvalidCell { code, x, y })?;
                cells.push(kind);
            }
        }
        let grid = TileGrid::from_cells(want_width, want_height, cells);

        let mut rooms = Vec::with_capacity(raw.rooms.len());
        for (index, r) in raw.rooms.iter().enumerate() {
            let room = Room::new(r.x, r.y, r.width, r.height);
            if !room.fits_within(want_width, want_height)
                || rooms.iter().any(|other| room.overlaps(other, 0))
            {
                return Err(ProviderError::InvalidRoom { index });
            }
            rooms.push(room);
        }

        let mut entities = Vec::with_capacity(raw.entities.len());
        for (index, e) in raw.entities.iter().enumerate() {
            if !grid.in_bounds(e.x, e.y) {
                return Err(ProviderError::InvalidEntity { index });
            }
            entities.push(EntityPlacement {
                kind: e.kind,
                x: e.x,
                y: e.y,
                count: e.count,
            });
        }

        Ok(Self {
            grid,
            rooms,
            entities,
        })
    }
}

/// Deterministic provider serving a fixed payload
///
/// Doubles as the test stand-in for a flaky external service: built with
/// [`StaticProvider::failing`] it errors on every call.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    payload: Option<String>,
    pub calls: usize,
}

impl StaticProvider {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            calls: 0,
        }
    }

    /// A provider that always fails with a transport error
    pub fn failing() -> Self {
        Self {
            payload: None,
            calls: 0,
        }
    }
}

impl CandidateProvider for StaticProvider {
    fn propose(&mut self, request: &CandidateRequest) -> Result<CandidateLevel, ProviderError> {
        self.calls += 1;
        match &self.payload {
            Some(payload) => CandidateLevel::from_json(payload, &request.constraints),
            None => Err(ProviderError::Transport("static provider configured to fail".into())),
        }
    }
}
