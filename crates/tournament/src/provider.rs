//! Entity providers and roster assembly.
//!
//! The tournament only needs complete entities. Where they come from is a
//! provider's business: a fixture file, a generator, or anything else that
//! implements [`EntityProvider`]. A fetch that fails or yields malformed data
//! marks that id as unavailable and roster selection moves on.

use creature_core::{capitalize, Entity, RawEntityRecord, Stat, STANDARD_TAGS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::ProviderError;

/// Source of raw creature records, addressed by numeric id.
pub trait EntityProvider {
    fn fetch(&mut self, id: u32) -> Result<RawEntityRecord, ProviderError>;

    /// Short name for log output.
    fn name(&self) -> &str {
        "provider"
    }
}

/// Pick `count` distinct ids from `id_range` at random and fetch them.
///
/// Ids that fail to fetch or validate are skipped and never retried. The
/// returned roster is in selection order.
///
/// # Errors
/// `Shortfall` if the range runs out of ids before `count` entities were
/// assembled.
pub fn select_roster<P, R>(
    provider: &mut P,
    count: usize,
    id_range: RangeInclusive<u32>,
    rng: &mut R,
) -> Result<Vec<Entity>, ProviderError>
where
    P: EntityProvider + ?Sized,
    R: Rng + ?Sized,
{
    let (min, max) = (*id_range.start(), *id_range.end());
    // number of ids in the range; 0 when it is empty
    let span = if min <= max {
        u64::from(max - min) + 1
    } else {
        0
    };

    let mut roster = Vec::with_capacity(count);
    let mut tried: HashSet<u32> = HashSet::new();
    while roster.len() < count && (tried.len() as u64) < span {
        let id = rng.gen_range(min..=max);
        if !tried.insert(id) {
            continue;
        }
        match fetch_entity(provider, id) {
            Ok(entity) => {
                debug!(id, name = entity.name(), "selected entity");
                roster.push(entity);
            }
            Err(err) => warn!(id, provider = provider.name(), error = %err, "entity unavailable"),
        }
    }

    if roster.len() < count {
        return Err(ProviderError::Shortfall {
            requested: count,
            found: roster.len(),
            min,
            max,
        });
    }
    info!(count, provider = provider.name(), "roster assembled");
    Ok(roster)
}

/// Fetch and validate a single entity.
pub fn fetch_entity<P>(provider: &mut P, id: u32) -> Result<Entity, ProviderError>
where
    P: EntityProvider + ?Sized,
{
    let record = provider.fetch(id)?;
    Entity::from_record(record).map_err(|err| ProviderError::Unavailable {
        id,
        reason: err.to_string(),
    })
}

// =============================================================================
// Fixture files
// =============================================================================

/// Creature-API payload shape: `types[].type.name`, `stats[].stat.name`, ...
#[derive(Debug, Deserialize)]
struct ApiPayload {
    id: u32,
    name: String,
    #[serde(default)]
    types: Vec<ApiTypeSlot>,
    stats: Vec<ApiStat>,
    #[serde(default)]
    sprites: Option<ApiSprites>,
}

#[derive(Debug, Deserialize)]
struct ApiTypeSlot {
    #[serde(default)]
    slot: u32,
    #[serde(rename = "type")]
    kind: ApiNamed,
}

#[derive(Debug, Deserialize)]
struct ApiStat {
    base_stat: f64,
    stat: ApiNamed,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiSprites {
    front_default: Option<String>,
}

impl From<ApiPayload> for RawEntityRecord {
    fn from(payload: ApiPayload) -> Self {
        let mut types = payload.types;
        types.sort_by_key(|t| t.slot);
        RawEntityRecord {
            id: Some(payload.id),
            name: Some(capitalize(&payload.name)),
            tags: types.into_iter().map(|t| t.kind.name).collect(),
            attributes: Some(
                payload
                    .stats
                    .into_iter()
                    .map(|s| (s.stat.name, s.base_stat))
                    .collect(),
            ),
            visual_ref: payload.sprites.and_then(|s| s.front_default),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Api(ApiPayload),
    Record(RawEntityRecord),
}

/// Provider backed by a JSON array of records loaded up front.
///
/// Elements may be plain records (`id`, `name`, `tags`, `attributes`,
/// `visual_ref`) or creature-API payloads; both can be mixed in one file.
/// Records without an id cannot be addressed and are dropped at load time.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    records: HashMap<u32, RawEntityRecord>,
}

impl FixtureProvider {
    /// Later records replace earlier ones with the same id.
    pub fn from_records(records: impl IntoIterator<Item = RawEntityRecord>) -> Self {
        let mut by_id = HashMap::new();
        for record in records {
            let Some(id) = record.id else { continue };
            if by_id.insert(id, record).is_some() {
                warn!(id, "duplicate id in fixture, keeping the later record");
            }
        }
        Self { records: by_id }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<FixtureEntry> = serde_json::from_str(json)?;
        Ok(Self::from_records(entries.into_iter().map(|e| match e {
            FixtureEntry::Api(payload) => payload.into(),
            FixtureEntry::Record(record) => record,
        })))
    }

    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents).map_err(|source| ProviderError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest id in the fixture.
    pub fn id_bounds(&self) -> Option<RangeInclusive<u32>> {
        let min = self.records.keys().min()?;
        let max = self.records.keys().max()?;
        Some(*min..=*max)
    }
}

impl EntityProvider for FixtureProvider {
    fn fetch(&mut self, id: u32) -> Result<RawEntityRecord, ProviderError> {
        self.records
            .get(&id)
            .cloned()
            .ok_or_else(|| ProviderError::Unavailable {
                id,
                reason: "not present in fixture".to_string(),
            })
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

// =============================================================================
// Generated creatures
// =============================================================================

const SYLLABLES: [&str; 16] = [
    "pi", "ka", "bul", "ba", "char", "squir", "mew", "zu", "go", "dra", "ni", "tor", "chu", "saur",
    "tle", "lee",
];

/// Deterministic synthetic creatures.
///
/// The same seed and id always produce the same creature, independent of
/// fetch order.
#[derive(Debug, Clone)]
pub struct GeneratedProvider {
    seed: u64,
    stat_range: RangeInclusive<u32>,
}

impl GeneratedProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            stat_range: 20..=150,
        }
    }

    pub fn with_stat_range(mut self, stat_range: RangeInclusive<u32>) -> Self {
        self.stat_range = stat_range;
        self
    }

    fn creature_name(rng: &mut ChaCha8Rng) -> String {
        let parts = rng.gen_range(2..=3);
        let mut raw = String::new();
        for _ in 0..parts {
            if let Some(syllable) = SYLLABLES.choose(rng) {
                raw.push_str(syllable);
            }
        }
        capitalize(&raw)
    }
}

impl EntityProvider for GeneratedProvider {
    fn fetch(&mut self, id: u32) -> Result<RawEntityRecord, ProviderError> {
        let stream = u64::from(id).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ stream);

        let tag_count = if rng.gen_bool(0.4) { 2 } else { 1 };
        let tags: Vec<String> = STANDARD_TAGS
            .choose_multiple(&mut rng, tag_count)
            .map(|t| t.to_string())
            .collect();

        let attributes: BTreeMap<String, f64> = Stat::ALL
            .iter()
            .map(|stat| {
                let value = rng.gen_range(self.stat_range.clone());
                (stat.key().to_string(), f64::from(value))
            })
            .collect();

        Ok(RawEntityRecord {
            id: Some(id),
            name: Some(Self::creature_name(&mut rng)),
            tags,
            attributes: Some(attributes),
            visual_ref: None,
        })
    }

    fn name(&self) -> &str {
        "generated"
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
