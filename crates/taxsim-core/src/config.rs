//! Configuration surface for similarity computations.
//!
//! Algorithm selection is enum dispatch: unknown mode names are rejected when
//! a string is parsed, never at call time inside a worker. The accepted tokens
//! are the exact mode names consumed per call:
//!
//! - `ic_mode`: `levels`, `content-based`
//! - `cs_mode`: `wu_palmer`, `li`, `simple_wu_palmer`, `leacock_chodorow`,
//!   `nguyen_almubaid`, `batet`
//! - `setsim_mode`: `jaccard`, `dice`, `cosine`, `overlap`, `mean_cs`,
//!   `hierarchical`, `bipartite_matching`
//! - `worker_count`: a positive integer or `auto`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TaxsimError, TaxsimResult};

/// Information-content policy.
///
/// Converts a concept's hierarchy position into a scalar specificity score;
/// deeper or rarer concepts score higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IcMode {
    /// IC equals tree depth (root = 0).
    #[default]
    Levels,
    /// IC derived from the fraction of taxonomy leaves the concept subsumes,
    /// log-scaled; root IC = 0.
    ContentBased,
}

impl IcMode {
    /// The mode name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            IcMode::Levels => "levels",
            IcMode::ContentBased => "content-based",
        }
    }
}

impl fmt::Display for IcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IcMode {
    type Err = TaxsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "levels" => Ok(IcMode::Levels),
            "content-based" => Ok(IcMode::ContentBased),
            other => Err(TaxsimError::invalid_config(format!(
                "unsupported ic_mode '{other}'"
            ))),
        }
    }
}

/// Pairwise concept-similarity algorithm.
///
/// Similarity-style modes return higher values for more similar concepts;
/// distance-style modes ([`CsMode::NguyenAlmubaid`], [`CsMode::Batet`]) return
/// higher values for more different concepts. Callers must know which
/// semantics a mode carries; the module does not normalize between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsMode {
    /// `2·ic(lca) / (ic(c1)+ic(c2))`, similarity in 0..1.
    #[default]
    WuPalmer,
    /// `exp(0.2·(ic1+ic2-2·icLca)) · tanh(0.6·icLca)`, similarity.
    Li,
    /// `1 - (D - ic(lca))/D` over tree depth `D`; valid only under
    /// [`IcMode::Levels`].
    SimpleWuPalmer,
    /// `-ln((ic1+ic2-2·icLca+1) / (2·maxIc))`, similarity.
    LeacockChodorow,
    /// Path-length distance scaled by LCA height; always computed over tree
    /// levels regardless of the IC policy.
    NguyenAlmubaid,
    /// Inclusive-ancestor overlap distance; defines no self-comparison.
    Batet,
}

impl CsMode {
    /// The mode name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            CsMode::WuPalmer => "wu_palmer",
            CsMode::Li => "li",
            CsMode::SimpleWuPalmer => "simple_wu_palmer",
            CsMode::LeacockChodorow => "leacock_chodorow",
            CsMode::NguyenAlmubaid => "nguyen_almubaid",
            CsMode::Batet => "batet",
        }
    }

    /// True for modes whose values grow with dissimilarity.
    ///
    /// Bipartite matching minimizes total weight for these modes and
    /// maximizes it for similarity-style modes.
    pub fn is_distance(&self) -> bool {
        matches!(self, CsMode::NguyenAlmubaid | CsMode::Batet)
    }

    /// The defined value of comparing a concept with itself, if any.
    ///
    /// Similarity-style modes self-compare at 1.0, distance-style at 0.0.
    /// `batet` has no defined self-comparison and returns `None`.
    pub fn self_comparison(&self) -> Option<f64> {
        match self {
            CsMode::WuPalmer | CsMode::Li | CsMode::SimpleWuPalmer | CsMode::LeacockChodorow => {
                Some(1.0)
            }
            CsMode::NguyenAlmubaid => Some(0.0),
            CsMode::Batet => None,
        }
    }

    /// True if the mode only supports the `levels` IC policy.
    pub fn requires_levels_ic(&self) -> bool {
        matches!(self, CsMode::SimpleWuPalmer)
    }
}

impl fmt::Display for CsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CsMode {
    type Err = TaxsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wu_palmer" => Ok(CsMode::WuPalmer),
            "li" => Ok(CsMode::Li),
            "simple_wu_palmer" => Ok(CsMode::SimpleWuPalmer),
            "leacock_chodorow" => Ok(CsMode::LeacockChodorow),
            "nguyen_almubaid" => Ok(CsMode::NguyenAlmubaid),
            "batet" => Ok(CsMode::Batet),
            other => Err(TaxsimError::invalid_config(format!(
                "unsupported cs_mode '{other}'"
            ))),
        }
    }
}

/// Set-similarity algorithm over two concept-sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetSimMode {
    /// `|S1∩S2| / |S1∪S2|`.
    #[default]
    Jaccard,
    /// `2·|S1∩S2| / (|S1|+|S2|)`.
    Dice,
    /// `|S1∩S2| / sqrt(|S1|·|S2|)`.
    Cosine,
    /// `|S1∩S2| / min(|S1|,|S2|)`.
    Overlap,
    /// Mean pairwise CS over the full cross product.
    MeanCs,
    /// Symmetric-difference distance normalized by the union size.
    Hierarchical,
    /// Optimal one-to-one assignment via the Hungarian algorithm.
    BipartiteMatching,
}

impl SetSimMode {
    /// The mode name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            SetSimMode::Jaccard => "jaccard",
            SetSimMode::Dice => "dice",
            SetSimMode::Cosine => "cosine",
            SetSimMode::Overlap => "overlap",
            SetSimMode::MeanCs => "mean_cs",
            SetSimMode::Hierarchical => "hierarchical",
            SetSimMode::BipartiteMatching => "bipartite_matching",
        }
    }

    /// True for measures that evaluate pairwise concept similarity; the
    /// trivial overlap measures only count shared codes.
    pub fn uses_concept_similarity(&self) -> bool {
        matches!(
            self,
            SetSimMode::MeanCs | SetSimMode::Hierarchical | SetSimMode::BipartiteMatching
        )
    }
}

impl fmt::Display for SetSimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetSimMode {
    type Err = TaxsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jaccard" => Ok(SetSimMode::Jaccard),
            "dice" => Ok(SetSimMode::Dice),
            "cosine" => Ok(SetSimMode::Cosine),
            "overlap" => Ok(SetSimMode::Overlap),
            "mean_cs" => Ok(SetSimMode::MeanCs),
            "hierarchical" => Ok(SetSimMode::Hierarchical),
            "bipartite_matching" => Ok(SetSimMode::BipartiteMatching),
            other => Err(TaxsimError::invalid_config(format!(
                "unsupported setsim_mode '{other}'"
            ))),
        }
    }
}

/// Worker pool size for the matrix engine.
///
/// `Auto` resolves to the machine's available parallelism at computation
/// time; a fixed count of 1 selects the sequential path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkerCount {
    /// Use `std::thread::available_parallelism()` (1 if unavailable).
    #[default]
    Auto,
    /// Use exactly this many workers; must be at least 1.
    Fixed(usize),
}

impl WorkerCount {
    /// Resolve to a concrete worker count, always at least 1.
    pub fn resolve(&self) -> usize {
        match self {
            WorkerCount::Auto => std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            WorkerCount::Fixed(n) => (*n).max(1),
        }
    }

    fn validate(&self) -> TaxsimResult<()> {
        if let WorkerCount::Fixed(0) = self {
            return Err(TaxsimError::invalid_config(
                "worker_count must be at least 1",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerCount::Auto => f.write_str("auto"),
            WorkerCount::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for WorkerCount {
    type Err = TaxsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            return Ok(WorkerCount::Auto);
        }
        let n: usize = s.parse().map_err(|_| {
            TaxsimError::invalid_config(format!(
                "worker_count must be a positive integer or 'auto', got '{s}'"
            ))
        })?;
        if n == 0 {
            return Err(TaxsimError::invalid_config(
                "worker_count must be at least 1",
            ));
        }
        Ok(WorkerCount::Fixed(n))
    }
}

// Wire shape is `int | "auto"`, matching the configuration surface consumed
// per call, so the serde impls are written by hand.
impl Serialize for WorkerCount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WorkerCount::Auto => serializer.serialize_str("auto"),
            WorkerCount::Fixed(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for WorkerCount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WorkerCountVisitor;

        impl serde::de::Visitor<'_> for WorkerCountVisitor {
            type Value = WorkerCount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive integer or the string \"auto\"")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                if v == 0 {
                    return Err(E::custom("worker_count must be at least 1"));
                }
                Ok(WorkerCount::Fixed(v as usize))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                if v <= 0 {
                    return Err(E::custom("worker_count must be at least 1"));
                }
                Ok(WorkerCount::Fixed(v as usize))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                WorkerCount::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(WorkerCountVisitor)
    }
}

/// Configuration for a pairwise concept-similarity matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConceptMatrixConfig {
    /// Information-content policy.
    pub ic_mode: IcMode,
    /// Concept-similarity algorithm.
    pub cs_mode: CsMode,
    /// Worker pool size.
    #[serde(default)]
    pub workers: WorkerCount,
    /// Divide the final matrix by its largest absolute entry.
    #[serde(default)]
    pub normalize: bool,
}

impl ConceptMatrixConfig {
    /// Create a configuration with default workers and no normalization.
    pub fn new(ic_mode: IcMode, cs_mode: CsMode) -> Self {
        Self {
            ic_mode,
            cs_mode,
            workers: WorkerCount::Auto,
            normalize: false,
        }
    }

    /// Validate the configuration, returning an error if invalid.
    pub fn validate(&self) -> TaxsimResult<()> {
        self.workers.validate()?;
        if self.cs_mode.requires_levels_ic() && self.ic_mode != IcMode::Levels {
            return Err(TaxsimError::invalid_config(format!(
                "cs_mode '{}' is only defined under ic_mode 'levels'",
                self.cs_mode
            )));
        }
        if self.cs_mode.self_comparison().is_none() {
            return Err(TaxsimError::invalid_config(format!(
                "cs_mode '{}' defines no self-comparison and cannot fill a matrix diagonal",
                self.cs_mode
            )));
        }
        Ok(())
    }
}

/// Configuration for a pairwise set-similarity matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetMatrixConfig {
    /// Information-content policy for the underlying CS evaluations.
    pub ic_mode: IcMode,
    /// Concept-similarity algorithm used by CS-aggregating measures.
    pub cs_mode: CsMode,
    /// Set-similarity measure.
    pub setsim_mode: SetSimMode,
    /// Worker pool size.
    #[serde(default)]
    pub workers: WorkerCount,
    /// Divide the final matrix by its largest absolute entry.
    #[serde(default)]
    pub normalize: bool,
    /// Divide each raw set score by `max(|S1|, |S2|)`.
    #[serde(default)]
    pub scale_to_set_sizes: bool,
}

impl SetMatrixConfig {
    /// Create a configuration with default workers and no post-processing.
    pub fn new(ic_mode: IcMode, cs_mode: CsMode, setsim_mode: SetSimMode) -> Self {
        Self {
            ic_mode,
            cs_mode,
            setsim_mode,
            workers: WorkerCount::Auto,
            normalize: false,
            scale_to_set_sizes: false,
        }
    }

    /// Validate the configuration, returning an error if invalid.
    pub fn validate(&self) -> TaxsimResult<()> {
        self.workers.validate()?;
        if self.setsim_mode.uses_concept_similarity()
            && self.cs_mode.requires_levels_ic()
            && self.ic_mode != IcMode::Levels
        {
            return Err(TaxsimError::invalid_config(format!(
                "cs_mode '{}' is only defined under ic_mode 'levels'",
                self.cs_mode
            )));
        }
        Ok(())
    }
}
