/// Index of a worker (and of the row block it owns), 0-indexed.
pub type Rank = u32;

/// Wire protocol version, checked during the TCP handshake.
pub const PROTOCOL_VERSION: u16 = 1;

/// Largest edge weight accepted from input.
///
/// Every finite distance is the length of a simple path, so a relaxation
/// sum stays below `2 * (n - 1) * MAX_EDGE_WEIGHT`, which fits in `u64`
/// for every `n < MAX_DIMENSION`.
pub const MAX_EDGE_WEIGHT: u64 = 1 << 40;

/// Largest matrix dimension accepted.
pub const MAX_DIMENSION: usize = 1 << 23;

/// Edge weight or path length under min-plus arithmetic.
#[derive(
    rkyv::Archive, rkyv::Serialize, rkyv::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub enum Weight {
    Finite(u64),
    /// No edge / no path. Behaves as +infinity.
    Unreachable,
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weight::Finite(w) => write!(f, "{w}"),
            Weight::Unreachable => f.write_str("-1"),
        }
    }
}

/// One matrix row.
pub type Row = Vec<Weight>;
