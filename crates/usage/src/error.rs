/// Failure modes for the usage ledger. The in-memory driver only ever
/// returns [`UsageError::NegativeAmount`]; a durable driver backed by a real
/// store would add connection/serialization variants here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
    #[error("usage amount must be non-negative, got {0}")]
    NegativeAmount(i64),
}
