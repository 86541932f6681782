/// Source of merchant-side identifiers for a payment attempt.
///
/// Every call must return a value never returned before in this process.
pub trait IdGenerator: Send + Sync {
    /// Identifier for the transaction (`merchantTransactionId`).
    fn transaction_id(&self) -> String;

    /// Identifier for the paying user (`merchantUserId`).
    fn user_id(&self) -> String;
}
