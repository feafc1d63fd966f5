use crate::{db_types::Part, traits::MarketplaceError};

/// The sole gateway for changing a part's stock quantity and derived status.
///
/// Implementations MUST apply the adjustment as a single atomic conditional update, not a read-modify-write, so that
/// concurrent adjustments from competing webhook deliveries cannot race. The stored quantity is floored at zero
/// rather than erroring; oversold protection is handled upstream at checkout validation.
#[allow(async_fn_in_trait)]
pub trait InventoryLedger: Clone {
    /// Applies `quantity = max(0, quantity + delta)` and, in the same statement, sets the part status to `Sold`
    /// when the resulting quantity is zero and back to `Active` when it rises above zero from `Sold`. A part the
    /// seller delisted stays `Inactive` regardless of stock movements.
    ///
    /// Returns the part row as it stands after the adjustment.
    async fn adjust_inventory(&self, part_id: i64, delta: i64) -> Result<Part, MarketplaceError>;
}
